use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::shared::format::format_number;

/// Per-request console log line: timestamp, duration, response size, status,
/// method and path. The body is buffered once to report its real size.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => {
            log_line("33", start, "error", parts.status.as_u16(), &method, uri.path());
            return Response::from_parts(parts, Body::default());
        }
    };

    // cyan for 200, yellow for everything else
    let color_code = if parts.status.as_u16() == 200 { "36" } else { "33" };
    let size = format_number(bytes.len());
    log_line(color_code, start, &size, parts.status.as_u16(), &method, uri.path());

    Response::from_parts(parts, Body::from(bytes))
}

fn log_line(
    color_code: &str,
    start: std::time::Instant,
    size: &str,
    status: u16,
    method: &axum::http::Method,
    path: &str,
) {
    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Utc::now().format("%H:%M:%S"),
        start.elapsed().as_millis(),
        size,
        status,
        method,
        path
    );
}
