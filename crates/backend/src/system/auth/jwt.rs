use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Session tokens are short-lived; there is no refresh or revocation, a token
/// simply stays valid until this expiry.
const TOKEN_LIFETIME_HOURS: i64 = 1;

/// Cookie lifetime matching the token expiry, for the Set-Cookie header.
pub const COOKIE_MAX_AGE_SECONDS: i64 = TOKEN_LIFETIME_HOURS * 3600;

pub fn generate_token(secret: &str, user_id: &str, username: &str) -> Result<String> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode session token")
}

pub fn validate_token(secret: &str, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode session token")?;

    Ok(token_data.claims)
}

/// Generate a random 256-bit secret, used when config.toml does not pin one.
pub fn generate_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}
