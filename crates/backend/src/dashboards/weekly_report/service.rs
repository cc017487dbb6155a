//! Weekly received/delivered report.
//!
//! Stateless O(n) aggregation over the full invoice list, recomputed per
//! request; with a few hundred invoices there is nothing worth caching.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use contracts::dashboards::weekly_report::{WeeklyReportResponse, DAYS_IN_WEEK};
use contracts::domain::invoices::aggregate::Invoice;
use sea_orm::DatabaseConnection;

use crate::domain::invoices::repository;
use crate::shared::error::ApiError;

/// Sunday on or before `date` (date-fns `startOfWeek` semantics, which the
/// original dashboard used).
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Forward navigation stops at the week containing `today`; any requested
/// week beyond it snaps back. Past weeks are unrestricted.
pub fn clamp_week_start(requested: NaiveDate, today: NaiveDate) -> NaiveDate {
    let requested = start_of_week(requested);
    let current = start_of_week(today);
    if requested > current {
        current
    } else {
        requested
    }
}

/// Aggregate one week of activity. Received buckets by the `today` field,
/// delivered by `delivered_at` (flag set and stamp present only); both are
/// restricted to `[week_start, week_start + 6]` inclusive. Amounts are grand
/// totals recomputed from the rows.
pub fn aggregate_week(invoices: &[Invoice], week_start: NaiveDate) -> WeeklyReportResponse {
    let week_end = week_start + Duration::days(6);
    let in_week = |d: NaiveDate| d >= week_start && d <= week_end;

    let mut received_in = [0u32; DAYS_IN_WEEK];
    let mut received_amount = [0f64; DAYS_IN_WEEK];
    let mut delivered = [0u32; DAYS_IN_WEEK];
    let mut delivered_amount = [0f64; DAYS_IN_WEEK];

    for invoice in invoices {
        let grand_total = invoice.grand_total();

        let received_date = invoice.today.date_naive();
        if in_week(received_date) {
            let day = received_date.weekday().num_days_from_sunday() as usize;
            received_in[day] += 1;
            received_amount[day] += grand_total;
        }

        if invoice.is_delivered {
            if let Some(delivered_at) = invoice.delivered_at {
                let delivered_date = delivered_at.date_naive();
                if in_week(delivered_date) {
                    let day = delivered_date.weekday().num_days_from_sunday() as usize;
                    delivered[day] += 1;
                    delivered_amount[day] += grand_total;
                }
            }
        }
    }

    WeeklyReportResponse {
        week_start,
        week_end,
        total_received: received_in.iter().sum(),
        total_delivered: delivered.iter().sum(),
        total_received_amount: received_amount.iter().sum(),
        total_delivered_amount: delivered_amount.iter().sum(),
        received_in,
        received_amount,
        delivered,
        delivered_amount,
    }
}

/// Fetch-and-aggregate entry point used by the HTTP handler. A missing
/// `week_start` means the current week.
pub async fn get_weekly_report(
    conn: &DatabaseConnection,
    week_start: Option<NaiveDate>,
) -> Result<WeeklyReportResponse, ApiError> {
    let today = Utc::now().date_naive();
    let week_start = clamp_week_start(week_start.unwrap_or(today), today);
    let invoices = repository::list_all(conn).await?;
    Ok(aggregate_week(&invoices, week_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};
    use contracts::domain::invoices::aggregate::{InvoiceId, InvoiceRow};

    fn invoice(today: NaiveDate, delivered_on: Option<NaiveDate>, amount: f64) -> Invoice {
        let midday = |d: NaiveDate| {
            Utc.with_ymd_and_hms(d.year(), d.month(), d.day(), 12, 0, 0)
                .unwrap()
        };
        Invoice {
            id: InvoiceId::new_v4(),
            card_number: format!("C-{}", uuid::Uuid::new_v4()),
            customer_name: "test".into(),
            phone_number: "077".into(),
            selected_date: midday(today),
            today: midday(today),
            advance: 0.0,
            rows: vec![InvoiceRow {
                description: "suit".into(),
                qty: 1.0,
                price: amount,
                total: amount,
            }],
            is_delivered: delivered_on.is_some(),
            delivered_at: delivered_on.map(midday),
            created_at: midday(today),
            updated_at: midday(today),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_of_week_snaps_to_sunday() {
        // 2024-06-09 is a Sunday
        assert_eq!(d(2024, 6, 9).weekday(), Weekday::Sun);
        assert_eq!(start_of_week(d(2024, 6, 9)), d(2024, 6, 9));
        assert_eq!(start_of_week(d(2024, 6, 12)), d(2024, 6, 9));
        assert_eq!(start_of_week(d(2024, 6, 15)), d(2024, 6, 9));
    }

    #[test]
    fn received_series_hits_only_the_right_days() {
        let week_start = d(2024, 6, 9); // Sunday
        let monday = d(2024, 6, 10);
        let wednesday = d(2024, 6, 12);
        let invoices = vec![
            invoice(monday, None, 100.0),
            invoice(wednesday, None, 250.0),
            // outside the week, must not contribute
            invoice(d(2024, 6, 20), None, 999.0),
        ];

        let report = aggregate_week(&invoices, week_start);
        assert_eq!(report.received_in, [0, 1, 0, 1, 0, 0, 0]);
        assert_eq!(report.total_received, 2);
        assert_eq!(report.received_amount[1], 100.0);
        assert_eq!(report.received_amount[3], 250.0);
        assert_eq!(report.total_received_amount, 350.0);
        assert_eq!(report.total_delivered, 0);
    }

    #[test]
    fn delivered_series_requires_flag_and_stamp() {
        let week_start = d(2024, 6, 9);
        let tuesday = d(2024, 6, 11);

        // Received long before the week, delivered inside it.
        let mut delivered_in_week = invoice(d(2024, 5, 1), Some(tuesday), 400.0);
        // Stale stamp without the flag must be ignored.
        let mut stale = invoice(d(2024, 5, 1), Some(tuesday), 50.0);
        stale.is_delivered = false;
        delivered_in_week.is_delivered = true;

        let report = aggregate_week(&[delivered_in_week, stale], week_start);
        assert_eq!(report.delivered, [0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(report.total_delivered, 1);
        assert_eq!(report.total_delivered_amount, 400.0);
        assert_eq!(report.total_received, 0);
    }

    #[test]
    fn week_boundaries_are_inclusive() {
        let week_start = d(2024, 6, 9);
        let saturday = d(2024, 6, 15);
        let invoices = vec![
            invoice(week_start, None, 10.0),
            invoice(saturday, None, 20.0),
        ];
        let report = aggregate_week(&invoices, week_start);
        assert_eq!(report.received_in[0], 1);
        assert_eq!(report.received_in[6], 1);
        assert_eq!(report.week_end, saturday);
    }

    #[test]
    fn forward_navigation_clamps_to_current_week() {
        let today = d(2024, 6, 12);
        let current_week = d(2024, 6, 9);

        assert_eq!(clamp_week_start(d(2024, 6, 23), today), current_week);
        assert_eq!(clamp_week_start(d(2025, 1, 1), today), current_week);
        // past weeks pass through, snapped to Sunday
        assert_eq!(clamp_week_start(d(2024, 6, 5), today), d(2024, 6, 2));
        assert_eq!(clamp_week_start(current_week, today), current_week);
    }
}
