use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One slot per day of week, index 0 = Sunday .. 6 = Saturday.
pub const DAYS_IN_WEEK: usize = 7;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportRequest {
    /// Start of the requested week (any date inside the week is accepted;
    /// the server snaps it to Sunday and clamps it to the current week).
    pub week_start: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,

    /// Invoices received per day of week, bucketed by their `today` date.
    pub received_in: [u32; DAYS_IN_WEEK],
    /// Grand totals of invoices received per day of week.
    pub received_amount: [f64; DAYS_IN_WEEK],
    /// Invoices delivered per day of week, bucketed by `deliveredAt`.
    pub delivered: [u32; DAYS_IN_WEEK],
    /// Grand totals of invoices delivered per day of week.
    pub delivered_amount: [f64; DAYS_IN_WEEK],

    pub total_received: u32,
    pub total_delivered: u32,
    pub total_received_amount: f64,
    pub total_delivered_amount: f64,
}
