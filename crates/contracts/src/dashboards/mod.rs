pub mod weekly_report;
