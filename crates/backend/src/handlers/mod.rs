pub mod invoices;
pub mod reports;
