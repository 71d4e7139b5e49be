use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use thiserror::Error;

pub mod book;
pub mod bucket;
pub mod daily;
pub mod record;


use bucket::{Bucket, Classifier, SubstringClassifier};
use daily::{DetailRow, OutputRow, SummaryRow};
use rust_decimal::Decimal;

#[derive(Debug, PartialEq, Error)]
pub enum LedgerError {
    #[error("totals for {0} overflow")]
    TotalOverflow(NaiveDate),
}

/// Decides which bucket a category code belongs to.
#[enum_dispatch]
pub trait Classify {
    fn classify(&self, code: &str) -> Bucket;
}

/// A single row of a daily sheet, in output column order.
#[enum_dispatch]
pub trait SheetRow {
    fn salary_code(&self) -> Option<&str>;
    fn salary_amount(&self) -> Option<Decimal>;
    fn other_code(&self) -> Option<&str>;
    fn other_amount(&self) -> Option<Decimal>;
    fn total(&self) -> Decimal;
}
