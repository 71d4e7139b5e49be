use chrono::NaiveDate;
use getset::Getters;
use rust_decimal::Decimal;

/// A ledger entry that survived cleaning: it always has a calendar date and a
/// numeric amount.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Record {
    date: NaiveDate,
    code: String,
    amount: Decimal,
}

impl Record {
    pub fn new(date: NaiveDate, code: impl Into<String>, amount: Decimal) -> Record {
        Record {
            date,
            code: code.into(),
            amount,
        }
    }
}
