use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use log::debug;
use rust_decimal::Decimal;

use super::book::Ledger;
use super::bucket::Bucket;
use super::record::Record;
use super::{Classify, LedgerError, SheetRow};

/// Daily sheets are named `DD-MM-YYYY`.
pub const SHEET_NAME_FORMAT: &str = "%d-%m-%Y";
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

#[enum_dispatch(SheetRow)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputRow {
    DetailRow,
    SummaryRow,
}

/// One ledger record placed in the column pair of its bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    code: String,
    amount: Decimal,
    bucket: Bucket,
}

impl DetailRow {
    pub fn new(code: impl Into<String>, amount: Decimal, bucket: Bucket) -> DetailRow {
        DetailRow {
            code: code.into(),
            amount,
            bucket,
        }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    fn in_bucket(&self, bucket: Bucket) -> bool {
        self.bucket == bucket
    }
}

impl SheetRow for DetailRow {
    fn salary_code(&self) -> Option<&str> {
        self.in_bucket(Bucket::Salary).then_some(self.code.as_str())
    }

    fn salary_amount(&self) -> Option<Decimal> {
        self.in_bucket(Bucket::Salary).then_some(self.amount)
    }

    fn other_code(&self) -> Option<&str> {
        self.in_bucket(Bucket::Other).then_some(self.code.as_str())
    }

    fn other_amount(&self) -> Option<Decimal> {
        self.in_bucket(Bucket::Other).then_some(self.amount)
    }

    fn total(&self) -> Decimal {
        self.amount
    }
}

/// The `Grand Total` row closing a daily sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryRow {
    pub salary_total: Decimal,
    pub other_total: Decimal,
    pub total: Decimal,
}

impl SummaryRow {
    /// Returns `None` when a total overflows.
    fn add(&mut self, bucket: Bucket, amount: Decimal) -> Option<()> {
        let bucket_total = match bucket {
            Bucket::Salary => &mut self.salary_total,
            Bucket::Other => &mut self.other_total,
        };
        *bucket_total = bucket_total.checked_add(amount)?;
        self.total = self.total.checked_add(amount)?;

        Some(())
    }
}

impl SheetRow for SummaryRow {
    fn salary_code(&self) -> Option<&str> {
        Some(GRAND_TOTAL_LABEL)
    }

    fn salary_amount(&self) -> Option<Decimal> {
        Some(self.salary_total)
    }

    fn other_code(&self) -> Option<&str> {
        None
    }

    fn other_amount(&self) -> Option<Decimal> {
        Some(self.other_total)
    }

    fn total(&self) -> Decimal {
        self.total
    }
}

/// The output rows of one calendar day: every detail row, then one summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySheet {
    pub date: NaiveDate,
    pub rows: Vec<OutputRow>,
}

impl DailySheet {
    /// Returns `Ok(None)` when no record maps to `date`; such a day gets no sheet.
    pub fn build<'a, C, I>(date: NaiveDate, records: I, classifier: &C) -> Result<Option<DailySheet>, LedgerError>
    where
        C: Classify + ?Sized,
        I: IntoIterator<Item = &'a Record>,
    {
        let mut rows = Vec::new();
        let mut summary = SummaryRow::default();

        for record in records {
            let bucket = classifier.classify(record.code());
            summary
                .add(bucket, *record.amount())
                .ok_or(LedgerError::TotalOverflow(date))?;
            rows.push(OutputRow::from(DetailRow::new(record.code().as_str(), *record.amount(), bucket)));
        }

        if rows.is_empty() {
            debug!("no records for {}, skipping sheet", date);
            return Ok(None);
        }

        rows.push(OutputRow::from(summary));
        Ok(Some(DailySheet { date, rows }))
    }

    pub fn name(&self) -> String {
        self.date.format(SHEET_NAME_FORMAT).to_string()
    }

    pub fn details(&self) -> impl Iterator<Item = &DetailRow> {
        self.rows.iter().filter_map(|row| match row {
            OutputRow::DetailRow(detail) => Some(detail),
            OutputRow::SummaryRow(_) => None,
        })
    }

    pub fn summary(&self) -> Option<&SummaryRow> {
        self.rows.iter().rev().find_map(|row| match row {
            OutputRow::SummaryRow(summary) => Some(summary),
            OutputRow::DetailRow(_) => None,
        })
    }
}

/// Builds one sheet per distinct date in the ledger, ascending by date.
pub fn build_daily_sheets<C>(ledger: &Ledger, classifier: &C) -> Result<Vec<DailySheet>, LedgerError>
where
    C: Classify + ?Sized,
{
    let mut sheets = Vec::new();
    for (date, indices) in ledger.daily_groups() {
        if let Some(sheet) = DailySheet::build(date, ledger.records_at(&indices), classifier)? {
            sheets.push(sheet);
        }
    }

    Ok(sheets)
}
