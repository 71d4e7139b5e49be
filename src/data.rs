use std::io::{Cursor, Write};
use std::str::FromStr;

use anyhow::Result;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::ledger::book::Ledger;
use crate::ledger::daily::DailySheet;
use crate::ledger::record::Record;

pub const DATE_HEADER: &str = "T.V.Date";
pub const CODE_HEADER: &str = "Object Code";
pub const AMOUNT_HEADER: &str = "Net Amt";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
// Month first, falling back to day first when the month would be out of range.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%m.%d.%Y", "%d.%m.%Y",
];

// Last serial Excel can represent, 9999-12-31.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const MIN_AMOUNT: f64 = 1e-28;

static EMPTY_CELL: Data = Data::Empty;

#[derive(Debug, Error)]
pub enum LedgerDataError {
    #[error("sheet \"{0}\" not found")]
    SheetNotFound(String),
    #[error("missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("amount {0} is out of range")]
    AmountOutOfRange(String),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Column positions of the three required headers.
struct ColumnMap {
    date: usize,
    code: usize,
    amount: usize,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Result<ColumnMap, LedgerDataError> {
        let position = |name: &str| header.iter().position(|cell| cell.to_string() == name);

        match (position(DATE_HEADER), position(CODE_HEADER), position(AMOUNT_HEADER)) {
            (Some(date), Some(code), Some(amount)) => Ok(ColumnMap { date, code, amount }),
            (date, code, amount) => {
                let missing = [(date, DATE_HEADER), (code, CODE_HEADER), (amount, AMOUNT_HEADER)]
                    .into_iter()
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect();
                Err(LedgerDataError::MissingColumns(missing))
            },
        }
    }
}

/// Reads `sheet_name` from an in-memory workbook into a cleaned ledger.
///
/// Rows without a usable date are dropped. Non-numeric amounts become zero.
pub fn read_ledger(bytes: &[u8], sheet_name: &str) -> Result<Ledger, LedgerDataError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(LedgerDataError::SheetNotFound(sheet_name.to_string()));
    }

    let range = workbook.worksheet_range(sheet_name)?;
    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => ColumnMap::from_header(header)?,
        None => ColumnMap::from_header(&[])?,
    };

    let mut ledger = Ledger::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(is_blank) {
            continue;
        }

        let cell = |column: usize| row.get(column).unwrap_or(&EMPTY_CELL);
        let Some(date) = parse_date(cell(columns.date)) else {
            debug!("dropping row {}, invalid date {:?}", index + 2, cell(columns.date));
            continue;
        };

        ledger.push(Record::new(date, code_text(cell(columns.code)), parse_amount(cell(columns.amount))?));
    }

    Ok(ledger)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn parse_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|dt| dt.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_text(s),
        Data::Float(serial) => serial_to_date(*serial),
        Data::Int(serial) => serial_to_date(*serial as f64),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| dt.date())
        .or_else(|| DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(text, format).ok()))
}

/// Converts a 1900-system spreadsheet serial to its calendar date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }

    let days = serial.trunc() as i64;
    // Serials below 61 predate the phantom 1900-02-29.
    let epoch = if days < 61 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_signed(Duration::days(days))
}

/// Coerces an amount cell. Missing or non-numeric cells become zero; numbers
/// too large for a `Decimal` are an error.
pub fn parse_amount(cell: &Data) -> Result<Decimal, LedgerDataError> {
    let amount = match cell {
        Data::Float(value) => Some(decimal_from_f64(*value)?),
        Data::Int(value) => Some(Decimal::from(*value)),
        Data::Bool(value) => Some(if *value { Decimal::ONE } else { Decimal::ZERO }),
        Data::String(s) => parse_amount_text(s)?,
        _ => None,
    };

    Ok(amount.unwrap_or_else(|| {
        if !is_blank(cell) {
            debug!("amount {:?} is not numeric, using 0", cell);
        }
        Decimal::ZERO
    }))
}

fn parse_amount_text(text: &str) -> Result<Option<Decimal>, LedgerDataError> {
    let text = text.trim();
    if let Ok(amount) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Ok(Some(amount));
    }

    match text.parse::<f64>() {
        Ok(value) => decimal_from_f64(value).map(Some),
        Err(_) => Ok(None),
    }
}

fn decimal_from_f64(value: f64) -> Result<Decimal, LedgerDataError> {
    // NaN is a missing amount; anything below 28 decimal places rounds to zero.
    if value.is_nan() || value.abs() < MIN_AMOUNT {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_f64(value).ok_or_else(|| LedgerDataError::AmountOutOfRange(value.to_string()))
}

pub fn code_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(value) if value.is_finite() && value.fract() == 0.0 => format!("{:.0}", value),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => dt.to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

/// Per-day totals of one daily sheet, as exported to CSV.
#[derive(Debug, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub entries: usize,
    pub salary_total: Decimal,
    pub other_total: Decimal,
    pub total: Decimal,
}

impl From<&DailySheet> for DailySummary {
    fn from(sheet: &DailySheet) -> Self {
        let summary = sheet.summary().cloned().unwrap_or_default();
        DailySummary {
            date: sheet.name(),
            entries: sheet.details().count(),
            salary_total: summary.salary_total,
            other_total: summary.other_total,
            total: summary.total,
        }
    }
}

pub fn daily_summaries(sheets: &[DailySheet]) -> Vec<DailySummary> {
    sheets.iter().map(DailySummary::from).collect()
}

pub fn export_csv<W: Write>(summaries: &[DailySummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }

    csv_writer.flush()?;

    Ok(())
}
