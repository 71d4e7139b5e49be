use std::error::Error as StdError;
use std::io::{Cursor, Read};

use log::{error, info, warn};
use thiserror::Error;

pub mod data;
pub mod ledger;
pub mod report;

use data::LedgerDataError;
use ledger::bucket::Classifier;
use ledger::daily::{build_daily_sheets, DailySheet};
use ledger::LedgerError;
use report::ReportError;

/// Sheet read when the caller does not name one.
pub const DEFAULT_SHEET_NAME: &str = "Table 1 (2)";
pub const OUTPUT_FILE_NAME: &str = "processed_report.xlsx";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("sheet \"{0}\" not found")]
    InvalidSheet(String),
    #[error("missing required column(s): {}", .0.join(", "))]
    Schema(Vec<String>),
    #[error("processing failed: {0}")]
    Processing(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<LedgerDataError> for TransformError {
    fn from(err: LedgerDataError) -> Self {
        match err {
            LedgerDataError::SheetNotFound(name) => TransformError::InvalidSheet(name),
            LedgerDataError::MissingColumns(columns) => TransformError::Schema(columns),
            other => TransformError::Processing(Box::new(other)),
        }
    }
}

impl From<LedgerError> for TransformError {
    fn from(err: LedgerError) -> Self {
        TransformError::Processing(Box::new(err))
    }
}

impl From<ReportError> for TransformError {
    fn from(err: ReportError) -> Self {
        TransformError::Processing(Box::new(err))
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Processing(Box::new(err))
    }
}

/// The single outcome callers see when a transform fails, whatever the cause.
#[derive(Debug, Error)]
#[error("Error processing file. Please ensure the sheet \"{sheet_name}\" exists and the data is correctly formatted.")]
pub struct ProcessingFailed {
    pub sheet_name: String,
}

#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub sheet_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl TransformOptions {
    pub fn with_sheet_name(sheet_name: impl Into<String>) -> TransformOptions {
        TransformOptions {
            sheet_name: sheet_name.into(),
        }
    }
}

/// A finished transform: the daily sheets and their serialized workbook.
#[derive(Debug)]
pub struct Report {
    pub sheets: Vec<DailySheet>,
    pub bytes: Vec<u8>,
}

impl Report {
    pub fn into_cursor(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }
}

/// Reads the ledger sheet, splits it into daily sheets and writes the output
/// workbook. Errors keep their cause.
pub fn try_transform<R: Read>(mut input: R, options: &TransformOptions) -> Result<Report, TransformError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let ledger = data::read_ledger(&bytes, &options.sheet_name)?;
    info!("read {} records from sheet \"{}\"", ledger.len(), options.sheet_name);
    if ledger.is_empty() {
        warn!("no dated records in sheet \"{}\"", options.sheet_name);
    }

    let sheets = build_daily_sheets(&ledger, &Classifier::default())?;
    let bytes = report::write_workbook(&sheets)?;
    info!("wrote {} daily sheets ({} bytes)", sheets.len(), bytes.len());

    Ok(Report { sheets, bytes })
}

/// Like [`try_transform`], but every failure collapses into [`ProcessingFailed`]
/// after being logged.
pub fn process<R: Read>(input: R, options: &TransformOptions) -> Result<Report, ProcessingFailed> {
    try_transform(input, options).map_err(|err| {
        error!("failed to process sheet \"{}\": {}", options.sheet_name, err);
        ProcessingFailed {
            sheet_name: options.sheet_name.clone(),
        }
    })
}

/// Transforms a ledger workbook into the daily report, returned as a buffer
/// positioned at its start.
pub fn transform<R: Read>(input: R, sheet_name: &str) -> Result<Cursor<Vec<u8>>, ProcessingFailed> {
    process(input, &TransformOptions::with_sheet_name(sheet_name)).map(Report::into_cursor)
}
