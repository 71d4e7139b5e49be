use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::ledger::daily::DailySheet;
use crate::ledger::SheetRow;

pub const OUTPUT_HEADERS: [&str; 5] = ["Object Code", "Net Amount", "Object Code1", "Net Amount Again", "Total"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("amount {0} cannot be written as a number")]
    Amount(Decimal),
}

/// Serializes the daily sheets, in order, into an xlsx document.
pub fn write_workbook(sheets: &[DailySheet]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            write_row(worksheet, index as u32 + 1, row)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_row<R: SheetRow>(worksheet: &mut Worksheet, row: u32, cells: &R) -> Result<(), ReportError> {
    // Blank cells are left unwritten.
    if let Some(code) = cells.salary_code().filter(|code| !code.is_empty()) {
        worksheet.write_string(row, 0, code)?;
    }
    if let Some(amount) = cells.salary_amount() {
        worksheet.write_number(row, 1, number(amount)?)?;
    }
    if let Some(code) = cells.other_code().filter(|code| !code.is_empty()) {
        worksheet.write_string(row, 2, code)?;
    }
    if let Some(amount) = cells.other_amount() {
        worksheet.write_number(row, 3, number(amount)?)?;
    }
    worksheet.write_number(row, 4, number(cells.total())?)?;

    Ok(())
}

fn number(amount: Decimal) -> Result<f64, ReportError> {
    amount.to_f64().ok_or(ReportError::Amount(amount))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use anyhow::Result;
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::ledger::bucket::Classifier;
    use crate::ledger::record::Record;

    #[test]
    fn test_write_workbook_layout() -> Result<()> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let records = vec![
            Record::new(date, "NoObject", dec!(100)),
            Record::new(date, "Travel", dec!(50.25)),
        ];
        let sheet = DailySheet::build(date, &records, &Classifier::default())?.unwrap();

        let bytes = write_workbook(&[sheet])?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice()))?;
        assert_eq!(workbook.sheet_names(), vec!["05-01-2024".to_string()]);

        let range = workbook.worksheet_range("05-01-2024")?;
        let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
        assert_eq!(
            rows,
            vec![
                OUTPUT_HEADERS.iter().map(|h| Data::String(h.to_string())).collect::<Vec<_>>(),
                vec![
                    Data::String("NoObject".into()),
                    Data::Float(100.0),
                    Data::Empty,
                    Data::Empty,
                    Data::Float(100.0),
                ],
                vec![
                    Data::Empty,
                    Data::Empty,
                    Data::String("Travel".into()),
                    Data::Float(50.25),
                    Data::Float(50.25),
                ],
                vec![
                    Data::String("Grand Total".into()),
                    Data::Float(100.0),
                    Data::Empty,
                    Data::Float(50.25),
                    Data::Float(150.25),
                ],
            ]
        );

        Ok(())
    }

    #[test]
    fn test_write_workbook_keeps_sheet_order() -> Result<()> {
        let first = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let second = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let records = vec![Record::new(first, "Salary", dec!(1)), Record::new(second, "Rent", dec!(2))];
        let sheets = vec![
            DailySheet::build(first, &records[..1], &Classifier::default())?.unwrap(),
            DailySheet::build(second, &records[1..], &Classifier::default())?.unwrap(),
        ];

        let bytes = write_workbook(&sheets)?;
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice()))?;

        assert_eq!(workbook.sheet_names(), vec!["31-12-2023".to_string(), "02-01-2024".to_string()]);

        Ok(())
    }
}
