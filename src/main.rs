use anyhow::Result;
use std::env;
use std::fs::{self, File};

use daybook::data;
use daybook::{TransformOptions, DEFAULT_SHEET_NAME, OUTPUT_FILE_NAME};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: cargo run -- <input_file.xlsx> [sheet_name] [output_file]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    if !input_path.ends_with(".xlsx") {
        eprintln!("{} is not an .xlsx file", input_path);
        std::process::exit(1);
    }

    let sheet_name = args.get(2).map(String::as_str).unwrap_or(DEFAULT_SHEET_NAME);
    let output_path = args.get(3).map(String::as_str).unwrap_or(OUTPUT_FILE_NAME);

    let input = File::open(input_path)?;
    let report = match daybook::process(input, &TransformOptions::with_sheet_name(sheet_name)) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        },
    };

    fs::write(output_path, &report.bytes)?;
    data::export_csv(&data::daily_summaries(&report.sheets), std::io::stdout())?;

    Ok(())
}
