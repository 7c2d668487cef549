//! Table and JSON rendering for command results.

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
}

/// Print rows to stdout in the chosen format.
pub fn render<T: Tabled + Serialize>(format: Format, rows: &[T]) -> Result<()> {
    println!("{}", to_string(format, rows)?);
    Ok(())
}

pub fn to_string<T: Tabled + Serialize>(format: Format, rows: &[T]) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(rows)?),
        Format::Table => {
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            Ok(table.to_string())
        }
    }
}

pub fn timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
