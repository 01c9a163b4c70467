//! Loading an observation table from a spreadsheet or CSV file.
//!
//! Workbooks (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) are read with calamine,
//! CSV files with the csv crate. The first row is always the header.

use super::cell::Cell;
use super::frame::Table;
use crate::error::LoadError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Input formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
}

impl InputFormat {
    /// Detect the format from the file extension.
    pub fn detect(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Csv),
            "" => Err(LoadError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(LoadError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Load a table from `path`.
///
/// `sheet` selects a worksheet by name; the first sheet is used when it is
/// `None`. It is ignored for CSV input.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let table = match InputFormat::detect(path)? {
        InputFormat::Workbook => load_workbook(path, sheet)?,
        InputFormat::Csv => {
            if sheet.is_some() {
                warn!("--sheet is ignored for CSV input");
            }
            load_csv(path)?
        }
    };

    info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    debug!("Workbook sheets: {:?}", sheet_names);

    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| LoadError::SheetNotFound(name.to_string()))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Schema("workbook has no sheets".to_string()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let header = rows
        .next()
        .ok_or_else(|| LoadError::EmptySheet(sheet_name.clone()))?;
    let columns = header.iter().map(|c| c.to_string().trim().to_string()).collect();

    let body = rows
        .map(|row| row.iter().map(data_to_cell).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    Table::new(columns, body)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => Cell::parse(s),
        Data::Empty => Cell::Empty,
        Data::Error(e) => {
            warn!("Spreadsheet error cell: {}", e);
            Cell::Text(e.to_string())
        }
        other => Cell::Text(other.to_string()),
    }
}

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut body = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record.iter().map(Cell::parse).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        body.push(row);
    }

    Table::new(columns, body)
}
