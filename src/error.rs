use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JangbuError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook not found: {}", .0.display())]
    MissingWorkbook(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet {} is out of range for {} ({} sheets)", .sheet, .path.display(), .count)]
    SheetOutOfRange {
        path: PathBuf,
        sheet: usize,
        count: usize,
    },

    #[error("No data rows left after skipping {skip} rows")]
    EmptySheet { skip: usize },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, JangbuError>;
