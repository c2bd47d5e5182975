use std::path::PathBuf;

use thiserror::Error;

use super::column::ColumnId;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Format error at line {line}: expected {expected} fields, found {found}")]
    Format {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// `line` counts like `Format`, with the header as line 0.
    #[error("Encoding error at line {line}: invalid UTF-8 at byte {offset}")]
    Encoding { line: usize, offset: usize },

    #[error("Length mismatch: expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// True for both missing files and unknown columns.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::FileNotFound(_) | TableError::ColumnNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
