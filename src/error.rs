// ⚠️ Error taxonomy
// Every failure the conversion pipeline can report, mapped to exit code 1 by the CLI

use crate::schema::ValidationReport;
use crate::transaction::Bank;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, mapping, validating or writing a statement.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Could not read {} as a spreadsheet: {reason}", path.display())]
    FileFormat { path: PathBuf, reason: String },

    #[error("Sheet '{selector}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        selector: String,
        available: Vec<String>,
    },

    #[error("Invalid sheet selector: '{0}'")]
    InvalidSheetSelector(String),

    #[error("Unsupported bank: {0} (run `cartola supported-banks`)")]
    UnsupportedBank(String),

    #[error("Unsupported account type '{account_type}' for {}", bank.name())]
    UnsupportedAccountType { bank: Bank, account_type: String },

    #[error("Row {row}, column '{column}': {reason} (value: '{value}')")]
    RowParse {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Schema validation failed: {0}")]
    SchemaValidation(ValidationReport),

    #[error("Sum of {0} amounts is too large to represent")]
    AmountOverflow(&'static str),

    #[error("Invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Character '{ch}' cannot be encoded as {encoding}")]
    Unencodable { encoding: String, ch: char },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// Build a row-level parse error
    pub fn row_parse(row: usize, column: &str, value: &str, reason: impl Into<String>) -> Self {
        Error::RowParse {
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
