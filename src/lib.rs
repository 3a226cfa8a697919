// cartola - Core Library
// Chilean bank Excel statements → canonical, validated CSV

pub mod banks;
pub mod convert;
pub mod error;
pub mod locale;
pub mod logging;
pub mod mapper;
pub mod schema;
pub mod spreadsheet;
pub mod transaction;
pub mod writer;

// Re-export commonly used types
pub use convert::{
    convert, convert_raw, default_output_path, load_batch, AssumeAnswer, ConvertOutcome,
    ConvertRequest, ConvertSummary, Outcome, OverwritePrompt, RawOutcome, RawRequest,
    RawSummary, Reporter, Silent,
};
pub use error::{Error, Result};
pub use mapper::{
    get_mapper, resolve_mapper, supported_combinations, AmountColumns, BankMapper, ColumnLayout,
};
pub use schema::{Schema, SchemaValidator, ValidationReport, Violation};
pub use spreadsheet::{read_sheet, read_table, Cell, Grid, RawRow, SheetSelector, Table};
pub use transaction::{
    AccountType, Bank, Transaction, TransactionBatch, TransactionType, CANONICAL_FIELDS,
};
pub use writer::{read_transactions, write_batch, write_table, CsvOptions, Encoding};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
