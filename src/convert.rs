// 🔁 Conversion Pipeline
// reader → mapper → validator → writer, all-or-nothing per invocation

use crate::error::{Error, Result};
use crate::mapper::{resolve_mapper, BankMapper};
use crate::schema::{SchemaValidator, ValidationReport};
use crate::spreadsheet::{read_sheet, read_table, SheetSelector};
use crate::transaction::{AccountType, Bank, TransactionBatch};
use crate::writer::{write_batch, write_table, CsvOptions};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// COLLABORATORS
// ============================================================================

/// Asks whether an existing output file may be replaced
pub trait OverwritePrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool>;
}

/// Fixed answer, for non-interactive runs
pub struct AssumeAnswer(pub bool);

impl OverwritePrompt for AssumeAnswer {
    fn confirm_overwrite(&mut self, _path: &Path) -> Result<bool> {
        Ok(self.0)
    }
}

/// Progress hooks; every method is optional
pub trait Reporter {
    fn loading(&mut self, _bank: Bank, _account_type: AccountType) {}

    fn loaded(&mut self, _batch: &TransactionBatch) {}

    fn validated(&mut self, _report: &ValidationReport) {}
}

/// Reporter that ignores every event
pub struct Silent;

impl Reporter for Silent {}

// ============================================================================
// REQUESTS & OUTCOMES
// ============================================================================

/// Everything the `convert` command needs
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub sheet: SheetSelector,
    pub csv: CsvOptions,
    pub force: bool,
    pub bank: String,
    pub account_type: Option<String>,
    pub validate: bool,
}

impl ConvertRequest {
    pub fn new(input: impl Into<PathBuf>, bank: impl Into<String>) -> Self {
        ConvertRequest {
            input: input.into(),
            output: None,
            sheet: SheetSelector::default(),
            csv: CsvOptions::default(),
            force: false,
            bank: bank.into(),
            account_type: None,
            validate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheet_name: String,
    pub bank: Bank,
    pub account_type: AccountType,
    pub transactions: usize,
    pub validated: bool,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

/// Everything the `raw` command needs
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub sheet: SheetSelector,
    pub csv: CsvOptions,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheet_name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Terminal states of a run that didn't fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Written(T),
    /// The user declined to overwrite an existing file
    Cancelled { output: PathBuf },
}

pub type ConvertOutcome = Outcome<ConvertSummary>;
pub type RawOutcome = Outcome<RawSummary>;

// ============================================================================
// PIPELINE
// ============================================================================

/// Input path with its extension swapped for `.csv`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// Pick the output path and make sure we may write to it
///
/// Returns `None` when the user declines to overwrite.
fn prepare_output(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    prompt: &mut dyn OverwritePrompt,
) -> Result<Option<PathBuf>> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.to_path_buf()));
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    if output.exists() && !force && !prompt.confirm_overwrite(&output)? {
        info!("Overwrite of {} declined", output.display());
        return Ok(None);
    }

    Ok(Some(output))
}

/// Read the statement and map it with the given mapper
pub fn load_batch(
    input: &Path,
    sheet: &SheetSelector,
    mapper: &dyn BankMapper,
) -> Result<(TransactionBatch, String)> {
    let grid = read_sheet(input, sheet)?;
    let header_index = mapper.locate_header(&grid)?;
    debug!(
        row = grid.row_number(header_index),
        sheet = %grid.sheet_name,
        "Using header row"
    );

    let table = grid.into_table(header_index);
    mapper.layout().check_headers(&table.headers, table.header_row)?;
    let batch = mapper.map(&table.rows)?;
    Ok((batch, table.sheet_name))
}

/// Convert one bank statement into canonical CSV
pub fn convert(
    request: &ConvertRequest,
    prompt: &mut dyn OverwritePrompt,
    reporter: &mut dyn Reporter,
) -> Result<ConvertOutcome> {
    // Unknown bank or account type fails before any file is touched
    let mapper = resolve_mapper(&request.bank, request.account_type.as_deref())?;

    let output = match prepare_output(
        &request.input,
        request.output.as_deref(),
        request.force,
        prompt,
    )? {
        Some(path) => path,
        None => {
            return Ok(Outcome::Cancelled {
                output: request
                    .output
                    .clone()
                    .unwrap_or_else(|| default_output_path(&request.input)),
            })
        }
    };

    reporter.loading(mapper.bank(), mapper.account_type());
    let (batch, sheet_name) = load_batch(&request.input, &request.sheet, mapper.as_ref())?;
    reporter.loaded(&batch);

    if request.validate {
        let report = SchemaValidator::default().validate(&batch);
        reporter.validated(&report);
        if !report.is_valid() {
            return Err(Error::SchemaValidation(report));
        }
    }

    let (total_debits, total_credits) = batch.totals()?;
    let written = write_batch(&batch, &output, &request.csv)?;

    info!(
        bank = batch.bank().code(),
        account_type = batch.account_type().code(),
        transactions = written,
        "Converted {} → {}",
        request.input.display(),
        output.display()
    );

    Ok(Outcome::Written(ConvertSummary {
        input: request.input.clone(),
        output,
        sheet_name,
        bank: batch.bank(),
        account_type: batch.account_type(),
        transactions: written,
        validated: request.validate,
        total_debits,
        total_credits,
    }))
}

/// Copy a worksheet to CSV as-is, first row as header
pub fn convert_raw(request: &RawRequest, prompt: &mut dyn OverwritePrompt) -> Result<RawOutcome> {
    let output = match prepare_output(
        &request.input,
        request.output.as_deref(),
        request.force,
        prompt,
    )? {
        Some(path) => path,
        None => {
            return Ok(Outcome::Cancelled {
                output: request
                    .output
                    .clone()
                    .unwrap_or_else(|| default_output_path(&request.input)),
            })
        }
    };

    let table = read_table(&request.input, &request.sheet)?;
    let rows = write_table(&table, &output, &request.csv)?;

    info!(rows, "Copied {} → {}", request.input.display(), output.display());

    Ok(Outcome::Written(RawSummary {
        input: request.input.clone(),
        output,
        sheet_name: table.sheet_name,
        rows,
        columns: table.headers.len(),
    }))
}

// ============================================================================
// TESTS
// ============================================================================
