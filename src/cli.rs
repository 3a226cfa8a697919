//! CLI argument definitions using clap
//!
//! - cartola convert <file> --bank <name>   # bank statement → canonical CSV
//! - cartola supported-banks                # list bank/account-type pairs
//! - cartola raw <file>                     # plain worksheet → CSV

use cartola::{ConvertRequest, CsvOptions, RawRequest, SheetSelector};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cartola")]
#[command(about = "Convert Chilean bank Excel statements into normalized CSV")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a bank statement workbook into canonical transaction CSV
    Convert {
        /// Path to the Excel file to convert
        input_file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Bank that issued the statement (see `supported-banks`)
        #[arg(short, long)]
        bank: String,

        /// Account type; defaults to the bank's checking account
        #[arg(short, long)]
        account_type: Option<String>,

        #[command(flatten)]
        validation: ValidationArgs,
    },

    /// List supported bank and account-type combinations
    SupportedBanks {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a worksheet to CSV without any bank mapping
    Raw {
        /// Path to the Excel file to convert
        input_file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Output options shared by `convert` and `raw`
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output CSV path (defaults to the input path with a .csv extension)
    #[arg(short, long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Sheet name or 0-based index
    #[arg(short, long, alias = "sheet-name", default_value = "0", env = "CARTOLA_SHEET")]
    pub sheet: String,

    /// Field delimiter (a single character; `\t` for tab)
    #[arg(short, long, default_value = ",", env = "CARTOLA_DELIMITER")]
    pub delimiter: String,

    /// Output encoding: utf-8, utf-8-sig or latin-1
    #[arg(short, long, default_value = "utf-8", env = "CARTOLA_ENCODING")]
    pub encoding: String,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,
}

/// `--validate` / `--no-validate`; the last one given wins
#[derive(Args, Debug)]
pub struct ValidationArgs {
    /// Validate output against the schema before saving (default)
    #[arg(long, overrides_with = "no_validate")]
    pub validate: bool,

    /// Skip schema validation
    #[arg(long = "no-validate", overrides_with = "validate")]
    pub no_validate: bool,
}

impl ValidationArgs {
    /// On unless `--no-validate` was the last switch given
    pub fn enabled(&self) -> bool {
        self.validate || !self.no_validate
    }
}

impl OutputArgs {
    pub fn sheet_selector(&self) -> cartola::Result<SheetSelector> {
        self.sheet.parse()
    }

    pub fn csv_options(&self) -> cartola::Result<CsvOptions> {
        CsvOptions::parse(&self.delimiter, &self.encoding)
    }
}

/// Build the library request for `convert`
pub fn convert_request(
    input_file: PathBuf,
    output: &OutputArgs,
    bank: String,
    account_type: Option<String>,
    validation: &ValidationArgs,
) -> cartola::Result<ConvertRequest> {
    Ok(ConvertRequest {
        input: input_file,
        output: output.output_file.clone(),
        sheet: output.sheet_selector()?,
        csv: output.csv_options()?,
        force: output.force,
        bank,
        account_type,
        validate: validation.enabled(),
    })
}

/// Build the library request for `raw`
pub fn raw_request(input_file: PathBuf, output: &OutputArgs) -> cartola::Result<RawRequest> {
    Ok(RawRequest {
        input: input_file,
        output: output.output_file.clone(),
        sheet: output.sheet_selector()?,
        csv: output.csv_options()?,
        force: output.force,
    })
}
