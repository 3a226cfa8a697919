//! Terminal output: status lines, spinner, overwrite prompt

use cartola::{
    supported_combinations, AccountType, Bank, OverwritePrompt, Reporter, TransactionBatch,
    ValidationReport,
};
use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a labelled value
pub fn field(label: &str, value: &str) {
    println!("{} {}", format!("{}:", label).cyan().bold(), value);
}

/// Print a warning message
pub fn warn(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn cancelled() {
    println!("{}", "Operation cancelled.".red().bold());
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Spinner while the workbook is read and mapped, then a short report
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn loading(&mut self, bank: Bank, _account_type: AccountType) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Processing {} transactions...", bank.name()).blue().bold().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn loaded(&mut self, batch: &TransactionBatch) {
        self.clear_spinner();
        field(
            "Bank",
            &format!("{} - {}", batch.bank().name(), batch.account_type().name()),
        );
        field("Transactions", &format!("{} records", batch.len()));
    }

    fn validated(&mut self, report: &ValidationReport) {
        if report.is_valid() {
            success("Validation successful");
        } else {
            eprintln!("{} {}", "✗".red().bold(), "Validation failed".red());
            for violation in &report.violations {
                eprintln!("  {}", violation.to_string().dimmed());
            }
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}

// ============================================================================
// OVERWRITE PROMPT
// ============================================================================

/// Asks on the terminal, defaulting to "no"
pub struct TerminalPrompt;

impl OverwritePrompt for TerminalPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> cartola::Result<bool> {
        Confirm::new()
            .with_prompt(format!(
                "Output file '{}' already exists. Overwrite?",
                path.display()
            ))
            .default(false)
            .interact()
            .map_err(|e| cartola::Error::Prompt(e.to_string()))
    }
}

/// Used when nobody can answer: never overwrites
pub struct NonInteractivePrompt;

impl OverwritePrompt for NonInteractivePrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> cartola::Result<bool> {
        warn(&format!(
            "Output file '{}' already exists and no terminal is attached; use --force to overwrite",
            path.display()
        ));
        Ok(false)
    }
}

/// Terminal prompt when someone can answer it, otherwise a fixed "no"
pub fn overwrite_prompt() -> Box<dyn OverwritePrompt> {
    if std::io::stdin().is_terminal() && console::user_attended_stderr() {
        Box::new(TerminalPrompt)
    } else {
        Box::new(NonInteractivePrompt)
    }
}

// ============================================================================
// SUPPORTED BANKS
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BankListing {
    pub bank: &'static str,
    pub name: &'static str,
    pub account_types: Vec<&'static str>,
    pub default_account_type: &'static str,
}

pub fn bank_listings() -> Vec<BankListing> {
    let combos = supported_combinations();
    Bank::ALL
        .iter()
        .map(|bank| BankListing {
            bank: bank.code(),
            name: bank.name(),
            account_types: combos
                .iter()
                .filter(|(b, _, _)| b == bank)
                .map(|(_, t, _)| t.code())
                .collect(),
            default_account_type: bank.default_account_type().code(),
        })
        .collect()
}

pub fn print_supported_banks(json: bool) -> anyhow::Result<()> {
    let listings = bank_listings();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    println!("{}", "Supported banks".bold().underline());
    println!();
    println!(
        "{} {} {}",
        format!("{:<16}", "Bank").bold(),
        format!("{:<12}", "Code").bold(),
        "Account types".bold()
    );
    for listing in &listings {
        let types: Vec<String> = listing
            .account_types
            .iter()
            .map(|t| {
                if *t == listing.default_account_type {
                    format!("{} (default)", t)
                } else {
                    t.to_string()
                }
            })
            .collect();
        println!("{:<16} {:<12} {}", listing.name, listing.bank, types.join(", "));
    }
    Ok(())
}
