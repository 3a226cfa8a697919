// cartola - bank statement converter CLI
//
// Exit codes: 0 success or cancelled overwrite, 1 conversion failure,
// 2 usage error (reported by clap)

mod cli;
mod terminal;

use anyhow::{Context, Result};
use cartola::{convert, convert_raw, logging, Outcome};
use clap::Parser;
use cli::{Cli, Commands};
use terminal::ConsoleReporter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            terminal::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input_file,
            output,
            bank,
            account_type,
            validation,
        } => {
            let request = cli::convert_request(input_file, &output, bank, account_type, &validation)?;
            let mut prompt = terminal::overwrite_prompt();
            let mut reporter = ConsoleReporter::new();

            let outcome = convert(&request, prompt.as_mut(), &mut reporter)
                .with_context(|| format!("Failed to convert {}", request.input.display()))?;

            match outcome {
                Outcome::Written(summary) => {
                    terminal::success(&format!(
                        "Successfully processed {} transactions",
                        summary.transactions
                    ));
                    terminal::field("Sheet", &summary.sheet_name);
                    terminal::field(
                        "Totals",
                        &format!(
                            "debits {} / credits {}",
                            summary.total_debits, summary.total_credits
                        ),
                    );
                    if !summary.validated {
                        terminal::warn("Schema validation skipped (--no-validate)");
                    }
                    terminal::field("Output saved to", &summary.output.display().to_string());
                }
                Outcome::Cancelled { .. } => terminal::cancelled(),
            }
        }

        Commands::SupportedBanks { json } => terminal::print_supported_banks(json)?,

        Commands::Raw { input_file, output } => {
            let request = cli::raw_request(input_file, &output)?;
            let mut prompt = terminal::overwrite_prompt();

            let outcome = convert_raw(&request, prompt.as_mut())
                .with_context(|| format!("Failed to convert {}", request.input.display()))?;

            match outcome {
                Outcome::Written(summary) => {
                    terminal::success(&format!(
                        "Converted sheet '{}' ({} rows, {} columns)",
                        summary.sheet_name, summary.rows, summary.columns
                    ));
                    terminal::field("Output saved to", &summary.output.display().to_string());
                }
                Outcome::Cancelled { .. } => terminal::cancelled(),
            }
        }
    }

    Ok(())
}
