// 🏗️ Mapper Framework
// One mapper per bank × account type, all producing the canonical Transaction

use crate::banks::{BancoChileMapper, ItauMapper, SantanderMapper};
use crate::error::{Error, Result};
use crate::locale::{parse_amount, parse_date};
use crate::spreadsheet::{normalize_header, Cell, Grid, RawRow};
use crate::transaction::{AccountType, Bank, Transaction, TransactionBatch, TransactionType};
use rust_decimal::Decimal;
use tracing::debug;

// ============================================================================
// COLUMN LAYOUTS
// ============================================================================

/// Where the money columns live in a bank export
#[derive(Debug, Clone, Copy)]
pub enum AmountColumns {
    /// Separate cargo (debit) and abono (credit) columns, both written as positive
    Split {
        debit: &'static [&'static str],
        credit: &'static [&'static str],
    },
    /// One column where charges are positive and payments negative
    Signed { amount: &'static [&'static str] },
}

/// ColumnLayout - Hardcoded header names (with accepted aliases) for one export format
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    pub date: &'static [&'static str],
    pub description: &'static [&'static str],
    pub amounts: AmountColumns,
    pub balance: Option<&'static [&'static str]>,
    pub date_formats: &'static [&'static str],
}

impl ColumnLayout {
    /// Alias lists of every column the mapper reads; the first alias is the display name
    pub fn required_columns(&self) -> Vec<&'static [&'static str]> {
        let mut columns = vec![self.date, self.description];
        match self.amounts {
            AmountColumns::Split { debit, credit } => {
                columns.push(debit);
                columns.push(credit);
            }
            AmountColumns::Signed { amount } => columns.push(amount),
        }
        if let Some(balance) = self.balance {
            columns.push(balance);
        }
        columns
    }

    /// Does this row look like the header line of the export?
    pub fn matches_header(&self, cells: &[Cell]) -> bool {
        let names: Vec<String> = cells
            .iter()
            .map(|c| normalize_header(&c.to_string()))
            .collect();
        let has = |aliases: &[&str]| {
            aliases
                .iter()
                .any(|alias| names.contains(&normalize_header(alias)))
        };
        has(self.date) && has(self.description)
    }

    /// Fail on the first required column missing from the header line
    ///
    /// Runs before any data row is looked at, so a sheet with a header and
    /// nothing under it is still checked.
    pub fn check_headers(&self, headers: &[String], header_row: usize) -> Result<()> {
        let names: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

        for aliases in self.required_columns() {
            let present = aliases
                .iter()
                .any(|alias| names.contains(&normalize_header(alias)));
            if !present {
                return Err(Error::row_parse(
                    header_row,
                    aliases[0],
                    "",
                    "missing required column",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// MAPPER TRAIT
// ============================================================================

/// BankMapper - Raw spreadsheet rows → canonical transactions
///
/// Adding a bank means adding a layout and implementing this trait; the
/// lookup in `get_mapper` is the only place that needs to know about it.
pub trait BankMapper: Send + Sync {
    fn bank(&self) -> Bank;

    fn account_type(&self) -> AccountType;

    /// Header names this export uses
    fn layout(&self) -> &'static ColumnLayout;

    /// Mapper version (for log output)
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Bank-specific informational rows (opening balance and similar) to leave out
    fn skip_row(&self, _row: &RawRow) -> bool {
        false
    }

    /// Index of the header line within the sheet
    ///
    /// Bank exports usually start with a few lines of account details, so
    /// the first row carrying both the date and description headers wins.
    /// A sheet without such a row (a summary sheet, the wrong tab) is rejected.
    fn locate_header(&self, grid: &Grid) -> Result<usize> {
        let layout = self.layout();
        grid.find_header_row(|cells| layout.matches_header(cells))
            .ok_or_else(|| {
                Error::row_parse(
                    grid.row_number(0),
                    layout.date[0],
                    "",
                    format!(
                        "no header row with '{}' and '{}' in sheet '{}'",
                        layout.date[0], layout.description[0], grid.sheet_name
                    ),
                )
            })
    }

    /// Map every row, aborting on the first one that can't be parsed
    fn map(&self, rows: &[RawRow]) -> Result<TransactionBatch> {
        map_rows(self, rows)
    }
}

/// Layout-driven mapping shared by all banks
pub fn map_rows<M: BankMapper + ?Sized>(mapper: &M, rows: &[RawRow]) -> Result<TransactionBatch> {
    let layout = mapper.layout();
    let mut batch = TransactionBatch::new(mapper.bank(), mapper.account_type());

    if let Some(first) = rows.first() {
        check_columns(layout, first)?;
    }

    for row in rows {
        let (date_header, date_cell) = column(row, layout.date)?;

        // Footers, subtotals and separators have no date
        if date_cell.is_empty() {
            debug!(row = row.row, "Skipping row without date");
            continue;
        }
        if mapper.skip_row(row) {
            debug!(row = row.row, "Skipping informational row");
            continue;
        }

        let date = parse_date(date_cell, layout.date_formats).ok_or_else(|| {
            Error::row_parse(row.row, date_header, &date_cell.to_string(), "unrecognized date")
        })?;

        let (_, description_cell) = column(row, layout.description)?;
        let description = description_cell
            .to_string()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let (amount, transaction_type) = match layout.amounts {
            AmountColumns::Split { debit, credit } => split_amount(row, debit, credit)?,
            AmountColumns::Signed { amount } => signed_amount(row, amount)?,
        };

        let balance = match layout.balance {
            Some(aliases) => {
                let (header, cell) = column(row, aliases)?;
                amount_cell(row, header, cell)?
            }
            None => None,
        };

        batch.push(Transaction::new(
            date,
            description,
            amount,
            balance,
            transaction_type,
            mapper.bank(),
            mapper.account_type(),
        ));
    }

    debug!(
        bank = mapper.bank().code(),
        account_type = mapper.account_type().code(),
        mapper_version = mapper.version(),
        transactions = batch.len(),
        "Mapped rows"
    );

    Ok(batch)
}

fn check_columns(layout: &ColumnLayout, first: &RawRow) -> Result<()> {
    for aliases in layout.required_columns() {
        column(first, aliases)?;
    }
    Ok(())
}

fn column<'a>(row: &'a RawRow, aliases: &[&str]) -> Result<(&'a str, &'a Cell)> {
    row.find(aliases).ok_or_else(|| {
        Error::row_parse(row.row, aliases[0], "", "missing required column")
    })
}

fn amount_cell(row: &RawRow, header: &str, cell: &Cell) -> Result<Option<Decimal>> {
    parse_amount(cell)
        .map_err(|_| Error::row_parse(row.row, header, &cell.to_string(), "unrecognized amount"))
}

fn split_amount(
    row: &RawRow,
    debit: &[&str],
    credit: &[&str],
) -> Result<(Decimal, TransactionType)> {
    let (debit_header, debit_cell) = column(row, debit)?;
    let (credit_header, credit_cell) = column(row, credit)?;

    let non_zero = |v: Option<Decimal>| v.filter(|d| !d.is_zero());
    let debit_value = non_zero(amount_cell(row, debit_header, debit_cell)?);
    let credit_value = non_zero(amount_cell(row, credit_header, credit_cell)?);

    match (debit_value, credit_value) {
        (Some(d), None) => Ok((-d.abs(), TransactionType::Debit)),
        (None, Some(c)) => Ok((c.abs(), TransactionType::Credit)),
        (None, None) => Err(Error::row_parse(
            row.row,
            debit_header,
            "",
            format!("neither '{}' nor '{}' has an amount", debit_header, credit_header),
        )),
        (Some(_), Some(_)) => Err(Error::row_parse(
            row.row,
            credit_header,
            &credit_cell.to_string(),
            format!("both '{}' and '{}' have an amount", debit_header, credit_header),
        )),
    }
}

fn signed_amount(row: &RawRow, aliases: &[&str]) -> Result<(Decimal, TransactionType)> {
    let (header, cell) = column(row, aliases)?;
    let value = amount_cell(row, header, cell)?
        .ok_or_else(|| Error::row_parse(row.row, header, "", "missing amount"))?;

    // Card statements list charges as positive numbers
    if value > Decimal::ZERO {
        Ok((-value, TransactionType::Debit))
    } else {
        Ok((value.abs(), TransactionType::Credit))
    }
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Get the mapper for a bank and account type
pub fn get_mapper(bank: Bank, account_type: AccountType) -> Box<dyn BankMapper> {
    match bank {
        Bank::Santander => Box::new(SantanderMapper::new(account_type)),
        Bank::Itau => Box::new(ItauMapper::new(account_type)),
        Bank::BancoChile => Box::new(BancoChileMapper::new(account_type)),
    }
}

/// Resolve user-supplied names to a mapper
///
/// The bank's default account type applies when none is given.
pub fn resolve_mapper(bank: &str, account_type: Option<&str>) -> Result<Box<dyn BankMapper>> {
    let bank: Bank = bank.parse()?;
    let account_type = match account_type {
        Some(name) => AccountType::parse_for(bank, name)?,
        None => bank.default_account_type(),
    };
    Ok(get_mapper(bank, account_type))
}

/// Every supported (bank, account type, is default) combination
pub fn supported_combinations() -> Vec<(Bank, AccountType, bool)> {
    Bank::ALL
        .iter()
        .flat_map(|bank| {
            bank.account_types()
                .iter()
                .map(move |t| (*bank, *t, *t == bank.default_account_type()))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
