// 🧾 Canonical Transaction Model
// Bank-agnostic record shape that every mapper produces

use crate::error::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical CSV header, in output order
pub const CANONICAL_FIELDS: [&str; 7] = [
    "date",
    "description",
    "amount",
    "balance",
    "transaction_type",
    "bank_name",
    "account_type",
];

// ============================================================================
// BANKS & ACCOUNT TYPES
// ============================================================================

/// Bank - Which institution issued the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Santander,
    Itau,
    BancoChile,
}

impl Bank {
    pub const ALL: [Bank; 3] = [Bank::Santander, Bank::Itau, Bank::BancoChile];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Bank::Santander => "Santander",
            Bank::Itau => "Itaú",
            Bank::BancoChile => "Banco de Chile",
        }
    }

    /// Short code used on the command line and in the CSV output
    pub fn code(&self) -> &'static str {
        match self {
            Bank::Santander => "santander",
            Bank::Itau => "itau",
            Bank::BancoChile => "bancochile",
        }
    }

    /// Account types this bank has a mapper for, default first
    pub fn account_types(&self) -> &'static [AccountType] {
        &[AccountType::Checking, AccountType::CreditCard]
    }

    /// Account type used when the user doesn't name one
    pub fn default_account_type(&self) -> AccountType {
        self.account_types()[0]
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .replace('ú', "u")
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        match key.as_str() {
            "santander" => Ok(Bank::Santander),
            "itau" => Ok(Bank::Itau),
            "bancochile" | "bancodechile" => Ok(Bank::BancoChile),
            _ => Err(Error::UnsupportedBank(s.to_string())),
        }
    }
}

/// AccountType - Which product the statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Cuenta corriente
    Checking,
    /// Tarjeta de crédito
    CreditCard,
}

impl AccountType {
    pub fn name(&self) -> &'static str {
        match self {
            AccountType::Checking => "Cuenta Corriente",
            AccountType::CreditCard => "Tarjeta de Crédito",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::CreditCard => "credit_card",
        }
    }

    /// Resolve an account type name for a specific bank
    pub fn parse_for(bank: Bank, s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        bank.account_types()
            .iter()
            .copied()
            .find(|t| t.code() == key)
            .ok_or_else(|| Error::UnsupportedAccountType {
                bank,
                account_type: s.to_string(),
            })
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// TransactionType - Direction of the money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money out (cargo)
    Debit,
    /// Money in (abono)
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Transaction - One canonical statement line
///
/// Amounts are signed: negative for debits, positive for credits.
/// Fields are private so a record can't change after a mapper builds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    amount: Decimal,
    balance: Option<Decimal>,
    transaction_type: TransactionType,
    #[serde(rename = "bank_name")]
    bank: Bank,
    account_type: AccountType,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: String,
        amount: Decimal,
        balance: Option<Decimal>,
        transaction_type: TransactionType,
        bank: Bank,
        account_type: AccountType,
    ) -> Self {
        Transaction {
            date,
            description,
            amount,
            balance,
            transaction_type,
            bank,
            account_type,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }
}

// ============================================================================
// BATCH
// ============================================================================

/// TransactionBatch - Everything one statement produced, in sheet order
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBatch {
    bank: Bank,
    account_type: AccountType,
    transactions: Vec<Transaction>,
}

impl TransactionBatch {
    pub fn new(bank: Bank, account_type: AccountType) -> Self {
        TransactionBatch {
            bank,
            account_type,
            transactions: Vec::new(),
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of debits and sum of credits, both as positive magnitudes
    ///
    /// Fails with `AmountOverflow` when a sum leaves the `Decimal` range.
    pub fn totals(&self) -> Result<(Decimal, Decimal)> {
        self.transactions
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(debits, credits), tx| {
                let magnitude = tx.amount.abs();
                match tx.transaction_type {
                    TransactionType::Debit => debits
                        .checked_add(magnitude)
                        .map(|d| (d, credits))
                        .ok_or(Error::AmountOverflow(TransactionType::Debit.as_str())),
                    TransactionType::Credit => credits
                        .checked_add(magnitude)
                        .map(|c| (debits, c))
                        .ok_or(Error::AmountOverflow(TransactionType::Credit.as_str())),
                }
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================
