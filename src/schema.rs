// 📐 Shape Layer - Schema Validation
// Validates mapped transactions against the canonical schema before they are written

use crate::transaction::{AccountType, Bank, Transaction, TransactionBatch, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

// ============================================================================
// SCHEMA DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Text,
    Decimal,
}

impl FieldKind {
    pub fn name(&self) -> &str {
        match self {
            FieldKind::Date => "date",
            FieldKind::Text => "text",
            FieldKind::Decimal => "decimal",
        }
    }
}

/// Value-level check applied once the type matches
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Text must contain something other than whitespace
    NotBlank,
    /// Text must be one of the listed values
    OneOf(Vec<String>),
    /// Date must fall within the inclusive range
    DateBetween(NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub checks: Vec<Check>,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            required: true,
            checks: Vec::new(),
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            required: false,
            ..FieldSpec::required(name, kind)
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

/// Schema - Declared field set every record must satisfy
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// The bank-agnostic transaction schema
    pub fn canonical() -> Self {
        let earliest = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN);
        let latest = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX);
        let bank_codes = Bank::ALL.iter().map(|b| b.code().to_string()).collect();
        let account_codes = [AccountType::Checking, AccountType::CreditCard]
            .iter()
            .map(|t| t.code().to_string())
            .collect();

        Schema {
            name: "BankTransactions",
            fields: vec![
                FieldSpec::required("date", FieldKind::Date)
                    .with_check(Check::DateBetween(earliest, latest)),
                FieldSpec::required("description", FieldKind::Text).with_check(Check::NotBlank),
                FieldSpec::required("amount", FieldKind::Decimal),
                FieldSpec::optional("balance", FieldKind::Decimal),
                FieldSpec::required("transaction_type", FieldKind::Text).with_check(Check::OneOf(
                    vec!["debit".to_string(), "credit".to_string()],
                )),
                FieldSpec::required("bank_name", FieldKind::Text)
                    .with_check(Check::OneOf(bank_codes)),
                FieldSpec::required("account_type", FieldKind::Text)
                    .with_check(Check::OneOf(account_codes)),
            ],
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

// ============================================================================
// RECORD VALUES
// ============================================================================

/// A typed field value pulled out of a record for checking
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl FieldValue {
    fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Decimal(_) => Some(FieldKind::Decimal),
            FieldValue::Date(_) => Some(FieldKind::Date),
        }
    }
}

fn field_value(tx: &Transaction, name: &str) -> FieldValue {
    match name {
        "date" => FieldValue::Date(tx.date()),
        "description" => FieldValue::Text(tx.description().to_string()),
        "amount" => FieldValue::Decimal(tx.amount()),
        "balance" => tx.balance().map(FieldValue::Decimal).unwrap_or(FieldValue::Null),
        "transaction_type" => FieldValue::Text(tx.transaction_type().as_str().to_string()),
        "bank_name" => FieldValue::Text(tx.bank().code().to_string()),
        "account_type" => FieldValue::Text(tx.account_type().code().to_string()),
        _ => FieldValue::Null,
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// 1-based position of the record in the batch
    pub record: usize,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {} {}: {}", self.record, self.field, self.message)
    }
}

/// ValidationReport - Success flag plus every violation found
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub schema: String,
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "{} records valid against {}", self.checked, self.schema);
        }

        write!(
            f,
            "{} violation(s) in {} records against {}",
            self.violations.len(),
            self.checked,
            self.schema
        )?;
        for violation in self.violations.iter().take(5) {
            write!(f, "; {}", violation)?;
        }
        if self.violations.len() > 5 {
            write!(f, "; ...")?;
        }
        Ok(())
    }
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

pub struct SchemaValidator {
    schema: Schema,
}

impl SchemaValidator {
    pub fn new(schema: Schema) -> Self {
        SchemaValidator { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate a whole batch; never stops at the first problem
    pub fn validate(&self, batch: &TransactionBatch) -> ValidationReport {
        let mut violations = Vec::new();

        for (i, tx) in batch.transactions().iter().enumerate() {
            let record = i + 1;
            violations.extend(self.validate_transaction(tx, record));

            if tx.bank() != batch.bank() {
                violations.push(Violation {
                    record,
                    field: "bank_name".to_string(),
                    message: format!("expected {} like the rest of the batch", batch.bank().code()),
                });
            }
            if tx.account_type() != batch.account_type() {
                violations.push(Violation {
                    record,
                    field: "account_type".to_string(),
                    message: format!(
                        "expected {} like the rest of the batch",
                        batch.account_type().code()
                    ),
                });
            }
        }

        ValidationReport {
            schema: self.schema.name.to_string(),
            checked: batch.len(),
            violations,
        }
    }

    /// Field checks plus the debit/credit sign rule for one record
    pub fn validate_transaction(&self, tx: &Transaction, record: usize) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut fail = |field: &str, message: String| {
            violations.push(Violation {
                record,
                field: field.to_string(),
                message,
            })
        };

        for spec in &self.schema.fields {
            let value = field_value(tx, spec.name);

            let kind = match value.kind() {
                None if spec.required => {
                    fail(spec.name, "required field is missing".to_string());
                    continue;
                }
                None => continue,
                Some(kind) => kind,
            };

            if kind != spec.kind {
                fail(
                    spec.name,
                    format!("expected {}, got {}", spec.kind.name(), kind.name()),
                );
                continue;
            }

            for check in &spec.checks {
                match (check, &value) {
                    (Check::NotBlank, FieldValue::Text(s)) if s.trim().is_empty() => {
                        fail(spec.name, "must not be blank".to_string());
                    }
                    (Check::OneOf(allowed), FieldValue::Text(s)) if !allowed.contains(s) => {
                        fail(
                            spec.name,
                            format!("'{}' is not one of {}", s, allowed.join(", ")),
                        );
                    }
                    (Check::DateBetween(min, max), FieldValue::Date(d)) if d < min || d > max => {
                        fail(
                            spec.name,
                            format!("{} is outside {} to {}", d, min, max),
                        );
                    }
                    _ => {}
                }
            }
        }

        match tx.transaction_type() {
            TransactionType::Debit if tx.amount() > Decimal::ZERO => fail(
                "amount",
                format!("debit must not be positive, got {}", tx.amount()),
            ),
            TransactionType::Credit if tx.amount() < Decimal::ZERO => fail(
                "amount",
                format!("credit must not be negative, got {}", tx.amount()),
            ),
            _ => {}
        }

        violations
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(Schema::canonical())
    }
}

// ============================================================================
// TESTS
// ============================================================================
