// Santander Chile - "Cartola" downloads from Office Banking

use crate::locale::CHILEAN_DATE_FORMATS;
use crate::mapper::{AmountColumns, BankMapper, ColumnLayout};
use crate::spreadsheet::{normalize_header, RawRow};
use crate::transaction::{AccountType, Bank};

/// Cuenta corriente: FECHA | DETALLE | CARGO ($) | ABONO ($) | SALDO ($)
pub const CHECKING_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha"],
    description: &["Detalle", "Descripción", "Descripcion"],
    amounts: AmountColumns::Split {
        debit: &["Cargo ($)", "Cargos", "Monto cargo ($)"],
        credit: &["Abono ($)", "Abonos", "Monto abono ($)"],
    },
    balance: Some(&["Saldo ($)", "Saldo"]),
    date_formats: CHILEAN_DATE_FORMATS,
};

/// Tarjeta de crédito: Fecha | Descripción | Monto ($)
pub const CREDIT_CARD_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha"],
    description: &["Descripción", "Descripcion", "Detalle"],
    amounts: AmountColumns::Signed {
        amount: &["Monto ($)", "Monto"],
    },
    balance: None,
    date_formats: CHILEAN_DATE_FORMATS,
};

pub struct SantanderMapper {
    account_type: AccountType,
}

impl SantanderMapper {
    pub fn new(account_type: AccountType) -> Self {
        SantanderMapper { account_type }
    }
}

impl BankMapper for SantanderMapper {
    fn bank(&self) -> Bank {
        Bank::Santander
    }

    fn account_type(&self) -> AccountType {
        self.account_type
    }

    fn layout(&self) -> &'static ColumnLayout {
        match self.account_type {
            AccountType::Checking => &CHECKING_LAYOUT,
            AccountType::CreditCard => &CREDIT_CARD_LAYOUT,
        }
    }

    // Checking cartolas open and close with dated balance lines
    fn skip_row(&self, row: &RawRow) -> bool {
        if self.account_type != AccountType::Checking {
            return false;
        }
        row.find(CHECKING_LAYOUT.description)
            .map(|(_, cell)| {
                let desc = normalize_header(&cell.to_string());
                desc.starts_with("saldo inicial") || desc.starts_with("saldo final")
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Cell;
    use crate::transaction::TransactionType;
    use rust_decimal::Decimal;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_checking_skips_balance_lines() {
        let mapper = SantanderMapper::new(AccountType::Checking);
        let row = |n, desc: &str, debit: Cell, credit: Cell| {
            RawRow::new(
                n,
                vec![
                    ("FECHA".to_string(), text("01/03/2024")),
                    ("DETALLE".to_string(), text(desc)),
                    ("CARGO ($)".to_string(), debit),
                    ("ABONO ($)".to_string(), credit),
                    ("SALDO ($)".to_string(), text("1.500.000")),
                ],
            )
        };
        let rows = vec![
            row(10, "SALDO INICIAL", Cell::Empty, Cell::Empty),
            row(11, "PAGO EN LINEA SERVIPAG", text("35.990"), Cell::Empty),
            row(12, "Saldo Final", Cell::Empty, Cell::Empty),
        ];

        let batch = mapper.map(&rows).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.transactions()[0].amount(), Decimal::new(-35_990, 0));
        assert_eq!(batch.transactions()[0].balance(), Some(Decimal::new(1_500_000, 0)));
    }

    #[test]
    fn test_credit_card_charges_and_payments() {
        let mapper = SantanderMapper::new(AccountType::CreditCard);
        let rows = vec![
            RawRow::new(
                4,
                vec![
                    ("Fecha".to_string(), text("05/03/2024")),
                    ("Descripción".to_string(), text("MERCADOPAGO *UBER")),
                    ("Monto ($)".to_string(), text("$ 7.450")),
                ],
            ),
            RawRow::new(
                5,
                vec![
                    ("Fecha".to_string(), text("10/03/2024")),
                    ("Descripción".to_string(), text("PAGO TARJETA")),
                    ("Monto ($)".to_string(), text("-$150.000")),
                ],
            ),
        ];

        let batch = mapper.map(&rows).unwrap();
        let txs = batch.transactions();

        assert_eq!(txs[0].transaction_type(), TransactionType::Debit);
        assert_eq!(txs[0].amount(), Decimal::new(-7_450, 0));
        assert_eq!(txs[0].balance(), None);
        assert_eq!(txs[1].transaction_type(), TransactionType::Credit);
        assert_eq!(txs[1].amount(), Decimal::new(150_000, 0));
    }
}
