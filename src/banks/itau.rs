// Itaú Chile - account and card movement exports

use crate::locale::CHILEAN_DATE_FORMATS;
use crate::mapper::{AmountColumns, BankMapper, ColumnLayout};
use crate::spreadsheet::{normalize_header, RawRow};
use crate::transaction::{AccountType, Bank};

pub const CHECKING_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha"],
    description: &["Descripción", "Descripcion", "Movimiento"],
    amounts: AmountColumns::Split {
        debit: &["Cargos", "Giros o cargos"],
        credit: &["Abonos", "Depósitos o abonos", "Depositos o abonos"],
    },
    balance: Some(&["Saldo", "Saldo diario"]),
    date_formats: CHILEAN_DATE_FORMATS,
};

/// Card exports date by operation, not by posting
pub const CREDIT_CARD_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha operación", "Fecha operacion", "Fecha"],
    description: &["Descripción", "Descripcion", "Detalle"],
    amounts: AmountColumns::Signed {
        amount: &["Monto operación", "Monto operacion", "Monto"],
    },
    balance: None,
    date_formats: CHILEAN_DATE_FORMATS,
};

pub struct ItauMapper {
    account_type: AccountType,
}

impl ItauMapper {
    pub fn new(account_type: AccountType) -> Self {
        ItauMapper { account_type }
    }
}

impl BankMapper for ItauMapper {
    fn bank(&self) -> Bank {
        Bank::Itau
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

    fn skip_row(&self, row: &RawRow) -> bool {
        row.find(self.layout().description)
            .map(|(_, cell)| normalize_header(&cell.to_string()).starts_with("saldo anterior"))
            .unwrap_or(false)
    }
}
