// Banco de Chile - "Movimientos" exports from Banconline

use crate::locale::CHILEAN_DATE_FORMATS;
use crate::mapper::{AmountColumns, BankMapper, ColumnLayout};
use crate::transaction::{AccountType, Bank};

pub const CHECKING_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha"],
    description: &["Descripción", "Descripcion"],
    amounts: AmountColumns::Split {
        debit: &["Cargos (CLP)", "Cargos"],
        credit: &["Abonos (CLP)", "Abonos"],
    },
    balance: Some(&["Saldo (CLP)", "Saldo"]),
    date_formats: CHILEAN_DATE_FORMATS,
};

pub const CREDIT_CARD_LAYOUT: ColumnLayout = ColumnLayout {
    date: &["Fecha"],
    description: &["Descripción", "Descripcion"],
    amounts: AmountColumns::Signed {
        amount: &["Monto ($)", "Monto"],
    },
    balance: None,
    date_formats: CHILEAN_DATE_FORMATS,
};

pub struct BancoChileMapper {
    account_type: AccountType,
}

impl BancoChileMapper {
    pub fn new(account_type: AccountType) -> Self {
        BancoChileMapper { account_type }
    }
}

impl BankMapper for BancoChileMapper {
    fn bank(&self) -> Bank {
        Bank::BancoChile
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
}
