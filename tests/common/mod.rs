// Workbook fixtures shared by the integration tests
#![allow(dead_code)]

use cartola::{AccountType, Bank};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// One cell of a fixture sheet
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

pub use Value::{Blank, Number, Text};

/// Write an .xlsx with the given sheets, in order
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Value>>)]) {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();

        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                match value {
                    Text(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Number(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

/// A small statement as each bank exports it: a title line, a blank line,
/// the header, then two movements (one debit, one credit)
pub fn statement(bank: Bank, account_type: AccountType) -> Vec<Vec<Value<'static>>> {
    let title = vec![Text("Cartola de movimientos")];

    let mut rows = match (bank, account_type) {
        (Bank::Santander, AccountType::Checking) => vec![
            vec![Text("Fecha"), Text("Detalle"), Text("Cargo ($)"), Text("Abono ($)"), Text("Saldo ($)")],
            vec![Text("01/03/2024"), Text("Saldo inicial"), Blank, Blank, Number(500000.0)],
            vec![Text("05/03/2024"), Text("COMPRA  SUPERMERCADO"), Number(15990.0), Blank, Number(484010.0)],
            vec![Text("10/03/2024"), Text("TRANSFERENCIA RECIBIDA"), Blank, Text("$ 250.000"), Number(734010.0)],
        ],
        (Bank::Santander, AccountType::CreditCard) => vec![
            vec![Text("Fecha"), Text("Descripción"), Text("Monto ($)")],
            vec![Text("05/03/2024"), Text("RESTAURANT"), Number(25990.0)],
            vec![Text("10/03/2024"), Text("PAGO TARJETA"), Number(-100000.0)],
        ],
        (Bank::Itau, AccountType::Checking) => vec![
            vec![Text("Fecha"), Text("Descripción"), Text("Cargos"), Text("Abonos"), Text("Saldo")],
            vec![Text("05-03-2024"), Text("GIRO CAJERO"), Text("40.000"), Blank, Text("960.000")],
            vec![Text("10-03-2024"), Text("DEPOSITO"), Blank, Number(120000.0), Text("1.080.000")],
        ],
        (Bank::Itau, AccountType::CreditCard) => vec![
            vec![Text("Fecha operación"), Text("Descripción"), Text("Monto operación")],
            vec![Number(45356.0), Text("FARMACIA"), Number(8490.0)],
            vec![Number(45361.0), Text("PAGO"), Text("-50.000")],
        ],
        (Bank::BancoChile, AccountType::Checking) => vec![
            vec![Text("Fecha"), Text("Descripción"), Text("Cargos (CLP)"), Text("Abonos (CLP)"), Text("Saldo (CLP)")],
            vec![Text("05/03/2024"), Text("PAGO CUENTA LUZ"), Number(32500.0), Blank, Number(467500.0)],
            vec![Text("10/03/2024"), Text("REMUNERACION"), Blank, Number(1200000.0), Number(1667500.0)],
        ],
        (Bank::BancoChile, AccountType::CreditCard) => vec![
            vec![Text("Fecha"), Text("Descripción"), Text("Monto ($)")],
            vec![Text("05/03/2024"), Text("LIBRERIA"), Number(12000.0)],
            vec![Text("10/03/2024"), Text("PAGO"), Number(-12000.0)],
        ],
    };

    let mut sheet = vec![title, vec![]];
    sheet.append(&mut rows);
    sheet
}

/// Every (bank, account type) pair with a mapper
pub fn all_pairs() -> Vec<(Bank, AccountType)> {
    cartola::supported_combinations()
        .into_iter()
        .map(|(bank, account_type, _)| (bank, account_type))
        .collect()
}
