// Command-line behaviour: exit codes, prompts and output

mod common;

use assert_cmd::Command;
use cartola::{AccountType, Bank};
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cartola() -> Command {
    let mut cmd = Command::cargo_bin("cartola").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CARTOLA_SHEET")
        .env_remove("CARTOLA_DELIMITER")
        .env_remove("CARTOLA_ENCODING");
    cmd
}

#[test]
fn test_convert_success() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cartola_marzo.xlsx");
    write_workbook(&input, &[("Movimientos", statement(Bank::Santander, AccountType::Checking))]);

    cartola()
        .arg("convert")
        .arg(&input)
        .args(["--bank", "santander"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully processed 2 transactions"))
        .stdout(predicate::str::contains("cartola_marzo.csv"));

    let csv = fs::read_to_string(dir.path().join("cartola_marzo.csv")).unwrap();
    assert!(csv.starts_with("date,description,amount,balance,transaction_type,bank_name,account_type\n"));
}

#[test]
fn test_unsupported_bank_exits_one_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("estado.xlsx");
    write_workbook(&input, &[("Hoja1", statement(Bank::Santander, AccountType::Checking))]);

    cartola()
        .arg("convert")
        .arg(&input)
        .args(["--bank", "bancoestado"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported bank: bancoestado"));

    assert!(!dir.path().join("estado.csv").exists());
}

#[test]
fn test_unsupported_account_type_exits_one() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("estado.xlsx");
    write_workbook(&input, &[("Hoja1", statement(Bank::Itau, AccountType::Checking))]);

    cartola()
        .arg("convert")
        .arg(&input)
        .args(["-b", "itau", "-a", "savings"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported account type 'savings'"));
}

#[test]
fn test_missing_input_exits_one() {
    let dir = TempDir::new().unwrap();

    cartola()
        .arg("convert")
        .arg(dir.path().join("no_existe.xlsx"))
        .args(["--bank", "santander"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_usage_error_exits_two() {
    cartola().args(["convert", "x.xlsx"]).assert().code(2);
    cartola().arg("frobnicate").assert().code(2);
}

#[test]
fn test_existing_output_without_force_is_cancelled() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tc.xlsx");
    let output = dir.path().join("tc.csv");
    write_workbook(&input, &[("Hoja1", statement(Bank::BancoChile, AccountType::CreditCard))]);
    fs::write(&output, "previous export").unwrap();

    // No terminal attached, so the answer is "no"
    cartola()
        .arg("convert")
        .arg(&input)
        .args(["-b", "bancochile", "-a", "credit_card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous export");

    cartola()
        .arg("convert")
        .arg(&input)
        .args(["-b", "bancochile", "-a", "credit_card", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&output).unwrap().starts_with("date,"));
}

#[test]
fn test_delimiter_from_environment() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("itau.xlsx");
    let output = dir.path().join("salida.tsv");
    write_workbook(&input, &[("Hoja1", statement(Bank::Itau, AccountType::Checking))]);

    cartola()
        .env("CARTOLA_DELIMITER", "\\t")
        .arg("convert")
        .arg(&input)
        .args(["-b", "itau", "-o"])
        .arg(&output)
        .assert()
        .success();

    let tsv = fs::read_to_string(&output).unwrap();
    assert!(tsv.starts_with("date\tdescription\tamount\t"));
}

#[test]
fn test_invalid_delimiter_exits_one() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("itau.xlsx");
    write_workbook(&input, &[("Hoja1", statement(Bank::Itau, AccountType::Checking))]);

    cartola()
        .arg("convert")
        .arg(&input)
        .args(["-b", "itau", "-d", "||"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid delimiter"));
}

#[test]
fn test_supported_banks_table() {
    cartola()
        .arg("supported-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Santander"))
        .stdout(predicate::str::contains("Itaú"))
        .stdout(predicate::str::contains("Banco de Chile"))
        .stdout(predicate::str::contains("checking (default)"))
        .stdout(predicate::str::contains("credit_card"));
}

#[test]
fn test_supported_banks_json() {
    let output = cartola()
        .args(["supported-banks", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let banks: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let codes: Vec<&str> = banks
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["bank"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["santander", "itau", "bancochile"]);
}

#[test]
fn test_raw_subcommand() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("datos.xlsx");
    write_workbook(
        &input,
        &[(
            "Datos",
            vec![
                vec![Text("Name"), Text("Age"), Text("City")],
                vec![Text("John"), Number(30.0), Text("New York")],
            ],
        )],
    );

    cartola()
        .arg("raw")
        .arg(&input)
        .args(["--sheet", "Datos", "--delimiter", ";"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rows, 3 columns"));

    assert_eq!(
        fs::read_to_string(dir.path().join("datos.csv")).unwrap(),
        "Name;Age;City\nJohn;30;New York\n"
    );
}
