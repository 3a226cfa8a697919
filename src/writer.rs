// 💾 CSV Writer
// Serializes batches (or raw tables) with a configurable delimiter and encoding

use crate::error::{Error, Result};
use crate::spreadsheet::Table;
use crate::transaction::{Transaction, TransactionBatch, CANONICAL_FIELDS};
use csv::{ReaderBuilder, WriterBuilder};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// OPTIONS
// ============================================================================

/// Output text encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// UTF-8 with a byte-order mark, which Excel needs to detect UTF-8
    Utf8Bom,
    /// ISO-8859-1
    Latin1,
}

impl Encoding {
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8-sig",
            Encoding::Latin1 => "latin-1",
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf8Bom => {
                let mut bytes = vec![0xEF, 0xBB, 0xBF];
                bytes.extend_from_slice(text.as_bytes());
                Ok(bytes)
            }
            Encoding::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| Error::Unencodable {
                        encoding: self.label().to_string(),
                        ch,
                    })
                })
                .collect(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| Error::io("<decoded text>", io::Error::new(io::ErrorKind::InvalidData, e)))
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|b| char::from(*b)).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Encoding::Utf8Bom),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(Encoding::Latin1),
            _ => Err(Error::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a delimiter argument; `\t` and `tab` mean a tab
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
                _ => Err(Error::InvalidDelimiter(s.to_string())),
            }
        }
    }
}

/// CsvOptions - How delimited text is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: Encoding,
}

impl CsvOptions {
    /// Build options from command-line style strings
    pub fn parse(delimiter: &str, encoding: &str) -> Result<Self> {
        Ok(CsvOptions {
            delimiter: parse_delimiter(delimiter)?,
            encoding: encoding.parse()?,
        })
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            encoding: Encoding::Utf8,
        }
    }
}

// ============================================================================
// WRITING
// ============================================================================

/// Write a batch with the canonical header; returns the number of records
///
/// The whole file is encoded in memory first so an encoding failure never
/// leaves a truncated file behind.
pub fn write_batch(batch: &TransactionBatch, path: &Path, options: &CsvOptions) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    // serde only emits the header together with the first record
    if batch.is_empty() {
        writer.write_record(CANONICAL_FIELDS)?;
    }
    for tx in batch.transactions() {
        writer.serialize(tx)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::io(path, e.into_error()))?;
    persist(path, &bytes, options)?;

    debug!(records = batch.len(), encoding = %options.encoding, "Wrote {}", path.display());
    Ok(batch.len())
}

/// Write a raw table: its headers, then every row's cells as displayed text
pub fn write_table(table: &Table, path: &Path, options: &CsvOptions) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.cells().map(|cell| cell.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::io(path, e.into_error()))?;
    persist(path, &bytes, options)?;

    debug!(rows = table.rows.len(), "Wrote {}", path.display());
    Ok(table.rows.len())
}

fn persist(path: &Path, utf8: &[u8], options: &CsvOptions) -> Result<()> {
    let text = std::str::from_utf8(utf8)
        .map_err(|e| Error::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
    let encoded = options.encoding.encode(text)?;
    fs::write(path, encoded).map_err(|e| Error::io(path, e))
}

// ============================================================================
// READING BACK
// ============================================================================

/// Load canonical records written by `write_batch`
pub fn read_transactions(path: &Path, options: &CsvOptions) -> Result<Vec<Transaction>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = options.encoding.decode(&bytes)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut transactions = Vec::new();
    for result in reader.deserialize() {
        transactions.push(result?);
    }
    Ok(transactions)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::{Cell, RawRow};
    use crate::transaction::{AccountType, Bank, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_batch() -> TransactionBatch {
        let mut batch = TransactionBatch::new(Bank::BancoChile, AccountType::Checking);
        batch.push(Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "Compra, Líder Ñuñoa".to_string(),
            Decimal::new(-23_990, 0),
            Some(Decimal::new(476_010, 0)),
            TransactionType::Debit,
            Bank::BancoChile,
            AccountType::Checking,
        ));
        batch.push(Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            "Abono remuneraciones".to_string(),
            Decimal::new(1_200_000, 0),
            None,
            TransactionType::Credit,
            Bank::BancoChile,
            AccountType::Checking,
        ));
        batch
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(matches!(parse_delimiter(";;"), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(parse_delimiter("¦"), Err(Error::InvalidDelimiter(_))));
        assert!(matches!(parse_delimiter(""), Err(Error::InvalidDelimiter(_))));
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("utf_8_sig".parse::<Encoding>().unwrap(), Encoding::Utf8Bom);
        assert_eq!("ISO-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!(matches!(
            "shift_jis".parse::<Encoding>(),
            Err(Error::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_latin1_encoding() {
        assert_eq!(Encoding::Latin1.encode("Ñuñoa").unwrap(), vec![0xD1, b'u', 0xF1, b'o', b'a']);
        assert!(matches!(
            Encoding::Latin1.encode("€"),
            Err(Error::Unencodable { ch: '€', .. })
        ));
    }

    #[test]
    fn test_write_batch_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = write_batch(&sample_batch(), &path, &CsvOptions::default()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(written, 2);
        assert_eq!(lines[0], CANONICAL_FIELDS.join(","));
        assert_eq!(
            lines[1],
            "2024-03-15,\"Compra, Líder Ñuñoa\",-23990,476010,debit,bancochile,checking"
        );
        assert_eq!(lines[2], "2024-03-16,Abono remuneraciones,1200000,,credit,bancochile,checking");
    }

    #[test]
    fn test_write_empty_batch_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let batch = TransactionBatch::new(Bank::Itau, AccountType::CreditCard);

        write_batch(&batch, &path, &CsvOptions::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), CANONICAL_FIELDS.join(","));
    }

    #[test]
    fn test_round_trip_with_semicolon_and_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        let options = CsvOptions::parse(";", "latin-1").unwrap();
        let batch = sample_batch();

        write_batch(&batch, &path, &options).unwrap();
        let bytes = fs::read(&path).unwrap();
        let header_end = bytes.iter().position(|b| *b == b'\n').unwrap();
        let header = std::str::from_utf8(&bytes[..header_end]).unwrap();

        assert!(header.contains(';'));
        assert!(!header.contains(','));

        let loaded = read_transactions(&path, &options).unwrap();
        assert_eq!(loaded, batch.transactions().to_vec());
    }

    #[test]
    fn test_utf8_bom_is_written_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        let options = CsvOptions::parse(",", "utf-8-sig").unwrap();

        write_batch(&sample_batch(), &path, &options).unwrap();

        assert!(fs::read(&path).unwrap().starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(read_transactions(&path, &options).unwrap().len(), 2);
    }

    #[test]
    fn test_unencodable_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.csv");
        let mut batch = TransactionBatch::new(Bank::Santander, AccountType::CreditCard);
        batch.push(Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "Suscripción €".to_string(),
            Decimal::new(-9_990, 0),
            None,
            TransactionType::Debit,
            Bank::Santander,
            AccountType::CreditCard,
        ));

        let result = write_batch(&batch, &path, &CsvOptions::parse(",", "latin1").unwrap());

        assert!(matches!(result, Err(Error::Unencodable { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let result = write_batch(&sample_batch(), &path, &CsvOptions::default());
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_write_table_raw_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        let table = Table {
            sheet_name: "Hoja1".to_string(),
            headers: vec!["Name".to_string(), "Age".to_string(), "City".to_string()],
            header_row: 1,
            rows: vec![RawRow::new(
                2,
                vec![
                    ("Name".to_string(), Cell::Text("John".to_string())),
                    ("Age".to_string(), Cell::Float(30.0)),
                    ("City".to_string(), Cell::Text("New York".to_string())),
                ],
            )],
        };

        let rows = write_table(&table, &path, &CsvOptions::parse(";", "utf-8").unwrap()).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name;Age;City\nJohn;30;New York\n");
    }
}
