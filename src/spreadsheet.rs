// 📊 Spreadsheet Reader
// Opens a workbook, picks one sheet, and turns it into rows of named columns

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// SHEET SELECTOR
// ============================================================================

/// SheetSelector - Which worksheet to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// 0-based position in the workbook
    Index(usize),
    /// Sheet name (exact match first, then case-insensitive)
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidSheetSelector(s.to_string()));
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let index = trimmed
                .parse()
                .map_err(|_| Error::InvalidSheetSelector(s.to_string()))?;
            return Ok(SheetSelector::Index(index));
        }
        Ok(SheetSelector::Name(trimmed.to_string()))
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "{}", i),
            SheetSelector::Name(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// CELLS & ROWS
// ============================================================================

/// Cell - One spreadsheet value, detached from the workbook library
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Formula error such as `#DIV/0!`
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Float(*f),
            Data::Int(i) => Cell::Int(*i),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => Cell::DateTime(value),
                None => Cell::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => NaiveDateTime::from_str(s)
                .ok()
                .or_else(|| {
                    NaiveDate::from_str(s)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .map(Cell::DateTime)
                .unwrap_or_else(|| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) if dt.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Error(e) => f.write_str(e),
        }
    }
}

/// Lowercase, trim and collapse inner whitespace so header lookups ignore layout noise
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// RawRow - One data row keyed by its column headers
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number as shown by spreadsheet applications
    pub row: usize,
    cells: Vec<(String, Cell)>,
}

impl RawRow {
    pub fn new(row: usize, cells: Vec<(String, Cell)>) -> Self {
        RawRow { row, cells }
    }

    /// Cell under an exact header name
    pub fn get(&self, header: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, cell)| cell)
    }

    /// First column whose normalized header matches one of the aliases
    pub fn find(&self, aliases: &[&str]) -> Option<(&str, &Cell)> {
        aliases.iter().find_map(|alias| {
            let wanted = normalize_header(alias);
            self.cells
                .iter()
                .find(|(name, _)| normalize_header(name) == wanted)
                .map(|(name, cell)| (name.as_str(), cell))
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, cell)| cell)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.is_empty())
    }
}

// ============================================================================
// GRID & TABLE
// ============================================================================

/// Grid - The used range of one worksheet, before a header row is chosen
#[derive(Debug, Clone)]
pub struct Grid {
    pub sheet_name: String,
    /// 0-based absolute index of `rows[0]` in the worksheet
    first_row: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(sheet_name: impl Into<String>, first_row: usize, rows: Vec<Vec<Cell>>) -> Self {
        Grid {
            sheet_name: sheet_name.into(),
            first_row,
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// 1-based spreadsheet row number of `rows[index]`
    pub fn row_number(&self, index: usize) -> usize {
        self.first_row + index + 1
    }

    /// Index of the first row whose cells satisfy the predicate
    pub fn find_header_row<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&[Cell]) -> bool,
    {
        self.rows.iter().position(|row| predicate(row))
    }

    /// Use `rows[header_index]` as column names and everything below as data
    ///
    /// Blank header cells become `column_N`, repeated names get a `.N` suffix,
    /// and rows with no content are dropped.
    pub fn into_table(self, header_index: usize) -> Table {
        let header_row = self.row_number(header_index);
        let mut rows = self.rows.into_iter().skip(header_index);

        let mut headers: Vec<String> = Vec::new();
        if let Some(cells) = rows.next() {
            for (i, cell) in cells.iter().enumerate() {
                let base = match cell {
                    c if c.is_empty() => format!("column_{}", i + 1),
                    c => c.to_string().trim().to_string(),
                };
                let mut name = base.clone();
                let mut n = 1;
                while headers.contains(&name) {
                    name = format!("{}.{}", base, n);
                    n += 1;
                }
                headers.push(name);
            }
        }

        let raw_rows = rows
            .enumerate()
            .filter_map(|(offset, cells)| {
                let row = RawRow::new(
                    header_row + offset + 1,
                    headers
                        .iter()
                        .enumerate()
                        .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or(Cell::Empty)))
                        .collect(),
                );
                (!row.is_blank()).then_some(row)
            })
            .collect();

        Table {
            sheet_name: self.sheet_name,
            headers,
            header_row,
            rows: raw_rows,
        }
    }
}

/// Table - Header names plus the data rows underneath them
#[derive(Debug, Clone)]
pub struct Table {
    pub sheet_name: String,
    pub headers: Vec<String>,
    /// 1-based row number of the header line
    pub header_row: usize,
    pub rows: Vec<RawRow>,
}

// ============================================================================
// WORKBOOK ACCESS
// ============================================================================

/// Read the used range of the selected worksheet
pub fn read_sheet(path: &Path, selector: &SheetSelector) -> Result<Grid> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| Error::FileFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let available = workbook.sheet_names();
    let sheet_name = resolve_sheet(&available, selector).ok_or_else(|| Error::SheetNotFound {
        selector: selector.to_string(),
        available: available.clone(),
    })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::FileFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    debug!(
        sheet = %sheet_name,
        rows = rows.len(),
        "Read worksheet from {}",
        path.display()
    );

    Ok(Grid::new(sheet_name, first_row, rows))
}

/// Read a worksheet whose first row holds the column names
pub fn read_table(path: &Path, selector: &SheetSelector) -> Result<Table> {
    let grid = read_sheet(path, selector)?;
    Ok(grid.into_table(0))
}

fn resolve_sheet(available: &[String], selector: &SheetSelector) -> Option<String> {
    match selector {
        SheetSelector::Index(i) => available.get(*i).cloned(),
        SheetSelector::Name(name) => available
            .iter()
            .find(|s| *s == name)
            .or_else(|| available.iter().find(|s| s.eq_ignore_ascii_case(name)))
            .cloned(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
