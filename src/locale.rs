// 🇨🇱 Chilean locale parsing
// Dates like 15/03/2024 and amounts like $ 1.234.567 or 1.234,56

use crate::spreadsheet::Cell;
use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Day-first formats banks use in their exports
pub const CHILEAN_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
];

/// Convert an Excel serial day number to a calendar date
///
/// Excel's epoch is 1899-12-30 once the 1900 leap-year bug is accounted for.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Parse a date cell: native date cells, serial numbers, or text in one of `formats`
///
/// Text may carry a trailing time ("15/03/2024 10:22"), which is ignored.
pub fn parse_date(cell: &Cell, formats: &[&str]) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Float(f) => excel_serial_to_date(*f),
        Cell::Int(i) => excel_serial_to_date(*i as f64),
        Cell::Text(s) => {
            let s = s.trim();
            let date_part = s.split_whitespace().next().unwrap_or(s);

            // chrono's %Y happily reads "24" as year 24, so two-digit years only try %y
            let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
            let short_year = parts.len() == 3 && parts[0].len() <= 2 && parts[2].len() == 2;

            formats
                .iter()
                .filter(|fmt| fmt.ends_with("%y") == short_year)
                .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        }
        Cell::Empty | Cell::Bool(_) | Cell::Error(_) => None,
    }
}

/// A cell whose content isn't a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAmount;

/// Parse an amount cell
///
/// Returns `Ok(None)` for a blank cell and `Err(InvalidAmount)` for content that
/// isn't a number. In text, `.` groups thousands and `,` is the decimal separator;
/// a leading `-` or surrounding parentheses make the amount negative.
pub fn parse_amount(cell: &Cell) -> Result<Option<Decimal>, InvalidAmount> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Int(i) => Ok(Some(Decimal::from(*i))),
        Cell::Float(f) => Decimal::from_f64(*f)
            .map(|d| Some(d.round_dp(6).normalize()))
            .ok_or(InvalidAmount),
        Cell::Text(s) => parse_amount_text(s).map(Some).ok_or(InvalidAmount),
        Cell::Bool(_) | Cell::DateTime(_) | Cell::Error(_) => Err(InvalidAmount),
    }
}

fn parse_amount_text(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // (4.500) -> -4.500
    let (paren_negative, s) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };

    let s = s.replace("CLP", "").replace("$", "");
    let s = s.trim();

    let (sign_negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, s.strip_prefix('+').unwrap_or(s).trim()),
    };

    // Some exports put the sign after the currency symbol: "$ -12.500"
    let (inner_negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, digits),
    };

    if digits.is_empty()
        || !digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == ' ')
    {
        return None;
    }

    let normalized: String = digits
        .chars()
        .filter(|c| *c != '.' && *c != ' ')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.matches('.').count() > 1 || normalized.starts_with('.') {
        return None;
    }

    let value: Decimal = normalized.parse().ok()?;
    let negative = paren_negative ^ sign_negative ^ inner_negative;
    Some(if negative { -value } else { value }.normalize())
}

// ============================================================================
// TESTS
// ============================================================================
