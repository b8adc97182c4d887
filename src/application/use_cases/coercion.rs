//! Turns loosely typed spreadsheet cells into numbers, lists and dates.
//!
//! Exports from Brazilian spreadsheets often carry "R$ 1.234,56", "12,5%"
//! or lists saved as text ("[4, 5, 3]"), so everything here accepts text.

use crate::domain::dataset::CellValue;
use crate::domain::error::{AppError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// `Ok(None)` for empty cells, an error for anything that is not a number.
pub fn coerce_number(cell: &CellValue) -> Result<Option<f64>> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Number(value) => Ok(Some(*value)),
        CellValue::Text(text) if text.trim().is_empty() => Ok(None),
        CellValue::Text(text) => parse_decimal(text)
            .map(Some)
            .ok_or_else(|| AppError::ParseError(format!("valor não numérico '{}'", text))),
        other => Err(AppError::ParseError(format!(
            "valor não numérico '{}'",
            other
        ))),
    }
}

/// A dot alone is a thousands separator only when every group after it has
/// exactly three digits and the leading group does not start with zero, so
/// "1.234" reads 1234 while "12.5" and "0.125" keep their decimals.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let mut text: String = raw
        .trim()
        .trim_start_matches("R$")
        .trim_end_matches('%')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match (text.rfind(','), text.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => {
            text = text.replace('.', "").replace(',', ".");
        }
        (Some(_), Some(_)) => {
            text = text.replace(',', "");
        }
        (Some(_), None) => {
            text = text.replace(',', ".");
        }
        (None, Some(_)) if is_dot_grouped(&text) => {
            text = text.replace('.', "");
        }
        _ => {}
    }

    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn is_dot_grouped(text: &str) -> bool {
    let mut groups = text.trim_start_matches('-').split('.');
    let leading = match groups.next() {
        Some(group) => group,
        None => return false,
    };
    let leading_ok = (1..=3).contains(&leading.len())
        && !leading.starts_with('0')
        && leading.bytes().all(|b| b.is_ascii_digit());

    leading_ok && groups.all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()))
}

/// Accepts `[4, 5]`, `(4, 5)` and a trailing comma before the closing
/// bracket, the shapes spreadsheet exports of Python lists take.
fn normalize_list_literal(text: &str) -> String {
    let text = text.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .or_else(|| text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')));

    match inner {
        Some(inner) => format!("[{}]", inner.trim().trim_end_matches(',')),
        None => text.to_string(),
    }
}

/// Lists are stored either as real numbers (one rating) or as text like
/// `"[4, 5, 3]"`. Empty lists and empty cells are errors: their mean is
/// undefined.
pub fn coerce_number_list(cell: &CellValue) -> Result<Vec<f64>> {
    let values = match cell {
        CellValue::Number(value) => vec![*value],
        CellValue::Text(text) => serde_json::from_str::<Vec<f64>>(&normalize_list_literal(text)).map_err(|e| {
            AppError::ParseError(format!("lista inválida '{}': {}", text, e))
        })?,
        CellValue::Empty => {
            return Err(AppError::ParseError("lista de avaliações vazia".to_string()))
        }
        other => {
            return Err(AppError::ParseError(format!(
                "lista inválida '{}'",
                other
            )))
        }
    };

    if values.is_empty() {
        return Err(AppError::ParseError("lista de avaliações vazia".to_string()));
    }
    Ok(values)
}

/// `Ok(None)` for empty cells. Bare numbers are read as Excel serial dates.
pub fn coerce_date(cell: &CellValue) -> Result<Option<NaiveDate>> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::DateTime(value) => Ok(Some(value.date())),
        CellValue::Number(serial) => excel_serial_to_date(*serial)
            .map(Some)
            .ok_or_else(|| AppError::ParseError(format!("data inválida '{}'", serial))),
        CellValue::Text(text) if text.trim().is_empty() => Ok(None),
        CellValue::Text(text) => parse_date_text(text.trim())
            .map(Some)
            .ok_or_else(|| AppError::ParseError(format!("data inválida '{}'", text))),
        CellValue::Bool(value) => Err(AppError::ParseError(format!(
            "data inválida '{}'",
            value
        ))),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn test_parse_decimal_formats() {
        assert_eq!(parse_decimal("12,5%"), Some(12.5));
        assert_eq!(parse_decimal("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("8500"), Some(8500.0));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_parse_decimal_dot_thousands() {
        assert_eq!(parse_decimal("1.234"), Some(1234.0));
        assert_eq!(parse_decimal("R$ 1.234.567"), Some(1234567.0));
        assert_eq!(parse_decimal("-2.500"), Some(-2500.0));
        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal("0.125"), Some(0.125));
        assert_eq!(parse_decimal("1.2345"), Some(1.2345));
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&CellValue::Empty).unwrap(), None);
        assert_eq!(coerce_number(&CellValue::Number(3.0)).unwrap(), Some(3.0));
        assert_eq!(coerce_number(&text("7,25")).unwrap(), Some(7.25));
        assert!(coerce_number(&text("n/a")).is_err());
    }

    #[test]
    fn test_coerce_number_list() {
        assert_eq!(coerce_number_list(&text("[4, 5, 3]")).unwrap(), vec![4.0, 5.0, 3.0]);
        assert_eq!(coerce_number_list(&text("[4.5]")).unwrap(), vec![4.5]);
        assert_eq!(coerce_number_list(&CellValue::Number(4.0)).unwrap(), vec![4.0]);
        assert_eq!(coerce_number_list(&text("[4, 5,]")).unwrap(), vec![4.0, 5.0]);
        assert_eq!(coerce_number_list(&text("(4, 5)")).unwrap(), vec![4.0, 5.0]);
        assert!(coerce_number_list(&text("[]")).is_err());
        assert!(coerce_number_list(&text("[,]")).is_err());
        assert!(coerce_number_list(&text("[4, 5")).is_err());
        assert!(coerce_number_list(&text("['a', 'b']")).is_err());
        assert!(coerce_number_list(&CellValue::Empty).is_err());
    }

    #[test]
    fn test_coerce_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(coerce_date(&text("2024-01-15")).unwrap(), expected);
        assert_eq!(coerce_date(&text("15/01/2024")).unwrap(), expected);
        assert_eq!(coerce_date(&text("2024-01-15 10:30:00")).unwrap(), expected);
        assert_eq!(coerce_date(&CellValue::Number(45306.0)).unwrap(), expected);
        assert_eq!(coerce_date(&CellValue::Empty).unwrap(), None);
        assert!(coerce_date(&text("ontem")).is_err());
    }
}
