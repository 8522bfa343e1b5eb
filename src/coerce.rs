// src/coerce.rs

/// Number of columns the published price table carries.
pub const EXPECTED_COLUMNS: usize = 11;

/// A typed spreadsheet cell value after coercing raw table text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Coerces one raw text cell into its typed value, by 1-based column:
///
/// - column 1 is the SELIC code, parsed as an integer;
/// - columns 2 and 3 are settlement/maturity dates, kept verbatim as text;
/// - column 7 is the PU. When the text carries both a thousands separator
///   (`.`) and a decimal comma it is kept as text: the value is too large
///   to coerce without guessing which separator means what;
/// - every other column is a rate, parsed as a float after `,` -> `.`.
///
/// Any parse failure falls back to the original text.
pub fn coerce_cell(text: &str, column: usize) -> CellValue {
    match column {
        1 => text
            .parse::<i64>()
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        2 | 3 => CellValue::Text(text.to_string()),
        7 if text.contains('.') && text.contains(',') => CellValue::Text(text.to_string()),
        _ => parse_decimal_comma(text),
    }
}

fn parse_decimal_comma(text: &str) -> CellValue {
    text.replace(',', ".")
        .parse::<f64>()
        .map(CellValue::Float)
        .unwrap_or_else(|_| CellValue::Text(text.to_string()))
}
