//! Best-effort numeric coercion of cell values.

use crate::model::CellValue;

/// Coerce a cell into a finite number.
///
/// - empty → `None`
/// - number → itself, or `None` if not finite
/// - boolean → `None`
/// - text → see [`parse_number_text`]
pub fn coerce_number(value: Option<&CellValue>) -> Option<f64> {
    match value? {
        CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        CellValue::Bool(_) => None,
        CellValue::Text(s) => parse_number_text(s),
    }
}

/// Parse a number out of free text such as `"532 nm"` or `"1.2e3µm"`.
///
/// Every character other than ASCII digits, `.`, `+`, `-`, `e` and `E` is
/// removed, then the longest leading decimal literal is parsed. Anything
/// after that literal is ignored, so `"1.2.3"` gives `1.2` and `"5-10"`
/// gives `5`. Returns `None` when no literal is found or the result is not
/// finite.
pub fn parse_number_text(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();

    let literal = leading_decimal(&stripped)?;
    literal.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Longest prefix of the form `[+-]?digits[.digits][(e|E)[+-]?digits]`
/// with at least one mantissa digit.
fn leading_decimal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if end < len && matches!(bytes[end], b'+' | b'-') {
        end += 1;
    }

    let int_end = digits_from(end);
    let int_digits = int_end - end;
    end = int_end;

    let mut frac_digits = 0;
    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        frac_digits = frac_end - (end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end = frac_end;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    Some(&s[..end])
}
