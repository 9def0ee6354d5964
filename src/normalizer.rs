// Lenient numeric coercion for spreadsheet cells.

/// Coerces a raw cell into a number. Digit-group separators are stripped
/// first; anything that still fails to parse becomes `0.0`. Rejecting a cell
/// is never an option here — a statement with stray text in a value column
/// must still analyze.
pub fn coerce_value(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(coerce_value("1234.5"), 1234.5);
        assert_eq!(coerce_value("-42"), -42.0);
    }

    #[test]
    fn strips_group_separators() {
        assert_eq!(coerce_value("1,234,567"), 1_234_567.0);
        assert_eq!(coerce_value(" 12 500 "), 12_500.0);
        assert_eq!(coerce_value("1\u{a0}000"), 1_000.0);
    }

    #[test]
    fn unparseable_cells_become_zero() {
        assert_eq!(coerce_value("n/a"), 0.0);
        assert_eq!(coerce_value(""), 0.0);
        assert_eq!(coerce_value("  "), 0.0);
        assert_eq!(coerce_value("12abc"), 0.0);
    }
}
