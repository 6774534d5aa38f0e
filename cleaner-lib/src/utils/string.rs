/// Normalize a header cell by replacing control characters with spaces and collapsing whitespace
///
/// "Client\nName" and "  Client   Name " both become "Client Name".
pub fn normalize_header(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Comparison key for column names: lowercase with spaces, underscores and dashes removed
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Render a number the way a spreadsheet displays it: whole values without a fractional part
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("  Client\tName \n"), "Client Name");
        assert_eq!(normalize_header("WorkerID"), "WorkerID");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Client_ID"), "clientid");
        assert_eq!(normalize_key("max-load per phase"), "maxloadperphase");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
    }
}
