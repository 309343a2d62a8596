/// Boolean properties arrive from the editor as `"1"`/`"0"` or `"true"`/`"false"`.
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

/// Parses a numeric property, keeping `previous` when the input is not a finite number.
pub fn parse_number_or(value: &str, previous: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => previous,
    }
}

pub fn bool_to_string(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

pub fn number_to_string(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case(" true ", true)]
    #[case("0", false)]
    #[case("false", false)]
    #[case("yes", false)]
    #[case("", false)]
    fn bools(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(input), expected);
    }

    #[rstest]
    #[case("12.5", 12.5)]
    #[case(" -3 ", -3.0)]
    #[case("abc", 7.0)]
    #[case("", 7.0)]
    #[case("NaN", 7.0)]
    #[case("inf", 7.0)]
    fn numbers_fall_back_to_previous(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(parse_number_or(input, 7.0), expected);
    }

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(number_to_string(200.0), "200");
        assert_eq!(number_to_string(0.1), "0.1");
    }
}
