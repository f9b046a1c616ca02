use crate::regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DOI_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:https?://)?(?:dx\.)?doi\.org/|(?:doi|DOI):\s*)").expect("doi prefix regex is valid")
});

/// Month names and abbreviations accepted in the `month` field.
const MONTHS: &[(&str, &str)] = &[
    ("jan", "01"),
    ("january", "01"),
    ("feb", "02"),
    ("february", "02"),
    ("mar", "03"),
    ("march", "03"),
    ("apr", "04"),
    ("april", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("june", "06"),
    ("jul", "07"),
    ("july", "07"),
    ("aug", "08"),
    ("august", "08"),
    ("sep", "09"),
    ("sept", "09"),
    ("september", "09"),
    ("oct", "10"),
    ("october", "10"),
    ("nov", "11"),
    ("november", "11"),
    ("dec", "12"),
    ("december", "12"),
];

/// Returns the trimmed value when it carries any text.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Strips the braces BibTeX authors use to protect capitalisation, e.g. `{2023}`.
fn strip_protecting_braces(value: &str) -> &str {
    value.trim().trim_start_matches('{').trim_end_matches('}').trim()
}

/// Returns a four digit year, or `None` when the field is not a plain year.
pub(crate) fn parse_year(year: Option<&str>) -> Option<&str> {
    let year = strip_protecting_braces(non_empty(year)?);
    (year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())).then_some(year)
}

/// Maps a month field to its two digit number.
///
/// Accepts numerals (`3`, `03`) in `1..=12` and English month names or
/// abbreviations in any case.
///
/// # Arguments
///
/// * `month` - The raw month field
pub(crate) fn month_to_number(month: Option<&str>) -> Option<String> {
    let month = strip_protecting_braces(non_empty(month)?).to_lowercase();
    if month.bytes().all(|b| b.is_ascii_digit()) {
        return match month.parse::<u32>() {
            Ok(number @ 1..=12) => Some(format!("{number:02}")),
            _ => None,
        };
    }
    let month = month.trim_end_matches('.');
    MONTHS
        .iter()
        .find(|(name, _)| *name == month)
        .map(|(_, number)| (*number).to_string())
}

/// Zero-pads a numeric day in `1..=31`.
pub(crate) fn day_to_number(day: Option<&str>) -> Option<String> {
    let day = strip_protecting_braces(non_empty(day)?);
    if !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match day.parse::<u32>() {
        Ok(number @ 1..=31) => Some(format!("{number:02}")),
        _ => None,
    }
}

/// Removes resolver URL and `doi:` prefixes, keeping the DOI's case.
///
/// # Arguments
///
/// * `doi` - The DOI string to clean
pub(crate) fn bare_doi(doi: &str) -> Option<String> {
    let doi = DOI_PREFIX_REGEX.replace(doi.trim(), "");
    let doi = doi.trim();
    (!doi.is_empty()).then(|| doi.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("3"), Some("03"))]
    #[case(Some("03"), Some("03"))]
    #[case(Some("12"), Some("12"))]
    #[case(Some("March"), Some("03"))]
    #[case(Some("mar"), Some("03"))]
    #[case(Some("SEPT"), Some("09"))]
    #[case(Some("Dec."), Some("12"))]
    #[case(Some(" {oct} "), Some("10"))]
    #[case(Some("13"), None)]
    #[case(Some("0"), None)]
    #[case(Some("spring"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn test_month_to_number(#[case] month: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(month_to_number(month).as_deref(), expected);
    }

    #[rstest]
    #[case(Some("5"), Some("05"))]
    #[case(Some("15"), Some("15"))]
    #[case(Some("31"), Some("31"))]
    #[case(Some("32"), None)]
    #[case(Some("first"), None)]
    #[case(None, None)]
    fn test_day_to_number(#[case] day: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(day_to_number(day).as_deref(), expected);
    }

    #[rstest]
    #[case(Some("2023"), Some("2023"))]
    #[case(Some(" 2021 "), Some("2021"))]
    #[case(Some("{2020}"), Some("2020"))]
    #[case(Some("in press"), None)]
    #[case(Some("23"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn test_parse_year(#[case] year: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(parse_year(year), expected);
    }

    #[test]
    fn test_bare_doi() {
        let test_cases = vec![
            ("10.1000/Test", Some("10.1000/Test".to_string())),
            (" 10.1000/test ", Some("10.1000/test".to_string())),
            ("https://doi.org/10.1000/Test", Some("10.1000/Test".to_string())),
            ("http://dx.doi.org/10.1000/test", Some("10.1000/test".to_string())),
            ("doi:10.1000/test", Some("10.1000/test".to_string())),
            ("DOI: 10.1000/test", Some("10.1000/test".to_string())),
            ("https://doi.org/", None),
            ("", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(bare_doi(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  x ")), Some("x"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
