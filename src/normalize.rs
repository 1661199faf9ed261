use lazy_static::lazy_static;
use regex::Regex;

/// Glyph every station name may end with ("역", station).
pub const STATION_SUFFIX: char = '역';

lazy_static! {
    static ref PARENTHESIZED: Regex = Regex::new(r"\(.*?\)").unwrap();
}

/// Canonical form of a station or location text, used for comparisons.
///
/// Lowercases, drops all whitespace and every parenthesized part, then
/// strips the trailing station suffix: `"강남역 (2호선)"` becomes `"강남"`.
/// Every trailing suffix glyph goes, not just the last one, so that
/// applying it twice gives the same result as applying it once.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
    let stripped = PARENTHESIZED.replace_all(&compact, "");

    stripped
        .trim_end_matches(STATION_SUFFIX)
        .trim()
        .to_string()
}

/// ASCII digits of `text`, in order: `"2호선"` -> `"2"`, `"수인분당"` -> `""`.
pub fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
