use anyhow::Error;

/// Words that step back one level at any navigator prompt.
const BACK_WORDS: [&str; 2] = ["b", "back"];

/// Parse a numeric answer. Anything that is not an integer reads as zero,
/// which each prompt interprets as "default" or "no selection".
pub(crate) fn parse_number(input: &str) -> i64 {
    input.trim().parse().unwrap_or(0)
}

/// Parse a list position. Negative and non-numeric answers read as zero.
pub(crate) fn parse_index(input: &str) -> usize {
    usize::try_from(parse_number(input)).unwrap_or(0)
}

pub(crate) fn is_back(input: &str) -> bool {
    let input = input.trim();
    BACK_WORDS
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
}

/// Confirmation that defaults to yes: only an explicit "n" declines.
pub(crate) fn declined(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "n" | "no")
}

/// Confirmation that defaults to no: only an explicit "y" accepts.
pub(crate) fn accepted(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
