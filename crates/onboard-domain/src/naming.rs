//! Normalisation rules for user-supplied identifiers.
//!
//! Every entry point normalises with these helpers exactly once, so stored values and
//! lookup keys always agree.

/// Length of the alphabetic prefix of company and employee codes.
pub const CODE_PREFIX_LEN: usize = 3;

/// Prefix used when a company name contains no letters at all.
pub const FALLBACK_COMPANY_PREFIX: &str = "COM";

/// Trim and lower-case an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim and upper-case a company code.
pub fn normalize_company_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Key used to compare roster names: trimmed, lower-cased.
pub fn name_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Roster names match case-insensitively after trimming.
///
/// ```
/// use onboard_domain::naming::names_match;
/// assert!(names_match("  Jane Doe ", "jane doe"));
/// ```
pub fn names_match(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Derive the three-letter code prefix from a name.
///
/// Takes the first three alphabetic characters, upper-cased. Shorter results are padded
/// with `X`; a name without letters yields `fallback`.
pub fn code_prefix(name: &str, fallback: &str) -> String {
    let mut prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(CODE_PREFIX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if prefix.is_empty() {
        return fallback.to_owned();
    }
    while prefix.len() < CODE_PREFIX_LEN {
        prefix.push('X');
    }
    prefix
}
