use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("invalid filename pattern"));

/// Strips characters that are invalid in filenames and truncates the result.
pub fn safe_filename(s: &str, max_length: usize) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(s, "");
    cleaned.chars().take(max_length).collect()
}
