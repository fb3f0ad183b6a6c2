use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

const EXCERPT_CHARS: usize = 200;

/// Extracts the JSON object assigned to `variable` somewhere in `html`.
///
/// Matches either `window['<variable>'] = {` (single or double quotes) or a
/// bare `<variable> = {`, then walks forward one character at a time until
/// the opening brace is balanced. The walk tracks string literals and
/// backslash escapes, so braces and semicolons inside string values never
/// close the object early. The page-embedded objects can be arbitrarily
/// large, which is why the span is found by balancing rather than by looking
/// for a terminator.
pub fn extract_embedded_object(html: &str, variable: &str) -> Result<Value> {
    let pattern = format!(
        r#"(?:window\[\s*['"]{var}['"]\s*\]|{var})\s*=\s*\{{"#,
        var = regex::escape(variable)
    );
    let assignment = Regex::new(&pattern).expect("assignment pattern");
    let Some(found) = assignment.find(html) else {
        return Err(Error::NotFound {
            variable: variable.to_owned(),
        });
    };
    // the pattern ends with the opening brace
    let start = found.end() - 1;
    let end = find_closing_brace(html, start).ok_or_else(|| Error::Unterminated {
        variable: variable.to_owned(),
    })?;
    let span = &html[start..end];
    serde_json::from_str(span).map_err(|source| Error::MalformedJson {
        variable: variable.to_owned(),
        excerpt: span.chars().take(EXCERPT_CHARS).collect(),
        source,
    })
}

fn find_closing_brace(html: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for (offset, ch) in html[start..].char_indices() {
        match in_string {
            Some(delimiter) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == delimiter {
                    in_string = None;
                }
            }
            None => match ch {
                '"' | '\'' => in_string = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(start + offset + 1);
                    }
                }
                _ => {}
            },
        }
    }
    None
}
