//! Textual repair of near-JSON model output before parsing.
//!
//! Passes run in a fixed order; later passes assume earlier ones ran:
//! 1. typographic quotes to ASCII
//! 2. code fences stripped
//! 3. line breaks removed (2 and 3 repeat until stable)
//! 4. trailing commas before `}` / `]` removed
//! 5. bare object keys quoted
//!
//! Normalization is pure and idempotent: `normalize(normalize(x)) == normalize(x)`.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::QuizError;

/// Repairs raw model text so it has a better chance of parsing.
pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

/// Regex and scanner based repair of the malformations models commonly produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicNormalizer;

impl ResponseNormalizer for HeuristicNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let text = replace_smart_quotes(raw);
        let text = strip_fences_and_line_breaks(&text);
        let text = remove_trailing_commas(&text);
        quote_bare_keys(&text).trim().to_string()
    }
}

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*[ \t]*|\s*```").expect("valid fence regex"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,\s*)+([}\]])").expect("valid trailing comma regex"));

fn replace_smart_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

fn remove_line_breaks(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Repeats both passes until neither changes the text. Removing a fence or a line break can
/// join leftover backticks into a new fence.
fn strip_fences_and_line_breaks(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = remove_line_breaks(&strip_code_fences(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

/// Quote identifiers used as object keys (`{a: 1, b: 2}`). Text inside string literals is left alone.
fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    // Last significant char outside strings was `{` or `,`.
    let mut key_position = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if key_position && is_ident_start(c) {
            let start = i;
            let mut end = i;
            while end < chars.len() && is_ident_char(chars[end]) {
                end += 1;
            }
            let mut after = end;
            while after < chars.len() && chars[after].is_whitespace() {
                after += 1;
            }
            let ident: String = chars[start..end].iter().collect();
            if after < chars.len() && chars[after] == ':' {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }
            key_position = false;
            i = end;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                key_position = false;
            }
            '{' | ',' => key_position = true,
            c if c.is_whitespace() => {}
            _ => key_position = false,
        }
        out.push(c);
        i += 1;
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Normalized text must be a single brace-delimited object.
pub fn ensure_braced(text: &str) -> Result<(), QuizError> {
    if text.starts_with('{') && text.ends_with('}') {
        return Ok(());
    }
    Err(QuizError::StructuralValidation(preview(text, 80)))
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}…", head)
}
