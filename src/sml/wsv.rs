//! Whitespace-separated value tokens.
//!
//! Every SML line is a sequence of values separated by whitespace. A value is
//! written bare when that is unambiguous and double-quoted otherwise:
//!
//! | Value | Written as |
//! |-------|------------|
//! | null | `-` |
//! | empty string | `""` |
//! | `-` | `"-"` |
//! | `a b` | `"a b"` |
//! | `say "hi"` | `"say ""hi"""` |
//! | line feed | `"/"` between quoted parts |
//!
//! `#` outside a quoted value starts a comment running to the end of the line.

use crate::{Error, Result};

/// A value read from one line, remembering whether it was quoted.
///
/// Quoted values never match the end keyword, which is what allows an element
/// literally named `End` to round-trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub value: Option<String>,
    pub quoted: bool,
}

#[inline]
pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{0085}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

#[inline]
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s == "-"
        || s
            .chars()
            .any(|ch| ch == '"' || ch == '#' || ch == '\n' || is_whitespace(ch))
}

/// Writes `s` in quoted form regardless of its content.
pub(crate) fn quote(s: &str) -> String {
    let mut output = String::with_capacity(s.len() + 2);
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\"\""),
            '\n' => output.push_str("\"/\""),
            _ => output.push(ch),
        }
    }
    output.push('"');
    output
}

/// Returns the on-line form of a value.
pub(crate) fn serialize_value(value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(s) if needs_quotes(s) => quote(s),
        Some(s) => s.to_string(),
    }
}

/// Splits one line into tokens. `line_number` is 1-based and only used for
/// error positions.
pub(crate) fn parse_line(line: &str, line_number: usize) -> Result<Vec<Token>> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        if is_whitespace(ch) {
            index += 1;
            continue;
        }
        if ch == '#' {
            break;
        }
        if ch == '"' {
            let (value, next) = parse_quoted(&chars, index, line_number)?;
            tokens.push(Token {
                value: Some(value),
                quoted: true,
            });
            index = next;
            continue;
        }

        let start = index;
        while index < chars.len() && !is_whitespace(chars[index]) && chars[index] != '#' {
            if chars[index] == '"' {
                return Err(Error::syntax(
                    line_number,
                    index + 1,
                    "Invalid double quote in value",
                ));
            }
            index += 1;
        }
        let value: String = chars[start..index].iter().collect();
        tokens.push(Token {
            value: if value == "-" { None } else { Some(value) },
            quoted: false,
        });
    }

    Ok(tokens)
}

/// Parses a quoted value starting at the opening quote, returning the value
/// and the index just after the closing quote.
fn parse_quoted(chars: &[char], start: usize, line_number: usize) -> Result<(String, usize)> {
    let mut value = String::new();
    let mut index = start + 1;

    loop {
        let Some(&ch) = chars.get(index) else {
            return Err(Error::syntax(line_number, index + 1, "String not closed"));
        };
        index += 1;
        if ch != '"' {
            value.push(ch);
            continue;
        }
        match chars.get(index) {
            Some('"') => {
                value.push('"');
                index += 1;
            }
            Some('/') => {
                if chars.get(index + 1) != Some(&'"') {
                    return Err(Error::syntax(
                        line_number,
                        index + 2,
                        "Invalid string line break",
                    ));
                }
                value.push('\n');
                index += 2;
            }
            Some(&next) if !is_whitespace(next) && next != '#' => {
                return Err(Error::syntax(
                    line_number,
                    index + 1,
                    "Invalid character after string",
                ));
            }
            _ => return Ok((value, index)),
        }
    }
}
