//! Invocation text parsing.
//!
//! # Responsibilities
//! - Normalize line endings and fold `\`-newline continuations into one logical line
//! - Rewrite bash ANSI-C words (`$'...'`) into plain single quotes
//! - Split into words with POSIX shell rules (quotes, escapes, `#` comments)
//! - Check that the first word names curl, inserting it when it was left off

use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use url::Url;

use crate::invocation::argument::Argument;
use crate::invocation::error::ParseError;

/// Program word inserted when the text starts directly with options or a URL.
pub const DEFAULT_PROGRAM: &str = "curl";

/// Split invocation text into decoded words.
pub fn tokenize(text: &str) -> Result<Vec<String>, ParseError> {
    let folded = fold_continuations(text);
    let posix = expand_ansi_c_quotes(&folded)?;
    let words = shlex::split(&posix).ok_or(ParseError::UnbalancedQuotes)?;
    if words.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(words)
}

/// Parse invocation text into arguments, index 0 being the program.
pub fn parse_arguments(text: &str) -> Result<Vec<Argument>, ParseError> {
    let mut words = tokenize(text)?;

    if !names_curl(&words[0]) {
        if words[0].starts_with('-') || looks_like_url(&words[0]) {
            words.insert(0, DEFAULT_PROGRAM.to_string());
        } else {
            return Err(ParseError::NotCurl(words[0].clone()));
        }
    }

    words
        .into_iter()
        .map(|w| Argument::new(w).map_err(ParseError::from))
        .collect()
}

fn fold_continuations(text: &str) -> String {
    text.replace("\r\n", "\n").replace("\\\n", "")
}

/// Replace every `$'...'` word with the single-quoted form of its decoded text. Quoting state
/// is tracked so `$'` inside other quotes or comments is left alone.
fn expand_ansi_c_quotes(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut word_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '\'' => {
                out.push(c);
                loop {
                    let inner = chars.next().ok_or(ParseError::UnbalancedQuotes)?;
                    out.push(inner);
                    if inner == '\'' {
                        break;
                    }
                }
            }
            '"' => {
                out.push(c);
                loop {
                    let inner = chars.next().ok_or(ParseError::UnbalancedQuotes)?;
                    out.push(inner);
                    match inner {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                out.push(escaped);
                            }
                        }
                        _ => {}
                    }
                }
            }
            '$' if chars.peek() == Some(&'\'') => {
                chars.next();
                let decoded = decode_ansi_c(&mut chars)?;
                out.push('\'');
                out.push_str(&decoded.replace('\'', "'\\''"));
                out.push('\'');
            }
            // Locale-translated strings behave like plain double quotes.
            '$' if chars.peek() == Some(&'"') => {}
            '#' if word_start => {
                out.push(c);
                for inner in chars.by_ref() {
                    out.push(inner);
                    if inner == '\n' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
        word_start = out.ends_with(char::is_whitespace);
    }
    Ok(out)
}

/// Decode the body of a `$'...'` word up to its closing quote.
fn decode_ansi_c(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut bytes: Vec<u8> = Vec::new();
    let mut utf8 = [0u8; 4];

    loop {
        let c = chars.next().ok_or(ParseError::UnbalancedQuotes)?;
        let literal = match c {
            '\'' => break,
            '\\' => match chars.next().ok_or(ParseError::UnbalancedQuotes)? {
                'a' => '\u{07}',
                'b' => '\u{08}',
                'e' | 'E' => '\u{1b}',
                'f' => '\u{0c}',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'v' => '\u{0b}',
                'x' => {
                    match take_digits(chars, 16, 2) {
                        Some(byte) => bytes.push(byte as u8),
                        None => bytes.extend_from_slice(b"\\x"),
                    }
                    continue;
                }
                marker @ ('u' | 'U') => {
                    let max = if marker == 'u' { 4 } else { 8 };
                    match take_digits(chars, 16, max).and_then(char::from_u32) {
                        Some(decoded) => {
                            bytes.extend_from_slice(decoded.encode_utf8(&mut utf8).as_bytes())
                        }
                        None => {
                            bytes.push(b'\\');
                            bytes.push(marker as u8);
                        }
                    }
                    continue;
                }
                d @ '0'..='7' => {
                    let mut value = d.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match chars.peek().and_then(|c| c.to_digit(8)) {
                            Some(digit) => {
                                value = value * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    bytes.push((value & 0xff) as u8);
                    continue;
                }
                'c' => match chars.next() {
                    Some(ctrl) => char::from((ctrl as u8) & 0x1f),
                    None => return Err(ParseError::UnbalancedQuotes),
                },
                escaped @ ('\\' | '\'' | '"' | '?') => escaped,
                other => {
                    bytes.push(b'\\');
                    other
                }
            },
            other => other,
        };
        bytes.extend_from_slice(literal.encode_utf8(&mut utf8).as_bytes());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read up to `max` digits in `radix`, if at least one is present.
fn take_digits(chars: &mut Peekable<Chars<'_>>, radix: u32, max: usize) -> Option<u32> {
    let mut value = None;
    for _ in 0..max {
        let Some(digit) = chars.peek().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        chars.next();
        value = Some(value.unwrap_or(0) * radix + digit);
    }
    value
}

fn names_curl(word: &str) -> bool {
    Path::new(word)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase().contains("curl"))
        .unwrap_or(false)
}

fn looks_like_url(word: &str) -> bool {
    word.contains("://") && Url::parse(word).is_ok()
}
