//! Value resolution: comment stripping, escapes, substitution, trimming.
//!
//! | quote kind      | comments | escapes                        | substitution |
//! |-----------------|----------|--------------------------------|--------------|
//! | none            | stripped | none                           | yes          |
//! | single / triple | kept     | `\'` and `\"` only             | no           |
//! | double / triple | kept     | `\'`, `\"`, then full decoding | yes          |

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{ParseOptions, QuoteKind, RawAssignment, ResolvedEnv};
use crate::env::Env;

/// Trailing comment of an unquoted value: `#` at the start or after whitespace.
/// An escaped `\#` is preceded by a backslash and never matches.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s+)#.*$").unwrap());

/// `{NAME}` or `${NAME}`, with optional whitespace inside the braces.
static SUB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}").unwrap());

/// A backslash-escaped quote character.
static ESCAPED_QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\\(['"])"#).unwrap());

/// Produce the final value of `assignment`.
///
/// `resolved` holds the values resolved so far from the same text; it is
/// consulted after `env` when substituting placeholders.
pub fn resolve(
    assignment: &RawAssignment,
    env: &Env,
    resolved: &ResolvedEnv,
    options: &ParseOptions,
) -> String {
    match assignment.quote {
        QuoteKind::None => {
            let value = COMMENT_RE.replace(assignment.raw_value.trim(), "$1");
            let value = if options.substitute {
                sub_env(&value, env, resolved, &options.missing_default)
            } else {
                value.into_owned()
            };
            if options.strip_values {
                value.trim().to_string()
            } else {
                value
            }
        }
        quote => {
            let value = ESCAPED_QUOTE_RE.replace_all(&assignment.raw_value, "$1");
            if !quote.is_double() {
                return value.into_owned();
            }
            let value = decode_escapes(&value);
            if options.substitute {
                sub_env(&value, env, resolved, &options.missing_default)
            } else {
                value
            }
        }
    }
}

/// Replace `{NAME}` / `${NAME}` placeholders in a single pass.
///
/// Lookup order: `env`, then `local`, then `missing_default`. Replacement
/// text is not scanned again.
pub fn sub_env(input: &str, env: &Env, local: &ResolvedEnv, missing_default: &str) -> String {
    SUB_RE
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            env.var(name)
                .ok()
                .or_else(|| local.get(name).cloned())
                .unwrap_or_else(|| missing_default.to_string())
        })
        .into_owned()
}

/// Decode backslash escapes the way a double-quoted value expects.
///
/// Supports `\n \t \r \\ \' \" \a \b \f \v`, octal `\ooo`, `\xHH`,
/// `\uHHHH` and `\UHHHHHHHH`. A backslash before a newline joins the lines.
/// Unknown or malformed escapes are kept verbatim.
pub fn decode_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '\n' => {}
            '0'..='7' => {
                let mut code = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                // At most 0o777, always a valid scalar value.
                out.extend(char::from_u32(code));
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::with_capacity(width);
                while digits.len() < width {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push(escape);
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}
