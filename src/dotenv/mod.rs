//! Dotenv parsing and loading.
//!
//! Text is scanned into raw assignments ([`scanner`]), each assignment is
//! resolved in file order ([`resolve`]), and the result may be copied into
//! an [`Env`] by the [`loader`]. Resolution is sequential: every value can
//! reference names resolved earlier in the same text.

pub mod loader;
pub mod resolve;
pub mod scanner;

use std::fmt;

use indexmap::IndexMap;

use crate::env::Env;

pub use loader::load_env;
pub use resolve::sub_env;
pub use scanner::Scanner;

/// Resolved variables in the order their names first appeared.
pub type ResolvedEnv = IndexMap<String, String>;

/// Delimiter style of an assigned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    /// `NAME=value`
    None,
    /// `NAME='value'` (or a doubled `''value''` run)
    Single,
    /// `NAME="value"` (or a doubled `""value""` run)
    Double,
    /// `NAME='''value'''`
    TripleSingle,
    /// `NAME="""value"""`
    TripleDouble,
}

impl QuoteKind {
    /// Classify a run of `len` copies of the quote character `quote`.
    pub(crate) fn from_run(quote: char, len: usize) -> Self {
        match (quote, len) {
            ('\'', 3) => QuoteKind::TripleSingle,
            ('\'', _) => QuoteKind::Single,
            (_, 3) => QuoteKind::TripleDouble,
            _ => QuoteKind::Double,
        }
    }

    /// Whether the value was enclosed in double quotes (single or triple).
    pub fn is_double(self) -> bool {
        matches!(self, QuoteKind::Double | QuoteKind::TripleDouble)
    }
}

/// One `NAME=VALUE` assignment as found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssignment {
    pub name: String,
    pub quote: QuoteKind,
    /// The value with quotes removed but no escaping or substitution applied.
    pub raw_value: String,
    /// 1-based line the assignment starts on.
    pub line: usize,
}

/// Why a line was not parsed as an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line does not start with a valid variable name.
    InvalidName,
    /// A name was found but no `=` follows it.
    MissingEquals,
    /// Nothing follows the `=`.
    MissingValue,
    /// An unquoted value contains a `'` or `"` character.
    StrayQuote,
    /// An opening quote has no matching closer.
    UnterminatedQuote,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidName => write!(f, "invalid variable name"),
            SkipReason::MissingEquals => write!(f, "missing '='"),
            SkipReason::MissingValue => write!(f, "missing value"),
            SkipReason::StrayQuote => write!(f, "quote character in unquoted value"),
            SkipReason::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

/// A non-blank, non-comment line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub reason: SkipReason,
}

/// Options controlling value resolution.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Trim surrounding whitespace from unquoted values after substitution.
    pub strip_values: bool,
    /// Expand `{NAME}` / `${NAME}` placeholders in unquoted and double-quoted values.
    pub substitute: bool,
    /// Replacement for placeholders whose name is found nowhere.
    pub missing_default: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_values: true,
            substitute: true,
            missing_default: String::new(),
        }
    }
}

/// The result of parsing dotenv text.
#[derive(Debug, Clone, Default)]
pub struct ParsedEnv {
    pub vars: ResolvedEnv,
    pub skipped: Vec<SkippedLine>,
}

/// Parse dotenv text, keeping diagnostics for skipped lines.
///
/// `env` is only read: it supplies the live values that take precedence
/// over earlier definitions in the same text during substitution.
pub fn parse(text: &str, env: &Env, options: &ParseOptions) -> ParsedEnv {
    let mut parsed = ParsedEnv::default();

    for scanned in Scanner::new(text) {
        match scanned {
            Ok(assignment) => {
                let value = resolve::resolve(&assignment, env, &parsed.vars, options);
                parsed.vars.insert(assignment.name, value);
            }
            Err(skipped) => parsed.skipped.push(skipped),
        }
    }

    parsed
}

/// Parse dotenv text into resolved variables, ignoring skipped lines.
pub fn parse_env_str(text: &str, env: &Env, options: &ParseOptions) -> ResolvedEnv {
    parse(text, env, options).vars
}
