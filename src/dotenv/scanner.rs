//! Hand-written scanner for `NAME=VALUE` assignments.
//!
//! The scanner walks the text one logical assignment at a time. Quoted
//! values may span several physical lines; everything else is confined to
//! its line. Lines that do not parse are yielded as [`SkippedLine`] values
//! so callers can log them, and scanning always continues with the next line.

use super::{QuoteKind, RawAssignment, SkipReason, SkippedLine};

/// Longest quote run recognised as a delimiter (`'''` / `"""`).
const MAX_QUOTE_RUN: usize = 3;

/// Iterator over the assignments of a dotenv text.
///
/// Blank lines and `#` comment lines are passed over silently.
pub struct Scanner<'a> {
    text: &'a str,
    /// Byte offset of the start of the current line.
    pos: usize,
    /// 1-based number of the current line.
    line: usize,
    /// Per quote character and run length, the offset from which a search
    /// for a valid closer is known to fail.
    no_closer_from: [[usize; MAX_QUOTE_RUN]; 2],
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            no_closer_from: [[usize::MAX; MAX_QUOTE_RUN]; 2],
        }
    }

    /// Byte offset of the end of the line containing `from` (exclusive of `\n`).
    fn line_end(&self, from: usize) -> usize {
        self.text[from..]
            .find('\n')
            .map_or(self.text.len(), |i| from + i)
    }

    /// Move to the start of the line following the one containing `at`.
    fn advance_past_line(&mut self, at: usize) {
        let end = self.line_end(at);
        self.line += self.text[self.pos..end].matches('\n').count() + 1;
        self.pos = (end + 1).min(self.text.len());
    }

    /// Scan one assignment whose name starts at byte `at`.
    fn scan_assignment(&mut self, at: usize, eol: usize) -> Result<RawAssignment, SkippedLine> {
        let line = self.line;
        let rest = &self.text[at..eol];

        let name_len = identifier_len(rest);
        if name_len == 0 {
            self.advance_past_line(at);
            return Err(SkippedLine {
                line,
                reason: SkipReason::InvalidName,
            });
        }
        let name = &rest[..name_len];

        let Some(after_eq) = rest[name_len..].trim_start_matches(is_blank).strip_prefix('=') else {
            self.advance_past_line(at);
            return Err(SkippedLine {
                line,
                reason: SkipReason::MissingEquals,
            });
        };

        let value = after_eq.trim_start_matches(is_blank);
        if value.trim_end().is_empty() {
            self.advance_past_line(at);
            return Err(SkippedLine {
                line,
                reason: SkipReason::MissingValue,
            });
        }
        let value_start = eol - value.len();

        match value.chars().next() {
            Some(quote @ ('\'' | '"')) => self.scan_quoted(name, quote, value_start),
            _ => {
                self.advance_past_line(at);
                if value.contains(['\'', '"']) {
                    return Err(SkippedLine {
                        line,
                        reason: SkipReason::StrayQuote,
                    });
                }
                Ok(RawAssignment {
                    name: name.to_string(),
                    quote: QuoteKind::None,
                    raw_value: value.to_string(),
                    line,
                })
            }
        }
    }

    /// Scan a quoted value opening at byte `start` with the character `quote`.
    ///
    /// The longest opening run (up to three quotes) is tried first. A closer
    /// is accepted only if the rest of its line holds no quote character;
    /// that rest is discarded. When no closer fits, shorter runs are tried so
    /// surplus quote characters become part of the value.
    fn scan_quoted(
        &mut self,
        name: &str,
        quote: char,
        start: usize,
    ) -> Result<RawAssignment, SkippedLine> {
        let text = self.text;
        let line = self.line;
        let run = text[start..]
            .chars()
            .take_while(|&c| c == quote)
            .count()
            .min(MAX_QUOTE_RUN);

        // `""` or `''` closing on its own line is an empty value, not the
        // opener of a run that would swallow the following lines.
        if run == 2 {
            let after = start + 2;
            if !text[after..self.line_end(after)].contains(['\'', '"']) {
                self.advance_past_line(after);
                return Ok(RawAssignment {
                    name: name.to_string(),
                    quote: QuoteKind::from_run(quote, 1),
                    raw_value: String::new(),
                    line,
                });
            }
        }

        for len in (1..=run).rev() {
            let open_end = start + len;
            if let Some(close) = self.find_closer(quote, len, open_end) {
                let raw_value = text[open_end..close].trim().to_string();
                self.advance_past_line(close + len);
                return Ok(RawAssignment {
                    name: name.to_string(),
                    quote: QuoteKind::from_run(quote, len),
                    raw_value,
                    line,
                });
            }
        }

        self.advance_past_line(start);
        Err(SkippedLine {
            line,
            reason: SkipReason::UnterminatedQuote,
        })
    }

    /// Offset of the first run of `len` copies of `quote` at or after `from`
    /// whose remaining line holds no quote character.
    ///
    /// Linear in the text searched: the last quote of each physical line is
    /// located once, and a failed search is remembered because a search from
    /// a later offset only sees a subset of the same candidates.
    fn find_closer(&mut self, quote: char, len: usize, from: usize) -> Option<usize> {
        let slot = (usize::from(quote == '"'), len - 1);
        if from >= self.no_closer_from[slot.0][slot.1] {
            return None;
        }

        let text = self.text;
        let closer = quote.to_string().repeat(len);
        // End of the physical line holding the latest candidate, and the last
        // quote character between that candidate and the line end.
        let mut line: Option<(usize, Option<usize>)> = None;
        let mut at = from;

        while let Some(offset) = text[at..].find(closer.as_str()) {
            let close = at + offset;
            let after = close + len;
            let (_, last_quote) = match line {
                Some((end, last_quote)) if after <= end => (end, last_quote),
                _ => {
                    let end = self.line_end(after);
                    let last_quote = text[after..end].rfind(['\'', '"']).map(|i| after + i);
                    *line.insert((end, last_quote))
                }
            };
            if last_quote.is_none_or(|q| q < after) {
                return Some(close);
            }
            at = close + 1;
        }

        let failed = &mut self.no_closer_from[slot.0][slot.1];
        *failed = (*failed).min(from);
        None
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<RawAssignment, SkippedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let start = self.pos;
            let eol = self.line_end(start);
            let line = &self.text[start..eol];
            let content = line.trim_start();

            if content.trim_end().is_empty() || content.starts_with('#') {
                self.advance_past_line(start);
                continue;
            }

            let at = start + (line.len() - content.len());
            return Some(self.scan_assignment(at, eol));
        }
        None
    }
}

/// Whitespace that does not end a line.
fn is_blank(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}

/// Length in bytes of the `[A-Za-z_][A-Za-z0-9_]*` identifier at the start of `s`.
fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(s.len(), |(i, _)| i)
}
