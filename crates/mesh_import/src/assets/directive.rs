//! Directive tokenizer shared by the `.obj` and `.mtl` parsers
//!
//! Both formats are one directive per line: a keyword followed by
//! whitespace-separated fields, or by a free-form argument such as a name or
//! a path.

use std::str::SplitWhitespace;

use log::warn;

/// One non-blank line split into keyword and remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// First whitespace-delimited token
    pub keyword: &'a str,
    /// Raw text after the keyword, untrimmed
    pub rest: &'a str,
}

impl<'a> Directive<'a> {
    /// Split `line`; blank lines yield `None`
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_start();
        if line.is_empty() {
            return None;
        }
        let end = line.find(char::is_whitespace).unwrap_or(line.len());
        Some(Self {
            keyword: &line[..end],
            rest: &line[end..],
        })
    }

    /// First character of the keyword
    pub fn lead(&self) -> char {
        self.keyword.chars().next().unwrap_or_default()
    }

    /// Free-form argument: the rest of the line past exactly one separator
    ///
    /// Further separators and trailing whitespace are part of the argument.
    /// `None` when nothing follows the keyword.
    pub fn argument(&self) -> Option<&'a str> {
        let mut chars = self.rest.chars();
        chars.next()?;
        Some(chars.as_str())
    }

    /// Whitespace-separated fields after the keyword
    pub fn fields(&self) -> SplitWhitespace<'a> {
        self.rest.split_whitespace()
    }

    /// Read `N` floats, substituting 0.0 for missing or malformed fields
    ///
    /// Problems are reported as warnings tagged with `source` and `line`.
    pub fn floats<const N: usize>(&self, source: &str, line: usize) -> [f32; N] {
        let mut values = [0.0; N];
        let mut fields = self.fields();
        let mut malformed = 0;
        for value in &mut values {
            match fields.next().map(str::parse::<f32>) {
                Some(Ok(parsed)) => *value = parsed,
                Some(Err(_)) | None => malformed += 1,
            }
        }
        if malformed > 0 {
            warn!(
                "{}:{}: '{}' expects {} numbers, {} missing or malformed: {}{}",
                source, line, self.keyword, N, malformed, self.keyword, self.rest
            );
        }
        values
    }
}
