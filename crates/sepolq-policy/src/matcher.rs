use crate::config::QueryMode;
use crate::error::PolicyError;
use regex::Regex;
use std::fmt;

/// Keyword that opens a policy construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Define,
    Interface,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Define => "define",
            Keyword::Interface => "interface",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matches the header line of a `define(`NAME'` or `interface(`NAME'`
/// declaration for one query.
pub struct DeclarationMatcher {
    query: String,
    regex: Regex,
}

impl DeclarationMatcher {
    pub fn new(query: &str, mode: QueryMode) -> Result<Self, PolicyError> {
        let name = match mode {
            QueryMode::Literal => regex::escape(query),
            QueryMode::Regex => query.to_string(),
        };

        let regex = Regex::new(&format!(r"(define|interface)\(`{}'", name))
            .map_err(|e| PolicyError::RegexError(e.to_string()))?;

        Ok(Self {
            query: query.to_string(),
            regex,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Match a raw source line. Surrounding whitespace is ignored and the
    /// header may appear anywhere in the line.
    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line.trim())
    }

    /// Keyword of the header on `line`, if it matches.
    ///
    /// A regex-mode query with top-level alternation can match without the
    /// keyword group taking part; the first keyword in the line is used
    /// then, and `None` when the line has none.
    pub fn keyword(&self, line: &str) -> Option<Keyword> {
        let line = line.trim();
        let caps = self.regex.captures(line)?;
        match caps.get(1).map(|m| m.as_str()) {
            Some("define") => Some(Keyword::Define),
            Some("interface") => Some(Keyword::Interface),
            _ => first_keyword(line),
        }
    }
}

fn first_keyword(line: &str) -> Option<Keyword> {
    let define = line.find("define(`").map(|at| (at, Keyword::Define));
    let interface = line.find("interface(`").map(|at| (at, Keyword::Interface));
    match (define, interface) {
        (Some(d), Some(i)) => Some(if d.0 < i.0 { d.1 } else { i.1 }),
        (found, None) | (None, found) => found.map(|(_, keyword)| keyword),
    }
}
