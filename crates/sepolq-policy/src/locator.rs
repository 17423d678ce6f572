use crate::config::QueryMode;
use crate::error::Result;
use crate::matcher::{DeclarationMatcher, Keyword};
use crate::source::PolicySource;
use std::path::PathBuf;

/// Where a declaration header was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// Zero-based line index of the header
    pub line: usize,
    /// `None` only when a regex query matched a line with no keyword
    pub keyword: Option<Keyword>,
}

/// Finds the first declaration header for a query across candidate files
pub struct Locator {
    matcher: DeclarationMatcher,
}

impl Locator {
    pub fn new(query: &str, mode: QueryMode) -> Result<Self> {
        Ok(Self {
            matcher: DeclarationMatcher::new(query, mode)?,
        })
    }

    /// Scan `files` in order and return the first matching line. Files after
    /// the one containing the match are never read.
    pub fn locate<S: PolicySource + ?Sized>(
        &self,
        source: &S,
        files: &[PathBuf],
    ) -> Result<Option<Location>> {
        for path in files {
            let lines = source.read_lines(path)?;
            tracing::trace!("Scanning {} ({} lines)", path.display(), lines.len());

            for (line, content) in lines.iter().enumerate() {
                if self.matcher.matches(content) {
                    let keyword = self.matcher.keyword(content);
                    tracing::debug!(
                        "Found {} '{}' at {}:{}",
                        keyword.map_or("declaration", |k| k.as_str()),
                        self.matcher.query(),
                        path.display(),
                        line + 1
                    );
                    return Ok(Some(Location {
                        path: path.clone(),
                        line,
                        keyword,
                    }));
                }
            }
        }

        tracing::debug!(
            "No declaration of '{}' in {} files",
            self.matcher.query(),
            files.len()
        );
        Ok(None)
    }
}
