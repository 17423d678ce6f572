use crate::config::QueryMode;
use crate::error::{PolicyError, Result};
use crate::extractor::{Construct, Extractor};
use crate::locator::Locator;
use crate::source::PolicySource;

/// Locate-then-extract lookup over one policy source
pub struct PolicySearch<S> {
    source: S,
    mode: QueryMode,
}

impl<S: PolicySource> PolicySearch<S> {
    pub fn new(source: S, mode: QueryMode) -> Self {
        Self { source, mode }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Find the first declaration of `query` and read its full text.
    ///
    /// The candidate set is checked before the query is compiled, so an
    /// empty tree reports `NoCandidateFiles` whatever the query.
    pub fn find(&self, query: &str) -> Result<Construct> {
        let files = self.source.candidates()?;
        tracing::debug!("Searching {} candidate files for '{}'", files.len(), query);

        let locator = Locator::new(query, self.mode)?;
        let location = locator
            .locate(&self.source, &files)?
            .ok_or_else(|| PolicyError::QueryNotFound(query.to_string()))?;

        let construct = Extractor::new(&self.source).extract(&location)?;
        tracing::info!(
            "Resolved {} '{}' at {}:{} ({} lines)",
            location.keyword.map_or("declaration", |k| k.as_str()),
            query,
            location.path.display(),
            location.line + 1,
            construct.line_count()
        );
        Ok(construct)
    }
}
