use crate::error::{PolicyError, Result};
use crate::locator::Location;
use crate::source::PolicySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Header carries the whole declaration
    SingleLine,
    /// Header ends with a backtick and the body runs to the terminator line
    Block,
}

/// Declaration text as stored in the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construct {
    pub location: Location,
    pub shape: Shape,
    pub text: String,
}

impl Construct {
    /// First line of the construct, newline included
    pub fn header(&self) -> &str {
        self.text.split_inclusive('\n').next().unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.text.split_inclusive('\n').count()
    }
}

/// Reads a construct back out of its file given a header location
pub struct Extractor<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: PolicySource + ?Sized> Extractor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn extract(&self, location: &Location) -> Result<Construct> {
        let lines = self.source.read_lines(&location.path)?;
        let rest = match lines.get(location.line..) {
            Some(rest) if !rest.is_empty() => rest,
            _ => {
                return Err(PolicyError::LineOutOfRange {
                    path: location.path.clone(),
                    line_number: location.line + 1,
                })
            }
        };

        let header = &rest[0];
        if !header.trim().ends_with('`') {
            return Ok(Construct {
                location: location.clone(),
                shape: Shape::SingleLine,
                text: header.clone(),
            });
        }

        let end = rest.iter().position(|line| is_terminator(line)).ok_or_else(|| {
            PolicyError::MalformedConstruct {
                path: location.path.clone(),
                line_number: location.line + 1,
            }
        })?;

        tracing::trace!(
            "Block at {}:{} spans {} lines",
            location.path.display(),
            location.line + 1,
            end + 1
        );

        Ok(Construct {
            location: location.clone(),
            shape: Shape::Block,
            text: rest[..=end].concat(),
        })
    }
}

/// Exactly `')` on its own line, ended by `\n` or `\r\n`. A final line
/// without its newline counts.
fn is_terminator(line: &str) -> bool {
    match line.strip_prefix("')") {
        Some(ending) => matches!(ending, "\n" | "\r\n" | ""),
        None => false,
    }
}
