pub mod config;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod matcher;
pub mod search;
pub mod source;

pub use config::{LoggingConfig, QueryMode, SearchConfig};
pub use error::{PolicyError, Result};
pub use extractor::{Construct, Extractor, Shape};
pub use locator::{Location, Locator};
pub use matcher::{DeclarationMatcher, Keyword};
pub use search::PolicySearch;
pub use source::{FsSource, MemorySource, PolicySource};
