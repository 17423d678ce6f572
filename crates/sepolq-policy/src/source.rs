use crate::config::{SearchConfig, DEFAULT_INTERFACE_EXTENSION, DEFAULT_SUPPORT_EXTENSION};
use crate::error::{PolicyError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Supplies the ordered candidate files of a policy tree and their contents.
///
/// Lookups walk `candidates()` in the order returned, so the order decides
/// which declaration wins when a name is defined more than once.
pub trait PolicySource {
    /// Candidate files, interface files first. Fails with
    /// `NoCandidateFiles` rather than returning an empty list.
    fn candidates(&self) -> Result<Vec<PathBuf>>;

    /// Full contents of `path`, one entry per line, newlines kept
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;
}

impl<S: PolicySource + ?Sized> PolicySource for &S {
    fn candidates(&self) -> Result<Vec<PathBuf>> {
        (**self).candidates()
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        (**self).read_lines(path)
    }
}

/// Split file contents into lines, each keeping its trailing `\n`. The last
/// line has none when the file does not end with a newline.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_owned).collect()
}

/// Policy tree on disk, enumerated with a recursive glob per extension
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    interface_extension: String,
    support_extension: String,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, config: &SearchConfig) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PolicyError::InvalidDirectory(root));
        }

        Ok(Self {
            root,
            interface_extension: config.interface_extension.clone(),
            support_extension: config.support_extension.clone(),
        })
    }

    /// Every regular file under the root ending in `.{extension}`, in glob
    /// traversal order.
    fn glob_extension(&self, extension: &str) -> Result<Vec<PathBuf>> {
        let root = self.root.to_str().ok_or_else(|| {
            PolicyError::InvalidPattern(format!(
                "Policy directory is not valid UTF-8: {}",
                self.root.display()
            ))
        })?;
        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(root.trim_end_matches('/')),
            extension
        );

        let entries =
            glob::glob(&pattern).map_err(|e| PolicyError::InvalidPattern(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(path) => tracing::trace!("Skipping non-file match {}", path.display()),
                Err(e) => tracing::warn!("Skipping unreadable path {}: {}", e.path().display(), e),
            }
        }

        tracing::debug!(
            "Found {} .{} files under {}",
            files.len(),
            extension,
            self.root.display()
        );
        Ok(files)
    }
}

impl PolicySource for FsSource {
    fn candidates(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.glob_extension(&self.interface_extension)?;
        files.extend(self.glob_extension(&self.support_extension)?);

        if files.is_empty() {
            return Err(PolicyError::NoCandidateFiles {
                root: self.root.clone(),
                interface: self.interface_extension.clone(),
                support: self.support_extension.clone(),
            });
        }
        Ok(files)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(split_lines(&content))
    }
}

/// In-memory policy tree. Files are returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: Vec<(PathBuf, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add a file, or replace the contents of one already present without
    /// changing its position.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = content,
            None => self.files.push((path, content)),
        }
    }

    pub fn remove(&mut self, path: &Path) {
        self.files.retain(|(p, _)| p != path);
    }
}

impl PolicySource for MemorySource {
    fn candidates(&self) -> Result<Vec<PathBuf>> {
        if self.files.is_empty() {
            return Err(PolicyError::NoCandidateFiles {
                root: PathBuf::from("<memory>"),
                interface: DEFAULT_INTERFACE_EXTENSION.to_string(),
                support: DEFAULT_SUPPORT_EXTENSION.to_string(),
            });
        }
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| split_lines(content))
            .ok_or_else(|| PolicyError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }
}
