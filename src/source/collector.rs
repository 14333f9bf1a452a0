//! Candidate collection
//!
//! Walks a source tree and keeps the files that look like real compilation
//! units: the file name carries a source marker (`.f` by default, so `.for`,
//! `.f90` and `.F90` all match) and at least one line mentions `end` or
//! `module`. Include fragments that hold only declarations or data fail the
//! second test and are left out.

use super::scanner::read_source_lossy;
use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Source directory does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("Source path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No compilable source files found under {root}")]
    NoSourceFound { root: PathBuf },
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Case-insensitive substrings a file name must contain.
    pub source_markers: Vec<String>,
    /// Case-insensitive substrings of which one must appear in some line.
    pub candidate_keywords: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            source_markers: vec![".f".to_string()],
            candidate_keywords: vec!["end".to_string(), "module".to_string()],
        }
    }
}

pub struct CandidateCollector {
    config: CollectorConfig,
}

impl CandidateCollector {
    pub fn new(config: CollectorConfig) -> Self {
        let config = CollectorConfig {
            source_markers: lowercase_all(&config.source_markers),
            candidate_keywords: lowercase_all(&config.candidate_keywords),
        };
        Self { config }
    }

    /// Returns candidate paths in walk order (directory entries sorted by name).
    ///
    /// Paths are absolute. Symlinks are followed and a linked file keeps the
    /// path of the link. An empty result is reported as
    /// [`CollectError::NoSourceFound`].
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>, CollectError> {
        let start = Instant::now();
        let root = Self::validate_root(root)?;

        info!(root = %root.display(), "Collecting candidate source files");

        let mut candidates = Vec::new();
        let mut files_seen = 0usize;

        for result in WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            files_seen += 1;

            let path = entry.path();
            if !self.has_source_marker(path) {
                continue;
            }

            let text = read_source_lossy(path).map_err(|source| CollectError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            if self.looks_like_program_unit(&text) {
                debug!(path = %path.display(), "Candidate");
                candidates.push(path.to_path_buf());
            } else {
                debug!(path = %path.display(), "Skipping fragment without program unit");
            }
        }

        if candidates.is_empty() {
            error!(root = %root.display(), "No source code files found");
            return Err(CollectError::NoSourceFound { root });
        }

        info!(
            candidates = candidates.len(),
            files_seen,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Candidate collection complete"
        );

        Ok(candidates)
    }

    fn validate_root(root: &Path) -> Result<PathBuf, CollectError> {
        if !root.exists() {
            return Err(CollectError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(CollectError::NotADirectory(root.to_path_buf()));
        }
        root.canonicalize().map_err(|source| CollectError::Io {
            path: root.to_path_buf(),
            source,
        })
    }

    fn has_source_marker(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.config
            .source_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }

    fn looks_like_program_unit(&self, text: &str) -> bool {
        text.lines().any(|line| {
            let line = line.to_lowercase();
            self.config
                .candidate_keywords
                .iter()
                .any(|keyword| line.contains(keyword.as_str()))
        })
    }
}

impl Default for CandidateCollector {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
