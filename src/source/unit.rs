use super::module_name::ModuleName;
use super::scanner::{self, Declarations};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// A candidate compilation unit with its scanned declarations.
///
/// Identity is the absolute path; the declarations are read once and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    path: PathBuf,
    declarations: Declarations,
}

impl SourceUnit {
    pub fn new(path: PathBuf, declarations: Declarations) -> Self {
        Self { path, declarations }
    }

    /// Scans `path` and builds the unit from what it declares.
    pub fn load(path: PathBuf) -> io::Result<Self> {
        let declarations = scanner::scan_file(&path)?;
        Ok(Self::new(path, declarations))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn requires(&self) -> &BTreeSet<ModuleName> {
        &self.declarations.requires
    }

    pub fn provides(&self) -> &BTreeSet<ModuleName> {
        &self.declarations.provides
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}
