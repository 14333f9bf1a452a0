//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Set up for Windows: the Linux line is commented out.
pub const MODULE_DEFS: &str = r"      MODULE ModuleDefs
      CHARACTER(LEN=1), PARAMETER :: SLASH = '\' !DOS, Windows
!     CHARACTER(LEN=1), PARAMETER :: SLASH = '/' !Linux, Unix
      END MODULE ModuleDefs
";

pub const CRSIMDEF: &str = r"!     Cropsim definitions
      CHARACTER(LEN=12), PARAMETER :: DIRSEP = '\' !dos, windows
!     CHARACTER(LEN=12), PARAMETER :: DIRSEP = '/' !linux, unix
      END
";

/// An installation root laid out the way the defaults expect:
/// `dssat-csm/` with sources and `Data/`, plus the profile at the root.
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("dssat-csm")).expect("Failed to create source dir");
        Self { dir }
    }

    /// The usual small model: a platform module, a utility module using it,
    /// a main program using both, and a data tree with a profile.
    pub fn standard() -> Self {
        let tree = Self::new();
        tree.source("ModuleDefs.for", MODULE_DEFS);
        tree.source("CRSIMDEF.for", CRSIMDEF);
        tree.source(
            "Utils/Util.f90",
            "module util\n  use moduledefs\ncontains\nend module util\n",
        );
        tree.source(
            "CSM.for",
            "      PROGRAM CSM\n      USE ModuleDefs\n      USE Util, ONLY: x\n      END PROGRAM CSM\n",
        );
        tree.source("README.txt", "module docs end\n");
        tree.data("Data/MODEL.ERR", "errors\n");
        tree.data("Data/Genotype/MZCER046.CUL", "cultivars\n");
        tree.file("DSSATPRO.L46", "profile\n");
        tree
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root().join("dssat-csm")
    }

    pub fn source(&self, relative: &str, content: &str) -> PathBuf {
        self.write(&self.source_dir().join(relative), content)
    }

    pub fn data(&self, relative: &str, content: &str) -> PathBuf {
        self.source(relative, content)
    }

    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        self.write(&self.root().join(relative), content)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).expect("Failed to read fixture file")
    }

    fn write(&self, path: &Path, content: &str) -> PathBuf {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write fixture file");
        path.to_path_buf()
    }
}
