//! Declaration scanner
//!
//! Extracts the modules a Fortran file uses and the modules it declares with a
//! fixed-column text check instead of a parser. Each line is trimmed and
//! lower-cased, then only its leading keyword window is inspected:
//!
//! - `use <name>` (4-character window `"use "`) adds `<name>` to `requires`
//! - `module <name>` (7-character window `"module "`) adds `<name>` to `provides`
//!
//! The name runs up to the first space, comma, semicolon or tab.
//!
//! This is a heuristic and it is known to be imprecise:
//!
//! - false positives: `module procedure foo` inside an interface block is read as
//!   a module named `procedure`; a continuation line that happens to begin with
//!   `use ` is read as a requirement.
//! - false negatives: `use, intrinsic :: x`, `use::x`, a tab right after the
//!   keyword, and declarations hidden behind preprocessor includes are not seen.
//! - comments and strings are never parsed; they are only excluded when the
//!   keyword does not open the trimmed line.
//!
//! Lines that open with a keyword but carry no name are skipped silently.

use super::module_name::ModuleName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

const USE_KEYWORD: &str = "use ";
const MODULE_KEYWORD: &str = "module ";
const NAME_TERMINATORS: [char; 4] = [' ', ',', ';', '\t'];

/// Module names a single source file requires and provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    pub requires: BTreeSet<ModuleName>,
    pub provides: BTreeSet<ModuleName>,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.provides.is_empty()
    }
}

/// Scans source text for `use` and `module` declarations.
pub fn scan_text(text: &str) -> Declarations {
    let mut declarations = Declarations::default();

    for line in text.lines() {
        let normalized = line.trim().to_lowercase();

        if let Some(name) = declared_name(&normalized, USE_KEYWORD) {
            declarations.requires.insert(name);
        }
        if let Some(name) = declared_name(&normalized, MODULE_KEYWORD) {
            declarations.provides.insert(name);
        }
    }

    declarations
}

/// Reads a file and scans it. Bytes that are not valid UTF-8 are replaced
/// rather than rejected, since legacy sources often carry Latin-1 comments.
pub fn scan_file(path: &Path) -> io::Result<Declarations> {
    let text = read_source_lossy(path)?;
    Ok(scan_text(&text))
}

pub(crate) fn read_source_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn declared_name(normalized: &str, keyword: &str) -> Option<ModuleName> {
    let rest = normalized.strip_prefix(keyword)?;
    let token = rest.split(NAME_TERMINATORS).next().unwrap_or_default();
    ModuleName::new(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn names(set: &BTreeSet<ModuleName>) -> Vec<&str> {
        set.iter().map(|n| n.as_str()).collect()
    }

    #[parameterized(
        plain = { "      USE ModuleDefs", "moduledefs" },
        only_list = { "  use ModuleData, only: GET, PUT", "moduledata" },
        semicolon = { "use csmio; implicit none", "csmio" },
        trailing_space = { "use flood_mod   ", "flood_mod" },
        tab_terminated = { "use ors_mod\t! comment", "ors_mod" },
    )]
    fn test_use_forms(line: &str, expected: &str) {
        let decl = scan_text(line);
        assert_eq!(names(&decl.requires), vec![expected]);
        assert!(decl.provides.is_empty());
    }

    #[parameterized(
        intrinsic_form = { "use, intrinsic :: iso_c_binding" },
        double_colon = { "use::foo" },
        comment = { "! use foo" },
        fixed_form_comment = { "C     use foo" },
        identifier_prefix = { "use_count = use_count + 1" },
        keyword_only = { "use" },
        keyword_then_spaces = { "use    " },
        mid_line = { "call x(); use foo" },
    )]
    fn test_lines_that_are_not_requirements(line: &str) {
        assert!(scan_text(line).requires.is_empty());
    }

    #[test]
    fn test_module_declaration() {
        let decl = scan_text("MODULE ModuleDefs\n  implicit none\nEND MODULE ModuleDefs\n");
        assert_eq!(names(&decl.provides), vec!["moduledefs"]);
        assert!(decl.requires.is_empty());
    }

    #[test]
    fn test_end_module_is_not_a_declaration() {
        let decl = scan_text("end module foo");
        assert!(decl.provides.is_empty());
    }

    #[test]
    fn test_module_procedure_is_a_known_false_positive() {
        let decl = scan_text("  module procedure get_real");
        assert_eq!(names(&decl.provides), vec!["procedure"]);
    }

    #[test]
    fn test_mixed_file() {
        let text = "\
      MODULE FloodModule
      USE ModuleDefs
      USE ModuleData, only: GET
      USE ModuleDefs
      END MODULE FloodModule
";
        let decl = scan_text(text);
        assert_eq!(names(&decl.provides), vec!["floodmodule"]);
        assert_eq!(names(&decl.requires), vec!["moduledata", "moduledefs"]);
    }

    #[test]
    fn test_no_declarations() {
        let decl = scan_text("      SUBROUTINE FOO\n      END SUBROUTINE\n");
        assert!(decl.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let decl = scan_text("use a\r\nmodule b\r\n");
        assert_eq!(names(&decl.requires), vec!["a"]);
        assert_eq!(names(&decl.provides), vec!["b"]);
    }

    #[test]
    fn test_scan_file_tolerates_latin1() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("legacy.for");
        let mut bytes = b"! Caf\xe9\n      USE ModuleDefs\n".to_vec();
        bytes.extend_from_slice(b"      END\n");
        std::fs::write(&path, bytes).unwrap();

        let decl = scan_file(&path).unwrap();
        assert_eq!(names(&decl.requires), vec!["moduledefs"]);
    }

    #[test]
    fn test_scan_missing_file_is_io_error() {
        let result = scan_file(Path::new("/nonexistent/file.for"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
