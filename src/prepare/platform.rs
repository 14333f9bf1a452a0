//! Platform line patching
//!
//! Some sources carry paired variants of platform-specific lines, each tagged
//! with a trailing marker comment:
//!
//! ```text
//!       SLASH = '\'  !DOS, Windows
//! !     SLASH = '/'  !Linux, UNIX
//! ```
//!
//! Patching for a target comments out every line tagged for the other platform
//! (first column becomes `!`) and uncomments every line tagged for the target
//! (first column becomes a space). Marker matching ignores case.
//!
//! Files are processed as bytes so non-UTF-8 text passes through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

const WINDOWS_MARKER: &[u8] = b"!dos, windows";
const LINUX_MARKER: &[u8] = b"!linux, unix";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    fn marker(self) -> &'static [u8] {
        match self {
            Platform::Linux => LINUX_MARKER,
            Platform::Windows => WINDOWS_MARKER,
        }
    }

    fn other(self) -> Self {
        match self {
            Platform::Linux => Platform::Windows,
            Platform::Windows => Platform::Linux,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => f.write_str("linux"),
            Platform::Windows => f.write_str("windows"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    /// Lines tagged for the other platform.
    pub commented: usize,
    /// Lines tagged for the target platform.
    pub uncommented: usize,
    /// Whether the content differs from the input.
    pub changed: bool,
}

/// Rewrites tagged lines for `platform`. Line endings are kept as they are.
pub fn patch_bytes(content: &[u8], platform: Platform) -> (Vec<u8>, PatchSummary) {
    let comment_marker = platform.other().marker();
    let uncomment_marker = platform.marker();

    let mut output = Vec::with_capacity(content.len());
    let mut summary = PatchSummary::default();

    for line in content.split_inclusive(|&b| b == b'\n') {
        let lowered = line.to_ascii_lowercase();
        let replacement = if contains(&lowered, comment_marker) {
            summary.commented += 1;
            Some(b'!')
        } else if contains(&lowered, uncomment_marker) {
            summary.uncommented += 1;
            Some(b' ')
        } else {
            None
        };

        match replacement {
            Some(first) if line.first().is_some_and(u8::is_ascii) => {
                output.push(first);
                output.extend_from_slice(&line[1..]);
            }
            _ => output.extend_from_slice(line),
        }
    }

    summary.changed = output != content;
    (output, summary)
}

/// Patches `path` in place.
///
/// The new content goes to a temporary file next to the original, which then
/// replaces it with a rename. If anything fails before the rename the original
/// is left as it was and the temporary file is removed. Unchanged files are not
/// rewritten.
pub fn patch_file(path: &Path, platform: Platform) -> io::Result<PatchSummary> {
    info!(path = %path.display(), %platform, "Patching platform-specific lines");

    let original = fs::read(path)?;
    let (patched, summary) = patch_bytes(&original, platform);

    if !summary.changed {
        debug!(path = %path.display(), "Already patched, leaving file untouched");
        return Ok(summary);
    }

    replace_contents(path, &patched)?;

    debug!(
        path = %path.display(),
        commented = summary.commented,
        uncommented = summary.uncommented,
        "Platform patch applied"
    );
    Ok(summary)
}

/// Writes `content` to a temporary file next to `path` and renames it over
/// `path`, keeping the permissions of the existing entry. On error the target
/// is untouched and the temporary file is gone.
fn replace_contents(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "      CHARACTER*1 SLASH\n      PARAMETER (SLASH = '\\') !DOS, Windows\n!     PARAMETER (SLASH = '/')  !Linux, UNIX\n      END\n";

    #[test]
    fn test_patch_for_linux() {
        let (out, summary) = patch_bytes(SAMPLE.as_bytes(), Platform::Linux);
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "      CHARACTER*1 SLASH");
        assert_eq!(lines[1], "!     PARAMETER (SLASH = '\\') !DOS, Windows");
        assert_eq!(lines[2], "      PARAMETER (SLASH = '/')  !Linux, UNIX");
        assert_eq!(summary.commented, 1);
        assert_eq!(summary.uncommented, 1);
        assert!(summary.changed);
    }

    #[test]
    fn test_patch_for_windows_is_inverse() {
        let (linux, _) = patch_bytes(SAMPLE.as_bytes(), Platform::Linux);
        let (windows, summary) = patch_bytes(&linux, Platform::Windows);
        assert_eq!(String::from_utf8(windows).unwrap(), SAMPLE);
        assert!(summary.changed);
    }

    #[test]
    fn test_patch_is_idempotent() {
        let (once, _) = patch_bytes(SAMPLE.as_bytes(), Platform::Linux);
        let (twice, summary) = patch_bytes(&once, Platform::Linux);
        assert_eq!(once, twice);
        assert!(!summary.changed);
    }

    #[test]
    fn test_preserves_crlf_and_non_utf8() {
        let input = b"      X = 1 !dos, windows\r\n! \xe9 Y = 2 !linux, unix\r\n".to_vec();
        let (out, _) = patch_bytes(&input, Platform::Linux);
        assert_eq!(out, b"!     X = 1 !dos, windows\r\n  \xe9 Y = 2 !linux, unix\r\n".to_vec());
    }

    #[test]
    fn test_patch_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ModuleDefs.for");
        fs::write(&path, SAMPLE).unwrap();

        let summary = patch_file(&path, Platform::Linux).unwrap();
        assert!(summary.changed);

        let patched = fs::read_to_string(&path).unwrap();
        assert!(patched.contains("!     PARAMETER (SLASH = '\\') !DOS, Windows"));

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file left behind");
    }

    #[cfg(unix)]
    #[test]
    fn test_patch_file_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CRSIMDEF.for");
        fs::write(&path, SAMPLE).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        patch_file(&path, Platform::Linux).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_failed_replace_keeps_target_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        // Renaming a file over a non-empty directory fails for every user
        let target = dir.path().join("ModuleDefs.for");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "kept\n").unwrap();

        assert!(replace_contents(&target, SAMPLE.as_bytes()).is_err());

        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "kept\n");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("ModuleDefs.for")]);
    }

    #[test]
    fn test_replace_contents_overwrites_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("CRSIMDEF.for");
        fs::write(&target, "old\n").unwrap();

        replace_contents(&target, b"new\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_patch_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = patch_file(&dir.path().join("missing.for"), Platform::Linux).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_platform_display_and_serde() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        let parsed: Platform = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, Platform::Windows);
    }
}
