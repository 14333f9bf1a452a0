//! Asset staging: copies runtime data next to the built executable.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Recursively copies the contents of `src` into `dst`, creating directories
/// as needed and overwriting files that already exist. Returns the number of
/// files copied.
pub fn copy_data_tree(src: &Path, dst: &Path) -> io::Result<usize> {
    info!(from = %src.display(), to = %dst.display(), "Copying data tree");

    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("data directory not found: {}", src.display()),
        ));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            debug!(file = %relative.display(), "Copied");
            copied += 1;
        }
    }

    info!(files = copied, "Data tree copied");
    Ok(copied)
}

/// Copies a single profile file, replacing `dst` if it exists.
pub fn copy_profile(src: &Path, dst: &Path) -> io::Result<()> {
    info!(from = %src.display(), to = %dst.display(), "Copying profile");
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::copy(src, dst)?;
    Ok(())
}
