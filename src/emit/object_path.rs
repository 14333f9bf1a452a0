use std::path::{Component, Path, PathBuf};

/// Maps a source file to its object file relative to the object root.
///
/// `source_root/sub/dir/X.for` becomes `sub/dir/X.o` for suffix `.o`. Returns
/// `None` when `source` is not under `source_root`.
pub fn relative_object_path(source: &Path, source_root: &Path, object_suffix: &str) -> Option<PathBuf> {
    let relative = source.strip_prefix(source_root).ok()?;
    relative.file_name()?;

    let mut object = relative.to_path_buf();
    object.set_extension(object_suffix.trim_start_matches('.'));
    Some(object)
}

/// Renders a relative path with `/` separators for use inside a makefile.
pub fn to_make_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrors_relative_directories() {
        let object = relative_object_path(
            Path::new("/src/dssat-csm/Plant/CROPGRO/CROPGRO.for"),
            Path::new("/src/dssat-csm"),
            ".o",
        )
        .unwrap();
        assert_eq!(object, PathBuf::from("Plant/CROPGRO/CROPGRO.o"));
    }

    #[test]
    fn test_file_at_root() {
        let object =
            relative_object_path(Path::new("/src/CSM.for"), Path::new("/src"), ".o").unwrap();
        assert_eq!(object, PathBuf::from("CSM.o"));
    }

    #[test]
    fn test_only_last_extension_replaced() {
        let object = relative_object_path(
            Path::new("/src/ORYZA/OR.ZA.f90"),
            Path::new("/src"),
            "obj",
        )
        .unwrap();
        assert_eq!(object, PathBuf::from("ORYZA/OR.ZA.obj"));
    }

    #[test]
    fn test_outside_root() {
        assert!(relative_object_path(Path::new("/other/x.for"), Path::new("/src"), ".o").is_none());
        assert!(relative_object_path(Path::new("/src"), Path::new("/src"), ".o").is_none());
    }

    #[test]
    fn test_make_path_uses_forward_slashes() {
        let relative: PathBuf = ["Plant", "CROPGRO", "CROPGRO.o"].iter().collect();
        assert_eq!(to_make_path(&relative), "Plant/CROPGRO/CROPGRO.o");
    }
}
