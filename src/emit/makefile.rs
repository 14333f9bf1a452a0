//! Makefile rendering
//!
//! Turns a resolved compile order into a makefile with this layout:
//! header comment, variable bindings (`FC`, `FCFLAGS`, `SD`, `OD`, `EXE`,
//! `INCLUDE`), the `OBJS` list in compile order, `all`, the link rule, one
//! pattern rule per source extension and `clean`.

use super::object_path::{relative_object_path, to_make_path};
use crate::resolve::CompileOrder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const TIMESTAMP_FORMAT: &str = "%m/%d/%y %I:%M:%S %p";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Source file {path} is outside the source root {root}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },
    #[error("Failed to write build script {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitConfig {
    pub title: String,
    pub compiler: String,
    pub compile_flags: String,
    pub include_flags: String,
    pub source_root: PathBuf,
    pub object_root: PathBuf,
    pub output_executable: PathBuf,
    /// Source suffixes, one pattern rule each, in this order.
    pub extensions: Vec<String>,
    pub object_suffix: String,
    /// Directory under the object root where the compiler writes `.mod` files.
    pub module_subdir: String,
}

/// One compiled object and the source it comes from, both relative to their roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub source: PathBuf,
    pub object: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescription {
    pub config: EmitConfig,
    pub objects: Vec<ObjectEntry>,
    pub generated_at: Option<NaiveDateTime>,
}

impl BuildDescription {
    /// Maps every unit of `order` to its object path, keeping the order.
    pub fn from_order(order: &CompileOrder, config: EmitConfig) -> Result<Self, EmitError> {
        let objects = order
            .paths()
            .map(|path| -> Result<ObjectEntry, EmitError> {
                let object = relative_object_path(path, &config.source_root, &config.object_suffix)
                    .ok_or_else(|| EmitError::OutsideSourceRoot {
                        path: path.to_path_buf(),
                        root: config.source_root.clone(),
                    })?;
                let source = path
                    .strip_prefix(&config.source_root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.to_path_buf());
                debug!(source = %source.display(), object = %object.display(), "Object mapping");
                Ok(ObjectEntry { source, object })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;

        Ok(Self {
            config,
            objects,
            generated_at: None,
        })
    }

    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Absolute object path for each entry, in compile order.
    pub fn object_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.objects
            .iter()
            .map(|entry| self.config.object_root.join(&entry.object))
    }

    /// Directories that must exist before the compiler can write objects and
    /// module files: the module directory plus every object's parent.
    pub fn object_dirs(&self) -> BTreeSet<PathBuf> {
        let mut dirs = BTreeSet::new();
        dirs.insert(self.config.object_root.join(&self.config.module_subdir));
        for object in self.object_paths() {
            if let Some(parent) = object.parent() {
                dirs.insert(parent.to_path_buf());
            }
        }
        dirs
    }

    pub fn render(&self) -> String {
        let config = &self.config;
        let mut out = String::new();

        let _ = writeln!(out, "#Makefile to compile {}", config.title);
        if let Some(generated_at) = &self.generated_at {
            let _ = writeln!(out, "#{}", generated_at.format(TIMESTAMP_FORMAT));
        }
        out.push('\n');

        let _ = writeln!(out, "FC = {}", config.compiler);
        let _ = writeln!(out, "FCFLAGS = {}", config.compile_flags);
        let _ = writeln!(out, "SD = {}", config.source_root.display());
        let _ = writeln!(out, "OD = {}", config.object_root.display());
        let _ = writeln!(out, "EXE = {}", config.output_executable.display());
        let _ = writeln!(out, "INCLUDE = {}", config.include_flags);
        out.push('\n');

        self.render_objects(&mut out);

        out.push_str("all: $(EXE)\n\n");

        out.push_str("$(EXE): $(OBJS)\n");
        out.push_str("\t@echo 'Building target: $@'\n");
        out.push_str("\t@echo 'Invoking Fortran Linker'\n");
        out.push_str("\t$(FC) -o $(EXE) $(OBJS)\n");
        out.push_str("\t@echo 'Finished building target: $@'\n");
        out.push_str("\t@echo ' '\n\n");

        let object_suffix = dotted(&config.object_suffix);
        for extension in &config.extensions {
            let _ = writeln!(out, "$(OD)/%{}: $(SD)/%{}", object_suffix, extension);
            out.push_str("\t@echo 'Building file: $<'\n");
            let _ = writeln!(out, "\t@echo 'Invoking {} Compiler'", config.compiler);
            out.push_str("\t$(FC) $(INCLUDE) $(FCFLAGS) $< -o $@\n");
            out.push_str("\t@echo 'Finished building: $<'\n");
            out.push_str("\t@echo ' '\n\n");
        }

        out.push_str("clean:\n");
        let _ = writeln!(
            out,
            "\t-rm $(EXE) $(OBJS) $(OD)/{}/*.mod",
            config.module_subdir
        );
        out.push_str("\t@echo ' '\n\n");

        out
    }

    fn render_objects(&self, out: &mut String) {
        if self.objects.is_empty() {
            out.push_str("OBJS +=\n\n");
            return;
        }

        out.push_str("OBJS += \\\n");
        let last = self.objects.len() - 1;
        for (index, entry) in self.objects.iter().enumerate() {
            let continuation = if index == last { "" } else { " \\" };
            let _ = writeln!(out, "\t$(OD)/{}{}", to_make_path(&entry.object), continuation);
        }
        out.push('\n');
    }

    pub fn write_to(&self, path: &Path) -> Result<(), EmitError> {
        fs::write(path, self.render()).map_err(|source| EmitError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            objects = self.objects.len(),
            "Build script written"
        );
        Ok(())
    }
}

/// Renders the build script for `order` without a timestamp.
pub fn emit(order: &CompileOrder, config: EmitConfig) -> Result<String, EmitError> {
    Ok(BuildDescription::from_order(order, config)?.render())
}

fn dotted(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{}", suffix)
    }
}
