use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::PreparationPhase;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Creates the output directories and writes the build script.
pub struct EmitPhase;

impl PreparationPhase for EmitPhase {
    fn name(&self) -> &'static str {
        "EmitPhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let description = context.build_description()?;

        let object_dir = context.config.object_dir();
        let mut dirs: BTreeSet<PathBuf> = BTreeSet::new();
        dirs.insert(context.config.exe_dir());
        dirs.insert(object_dir.clone());
        dirs.extend(context.config.object_subdirs.iter().map(|d| object_dir.join(d)));
        dirs.extend(description.object_dirs());

        for dir in &dirs {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            debug!(dir = %dir.display(), "Directory ready");
        }

        let makefile = context.config.makefile_path();
        description.write_to(&makefile)?;

        context.created_dirs = dirs.into_iter().collect();
        context.makefile = Some(makefile);
        context.build = Some(description);
        Ok(())
    }
}
