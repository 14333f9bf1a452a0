use crate::pipeline::context::{PatchedFile, PreparationContext};
use crate::pipeline::phase_trait::PreparationPhase;
use crate::prepare::patch_file;
use anyhow::{Context, Result};

pub struct PatchPhase;

impl PreparationPhase for PatchPhase {
    fn name(&self) -> &'static str {
        "PatchPhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let platform = context.config.platform;

        for path in context.config.platform_file_paths() {
            let summary = patch_file(&path, platform)
                .with_context(|| format!("Failed to patch {}", path.display()))?;
            context.patched.push(PatchedFile { path, summary });
        }

        Ok(())
    }
}
