use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::PreparationPhase;
use crate::prepare::{copy_data_tree, copy_profile};
use anyhow::{Context, Result};

/// Copies the model's data files and the profile into the executable directory.
pub struct StagePhase;

impl PreparationPhase for StagePhase {
    fn name(&self) -> &'static str {
        "StagePhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let config = &context.config;
        let exe_dir = config.exe_dir();

        let data_dir = config.data_dir();
        let staged = copy_data_tree(&data_dir, &exe_dir)
            .with_context(|| format!("Failed to copy data directory {}", data_dir.display()))?;

        let profile = config.profile_source();
        copy_profile(&profile, &config.profile_target())
            .with_context(|| format!("Failed to copy profile {}", profile.display()))?;

        context.staged_files = staged;
        context.profile_staged = true;
        Ok(())
    }
}
