use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::{FinalizeHook, PreparationPhase};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Runs the installed [`FinalizeHook`], if any.
pub struct FinalizePhase<'a> {
    hook: Option<&'a dyn FinalizeHook>,
}

impl<'a> FinalizePhase<'a> {
    pub fn new(hook: Option<&'a dyn FinalizeHook>) -> Self {
        Self { hook }
    }
}

impl PreparationPhase for FinalizePhase<'_> {
    fn name(&self) -> &'static str {
        "FinalizePhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        match self.hook {
            Some(hook) => {
                info!(hook = hook.name(), "Running finalize hook");
                hook.run(context)
                    .with_context(|| format!("Finalize hook '{}' failed", hook.name()))
            }
            None => {
                debug!("No finalize hook installed, step reserved");
                Ok(())
            }
        }
    }
}
