use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::PreparationPhase;
use crate::source::SourceUnit;
use anyhow::{Context, Result};
use tracing::debug;

pub struct ScanPhase;

impl PreparationPhase for ScanPhase {
    fn name(&self) -> &'static str {
        "ScanPhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let mut units = Vec::with_capacity(context.candidates.len());

        for path in &context.candidates {
            let unit = SourceUnit::load(path.clone())
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            debug!(
                path = %path.display(),
                requires = unit.requires().len(),
                provides = unit.provides().len(),
                "Scanned declarations"
            );
            units.push(unit);
        }

        context.units = units;
        Ok(())
    }
}
