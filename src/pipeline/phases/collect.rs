use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::PreparationPhase;
use crate::source::CandidateCollector;
use anyhow::{Context, Result};

pub struct CollectPhase;

impl PreparationPhase for CollectPhase {
    fn name(&self) -> &'static str {
        "CollectPhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let source_dir = context.config.source_dir();
        let collector = CandidateCollector::new(context.config.collector_config());

        context.candidates = collector.collect(&source_dir)?;
        context.source_root = Some(source_dir.canonicalize().with_context(|| {
            format!("Failed to resolve source directory {}", source_dir.display())
        })?);

        Ok(())
    }
}
