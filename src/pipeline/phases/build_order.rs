use crate::pipeline::context::PreparationContext;
use crate::pipeline::phase_trait::PreparationPhase;
use anyhow::Result;

pub struct BuildOrderPhase;

impl PreparationPhase for BuildOrderPhase {
    fn name(&self) -> &'static str {
        "BuildOrderPhase"
    }

    fn execute(&self, context: &mut PreparationContext) -> Result<()> {
        let order = context.config.resolver().resolve(&context.units)?;
        context.order = Some(order);
        Ok(())
    }
}
