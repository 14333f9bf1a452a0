use super::context::PreparationContext;
use anyhow::Result;

/// One step of a preparation run. Phases run in sequence on a shared context.
pub trait PreparationPhase {
    fn name(&self) -> &'static str;

    fn execute(&self, context: &mut PreparationContext) -> Result<()>;
}

/// Optional last step of a full run.
///
/// Reserved for post-build fix-ups of the prepared tree (such as renaming
/// files the executable expects under other names). Nothing is installed by
/// default.
pub trait FinalizeHook {
    fn name(&self) -> &str;

    fn run(&self, context: &PreparationContext) -> Result<()>;
}
