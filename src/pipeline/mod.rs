//! Preparation run: patch, collect, scan, order, emit, stage, finalize.

pub mod config;
pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;

pub use config::RunOptions;
pub use context::{OrderedUnit, PatchedFile, PreparationContext, PreparationReport};
pub use orchestrator::PipelineOrchestrator;
pub use phase_trait::{FinalizeHook, PreparationPhase};
