pub mod build_order;
pub mod collect;
pub mod emit;
pub mod finalize;
pub mod patch;
pub mod scan;
pub mod stage;

pub use build_order::BuildOrderPhase;
pub use collect::CollectPhase;
pub use emit::EmitPhase;
pub use finalize::FinalizePhase;
pub use patch::PatchPhase;
pub use scan::ScanPhase;
pub use stage::StagePhase;
