//! Source discovery: which files to compile and what each one declares.

pub mod collector;
pub mod module_name;
pub mod scanner;
pub mod unit;

pub use collector::{CandidateCollector, CollectError, CollectorConfig};
pub use module_name::ModuleName;
pub use scanner::{scan_file, scan_text, Declarations};
pub use unit::SourceUnit;
