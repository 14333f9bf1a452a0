//! dssat-prep - build preparation for the DSSAT crop simulation model
//!
//! The model's Fortran sources declare modules with `MODULE name` and import
//! them with `USE name`. A file can only be compiled once every module it uses
//! has been compiled. This library works out that order and turns it into a
//! makefile, alongside the small filesystem chores a build needs.
//!
//! # Core Concepts
//!
//! - **Candidate**: a file under the source tree that looks like Fortran and
//!   contains program text
//! - **Source unit**: a candidate with the modules it requires and provides
//! - **Compile order**: a sequence of units in which every required module is
//!   provided earlier, by the unit itself, or by the compiler
//! - **Build description**: the makefile derived from a compile order
//!
//! # Example Usage
//!
//! ```no_run
//! use dssat_prep::{CandidateCollector, Resolver, SourceUnit};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let candidates = CandidateCollector::default().collect(Path::new("dssat-csm"))?;
//! let units = candidates
//!     .into_iter()
//!     .map(SourceUnit::load)
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let order = Resolver::new().resolve(&units)?;
//! for path in order.paths() {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`source`]: candidate collection and declaration scanning
//! - [`resolve`]: compile-order resolution
//! - [`emit`]: makefile generation
//! - [`prepare`]: platform patching and asset staging
//! - [`pipeline`]: the phases of a full preparation run

pub mod cli;
pub mod config;
pub mod emit;
pub mod pipeline;
pub mod prepare;
pub mod progress;
pub mod resolve;
pub mod source;
pub mod util;

pub use config::{ConfigError, PrepConfig};
pub use emit::{emit, BuildDescription, EmitConfig, EmitError};
pub use pipeline::{PipelineOrchestrator, PreparationContext, PreparationReport, RunOptions};
pub use prepare::{patch_file, PatchSummary, Platform};
pub use resolve::{resolve, CompileOrder, ResolveError, Resolver};
pub use source::{
    scan_text, CandidateCollector, CollectError, Declarations, ModuleName, SourceUnit,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
