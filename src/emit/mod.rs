//! Build-script emission

pub mod makefile;
pub mod object_path;

pub use makefile::{emit, BuildDescription, EmitConfig, EmitError, ObjectEntry};
pub use object_path::relative_object_path;
