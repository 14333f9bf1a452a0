//! Filesystem collaborators around the build: platform patching and staging.

pub mod platform;
pub mod staging;

pub use platform::{patch_bytes, patch_file, PatchSummary, Platform};
pub use staging::{copy_data_tree, copy_profile};
