//! State shared by the phases of one preparation run

use super::config::RunOptions;
use crate::config::PrepConfig;
use crate::emit::BuildDescription;
use crate::prepare::PatchSummary;
use crate::resolve::CompileOrder;
use crate::source::{ModuleName, SourceUnit};
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct PreparationContext {
    pub config: PrepConfig,
    pub options: RunOptions,

    /// Timestamp written into the build script; the emit phase uses the
    /// current local time when unset.
    pub generated_at: Option<NaiveDateTime>,

    /// Canonical source directory, set by the collect phase.
    pub source_root: Option<PathBuf>,
    pub patched: Vec<PatchedFile>,
    pub candidates: Vec<PathBuf>,
    pub units: Vec<SourceUnit>,
    pub order: Option<CompileOrder>,
    pub build: Option<BuildDescription>,
    pub makefile: Option<PathBuf>,
    pub created_dirs: Vec<PathBuf>,
    pub staged_files: usize,
    pub profile_staged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchedFile {
    pub path: PathBuf,
    pub summary: PatchSummary,
}

impl PreparationContext {
    pub fn new(config: PrepConfig, options: RunOptions) -> Self {
        Self {
            config,
            options,
            generated_at: None,
            source_root: None,
            patched: Vec::new(),
            candidates: Vec::new(),
            units: Vec::new(),
            order: None,
            build: None,
            makefile: None,
            created_dirs: Vec::new(),
            staged_files: 0,
            profile_staged: false,
        }
    }

    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Builds the makefile description from the resolved order.
    ///
    /// Needs the collect and build-order phases to have run. The timestamp is
    /// `generated_at` or the current local time.
    pub fn build_description(&self) -> Result<BuildDescription> {
        let order = self
            .order
            .as_ref()
            .ok_or_else(|| anyhow!("Compile order must be resolved before emitting"))?;
        let source_root = self
            .source_root
            .clone()
            .ok_or_else(|| anyhow!("Source root must be known before emitting"))?;

        let generated_at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        let description = BuildDescription::from_order(order, self.config.emit_config(source_root))?
            .with_timestamp(generated_at);
        Ok(description)
    }

    pub fn report(&self) -> PreparationReport {
        let root = self.source_root.as_deref();
        let order = self
            .order
            .as_ref()
            .map(|order| {
                order
                    .units
                    .iter()
                    .map(|unit| OrderedUnit::from_unit(unit, root))
                    .collect()
            })
            .unwrap_or_default();

        PreparationReport {
            source_root: self.source_root.clone(),
            candidates: self.candidates.len(),
            passes: self.order.as_ref().map(|o| o.passes).unwrap_or(0),
            order,
            patched: self.patched.clone(),
            makefile: self.makefile.clone(),
            created_dirs: self.created_dirs.clone(),
            staged_files: self.staged_files,
            profile_staged: self.profile_staged,
        }
    }
}

/// Summary of a run, suitable for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PreparationReport {
    pub source_root: Option<PathBuf>,
    pub candidates: usize,
    pub passes: usize,
    pub order: Vec<OrderedUnit>,
    pub patched: Vec<PatchedFile>,
    pub makefile: Option<PathBuf>,
    pub created_dirs: Vec<PathBuf>,
    pub staged_files: usize,
    pub profile_staged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedUnit {
    /// Relative to the source root when the unit lies under it.
    pub path: PathBuf,
    pub provides: BTreeSet<ModuleName>,
    pub requires: BTreeSet<ModuleName>,
}

impl OrderedUnit {
    pub fn from_unit(unit: &SourceUnit, root: Option<&Path>) -> Self {
        let path = root
            .and_then(|root| unit.path().strip_prefix(root).ok())
            .unwrap_or(unit.path())
            .to_path_buf();
        Self {
            path,
            provides: unit.provides().clone(),
            requires: unit.requires().clone(),
        }
    }
}
