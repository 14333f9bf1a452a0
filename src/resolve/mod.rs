//! Compile-order resolution
//!
//! Orders source units so that every module a unit uses is declared by a unit
//! placed before it (or by the unit itself). There is no explicit graph: each
//! pass walks the unplaced units in candidate order and places every unit whose
//! requirements are already in the compiled set. Passes repeat until all units
//! are placed. A pass that places nothing means the rest are blocked by a
//! cycle or by a module no candidate declares, and resolution fails with the
//! blocked units named.

mod state;

pub use state::{PassOutcome, ResolveState};

use crate::source::{ModuleName, SourceUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// A unit that could not be placed and the modules it is still waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuckUnit {
    pub path: PathBuf,
    pub missing: Vec<ModuleName>,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(
        "Cannot determine compile order: {} source file(s) have unresolvable module dependencies{}",
        .stuck.len(),
        describe_stuck(.stuck, .undeclared)
    )]
    Unresolvable {
        stuck: Vec<StuckUnit>,
        /// Missing modules that no candidate declares at all.
        undeclared: Vec<ModuleName>,
    },
}

fn describe_stuck(stuck: &[StuckUnit], undeclared: &[ModuleName]) -> String {
    let mut out = String::new();
    for unit in stuck {
        let missing: Vec<&str> = unit.missing.iter().map(|m| m.as_str()).collect();
        let _ = write!(out, "\n  {} (waiting for: {})", unit.path.display(), missing.join(", "));
    }
    if !undeclared.is_empty() {
        let names: Vec<&str> = undeclared.iter().map(|m| m.as_str()).collect();
        let _ = write!(out, "\n  modules declared by no source file: {}", names.join(", "));
    }
    out
}

/// Units in a valid compile order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOrder {
    pub units: Vec<SourceUnit>,
    pub passes: usize,
}

impl CompileOrder {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.units.iter().map(|u| u.path())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    external_modules: BTreeSet<ModuleName>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modules treated as compiled before the first pass, such as the
    /// compiler's intrinsic modules.
    pub fn with_external_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = ModuleName>,
    {
        self.external_modules.extend(modules);
        self
    }

    pub fn resolve(&self, units: &[SourceUnit]) -> Result<CompileOrder, ResolveError> {
        let mut state = ResolveState::seeded(units.len(), self.external_modules.clone());

        while !state.is_complete() {
            let PassOutcome {
                state: next,
                newly_ordered,
            } = state.step(units);

            debug!(
                pass = next.passes(),
                newly_ordered,
                remaining = units.len() - next.order().len(),
                "Resolution pass complete"
            );

            if newly_ordered == 0 {
                return Err(Self::unresolvable(&next, units));
            }
            state = next;
        }

        info!(
            units = units.len(),
            passes = state.passes(),
            "Compile order resolved"
        );

        Ok(CompileOrder {
            units: state.order().iter().map(|&i| units[i].clone()).collect(),
            passes: state.passes(),
        })
    }

    fn unresolvable(state: &ResolveState, units: &[SourceUnit]) -> ResolveError {
        let stuck: Vec<StuckUnit> = state
            .remaining()
            .map(|index| StuckUnit {
                path: units[index].path().to_path_buf(),
                missing: state.missing_for(&units[index]),
            })
            .collect();

        let declared: BTreeSet<&ModuleName> = units.iter().flat_map(|u| u.provides()).collect();
        let undeclared: Vec<ModuleName> = stuck
            .iter()
            .flat_map(|s| s.missing.iter())
            .filter(|name| !declared.contains(name))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        ResolveError::Unresolvable { stuck, undeclared }
    }
}

/// Resolves with an empty starting set.
pub fn resolve(units: &[SourceUnit]) -> Result<CompileOrder, ResolveError> {
    Resolver::new().resolve(units)
}
