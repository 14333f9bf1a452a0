use crate::source::{ModuleName, SourceUnit};
use std::collections::BTreeSet;

/// Snapshot of a resolution run between passes.
///
/// `compiled` is every module name satisfied by the units placed so far and
/// only ever grows. `order` holds indices into the candidate slice the state
/// was built for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveState {
    compiled: BTreeSet<ModuleName>,
    order: Vec<usize>,
    placed: Vec<bool>,
    passes: usize,
}

/// Result of one pass over the remaining candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub state: ResolveState,
    pub newly_ordered: usize,
}

impl ResolveState {
    pub fn new(unit_count: usize) -> Self {
        Self::seeded(unit_count, BTreeSet::new())
    }

    /// Starts with `available` already counted as compiled.
    pub fn seeded(unit_count: usize, available: BTreeSet<ModuleName>) -> Self {
        Self {
            compiled: available,
            order: Vec::with_capacity(unit_count),
            placed: vec![false; unit_count],
            passes: 0,
        }
    }

    pub fn compiled(&self) -> &BTreeSet<ModuleName> {
        &self.compiled
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn is_complete(&self) -> bool {
        self.order.len() == self.placed.len()
    }

    pub fn is_placed(&self, index: usize) -> bool {
        self.placed.get(index).copied().unwrap_or(false)
    }

    /// Indices not yet placed, in candidate order.
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.placed
            .iter()
            .enumerate()
            .filter(|(_, placed)| !**placed)
            .map(|(index, _)| index)
    }

    /// A unit is ready when each module it uses is already compiled or is
    /// one it declares itself.
    pub fn is_ready(&self, unit: &SourceUnit) -> bool {
        unit.requires()
            .iter()
            .all(|name| self.compiled.contains(name) || unit.provides().contains(name))
    }

    /// Modules `unit` still waits for.
    pub fn missing_for(&self, unit: &SourceUnit) -> Vec<ModuleName> {
        unit.requires()
            .iter()
            .filter(|name| !self.compiled.contains(*name) && !unit.provides().contains(*name))
            .cloned()
            .collect()
    }

    /// Runs one pass over the unplaced candidates in their original order and
    /// returns the next snapshot.
    ///
    /// A unit placed early in the pass makes its modules available to units
    /// later in the same pass.
    ///
    /// `units` must be the same slice the state was created for.
    pub fn step(&self, units: &[SourceUnit]) -> PassOutcome {
        debug_assert_eq!(units.len(), self.placed.len());

        let mut next = self.clone();
        next.passes += 1;
        let mut newly_ordered = 0;

        for (index, unit) in units.iter().enumerate() {
            if next.placed[index] || !next.is_ready(unit) {
                continue;
            }

            next.placed[index] = true;
            next.order.push(index);
            next.compiled.extend(unit.requires().iter().cloned());
            next.compiled.extend(unit.provides().iter().cloned());
            newly_ordered += 1;
        }

        PassOutcome {
            state: next,
            newly_ordered,
        }
    }
}
