//! Fault injection for chaos runs.
//!
//! A fault makes one traveler submit an out-of-vocabulary delta at a given
//! step, which the grid rejects. Used to check that one traveler's failure
//! never affects the others.

use std::collections::BTreeMap;
use travelers_env::TravelerId;

/// One injected fault: traveler `traveler` fails at step `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultSpec {
    pub traveler: TravelerId,
    pub step: usize,
}

impl std::str::FromStr for FaultSpec {
    type Err = String;

    /// Parses `ID` or `ID@STEP` (step defaults to 0).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, step) = match s.split_once('@') {
            Some((id, step)) => (id, Some(step)),
            None => (s, None),
        };

        let traveler = id
            .trim()
            .parse::<u32>()
            .map(TravelerId)
            .map_err(|e| format!("Invalid traveler id '{}': {}", id, e))?;
        let step = match step {
            Some(step) => step
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid step '{}': {}", step, e))?,
            None => 0,
        };

        Ok(Self { traveler, step })
    }
}

/// The set of faults to apply in one run, at most one per traveler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    faults: BTreeMap<TravelerId, usize>,
}

impl FaultPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fault; a later fault for the same traveler replaces it.
    pub fn corrupt(mut self, traveler: TravelerId, step: usize) -> Self {
        self.faults.insert(traveler, step);
        self
    }

    /// Returns the failing step for a traveler, if any.
    pub fn fault_for(&self, traveler: TravelerId) -> Option<usize> {
        self.faults.get(&traveler).copied()
    }

    /// Returns faults aimed at ids outside `0..traveler_count`.
    pub fn out_of_range(&self, traveler_count: u32) -> Vec<TravelerId> {
        self.faults
            .keys()
            .filter(|id| id.0 >= traveler_count)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }
}

impl FromIterator<FaultSpec> for FaultPlan {
    fn from_iter<I: IntoIterator<Item = FaultSpec>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |plan, spec| plan.corrupt(spec.traveler, spec.step))
    }
}
