//! Swing phases and the key-frame map.
//!
//! A [`KeyFrameMap`] assigns each configured phase an index into the swing
//! sequence, or records that the phase could not be located. Maps produced
//! by stability/extremum detection may be partial or out of canonical
//! order, so callers should run [`KeyFrameMap::validated`] before indexing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical golf swing phases, declared in temporal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Address,
    Backswing,
    Top,
    Impact,
    FollowThrough,
    Finish,
}

impl SwingPhase {
    /// All phases in canonical order.
    pub const ALL: [SwingPhase; 6] = [
        SwingPhase::Address,
        SwingPhase::Backswing,
        SwingPhase::Top,
        SwingPhase::Impact,
        SwingPhase::FollowThrough,
        SwingPhase::Finish,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SwingPhase::Address => "address",
            SwingPhase::Backswing => "backswing",
            SwingPhase::Top => "top",
            SwingPhase::Impact => "impact",
            SwingPhase::FollowThrough => "follow_through",
            SwingPhase::Finish => "finish",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase → frame index, with explicit holes for undetected phases.
///
/// Serialized as `{"address": 0, "top": null, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyFrameMap {
    phases: BTreeMap<SwingPhase, Option<usize>>,
}

impl KeyFrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map covering `phases`, none of them located yet.
    pub fn with_phases(phases: impl IntoIterator<Item = SwingPhase>) -> Self {
        Self {
            phases: phases.into_iter().map(|p| (p, None)).collect(),
        }
    }

    /// Set (or clear) the index for a phase, adding it to the covered set.
    pub fn set(&mut self, phase: SwingPhase, index: Option<usize>) {
        self.phases.insert(phase, index);
    }

    /// Located index for a phase, `None` if absent or not covered.
    pub fn get(&self, phase: SwingPhase) -> Option<usize> {
        self.phases.get(&phase).copied().flatten()
    }

    /// Whether the phase is part of this map (located or not).
    pub fn covers(&self, phase: SwingPhase) -> bool {
        self.phases.contains_key(&phase)
    }

    /// Covered phases in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SwingPhase, Option<usize>)> + '_ {
        self.phases.iter().map(|(p, i)| (*p, *i))
    }

    /// Located phases in canonical order.
    pub fn located(&self) -> impl Iterator<Item = (SwingPhase, usize)> + '_ {
        self.phases.iter().filter_map(|(p, i)| i.map(|i| (*p, i)))
    }

    /// Covered phases that were not located.
    pub fn missing(&self) -> Vec<SwingPhase> {
        self.phases
            .iter()
            .filter(|(_, i)| i.is_none())
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn is_partial(&self) -> bool {
        self.phases.values().any(Option::is_none)
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether located indices never decrease in canonical phase order.
    pub fn is_monotonic(&self) -> bool {
        let indices: Vec<usize> = self.located().map(|(_, i)| i).collect();
        indices.windows(2).all(|w| w[0] <= w[1])
    }

    /// Drop indices outside `0..len`, returning the cleaned map and the
    /// phases that were dropped.
    pub fn validated(mut self, len: usize) -> (KeyFrameMap, Vec<SwingPhase>) {
        let mut dropped = vec![];
        for (phase, index) in self.phases.iter_mut() {
            if matches!(index, Some(i) if *i >= len) {
                *index = None;
                dropped.push(*phase);
            }
        }
        (self, dropped)
    }
}
