//! Per-device source registry
//!
//! Binds each of the six input slots to the label the user picked at setup
//! time. Built once and never mutated.

use nac_codes::{SlotId, SourceLabel};

/// Mapping from input slots to user-chosen source labels
///
/// Labels need not be distinct. When two slots share a label, lookups by
/// label resolve to the lowest slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    /// Indexed by `SlotId::index()`
    labels: [SourceLabel; 6],
}

impl SourceRegistry {
    /// Create a registry from labels in slot order
    pub fn new(labels: [SourceLabel; 6]) -> Self {
        Self { labels }
    }

    /// Label bound to a slot
    pub fn label(&self, slot: SlotId) -> SourceLabel {
        self.labels[slot.index()]
    }

    /// All labels in slot order; this is the advertised source list
    pub fn sources_in_order(&self) -> impl Iterator<Item = SourceLabel> + '_ {
        self.labels.iter().copied()
    }

    /// Advertised source list as display strings
    pub fn source_names(&self) -> Vec<String> {
        self.sources_in_order().map(|l| l.name().to_string()).collect()
    }

    /// First slot, in slot order, carrying `label`
    pub fn slot_for(&self, label: SourceLabel) -> Option<SlotId> {
        SlotId::ALL
            .into_iter()
            .find(|slot| self.labels[slot.index()] == label)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(SlotId::ALL.map(SourceLabel::default_for))
    }
}
