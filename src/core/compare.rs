//! Bounded, user-curated set of vehicles shown side by side
//!
//! The set is independent of the current filter: a vehicle stays selected even
//! when a later filter hides it from the list.
//!
//! ```text
//! Unselected ──toggle (len < 3)──▶ Selected
//! Selected   ──toggle / remove──▶ Unselected
//! ```

use crate::core::field::CompareField;
use crate::core::vehicle::VehicleRecord;
use serde::Serialize;

/// Maximum number of vehicles in a comparison
pub const COMPARE_CAPACITY: usize = 3;

/// Result of toggling a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The record was appended to the end of the set
    Added,
    /// A record with the same id was present and has been removed
    Removed,
    /// The set was full; nothing changed
    Rejected,
}

/// Ordered set of at most [`COMPARE_CAPACITY`] records, unique by `id`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSet {
    records: Vec<VehicleRecord>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the record if its id is present, otherwise append it if there is room
    pub fn toggle(&mut self, record: &VehicleRecord) -> ToggleOutcome {
        if self.remove(&record.id) {
            return ToggleOutcome::Removed;
        }
        if self.is_full() {
            return ToggleOutcome::Rejected;
        }
        self.records.push(record.clone());
        ToggleOutcome::Added
    }

    /// Remove the record with this id; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= COMPARE_CAPACITY
    }

    /// Whether the add/remove affordance for this id should be enabled
    pub fn can_toggle(&self, id: &str) -> bool {
        self.contains(id) || !self.is_full()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.records.iter()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// One line of the comparison table: a label and one cell per compared record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareRow {
    pub label: String,
    pub values: Vec<String>,
}

/// Project the comparison set through the given fields
///
/// Produces exactly one row per field, in field order, with one value per
/// record in set order.
pub fn compare_rows(fields: &[CompareField], set: &ComparisonSet) -> Vec<CompareRow> {
    fields
        .iter()
        .map(|field| CompareRow {
            label: field.label.to_string(),
            values: set.iter().map(|record| field.render(record)).collect(),
        })
        .collect()
}
