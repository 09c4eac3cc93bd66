//! Favorite folder and snapshot models.

use serde::{Deserialize, Serialize};

use super::PrescriptionLine;

/// A favorite folder with its current entry count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteFolder {
    /// Surrogate row id
    pub id: i64,
    /// Unique folder name
    pub name: String,
    /// Number of entries currently in the folder
    pub entry_count: i64,
    /// Creation timestamp
    pub created_time: String,
}

/// Point-in-time copy of one visit's full prescription set.
///
/// Stored as JSON; later edits or deletions of the source visit
/// do not change it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionSnapshot {
    pub prescriptions: Vec<SnapshotLine>,
}

/// One line within a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotLine {
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
}

impl PrescriptionSnapshot {
    /// Capture the current lines of a visit, in entry order.
    pub fn from_lines(lines: &[PrescriptionLine]) -> Self {
        Self {
            prescriptions: lines
                .iter()
                .map(|line| SnapshotLine {
                    medicine: line.medicine.clone(),
                    dosage: line.dosage.clone(),
                    usage: line.usage.clone(),
                })
                .collect(),
        }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A stored favorite entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    /// Surrogate row id
    pub id: i64,
    /// Owning folder
    pub folder_id: i64,
    /// Folder name at read time
    pub folder_name: String,
    /// Source visit id; the entry outlives the visit
    pub visit_id: i64,
    /// Patient name captured at favoriting time
    pub patient_name: String,
    /// Immutable prescription set copy
    pub snapshot: PrescriptionSnapshot,
    /// Creation timestamp
    pub created_time: String,
}
