//! Medicine models.

use serde::{Deserialize, Serialize};

/// Display unit applied when an upsert leaves the unit blank.
pub const DEFAULT_UNIT: &str = "包";

/// A stored medicine row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Surrogate row id
    pub id: i64,
    /// Unique medicine name
    pub name: String,
    /// On-hand stock, never negative
    pub stock: i64,
    /// Display unit for stock counts
    pub unit: String,
    /// Default administration instructions
    pub usage: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Incoming fields for a medicine upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineDetails {
    pub name: String,
    pub stock: i64,
    pub unit: String,
    pub usage: String,
}

impl MedicineDetails {
    pub fn new(name: &str, stock: i64, unit: &str) -> Self {
        Self {
            name: name.into(),
            stock,
            unit: unit.into(),
            usage: String::new(),
        }
    }
}

impl Default for MedicineDetails {
    fn default() -> Self {
        Self {
            name: String::new(),
            stock: 0,
            unit: DEFAULT_UNIT.into(),
            usage: String::new(),
        }
    }
}
