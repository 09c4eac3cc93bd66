//! Patient models.

use serde::{Deserialize, Serialize};

/// A stored patient row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Surrogate row id
    pub id: i64,
    /// Patient name, half of the identity key
    pub name: String,
    /// Gender display text
    pub gender: String,
    /// Age in years
    pub age: Option<i64>,
    /// Phone number, the other half of the identity key
    pub phone: String,
    /// Free-text medical history
    pub history: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// The (name, phone) pair that identifies this patient.
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.phone)
    }
}

/// Incoming patient fields for identity resolution and explicit edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientDetails {
    /// Patient name (required)
    pub name: String,
    /// Gender display text
    pub gender: String,
    /// Age in years
    pub age: Option<i64>,
    /// Phone number (required)
    pub phone: String,
    /// Free-text medical history; blank means "keep what is stored"
    pub history: String,
}

impl PatientDetails {
    /// Details carrying only the identity pair.
    pub fn identity(name: &str, phone: &str) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_pair() {
        let details = PatientDetails::identity("张三", "13800000001");
        assert_eq!(details.name, "张三");
        assert_eq!(details.phone, "13800000001");
        assert!(details.history.is_empty());
        assert!(details.age.is_none());
    }
}
