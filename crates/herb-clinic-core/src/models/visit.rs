//! Visit and prescription models.

use serde::{Deserialize, Serialize};

/// A stored visit row (one clinical encounter). Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Surrogate row id
    pub id: i64,
    /// Owning patient
    pub patient_id: i64,
    /// Free-form date string, normally YYYY-MM-DD
    pub visit_date: String,
    /// Inspection notes (wang zhen)
    pub wang: String,
    /// Listening and smelling notes (wen zhen)
    pub wen: String,
    /// Inquiry notes (wen zhen)
    pub wen2: String,
    /// Palpation notes (qie zhen)
    pub qie: String,
    /// Diagnosis text, never blank
    pub diagnosis: String,
    /// Treatment plan
    pub treatment: String,
    /// Creation timestamp
    pub created_at: String,
}

/// A visit joined with its patient for list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitSummary {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub visit_date: String,
    pub diagnosis: String,
    pub treatment: String,
}

/// One stored prescription line, in entry order within its visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionLine {
    pub id: i64,
    pub visit_id: i64,
    /// Medicine name, matches a medicines row by exact name
    pub medicine: String,
    /// Free-form dosage text with an embedded quantity
    pub dosage: String,
    /// Administration instructions
    pub usage: String,
}

/// A prescription line joined with its visit and patient for list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionSummary {
    pub visit_id: i64,
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
    pub visit_date: String,
    pub patient_name: String,
}

/// Fields for a visit about to be recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisitDraft {
    /// Visit date; blank is replaced with today's date at save time
    pub visit_date: String,
    pub wang: String,
    pub wen: String,
    pub wen2: String,
    pub qie: String,
    /// Required, the save is rejected when blank
    pub diagnosis: String,
    pub treatment: String,
    /// Prescription lines in entry order
    pub lines: Vec<PrescriptionDraft>,
}

/// One prescription line about to be recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionDraft {
    pub medicine: String,
    /// Blank falls back to the "as needed" sentinel
    pub dosage: String,
    pub usage: String,
}

impl PrescriptionDraft {
    pub fn new(medicine: &str, dosage: &str, usage: &str) -> Self {
        Self {
            medicine: medicine.into(),
            dosage: dosage.into(),
            usage: usage.into(),
        }
    }
}

/// Row ids produced by a combined resolve-and-record operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VisitReceipt {
    pub patient_id: i64,
    pub visit_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_are_blank() {
        let draft = VisitDraft::default();
        assert!(draft.visit_date.is_empty());
        assert!(draft.diagnosis.is_empty());
        assert!(draft.lines.is_empty());
    }

    #[test]
    fn test_prescription_draft_new() {
        let line = PrescriptionDraft::new("甘草", "15g", "煎服");
        assert_eq!(line.medicine, "甘草");
        assert_eq!(line.dosage, "15g");
        assert_eq!(line.usage, "煎服");
    }
}
