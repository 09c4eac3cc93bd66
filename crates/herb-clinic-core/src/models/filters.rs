//! Filter parameter sets for list queries.
//!
//! Every supplied non-blank field becomes one AND-ed predicate; omitted
//! or blank fields impose no constraint.

/// Predicates over patients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    /// Substring match on name
    pub name: Option<String>,
    /// Substring match on phone
    pub phone: Option<String>,
    /// Exact match on age
    pub age: Option<i64>,
}

/// Predicates over visits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitFilter {
    /// Substring match on the patient name
    pub patient_name: Option<String>,
    /// Substring match on the patient phone
    pub patient_phone: Option<String>,
    /// Exact match on the visit date
    pub visit_date: Option<String>,
}

/// Predicates over prescription lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrescriptionFilter {
    /// Substring match on the patient name
    pub patient_name: Option<String>,
    /// Exact match on the owning visit id
    pub visit_id: Option<i64>,
    /// Exact match on the visit date
    pub visit_date: Option<String>,
}

/// Predicates over medicines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineFilter {
    /// Substring match on name
    pub name: Option<String>,
    /// Substring match on the default usage text
    pub usage: Option<String>,
}

/// Predicates over favorite folders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderFilter {
    /// Substring match on folder name
    pub name: Option<String>,
}
