//! Herb-Clinic Core Library
//!
//! Local-first record keeping for a traditional Chinese medicine clinic,
//! with transactional visit capture and inventory consistency.
//!
//! # Architecture
//!
//! ```text
//! Entry form → Identity Resolver (name, phone)
//!                      │
//!      ┌───────────────▼───────────────┐
//!      │        Visit Recorder         │
//!      │  one transaction:             │
//!      │  patient upsert → visit row   │
//!      │  → stock ledger → lines       │
//!      └───────────────┬───────────────┘
//!                      │
//!      ┌───────────────┼───────────────┐
//!      ▼               ▼               ▼
//!   Queries        Favorites        Exports
//!  (filtered     (whole-visit     (JSON/CSV
//!   lists)        snapshots)       bundles)
//! ```
//!
//! # Core Principle
//!
//! **A visit commits together with its stock effects, or not at all.** A
//! failed validation or an exhausted medicine rolls back the patient
//! upsert, the visit, its lines, and every deduction from the same call.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer and schema
//! - [`models`]: Domain types (Patient, Visit, Medicine, etc.)
//! - [`identity`]: Patient identity resolution by (name, phone)
//! - [`recorder`]: Transactional visit capture
//! - [`inventory`]: Dosage parsing and stock deductions
//! - [`favorites`]: Prescription snapshot folders
//! - [`suggest`]: Medicine name suggestions
//! - [`export`]: Record export for archival

pub mod db;
pub mod export;
pub mod favorites;
pub mod identity;
pub mod inventory;
pub mod models;
pub mod recorder;
pub mod suggest;

// Re-export commonly used types
pub use db::{Database, PeriodCount};
pub use export::{RecordExport, RecordExporter};
pub use favorites::FavoritesStore;
pub use identity::IdentityError;
pub use inventory::{parse_quantity, LedgerError, AS_NEEDED_DOSAGE};
pub use models::{
    FavoriteEntry, FavoriteFolder, Medicine, MedicineDetails, Patient, PatientDetails,
    PrescriptionDraft, PrescriptionLine, Visit, VisitDraft, VisitReceipt,
};
pub use recorder::VisitRecorder;
pub use suggest::{MedicineSuggester, Suggestion};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HerbClinicError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reference error: {0}")]
    ReferenceError(String),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Insufficient stock for {name}: {available} {unit} available, {requested} requested")]
    InsufficientStockError {
        name: String,
        available: i64,
        unit: String,
        requested: f64,
    },

    #[error("Duplicate name: {0}")]
    DuplicateNameError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<db::DbError> for HerbClinicError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::Constraint(msg) => HerbClinicError::ValidationError(msg),
            db::DbError::NotFound(msg) => HerbClinicError::NotFound(msg),
            db::DbError::Json(e) => HerbClinicError::SerializationError(e.to_string()),
            db::DbError::Sqlite(e) => HerbClinicError::DatabaseError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for HerbClinicError {
    fn from(e: serde_json::Error) -> Self {
        HerbClinicError::SerializationError(e.to_string())
    }
}

impl From<identity::IdentityError> for HerbClinicError {
    fn from(e: identity::IdentityError) -> Self {
        match e {
            identity::IdentityError::MissingField(field) => {
                HerbClinicError::ValidationError(format!("{} is required", field))
            }
            identity::IdentityError::Database(e) => e.into(),
        }
    }
}

impl From<inventory::LedgerError> for HerbClinicError {
    fn from(e: inventory::LedgerError) -> Self {
        match e {
            inventory::LedgerError::UnknownMedicine(name) => {
                HerbClinicError::ReferenceError(format!("unknown medicine: {}", name))
            }
            inventory::LedgerError::UnparseableDosage(dosage) => {
                HerbClinicError::FormatError(format!("no quantity in dosage: {}", dosage))
            }
            inventory::LedgerError::InsufficientStock {
                name,
                available,
                unit,
                requested,
            } => HerbClinicError::InsufficientStockError {
                name,
                available,
                unit,
                requested,
            },
            inventory::LedgerError::Database(e) => e.into(),
        }
    }
}

impl From<recorder::RecorderError> for HerbClinicError {
    fn from(e: recorder::RecorderError) -> Self {
        match e {
            recorder::RecorderError::MissingField(field) => {
                HerbClinicError::ValidationError(format!("{} is required", field))
            }
            recorder::RecorderError::UnknownPatient(id) => {
                HerbClinicError::NotFound(format!("patient {}", id))
            }
            recorder::RecorderError::Identity(e) => e.into(),
            recorder::RecorderError::Ledger(e) => e.into(),
            recorder::RecorderError::Database(e) => e.into(),
        }
    }
}

impl From<favorites::FavoritesError> for HerbClinicError {
    fn from(e: favorites::FavoritesError) -> Self {
        match e {
            favorites::FavoritesError::DuplicateFolder(name) => {
                HerbClinicError::DuplicateNameError(name)
            }
            favorites::FavoritesError::FolderNotFound(id) => {
                HerbClinicError::NotFound(format!("folder {}", id))
            }
            favorites::FavoritesError::VisitNotFound(id) => {
                HerbClinicError::NotFound(format!("visit {}", id))
            }
            favorites::FavoritesError::MissingName => {
                HerbClinicError::ValidationError("folder name is required".to_string())
            }
            favorites::FavoritesError::Json(e) => HerbClinicError::SerializationError(e.to_string()),
            favorites::FavoritesError::Database(e) => e.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for HerbClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HerbClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<HerbClinicCore>, HerbClinicError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(HerbClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<HerbClinicCore>, HerbClinicError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(HerbClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HerbClinicCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl HerbClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Resolve a patient by (name, phone), creating or refreshing the row.
    pub fn resolve_patient(
        &self,
        name: String,
        phone: String,
        gender: String,
        age: Option<i64>,
        history: String,
    ) -> Result<i64, HerbClinicError> {
        let mut db = self.db.lock()?;
        let details = PatientDetails {
            name,
            gender,
            age,
            phone,
            history,
        };
        let tx = db.transaction()?;
        let patient_id = identity::resolve(&tx, &details)?;
        tx.commit().map_err(db::DbError::from)?;
        Ok(patient_id)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> Result<Option<FfiPatient>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(id)?.map(|p| p.into()))
    }

    /// List patients matching the filter, in insertion order.
    pub fn list_patients(
        &self,
        filter: FfiPatientFilter,
    ) -> Result<Vec<FfiPatient>, HerbClinicError> {
        let db = self.db.lock()?;
        let patients = db.list_patients(&filter.into())?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Overwrite every editable field of a patient.
    pub fn update_patient(
        &self,
        id: i64,
        details: FfiPatientDetails,
    ) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.update_patient(id, &details.into())?)
    }

    /// Delete a patient and their whole history.
    pub fn delete_patient(&self, id: i64) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_patient(id)?)
    }

    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Record a visit for an already known patient.
    pub fn save_visit(&self, patient_id: i64, draft: FfiVisitDraft) -> Result<i64, HerbClinicError> {
        let mut db = self.db.lock()?;
        let visit_id = VisitRecorder::new(&mut db).save_visit(patient_id, &draft.into())?;
        Ok(visit_id)
    }

    /// Resolve the patient and record a visit in one transaction.
    pub fn record_visit(
        &self,
        details: FfiPatientDetails,
        draft: FfiVisitDraft,
    ) -> Result<FfiVisitReceipt, HerbClinicError> {
        let mut db = self.db.lock()?;
        let receipt = VisitRecorder::new(&mut db).record_visit(&details.into(), &draft.into())?;
        Ok(receipt.into())
    }

    /// Get a full visit by id.
    pub fn get_visit(&self, id: i64) -> Result<Option<FfiVisit>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.get_visit(id)?.map(|v| v.into()))
    }

    /// List visits matching the filter, newest date first.
    pub fn list_visits(
        &self,
        filter: FfiVisitFilter,
    ) -> Result<Vec<FfiVisitSummary>, HerbClinicError> {
        let db = self.db.lock()?;
        let visits = db.list_visits(&filter.into())?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    /// Prescription lines of one visit, in entry order.
    pub fn prescription_lines(
        &self,
        visit_id: i64,
    ) -> Result<Vec<FfiPrescriptionLine>, HerbClinicError> {
        let db = self.db.lock()?;
        let lines = db.prescription_lines(visit_id)?;
        Ok(lines.into_iter().map(|l| l.into()).collect())
    }

    /// List prescription lines across visits, newest visit date first.
    pub fn list_prescriptions(
        &self,
        filter: FfiPrescriptionFilter,
    ) -> Result<Vec<FfiPrescriptionSummary>, HerbClinicError> {
        let db = self.db.lock()?;
        let rows = db.list_prescriptions(&filter.into())?;
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Delete a visit and its lines.
    pub fn delete_visit(&self, id: i64) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_visit(id)?)
    }

    // =========================================================================
    // Medicine Operations
    // =========================================================================

    /// Add a medicine or overwrite one matched by name.
    pub fn upsert_medicine(
        &self,
        name: String,
        stock: i64,
        unit: String,
        usage: String,
    ) -> Result<i64, HerbClinicError> {
        let db = self.db.lock()?;
        let details = MedicineDetails {
            name,
            stock,
            unit,
            usage,
        };
        Ok(db.upsert_medicine(&details)?)
    }

    /// Get a medicine by exact name.
    pub fn get_medicine_by_name(
        &self,
        name: String,
    ) -> Result<Option<FfiMedicine>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.get_medicine_by_name(&name)?.map(|m| m.into()))
    }

    /// List medicines matching the filter, in insertion order.
    pub fn list_medicines(
        &self,
        filter: FfiMedicineFilter,
    ) -> Result<Vec<FfiMedicine>, HerbClinicError> {
        let db = self.db.lock()?;
        let medicines = db.list_medicines(&filter.into())?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Rank catalog names against a partial query, best first.
    pub fn suggest_medicines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiSuggestion>, HerbClinicError> {
        let db = self.db.lock()?;
        let suggestions = MedicineSuggester::new(&db).suggest(&query, limit as usize)?;
        Ok(suggestions.into_iter().map(|s| s.into()).collect())
    }

    /// Delete a medicine from the catalog.
    pub fn delete_medicine(&self, id: i64) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_medicine(id)?)
    }

    // =========================================================================
    // Favorites Operations
    // =========================================================================

    /// Create a favorite folder. Names are unique.
    pub fn create_folder(&self, name: String) -> Result<i64, HerbClinicError> {
        let mut db = self.db.lock()?;
        Ok(FavoritesStore::new(&mut db).create_folder(&name)?)
    }

    /// Folder id for an exact name.
    pub fn folder_id_by_name(&self, name: String) -> Result<Option<i64>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.find_folder_by_name(&name)?)
    }

    /// Snapshot a visit's prescriptions into a folder.
    pub fn add_favorite(
        &self,
        folder_id: i64,
        visit_id: i64,
        patient_name: String,
    ) -> Result<i64, HerbClinicError> {
        let mut db = self.db.lock()?;
        Ok(FavoritesStore::new(&mut db).add_favorite(folder_id, visit_id, &patient_name)?)
    }

    /// List folders with entry counts.
    pub fn list_folders(
        &self,
        filter: FfiFolderFilter,
    ) -> Result<Vec<FfiFavoriteFolder>, HerbClinicError> {
        let db = self.db.lock()?;
        let folders = db.list_folders(&filter.into())?;
        Ok(folders.into_iter().map(|f| f.into()).collect())
    }

    /// List favorite entries, newest first, optionally for one folder.
    pub fn list_favorites(
        &self,
        folder_id: Option<i64>,
    ) -> Result<Vec<FfiFavoriteEntry>, HerbClinicError> {
        let db = self.db.lock()?;
        let entries = db.list_favorites(folder_id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Delete a folder and every entry in it.
    pub fn delete_folder(&self, id: i64) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_folder(id)?)
    }

    /// Delete a single favorite entry.
    pub fn delete_favorite(&self, id: i64) -> Result<bool, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_favorite(id)?)
    }

    // =========================================================================
    // Statistics Operations
    // =========================================================================

    /// Visit counts per day over the last 30 days, ascending.
    pub fn visit_counts_daily(&self) -> Result<Vec<FfiPeriodCount>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.visit_counts_by_day()?.into_iter().map(|c| c.into()).collect())
    }

    /// Visit counts per month over the last 12 months, ascending.
    pub fn visit_counts_monthly(&self) -> Result<Vec<FfiPeriodCount>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.visit_counts_by_month()?.into_iter().map(|c| c.into()).collect())
    }

    /// Visit counts per year, ascending.
    pub fn visit_counts_yearly(&self) -> Result<Vec<FfiPeriodCount>, HerbClinicError> {
        let db = self.db.lock()?;
        Ok(db.visit_counts_by_year()?.into_iter().map(|c| c.into()).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export every patient record as JSON.
    pub fn export_records_json(&self) -> Result<String, HerbClinicError> {
        let db = self.db.lock()?;
        let export = RecordExporter::new(&db).export_all()?;
        Ok(export.to_json()?)
    }

    /// Export every patient record as CSV.
    pub fn export_records_csv(&self) -> Result<String, HerbClinicError> {
        let db = self.db.lock()?;
        let export = RecordExporter::new(&db).export_all()?;
        Ok(export.to_csv())
    }

    /// Export one patient's records as JSON.
    pub fn export_patient_json(&self, patient_id: i64) -> Result<String, HerbClinicError> {
        let db = self.db.lock()?;
        let export = RecordExporter::new(&db)
            .export_patient(patient_id)?
            .ok_or_else(|| HerbClinicError::NotFound(format!("patient {}", patient_id)))?;
        Ok(export.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient details for resolve/update calls.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDetails {
    pub name: String,
    pub gender: String,
    pub age: Option<i64>,
    pub phone: String,
    pub history: String,
}

impl From<FfiPatientDetails> for PatientDetails {
    fn from(d: FfiPatientDetails) -> Self {
        PatientDetails {
            name: d.name,
            gender: d.gender,
            age: d.age,
            phone: d.phone,
            history: d.history,
        }
    }
}

/// FFI-safe patient row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub age: Option<i64>,
    pub phone: String,
    pub history: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            name: p.name,
            gender: p.gender,
            age: p.age,
            phone: p.phone,
            history: p.history,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// FFI-safe patient filter.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientFilter {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
}

impl From<FfiPatientFilter> for models::PatientFilter {
    fn from(f: FfiPatientFilter) -> Self {
        models::PatientFilter {
            name: f.name,
            phone: f.phone,
            age: f.age,
        }
    }
}

/// FFI-safe visit draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitDraft {
    pub visit_date: String,
    pub wang: String,
    pub wen: String,
    pub wen2: String,
    pub qie: String,
    pub diagnosis: String,
    pub treatment: String,
    pub lines: Vec<FfiPrescriptionDraft>,
}

impl From<FfiVisitDraft> for VisitDraft {
    fn from(d: FfiVisitDraft) -> Self {
        VisitDraft {
            visit_date: d.visit_date,
            wang: d.wang,
            wen: d.wen,
            wen2: d.wen2,
            qie: d.qie,
            diagnosis: d.diagnosis,
            treatment: d.treatment,
            lines: d.lines.into_iter().map(|l| l.into()).collect(),
        }
    }
}

/// FFI-safe prescription draft line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionDraft {
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
}

impl From<FfiPrescriptionDraft> for PrescriptionDraft {
    fn from(l: FfiPrescriptionDraft) -> Self {
        PrescriptionDraft {
            medicine: l.medicine,
            dosage: l.dosage,
            usage: l.usage,
        }
    }
}

/// FFI-safe visit save receipt.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitReceipt {
    pub patient_id: i64,
    pub visit_id: i64,
}

impl From<VisitReceipt> for FfiVisitReceipt {
    fn from(r: VisitReceipt) -> Self {
        Self {
            patient_id: r.patient_id,
            visit_id: r.visit_id,
        }
    }
}

/// FFI-safe full visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: i64,
    pub patient_id: i64,
    pub visit_date: String,
    pub wang: String,
    pub wen: String,
    pub wen2: String,
    pub qie: String,
    pub diagnosis: String,
    pub treatment: String,
    pub created_at: String,
}

impl From<Visit> for FfiVisit {
    fn from(v: Visit) -> Self {
        Self {
            id: v.id,
            patient_id: v.patient_id,
            visit_date: v.visit_date,
            wang: v.wang,
            wen: v.wen,
            wen2: v.wen2,
            qie: v.qie,
            diagnosis: v.diagnosis,
            treatment: v.treatment,
            created_at: v.created_at,
        }
    }
}

/// FFI-safe visit list row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitSummary {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub visit_date: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl From<models::VisitSummary> for FfiVisitSummary {
    fn from(v: models::VisitSummary) -> Self {
        Self {
            id: v.id,
            patient_id: v.patient_id,
            patient_name: v.patient_name,
            visit_date: v.visit_date,
            diagnosis: v.diagnosis,
            treatment: v.treatment,
        }
    }
}

/// FFI-safe visit filter.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiVisitFilter {
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub visit_date: Option<String>,
}

impl From<FfiVisitFilter> for models::VisitFilter {
    fn from(f: FfiVisitFilter) -> Self {
        models::VisitFilter {
            patient_name: f.patient_name,
            patient_phone: f.patient_phone,
            visit_date: f.visit_date,
        }
    }
}

/// FFI-safe stored prescription line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionLine {
    pub id: i64,
    pub visit_id: i64,
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
}

impl From<PrescriptionLine> for FfiPrescriptionLine {
    fn from(l: PrescriptionLine) -> Self {
        Self {
            id: l.id,
            visit_id: l.visit_id,
            medicine: l.medicine,
            dosage: l.dosage,
            usage: l.usage,
        }
    }
}

/// FFI-safe prescription list row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionSummary {
    pub visit_id: i64,
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
    pub visit_date: String,
    pub patient_name: String,
}

impl From<models::PrescriptionSummary> for FfiPrescriptionSummary {
    fn from(p: models::PrescriptionSummary) -> Self {
        Self {
            visit_id: p.visit_id,
            medicine: p.medicine,
            dosage: p.dosage,
            usage: p.usage,
            visit_date: p.visit_date,
            patient_name: p.patient_name,
        }
    }
}

/// FFI-safe prescription filter.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPrescriptionFilter {
    pub patient_name: Option<String>,
    pub visit_id: Option<i64>,
    pub visit_date: Option<String>,
}

impl From<FfiPrescriptionFilter> for models::PrescriptionFilter {
    fn from(f: FfiPrescriptionFilter) -> Self {
        models::PrescriptionFilter {
            patient_name: f.patient_name,
            visit_id: f.visit_id,
            visit_date: f.visit_date,
        }
    }
}

/// FFI-safe medicine row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: i64,
    pub name: String,
    pub stock: i64,
    pub unit: String,
    pub usage: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Medicine> for FfiMedicine {
    fn from(m: Medicine) -> Self {
        Self {
            id: m.id,
            name: m.name,
            stock: m.stock,
            unit: m.unit,
            usage: m.usage,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// FFI-safe medicine filter.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedicineFilter {
    pub name: Option<String>,
    pub usage: Option<String>,
}

impl From<FfiMedicineFilter> for models::MedicineFilter {
    fn from(f: FfiMedicineFilter) -> Self {
        models::MedicineFilter {
            name: f.name,
            usage: f.usage,
        }
    }
}

/// FFI-safe name suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSuggestion {
    pub name: String,
    pub score: f64,
}

impl From<Suggestion> for FfiSuggestion {
    fn from(s: Suggestion) -> Self {
        Self {
            name: s.name,
            score: s.score,
        }
    }
}

/// FFI-safe favorite folder row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFavoriteFolder {
    pub id: i64,
    pub name: String,
    pub entry_count: i64,
    pub created_time: String,
}

impl From<FavoriteFolder> for FfiFavoriteFolder {
    fn from(f: FavoriteFolder) -> Self {
        Self {
            id: f.id,
            name: f.name,
            entry_count: f.entry_count,
            created_time: f.created_time,
        }
    }
}

/// FFI-safe folder filter.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiFolderFilter {
    pub name: Option<String>,
}

impl From<FfiFolderFilter> for models::FolderFilter {
    fn from(f: FfiFolderFilter) -> Self {
        models::FolderFilter { name: f.name }
    }
}

/// FFI-safe favorite entry with its snapshot lines.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFavoriteEntry {
    pub id: i64,
    pub folder_id: i64,
    pub folder_name: String,
    pub visit_id: i64,
    pub patient_name: String,
    pub prescriptions: Vec<FfiSnapshotLine>,
    pub created_time: String,
}

impl From<FavoriteEntry> for FfiFavoriteEntry {
    fn from(e: FavoriteEntry) -> Self {
        Self {
            id: e.id,
            folder_id: e.folder_id,
            folder_name: e.folder_name,
            visit_id: e.visit_id,
            patient_name: e.patient_name,
            prescriptions: e
                .snapshot
                .prescriptions
                .into_iter()
                .map(|l| l.into())
                .collect(),
            created_time: e.created_time,
        }
    }
}

/// FFI-safe snapshot line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSnapshotLine {
    pub medicine: String,
    pub dosage: String,
    pub usage: String,
}

impl From<models::SnapshotLine> for FfiSnapshotLine {
    fn from(l: models::SnapshotLine) -> Self {
        Self {
            medicine: l.medicine,
            dosage: l.dosage,
            usage: l.usage,
        }
    }
}

/// FFI-safe period count for statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPeriodCount {
    pub period: String,
    pub count: i64,
}

impl From<PeriodCount> for FfiPeriodCount {
    fn from(c: PeriodCount) -> Self {
        Self {
            period: c.period,
            count: c.count,
        }
    }
}
