//! Visit recorder.
//!
//! Owns the write path for clinic visits. One transaction covers the
//! patient upsert, the visit row, its prescription lines, and the stock
//! deductions, so a failure anywhere leaves the database untouched.

use chrono::Local;
use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

use crate::db::{self, Database};
use crate::identity::{self, IdentityError};
use crate::inventory::{self, LedgerError, AS_NEEDED_DOSAGE};
use crate::models::{PatientDetails, VisitDraft, VisitReceipt};

/// Recorder errors.
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown patient: {0}")]
    UnknownPatient(i64),
}

pub type RecorderResult<T> = Result<T, RecorderError>;

/// Records visits against a database.
pub struct VisitRecorder<'a> {
    db: &'a mut Database,
}

impl<'a> VisitRecorder<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        VisitRecorder { db }
    }

    /// Record a visit for the patient described by `details`, creating or
    /// refreshing their row as part of the same transaction.
    pub fn record_visit(
        &mut self,
        details: &PatientDetails,
        draft: &VisitDraft,
    ) -> RecorderResult<VisitReceipt> {
        check_diagnosis(draft)?;

        let tx = self.db.transaction()?;
        let patient_id = identity::resolve(&tx, details)?;
        let visit_id = insert_visit(&tx, patient_id, draft)?;
        tx.commit().map_err(db::DbError::from)?;

        info!(patient_id, visit_id, "visit recorded");
        Ok(VisitReceipt {
            patient_id,
            visit_id,
        })
    }

    /// Record a visit for an already known patient.
    pub fn save_visit(&mut self, patient_id: i64, draft: &VisitDraft) -> RecorderResult<i64> {
        check_diagnosis(draft)?;

        let tx = self.db.transaction()?;
        if !db::patients::exists(&tx, patient_id)? {
            return Err(RecorderError::UnknownPatient(patient_id));
        }
        let visit_id = insert_visit(&tx, patient_id, draft)?;
        tx.commit().map_err(db::DbError::from)?;

        info!(patient_id, visit_id, "visit recorded");
        Ok(visit_id)
    }
}

fn check_diagnosis(draft: &VisitDraft) -> RecorderResult<()> {
    if draft.diagnosis.trim().is_empty() {
        return Err(RecorderError::MissingField("diagnosis"));
    }
    Ok(())
}

/// Insert the visit row, settle the stock ledger, then store the lines.
/// Runs inside the caller's transaction.
fn insert_visit(conn: &Connection, patient_id: i64, draft: &VisitDraft) -> RecorderResult<i64> {
    let mut stored = draft.clone();
    if stored.visit_date.trim().is_empty() {
        stored.visit_date = Local::now().format("%Y-%m-%d").to_string();
    }
    for line in &mut stored.lines {
        if line.dosage.trim().is_empty() {
            line.dosage = AS_NEEDED_DOSAGE.to_string();
        }
    }

    let visit_id = db::visits::insert(conn, patient_id, &stored)?;
    // Ledger first: it also proves every line names a known medicine
    inventory::apply_deductions(conn, &stored.lines)?;
    for line in &stored.lines {
        db::prescriptions::insert_line(conn, visit_id, &line.medicine, &line.dosage, &line.usage)?;
    }
    Ok(visit_id)
}
