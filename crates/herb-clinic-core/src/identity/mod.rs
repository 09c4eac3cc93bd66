//! Patient identity resolution.
//!
//! An incoming (name, phone) pair either matches a stored patient,
//! whose mutable fields are refreshed, or becomes a new patient row.

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::db;
use crate::models::PatientDetails;

/// Identity resolution errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Trimmed copy of the details, rejecting a blank name or phone.
pub fn normalized(details: &PatientDetails) -> IdentityResult<PatientDetails> {
    let name = details.name.trim();
    let phone = details.phone.trim();
    if name.is_empty() {
        return Err(IdentityError::MissingField("name"));
    }
    if phone.is_empty() {
        return Err(IdentityError::MissingField("phone"));
    }
    Ok(PatientDetails {
        name: name.into(),
        gender: details.gender.clone(),
        age: details.age,
        phone: phone.into(),
        history: details.history.clone(),
    })
}

/// Resolve the details to a patient id, creating or refreshing a row.
///
/// A blank incoming history keeps whatever history is stored; anything
/// else overwrites it. Gender, age and phone are overwritten as given.
pub fn resolve(conn: &Connection, details: &PatientDetails) -> IdentityResult<i64> {
    let incoming = normalized(details)?;

    match db::patients::find_by_identity(conn, &incoming.name, &incoming.phone)? {
        Some((id, stored_history)) => {
            let history = if incoming.history.trim().is_empty() {
                stored_history
            } else {
                incoming.history.clone()
            };
            db::patients::update_resolved(conn, id, &incoming, &history)?;
            debug!(patient_id = id, "existing patient refreshed");
            Ok(id)
        }
        None => {
            let id = db::patients::insert(conn, &incoming)?;
            debug!(patient_id = id, "new patient created");
            Ok(id)
        }
    }
}
