//! Favorite prescriptions.
//!
//! Folders of prescription snapshots. A favorite copies the whole set of
//! lines from a visit at the moment it is starred, so deleting the visit
//! later never changes what was saved.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::db::{self, Database};
use crate::models::PrescriptionSnapshot;

/// Favorites errors.
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Folder name already in use: {0}")]
    DuplicateFolder(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(i64),

    #[error("Visit not found: {0}")]
    VisitNotFound(i64),

    #[error("Folder name is required")]
    MissingName,
}

pub type FavoritesResult<T> = Result<T, FavoritesError>;

/// Manages favorite folders and the snapshots inside them.
pub struct FavoritesStore<'a> {
    db: &'a mut Database,
}

impl<'a> FavoritesStore<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        FavoritesStore { db }
    }

    /// Create a folder. Names are unique across all folders.
    pub fn create_folder(&mut self, name: &str) -> FavoritesResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FavoritesError::MissingName);
        }
        if self.db.find_folder_by_name(name)?.is_some() {
            return Err(FavoritesError::DuplicateFolder(name.to_string()));
        }
        let id = self.db.insert_folder(name)?;
        debug!(folder_id = id, name, "favorite folder created");
        Ok(id)
    }

    /// Snapshot a visit's prescription lines into a folder.
    ///
    /// The lines are copied as they stand right now. `patient_name` is
    /// stamped on the entry; when blank, the visit's own patient name is
    /// used. Adding content a folder already holds returns the existing
    /// entry instead of a second copy.
    pub fn add_favorite(
        &mut self,
        folder_id: i64,
        visit_id: i64,
        patient_name: &str,
    ) -> FavoritesResult<i64> {
        let tx = self.db.transaction()?;

        if !db::favorites::folder_exists(&tx, folder_id)? {
            return Err(FavoritesError::FolderNotFound(folder_id));
        }
        let visit_patient = db::visits::patient_name_for(&tx, visit_id)?
            .ok_or(FavoritesError::VisitNotFound(visit_id))?;
        let stamped = match patient_name.trim() {
            "" => visit_patient.as_str(),
            given => given,
        };

        let lines = db::prescriptions::lines_for_visit(&tx, visit_id)?;
        let json = PrescriptionSnapshot::from_lines(&lines).to_json()?;
        let hash = snapshot_hash(&json);

        let entry_id =
            db::favorites::insert_entry(&tx, folder_id, visit_id, stamped, &json, &hash)?;
        tx.commit().map_err(db::DbError::from)?;

        debug!(folder_id, visit_id, entry_id, "visit favorited");
        Ok(entry_id)
    }
}

/// Content hash of a snapshot, used for per-folder deduplication.
fn snapshot_hash(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}
