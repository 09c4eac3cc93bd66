//! Favorite folder and entry database operations.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::{Database, DbError, DbResult};
use crate::models::{FavoriteEntry, FavoriteFolder, FolderFilter, PrescriptionSnapshot};

/// Whether a folder row exists.
pub(crate) fn folder_exists(conn: &Connection, id: i64) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM favorite_folders WHERE id = ?",
        [id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Store a snapshot entry. An identical snapshot already present in the
/// folder is left alone and its id returned.
pub(crate) fn insert_entry(
    conn: &Connection,
    folder_id: i64,
    visit_id: i64,
    patient_name: &str,
    snapshot_json: &str,
    snapshot_hash: &str,
) -> DbResult<i64> {
    let rows_affected = conn.execute(
        r#"
        INSERT INTO favorite_prescriptions (folder_id, visit_id, patient_name, snapshot, snapshot_hash)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(folder_id, snapshot_hash) DO NOTHING
        "#,
        params![folder_id, visit_id, patient_name, snapshot_json, snapshot_hash],
    )?;

    if rows_affected > 0 {
        return Ok(conn.last_insert_rowid());
    }
    conn.query_row(
        "SELECT id FROM favorite_prescriptions WHERE folder_id = ?1 AND snapshot_hash = ?2",
        params![folder_id, snapshot_hash],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("favorite entry in folder {}", folder_id)))
}

impl Database {
    /// Insert a new folder. Name uniqueness is backed by the schema.
    pub fn insert_folder(&self, name: &str) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO favorite_folders (name) VALUES (?)",
            [name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Folder id for an exact name.
    pub fn find_folder_by_name(&self, name: &str) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM favorite_folders WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List folders with their entry counts, in insertion order.
    pub fn list_folders(&self, filter: &FolderFilter) -> DbResult<Vec<FavoriteFolder>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("f.name LIKE ?".into());
            values.push(Box::new(format!("%{}%", name)));
        }

        let mut sql = String::from(
            r#"
            SELECT f.id, f.name, COUNT(fp.id), f.created_time
            FROM favorite_folders f
            LEFT JOIN favorite_prescriptions fp ON f.id = fp.folder_id
            "#,
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" GROUP BY f.id, f.name, f.created_time ORDER BY f.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(FavoriteFolder {
                id: row.get(0)?,
                name: row.get(1)?,
                entry_count: row.get(2)?,
                created_time: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List entries, newest first, optionally restricted to one folder.
    pub fn list_favorites(&self, folder_id: Option<i64>) -> DbResult<Vec<FavoriteEntry>> {
        let mut sql = String::from(
            r#"
            SELECT fp.id, fp.folder_id, f.name, fp.visit_id, fp.patient_name,
                   fp.snapshot, fp.created_time
            FROM favorite_prescriptions fp
            JOIN favorite_folders f ON fp.folder_id = f.id
            "#,
        );
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(folder_id) = folder_id {
            sql.push_str(" WHERE fp.folder_id = ?");
            values.push(Box::new(folder_id));
        }
        sql.push_str(" ORDER BY fp.created_time DESC, fp.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                folder_id: row.get(1)?,
                folder_name: row.get(2)?,
                visit_id: row.get(3)?,
                patient_name: row.get(4)?,
                snapshot: row.get(5)?,
                created_time: row.get(6)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// Delete a folder and, through the schema, all its entries.
    pub fn delete_folder(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM favorite_folders WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete a single entry.
    pub fn delete_favorite(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM favorite_prescriptions WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct EntryRow {
    id: i64,
    folder_id: i64,
    folder_name: String,
    visit_id: i64,
    patient_name: String,
    snapshot: String,
    created_time: String,
}

impl TryFrom<EntryRow> for FavoriteEntry {
    type Error = DbError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let snapshot: PrescriptionSnapshot = serde_json::from_str(&row.snapshot)?;
        Ok(FavoriteEntry {
            id: row.id,
            folder_id: row.folder_id,
            folder_name: row.folder_name,
            visit_id: row.visit_id,
            patient_name: row.patient_name,
            snapshot,
            created_time: row.created_time,
        })
    }
}
