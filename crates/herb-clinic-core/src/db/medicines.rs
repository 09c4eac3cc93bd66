//! Medicine database operations.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::{Database, DbError, DbResult};
use crate::models::{Medicine, MedicineDetails, MedicineFilter, DEFAULT_UNIT};

/// Current (id, stock, unit) of a medicine, by exact name.
pub(crate) fn find_for_deduction(
    conn: &Connection,
    name: &str,
) -> DbResult<Option<(i64, i64, String)>> {
    conn.query_row(
        "SELECT id, stock, unit FROM medicines WHERE name = ?",
        [name],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()
    .map_err(Into::into)
}

/// Conditionally deduct stock. Returns false when the row holds fewer
/// than `units`, leaving it untouched.
pub(crate) fn deduct_stock(conn: &Connection, id: i64, units: i64) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE medicines
        SET stock = stock - ?2, updated_at = datetime('now')
        WHERE id = ?1 AND stock >= ?2
        "#,
        params![id, units],
    )?;
    Ok(rows_affected > 0)
}

impl Database {
    /// Insert a medicine, or overwrite stock/unit/usage when the name
    /// already exists.
    pub fn upsert_medicine(&self, details: &MedicineDetails) -> DbResult<i64> {
        if details.name.is_empty() {
            return Err(DbError::Constraint("medicine name is required".into()));
        }
        if details.stock < 0 {
            return Err(DbError::Constraint(format!(
                "stock for {} cannot be negative",
                details.name
            )));
        }
        let unit = if details.unit.is_empty() {
            DEFAULT_UNIT
        } else {
            &details.unit
        };

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM medicines WHERE name = ?",
                [&details.name],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    r#"
                    UPDATE medicines SET stock = ?2, unit = ?3, usage = ?4,
                        updated_at = datetime('now')
                    WHERE id = ?1
                    "#,
                    params![id, details.stock, unit, details.usage],
                )?;
                Ok(id)
            }
            None => {
                self.conn.execute(
                    r#"
                    INSERT INTO medicines (name, stock, unit, usage)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                    params![details.name, details.stock, unit, details.usage],
                )?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: i64) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, stock, unit, usage, created_at, updated_at
                FROM medicines
                WHERE id = ?
                "#,
                [id],
                map_medicine_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a medicine by exact name.
    pub fn get_medicine_by_name(&self, name: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, stock, unit, usage, created_at, updated_at
                FROM medicines
                WHERE name = ?
                "#,
                [name],
                map_medicine_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List medicines matching the filter, in insertion order.
    pub fn list_medicines(&self, filter: &MedicineFilter) -> DbResult<Vec<Medicine>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("name LIKE ?".into());
            values.push(Box::new(format!("%{}%", name)));
        }
        if let Some(usage) = filter.usage.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("usage LIKE ?".into());
            values.push(Box::new(format!("%{}%", usage)));
        }

        let mut sql = String::from(
            "SELECT id, name, stock, unit, usage, created_at, updated_at FROM medicines",
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_medicine_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Every medicine name, for pickers and suggestions.
    pub fn medicine_names(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM medicines ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a medicine.
    pub fn delete_medicine(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_medicine_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        stock: row.get(2)?,
        unit: row.get(3)?,
        usage: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
