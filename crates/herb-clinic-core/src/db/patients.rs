//! Patient database operations.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::{Database, DbError, DbResult};
use crate::models::{Patient, PatientDetails, PatientFilter};

/// Look up a patient id and stored history by exact (name, phone).
pub(crate) fn find_by_identity(
    conn: &Connection,
    name: &str,
    phone: &str,
) -> DbResult<Option<(i64, String)>> {
    conn.query_row(
        "SELECT id, history FROM patients WHERE name = ?1 AND phone = ?2",
        params![name, phone],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(Into::into)
}

/// True when a patient row with this id exists.
pub(crate) fn exists(conn: &Connection, id: i64) -> DbResult<bool> {
    conn.query_row("SELECT 1 FROM patients WHERE id = ?", [id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .map_err(Into::into)
}

/// Insert a new patient row.
pub(crate) fn insert(conn: &Connection, details: &PatientDetails) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO patients (name, gender, age, phone, history)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            details.name,
            details.gender,
            details.age,
            details.phone,
            details.history,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the mutable fields of a resolved patient. The name is part
/// of the identity key and stays as stored.
pub(crate) fn update_resolved(
    conn: &Connection,
    id: i64,
    details: &PatientDetails,
    history: &str,
) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE patients SET
            gender = ?2,
            age = ?3,
            phone = ?4,
            history = ?5,
            updated_at = datetime('now')
        WHERE id = ?1
        "#,
        params![id, details.gender, details.age, details.phone, history],
    )?;
    Ok(rows_affected > 0)
}

impl Database {
    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, gender, age, phone, history, created_at, updated_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                map_patient_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List patients matching the filter, in insertion order.
    pub fn list_patients(&self, filter: &PatientFilter) -> DbResult<Vec<Patient>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("name LIKE ?".into());
            values.push(Box::new(format!("%{}%", name)));
        }
        if let Some(phone) = filter.phone.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("phone LIKE ?".into());
            values.push(Box::new(format!("%{}%", phone)));
        }
        if let Some(age) = filter.age {
            clauses.push("age = ?".into());
            values.push(Box::new(age));
        }

        let mut sql = String::from(
            "SELECT id, name, gender, age, phone, history, created_at, updated_at FROM patients",
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_patient_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Overwrite every editable field of a patient (explicit edit form).
    pub fn update_patient(&self, id: i64, details: &PatientDetails) -> DbResult<bool> {
        let taken: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM patients WHERE name = ?1 AND phone = ?2 AND id <> ?3",
                params![details.name, details.phone, id],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(DbError::Constraint(format!(
                "patient ({}, {}) already exists",
                details.name, details.phone
            )));
        }

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                gender = ?3,
                age = ?4,
                phone = ?5,
                history = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                details.name,
                details.gender,
                details.age,
                details.phone,
                details.history,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a patient. Their visits and prescription lines go with them.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        age: row.get(3)?,
        phone: row.get(4)?,
        history: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn details(name: &str, phone: &str, age: Option<i64>) -> PatientDetails {
        PatientDetails {
            name: name.into(),
            gender: "男".into(),
            age,
            phone: phone.into(),
            history: String::new(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let id = insert(db.conn(), &details("张三", "13800000001", Some(42))).unwrap();
        let patient = db.get_patient(id).unwrap().unwrap();

        assert_eq!(patient.name, "张三");
        assert_eq!(patient.phone, "13800000001");
        assert_eq!(patient.age, Some(42));
        assert_eq!(patient.identity(), ("张三", "13800000001"));
    }

    #[test]
    fn test_find_by_identity() {
        let db = setup_db();

        let mut d = details("张三", "13800000001", None);
        d.history = "高血压".into();
        let id = insert(db.conn(), &d).unwrap();

        let found = find_by_identity(db.conn(), "张三", "13800000001").unwrap();
        assert_eq!(found, Some((id, "高血压".to_string())));

        let missing = find_by_identity(db.conn(), "张三", "13800000002").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_list_with_filters() {
        let db = setup_db();

        insert(db.conn(), &details("张三", "13800000001", Some(42))).unwrap();
        insert(db.conn(), &details("张小雨", "13900000002", Some(8))).unwrap();
        insert(db.conn(), &details("李四", "13800000003", Some(42))).unwrap();

        // Empty filter returns everyone in insertion order
        let all = db.list_patients(&PatientFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "张三");
        assert_eq!(all[2].name, "李四");

        // Name substring
        let zhangs = db
            .list_patients(&PatientFilter {
                name: Some("张".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(zhangs.len(), 2);

        // Blank string imposes no constraint
        let zhangs = db
            .list_patients(&PatientFilter {
                name: Some("张".into()),
                phone: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(zhangs.len(), 2);

        // Conjunction of name substring and exact age
        let filtered = db
            .list_patients(&PatientFilter {
                name: Some("张".into()),
                age: Some(42),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "张三");
    }

    #[test]
    fn test_update_patient_overwrites_all_fields() {
        let db = setup_db();

        let id = insert(db.conn(), &details("张三", "13800000001", Some(42))).unwrap();

        let mut edited = details("张三丰", "13800000009", Some(43));
        edited.history = "既往体健".into();
        assert!(db.update_patient(id, &edited).unwrap());

        let patient = db.get_patient(id).unwrap().unwrap();
        assert_eq!(patient.name, "张三丰");
        assert_eq!(patient.phone, "13800000009");
        assert_eq!(patient.history, "既往体健");
    }

    #[test]
    fn test_update_patient_rejects_identity_collision() {
        let db = setup_db();

        insert(db.conn(), &details("张三", "13800000001", None)).unwrap();
        let id = insert(db.conn(), &details("李四", "13800000003", None)).unwrap();

        let result = db.update_patient(id, &details("张三", "13800000001", None));
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_delete_patient() {
        let db = setup_db();

        let id = insert(db.conn(), &details("张三", "13800000001", None)).unwrap();
        assert!(db.delete_patient(id).unwrap());
        assert!(db.get_patient(id).unwrap().is_none());
        assert!(!db.delete_patient(id).unwrap());
    }
}
