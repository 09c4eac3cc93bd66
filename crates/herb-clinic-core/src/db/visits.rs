//! Visit database operations.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::{Database, DbResult};
use crate::models::{Visit, VisitDraft, VisitFilter, VisitSummary};

/// Name of the patient a visit belongs to, or None for a missing visit.
pub(crate) fn patient_name_for(conn: &Connection, visit_id: i64) -> DbResult<Option<String>> {
    conn.query_row(
        r#"
        SELECT p.name
        FROM visits v
        JOIN patients p ON v.patient_id = p.id
        WHERE v.id = ?
        "#,
        [visit_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Insert a visit row. Lines are inserted separately by the caller,
/// inside the same transaction.
pub(crate) fn insert(conn: &Connection, patient_id: i64, draft: &VisitDraft) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO visits (patient_id, visit_date, wang, wen, wen2, qie, diagnosis, treatment)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            patient_id,
            draft.visit_date,
            draft.wang,
            draft.wen,
            draft.wen2,
            draft.qie,
            draft.diagnosis,
            draft.treatment,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Get a full visit by id.
    pub fn get_visit(&self, id: i64) -> DbResult<Option<Visit>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, visit_date, wang, wen, wen2, qie,
                       diagnosis, treatment, created_at
                FROM visits
                WHERE id = ?
                "#,
                [id],
                map_visit_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List visits matching the filter, newest date first.
    pub fn list_visits(&self, filter: &VisitFilter) -> DbResult<Vec<VisitSummary>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.patient_name.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("p.name LIKE ?".into());
            values.push(Box::new(format!("%{}%", name)));
        }
        if let Some(phone) = filter.patient_phone.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("p.phone LIKE ?".into());
            values.push(Box::new(format!("%{}%", phone)));
        }
        if let Some(date) = filter.visit_date.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("v.visit_date = ?".into());
            values.push(Box::new(date.to_string()));
        }

        let mut sql = String::from(
            r#"
            SELECT v.id, v.patient_id, p.name, v.visit_date, v.diagnosis, v.treatment
            FROM visits v
            JOIN patients p ON v.patient_id = p.id
            "#,
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY v.visit_date DESC, v.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(VisitSummary {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                patient_name: row.get(2)?,
                visit_date: row.get(3)?,
                diagnosis: row.get(4)?,
                treatment: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All visits of one patient, oldest first.
    pub fn visits_for_patient(&self, patient_id: i64) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, visit_date, wang, wen, wen2, qie,
                   diagnosis, treatment, created_at
            FROM visits
            WHERE patient_id = ?
            ORDER BY visit_date, id
            "#,
        )?;
        let rows = stmt.query_map([patient_id], map_visit_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a visit and, through the schema, its prescription lines.
    pub fn delete_visit(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM visits WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_visit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_date: row.get(2)?,
        wang: row.get(3)?,
        wen: row.get(4)?,
        wen2: row.get(5)?,
        qie: row.get(6)?,
        diagnosis: row.get(7)?,
        treatment: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::patients;
    use crate::models::PatientDetails;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_patient(db: &Database, name: &str, phone: &str) -> i64 {
        patients::insert(db.conn(), &PatientDetails::identity(name, phone)).unwrap()
    }

    fn draft(date: &str, diagnosis: &str) -> VisitDraft {
        VisitDraft {
            visit_date: date.into(),
            diagnosis: diagnosis.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let patient_id = add_patient(&db, "张三", "13800000001");

        let mut d = draft("2024-03-01", "风寒感冒");
        d.wang = "面色偏白".into();
        d.qie = "脉浮紧".into();
        let id = insert(db.conn(), patient_id, &d).unwrap();

        let visit = db.get_visit(id).unwrap().unwrap();
        assert_eq!(visit.patient_id, patient_id);
        assert_eq!(visit.visit_date, "2024-03-01");
        assert_eq!(visit.wang, "面色偏白");
        assert_eq!(visit.qie, "脉浮紧");
        assert_eq!(visit.diagnosis, "风寒感冒");
    }

    #[test]
    fn test_list_newest_date_first() {
        let db = setup_db();
        let patient_id = add_patient(&db, "张三", "13800000001");

        insert(db.conn(), patient_id, &draft("2024-01-05", "咳嗽")).unwrap();
        insert(db.conn(), patient_id, &draft("2024-03-01", "风寒感冒")).unwrap();
        insert(db.conn(), patient_id, &draft("2024-02-10", "失眠")).unwrap();

        let visits = db.list_visits(&VisitFilter::default()).unwrap();
        assert_eq!(visits.len(), 3);
        assert_eq!(visits[0].visit_date, "2024-03-01");
        assert_eq!(visits[1].visit_date, "2024-02-10");
        assert_eq!(visits[2].visit_date, "2024-01-05");
    }

    #[test]
    fn test_same_date_newest_id_first() {
        let db = setup_db();
        let patient_id = add_patient(&db, "张三", "13800000001");

        let first = insert(db.conn(), patient_id, &draft("2024-03-01", "咳嗽")).unwrap();
        let second = insert(db.conn(), patient_id, &draft("2024-03-01", "复诊")).unwrap();

        let visits = db.list_visits(&VisitFilter::default()).unwrap();
        assert_eq!(visits[0].id, second);
        assert_eq!(visits[1].id, first);
    }

    #[test]
    fn test_list_filters_compose() {
        let db = setup_db();
        let zhang = add_patient(&db, "张三", "13800000001");
        let li = add_patient(&db, "李四", "13900000002");

        insert(db.conn(), zhang, &draft("2024-03-01", "风寒感冒")).unwrap();
        insert(db.conn(), li, &draft("2024-03-01", "胃痛")).unwrap();
        insert(db.conn(), zhang, &draft("2024-03-02", "复诊")).unwrap();

        let filtered = db
            .list_visits(&VisitFilter {
                patient_name: Some("张".into()),
                visit_date: Some("2024-03-01".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].diagnosis, "风寒感冒");
        assert_eq!(filtered[0].patient_name, "张三");
    }

    #[test]
    fn test_visits_for_patient_oldest_first() {
        let db = setup_db();
        let zhang = add_patient(&db, "张三", "13800000001");
        let li = add_patient(&db, "李四", "13900000002");

        insert(db.conn(), zhang, &draft("2024-03-01", "风寒感冒")).unwrap();
        insert(db.conn(), li, &draft("2024-01-01", "胃痛")).unwrap();
        insert(db.conn(), zhang, &draft("2024-01-05", "咳嗽")).unwrap();

        let visits = db.visits_for_patient(zhang).unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].visit_date, "2024-01-05");
        assert_eq!(visits[1].visit_date, "2024-03-01");
    }

    #[test]
    fn test_delete_visit() {
        let db = setup_db();
        let patient_id = add_patient(&db, "张三", "13800000001");
        let id = insert(db.conn(), patient_id, &draft("2024-03-01", "风寒感冒")).unwrap();

        assert!(db.delete_visit(id).unwrap());
        assert!(db.get_visit(id).unwrap().is_none());
        assert!(!db.delete_visit(id).unwrap());
    }
}
