//! Prescription line database operations.

use rusqlite::{params, params_from_iter, Connection, ToSql};

use super::{Database, DbResult};
use crate::models::{PrescriptionFilter, PrescriptionLine, PrescriptionSummary};

/// Insert one prescription line for a visit.
pub(crate) fn insert_line(
    conn: &Connection,
    visit_id: i64,
    medicine: &str,
    dosage: &str,
    usage: &str,
) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO prescriptions (visit_id, medicine, dosage, usage)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![visit_id, medicine, dosage, usage],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All lines of one visit, in entry order.
pub(crate) fn lines_for_visit(conn: &Connection, visit_id: i64) -> DbResult<Vec<PrescriptionLine>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, visit_id, medicine, dosage, usage
        FROM prescriptions
        WHERE visit_id = ?
        ORDER BY id
        "#,
    )?;
    let rows = stmt.query_map([visit_id], |row| {
        Ok(PrescriptionLine {
            id: row.get(0)?,
            visit_id: row.get(1)?,
            medicine: row.get(2)?,
            dosage: row.get(3)?,
            usage: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl Database {
    /// All lines of one visit, in entry order.
    pub fn prescription_lines(&self, visit_id: i64) -> DbResult<Vec<PrescriptionLine>> {
        lines_for_visit(&self.conn, visit_id)
    }

    /// List prescription lines matching the filter, newest visit first.
    /// Lines within one visit keep their entry order.
    pub fn list_prescriptions(
        &self,
        filter: &PrescriptionFilter,
    ) -> DbResult<Vec<PrescriptionSummary>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.patient_name.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("pt.name LIKE ?".into());
            values.push(Box::new(format!("%{}%", name)));
        }
        if let Some(visit_id) = filter.visit_id {
            clauses.push("p.visit_id = ?".into());
            values.push(Box::new(visit_id));
        }
        if let Some(date) = filter.visit_date.as_deref().filter(|s| !s.is_empty()) {
            clauses.push("v.visit_date = ?".into());
            values.push(Box::new(date.to_string()));
        }

        let mut sql = String::from(
            r#"
            SELECT p.visit_id, p.medicine, p.dosage, p.usage, v.visit_date, pt.name
            FROM prescriptions p
            JOIN visits v ON p.visit_id = v.id
            JOIN patients pt ON v.patient_id = pt.id
            "#,
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY v.visit_date DESC, p.visit_id DESC, p.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(PrescriptionSummary {
                visit_id: row.get(0)?,
                medicine: row.get(1)?,
                dosage: row.get(2)?,
                usage: row.get(3)?,
                visit_date: row.get(4)?,
                patient_name: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
