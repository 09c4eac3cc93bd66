//! Visit count aggregates for charts and reports.

use super::{Database, DbResult};

/// One (period, count) aggregation row.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodCount {
    /// Day, month or year label, e.g. "2024-03-01", "2024-03", "2024"
    pub period: String,
    /// Number of visits recorded in the period
    pub count: i64,
}

impl Database {
    /// Visits per day over the last 30 days, ascending by date.
    pub fn visit_counts_by_day(&self) -> DbResult<Vec<PeriodCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT visit_date, COUNT(*)
            FROM visits
            WHERE visit_date >= date('now', '-30 days')
            GROUP BY visit_date
            ORDER BY visit_date
            "#,
        )?;
        let rows = stmt.query_map([], map_period_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Visits per month over the last 12 months, ascending by month.
    pub fn visit_counts_by_month(&self) -> DbResult<Vec<PeriodCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT strftime('%Y-%m', visit_date), COUNT(*)
            FROM visits
            WHERE visit_date >= date('now', '-12 months')
            GROUP BY strftime('%Y-%m', visit_date)
            ORDER BY 1
            "#,
        )?;
        let rows = stmt.query_map([], map_period_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Visits per year over every recorded year, ascending.
    pub fn visit_counts_by_year(&self) -> DbResult<Vec<PeriodCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT strftime('%Y', visit_date), COUNT(*)
            FROM visits
            GROUP BY strftime('%Y', visit_date)
            ORDER BY 1
            "#,
        )?;
        let rows = stmt.query_map([], map_period_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_period_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PeriodCount> {
    Ok(PeriodCount {
        period: row.get(0)?,
        count: row.get(1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{patients, visits};
    use crate::models::{PatientDetails, VisitDraft};
    use chrono::{Duration, Local};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn record_on(db: &Database, patient_id: i64, date: &str) {
        let draft = VisitDraft {
            visit_date: date.into(),
            diagnosis: "复诊".into(),
            ..Default::default()
        };
        visits::insert(db.conn(), patient_id, &draft).unwrap();
    }

    fn days_ago(n: i64) -> String {
        (Local::now() - Duration::days(n)).format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_daily_counts_window_and_order() {
        let db = setup_db();
        let patient_id =
            patients::insert(db.conn(), &PatientDetails::identity("张三", "13800000001")).unwrap();

        let today = days_ago(0);
        let recent = days_ago(10);
        let ancient = days_ago(400);

        record_on(&db, patient_id, &today);
        record_on(&db, patient_id, &today);
        record_on(&db, patient_id, &recent);
        record_on(&db, patient_id, &ancient);

        let counts = db.visit_counts_by_day().unwrap();
        assert_eq!(counts.len(), 2);
        // Ascending by date
        assert_eq!(counts[0].period, recent);
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].period, today);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn test_monthly_window_excludes_old_visits() {
        let db = setup_db();
        let patient_id =
            patients::insert(db.conn(), &PatientDetails::identity("张三", "13800000001")).unwrap();

        record_on(&db, patient_id, &days_ago(0));
        record_on(&db, patient_id, &days_ago(400));

        let counts = db.visit_counts_by_month().unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].period, Local::now().format("%Y-%m").to_string());
    }

    #[test]
    fn test_yearly_counts_cover_all_years() {
        let db = setup_db();
        let patient_id =
            patients::insert(db.conn(), &PatientDetails::identity("张三", "13800000001")).unwrap();

        record_on(&db, patient_id, &days_ago(0));
        record_on(&db, patient_id, &days_ago(400));

        let counts = db.visit_counts_by_year().unwrap();
        assert_eq!(counts.len(), 2);
        assert!(counts[0].period < counts[1].period);
        assert_eq!(counts[1].period, Local::now().format("%Y").to_string());
    }
}
