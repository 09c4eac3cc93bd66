//! Patient record export for external archival.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{Database, DbResult};
use crate::models::{Patient, PatientFilter, PrescriptionLine, Visit};

/// Complete record export across one or more patients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExport {
    /// Unique id for this export run
    pub export_id: String,
    /// Export timestamp
    pub generated_at: String,
    /// Per-patient bundles, in patient insertion order
    pub patients: Vec<PatientRecordBundle>,
    /// Total visit count across all bundles
    pub total_visits: usize,
}

/// One patient with their full visit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecordBundle {
    /// Patient master data
    pub patient: Patient,
    /// Visits oldest first
    pub visits: Vec<ExportedVisit>,
}

/// One visit with its prescription lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedVisit {
    /// Visit detail
    pub visit: Visit,
    /// Lines in entry order
    pub lines: Vec<PrescriptionLine>,
}

impl RecordExport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per prescription line. Visits
    /// without lines still produce a row so no record is dropped.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(
            "patient_id,patient_name,gender,age,phone,visit_id,visit_date,diagnosis,treatment,medicine,dosage,usage\n",
        );

        for bundle in &self.patients {
            for exported in &bundle.visits {
                if exported.lines.is_empty() {
                    csv.push_str(&format!("{},,,\n", visit_prefix(&bundle.patient, &exported.visit)));
                    continue;
                }
                for line in &exported.lines {
                    csv.push_str(&format!(
                        "{},{},{},{}\n",
                        visit_prefix(&bundle.patient, &exported.visit),
                        escape_csv(&line.medicine),
                        escape_csv(&line.dosage),
                        escape_csv(&line.usage),
                    ));
                }
            }
        }

        csv
    }
}

fn visit_prefix(patient: &Patient, visit: &Visit) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}",
        patient.id,
        escape_csv(&patient.name),
        escape_csv(&patient.gender),
        patient.age.map(|a| a.to_string()).unwrap_or_default(),
        escape_csv(&patient.phone),
        visit.id,
        escape_csv(&visit.visit_date),
        escape_csv(&visit.diagnosis),
        escape_csv(&visit.treatment),
    )
}

/// Record exporter.
pub struct RecordExporter<'a> {
    db: &'a Database,
}

impl<'a> RecordExporter<'a> {
    /// Create a new record exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export every patient with their full history.
    pub fn export_all(&self) -> DbResult<RecordExport> {
        let patients = self.db.list_patients(&PatientFilter::default())?;
        let mut bundles = Vec::with_capacity(patients.len());
        for patient in patients {
            bundles.push(self.bundle_for(patient)?);
        }
        Ok(assemble(bundles))
    }

    /// Export a single patient, or None when the id is unknown.
    pub fn export_patient(&self, patient_id: i64) -> DbResult<Option<RecordExport>> {
        let Some(patient) = self.db.get_patient(patient_id)? else {
            return Ok(None);
        };
        let bundle = self.bundle_for(patient)?;
        Ok(Some(assemble(vec![bundle])))
    }

    fn bundle_for(&self, patient: Patient) -> DbResult<PatientRecordBundle> {
        let visits = self.db.visits_for_patient(patient.id)?;
        let mut exported = Vec::with_capacity(visits.len());
        for visit in visits {
            let lines = self.db.prescription_lines(visit.id)?;
            exported.push(ExportedVisit { visit, lines });
        }
        Ok(PatientRecordBundle {
            patient,
            visits: exported,
        })
    }
}

fn assemble(patients: Vec<PatientRecordBundle>) -> RecordExport {
    let total_visits = patients.iter().map(|b| b.visits.len()).sum();
    RecordExport {
        export_id: Uuid::new_v4().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        patients,
        total_visits,
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{patients, prescriptions, visits};
    use crate::models::{PatientDetails, VisitDraft};

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();

        let zhang = patients::insert(
            db.conn(),
            &PatientDetails {
                name: "张三".into(),
                gender: "男".into(),
                age: Some(42),
                phone: "13800000001".into(),
                history: "高血压".into(),
            },
        )
        .unwrap();
        let li =
            patients::insert(db.conn(), &PatientDetails::identity("李四", "13900000002")).unwrap();

        let first = visits::insert(
            db.conn(),
            zhang,
            &VisitDraft {
                visit_date: "2024-01-05".into(),
                diagnosis: "咳嗽".into(),
                ..Default::default()
            },
        )
        .unwrap();
        prescriptions::insert_line(db.conn(), first, "甘草", "15g", "煎服").unwrap();
        prescriptions::insert_line(db.conn(), first, "黄芪", "10g", "煎服").unwrap();

        visits::insert(
            db.conn(),
            zhang,
            &VisitDraft {
                visit_date: "2024-03-01".into(),
                diagnosis: "复诊".into(),
                ..Default::default()
            },
        )
        .unwrap();

        visits::insert(
            db.conn(),
            li,
            &VisitDraft {
                visit_date: "2024-02-10".into(),
                diagnosis: "胃痛".into(),
                ..Default::default()
            },
        )
        .unwrap();

        db
    }

    #[test]
    fn test_export_all_bundles_every_patient() {
        let db = setup_db();
        let export = RecordExporter::new(&db).export_all().unwrap();

        assert_eq!(export.patients.len(), 2);
        assert_eq!(export.total_visits, 3);
        assert!(!export.export_id.is_empty());

        // Patients in insertion order, visits oldest first
        let zhang = &export.patients[0];
        assert_eq!(zhang.patient.name, "张三");
        assert_eq!(zhang.visits.len(), 2);
        assert_eq!(zhang.visits[0].visit.visit_date, "2024-01-05");
        assert_eq!(zhang.visits[0].lines.len(), 2);
        assert_eq!(zhang.visits[1].lines.len(), 0);
    }

    #[test]
    fn test_export_single_patient() {
        let db = setup_db();
        let exporter = RecordExporter::new(&db);

        let export = exporter.export_patient(1).unwrap().unwrap();
        assert_eq!(export.patients.len(), 1);
        assert_eq!(export.total_visits, 2);

        assert!(exporter.export_patient(999).unwrap().is_none());
    }

    #[test]
    fn test_export_json() {
        let db = setup_db();
        let export = RecordExporter::new(&db).export_all().unwrap();

        let json = export.to_json().unwrap();
        assert!(json.contains("张三"));
        assert!(json.contains("甘草"));
        assert!(json.contains("export_id"));
    }

    #[test]
    fn test_export_csv_rows() {
        let db = setup_db();
        let export = RecordExporter::new(&db).export_all().unwrap();

        let csv = export.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        // Header + 2 lines for the first visit + 1 each for the lineless visits
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("patient_id,patient_name"));
        assert!(lines[1].contains("甘草"));
        assert!(lines[2].contains("黄芪"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
