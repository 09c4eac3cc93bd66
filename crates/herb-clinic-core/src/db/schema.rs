//! SQLite schema definition.

/// Complete database schema for herb-clinic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Substring filters use LIKE; matches must be case sensitive
PRAGMA case_sensitive_like = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (name <> ''),
    gender TEXT NOT NULL DEFAULT '',
    age INTEGER,
    phone TEXT NOT NULL CHECK (phone <> ''),
    history TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Identity key: two rows may share a name, never a (name, phone) pair
CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_identity ON patients(name, phone);

-- ============================================================================
-- Visits (medical records)
-- ============================================================================

CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    visit_date TEXT NOT NULL,
    wang TEXT NOT NULL DEFAULT '',               -- inspection notes
    wen TEXT NOT NULL DEFAULT '',                -- listening/smelling notes
    wen2 TEXT NOT NULL DEFAULT '',               -- inquiry notes
    qie TEXT NOT NULL DEFAULT '',                -- palpation notes
    diagnosis TEXT NOT NULL CHECK (diagnosis <> ''),
    treatment TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(visit_date);

-- Visits are append-only once written
CREATE TRIGGER IF NOT EXISTS visits_immutable BEFORE UPDATE ON visits
BEGIN
    SELECT RAISE(ABORT, 'Visit rows are immutable');
END;

-- ============================================================================
-- Prescription Lines
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    visit_id INTEGER NOT NULL REFERENCES visits(id) ON DELETE CASCADE,
    medicine TEXT NOT NULL CHECK (medicine <> ''),
    dosage TEXT NOT NULL,
    usage TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_visit ON prescriptions(visit_id);

-- Lines are written with their visit and never edited individually
CREATE TRIGGER IF NOT EXISTS prescriptions_immutable BEFORE UPDATE ON prescriptions
BEGIN
    SELECT RAISE(ABORT, 'Prescription lines are immutable');
END;

-- ============================================================================
-- Medicines
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (name <> ''),
    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    unit TEXT NOT NULL DEFAULT '包',
    usage TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Favorite Folders and Entries
-- ============================================================================

CREATE TABLE IF NOT EXISTS favorite_folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (name <> ''),
    created_time TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS favorite_prescriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    folder_id INTEGER NOT NULL REFERENCES favorite_folders(id) ON DELETE CASCADE,
    visit_id INTEGER NOT NULL,                   -- source visit, no FK so snapshots outlive it
    patient_name TEXT NOT NULL DEFAULT '',
    snapshot TEXT NOT NULL,                      -- JSON object {"prescriptions": [...]}
    snapshot_hash TEXT NOT NULL,                 -- SHA-256 over the snapshot text
    created_time TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_favorites_folder ON favorite_prescriptions(folder_id);

-- A folder holds each distinct prescription set at most once
CREATE UNIQUE INDEX IF NOT EXISTS idx_favorites_dedup
    ON favorite_prescriptions(folder_id, snapshot_hash);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_identity_pair_unique() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO patients (name, phone) VALUES ('张三', '13800000001')",
            [],
        )
        .unwrap();

        // Same name, different phone is a different patient
        let result = conn.execute(
            "INSERT INTO patients (name, phone) VALUES ('张三', '13800000002')",
            [],
        );
        assert!(result.is_ok());

        // Same (name, phone) pair must be rejected
        let result = conn.execute(
            "INSERT INTO patients (name, phone) VALUES ('张三', '13800000001')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stock_never_negative() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO medicines (name, stock, unit) VALUES ('甘草', 10, 'g')",
            [],
        )
        .unwrap();

        let result = conn.execute("UPDATE medicines SET stock = -1 WHERE name = '甘草'", []);
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO medicines (name, stock) VALUES ('黄芪', -5)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_visits_are_immutable() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO patients (name, phone) VALUES ('张三', '13800000001')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO visits (patient_id, visit_date, diagnosis) VALUES (1, '2024-01-01', '风寒感冒')",
            [],
        )
        .unwrap();

        let result = conn.execute("UPDATE visits SET diagnosis = '风热感冒' WHERE id = 1", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_delete_cascades_to_visits_and_lines() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO patients (name, phone) VALUES ('张三', '13800000001')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO visits (patient_id, visit_date, diagnosis) VALUES (1, '2024-01-01', '风寒感冒')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO prescriptions (visit_id, medicine, dosage) VALUES (1, '甘草', '5g')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM patients WHERE id = 1", []).unwrap();

        let visits: i64 = conn
            .query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))
            .unwrap();
        let lines: i64 = conn
            .query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(visits, 0);
        assert_eq!(lines, 0);
    }

    #[test]
    fn test_folder_delete_cascades_to_entries() {
        let conn = setup_conn();

        conn.execute("INSERT INTO favorite_folders (name) VALUES ('常用方')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO favorite_prescriptions (folder_id, visit_id, patient_name, snapshot, snapshot_hash)
             VALUES (1, 1, '张三', '{\"prescriptions\":[]}', 'abc')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM favorite_folders WHERE id = 1", [])
            .unwrap();

        let entries: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorite_prescriptions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_folder_rejects_duplicate_snapshot() {
        let conn = setup_conn();

        conn.execute("INSERT INTO favorite_folders (name) VALUES ('常用方')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO favorite_prescriptions (folder_id, visit_id, patient_name, snapshot, snapshot_hash)
             VALUES (1, 1, '张三', '{\"prescriptions\":[]}', 'abc')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO favorite_prescriptions (folder_id, visit_id, patient_name, snapshot, snapshot_hash)
             VALUES (1, 2, '李四', '{\"prescriptions\":[]}', 'abc')",
            [],
        );
        assert!(result.is_err());
    }
}
