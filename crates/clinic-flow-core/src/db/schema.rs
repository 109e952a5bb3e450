//! SQLite schema definition.

/// Complete database schema for clinic-flow.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    phone TEXT,
    date_of_birth TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_full_name ON patients(full_name);
CREATE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone);

-- ============================================================================
-- Appointments (read-only join source for the board)
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    department TEXT NOT NULL,
    scheduled_time TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);

-- ============================================================================
-- OPD Visits (the workflow tracker's only read/write target)
-- ============================================================================

-- current_status is the canonical column name for the visit stage.
CREATE TABLE IF NOT EXISTS opd_visits (
    visit_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    appointment_id TEXT REFERENCES appointments(appointment_id),
    department TEXT NOT NULL,
    current_status TEXT NOT NULL DEFAULT 'waiting' CHECK (current_status IN (
        'waiting', 'in_consultation', 'admin_review', 'procedures_pending',
        'pharmacy_pending', 'completed', 'billed'
    )),
    requires_procedures INTEGER NOT NULL DEFAULT 0,
    requires_medicines INTEGER NOT NULL DEFAULT 0,
    procedure_quotes TEXT NOT NULL DEFAULT '[]',  -- JSON array of ProcedureQuote
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_status ON opd_visits(current_status);
CREATE INDEX IF NOT EXISTS idx_visits_patient ON opd_visits(patient_id);
CREATE INDEX IF NOT EXISTS idx_visits_department ON opd_visits(department);

-- ============================================================================
-- Visit Status History (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS visit_status_history (
    history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    visit_id TEXT NOT NULL REFERENCES opd_visits(visit_id),
    from_status TEXT NOT NULL,
    to_status TEXT NOT NULL,
    changed_by TEXT NOT NULL,
    changed_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_history_visit ON visit_status_history(visit_id);
"#;
