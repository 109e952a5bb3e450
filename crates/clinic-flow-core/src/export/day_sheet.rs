//! Day-sheet export: the current board serialized for the front desk.
//!
//! Pure serialization of already-fetched rows; no billing arithmetic.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{VisitOverview, VisitStatus};
use crate::workflow::{WorkflowResult, WorkflowTracker};

/// One exported board row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheetRow {
    /// Visit ID for traceability
    pub visit_id: String,
    /// Patient name
    pub patient_name: String,
    /// Patient phone
    pub patient_phone: Option<String>,
    /// Department
    pub department: String,
    /// Current stage
    pub status: String,
    /// Appointment time, when the visit came from one
    pub scheduled_time: Option<String>,
    /// Check-in timestamp
    pub checked_in_at: String,
    /// Last status change timestamp
    pub last_update_at: String,
}

/// Full board snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheetExport {
    /// Export timestamp
    pub exported_at: String,
    /// Board rows
    pub rows: Vec<DaySheetRow>,
    /// Total visit count
    pub total_visits: usize,
}

impl DaySheetExport {
    /// Build from fetched board rows.
    pub fn from_rows(rows: Vec<VisitOverview>) -> Self {
        let rows: Vec<DaySheetRow> = rows
            .into_iter()
            .map(|row| DaySheetRow {
                visit_id: row.visit.visit_id,
                patient_name: row.patient_name,
                patient_phone: row.patient_phone,
                department: row.visit.department,
                status: row.visit.status.as_str().to_string(),
                scheduled_time: row.scheduled_time,
                checked_in_at: row.visit.created_at,
                last_update_at: row.visit.updated_at,
            })
            .collect();

        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            total_visits: rows.len(),
            rows,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(
            "visit_id,patient_name,patient_phone,department,status,scheduled_time,checked_in_at,last_update_at\n",
        );

        // Lines
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                escape_csv(&row.visit_id),
                escape_csv(&row.patient_name),
                row.patient_phone.as_deref().map(escape_csv).unwrap_or_default(),
                escape_csv(&row.department),
                escape_csv(&row.status),
                row.scheduled_time.as_deref().map(escape_csv).unwrap_or_default(),
                escape_csv(&row.checked_in_at),
                escape_csv(&row.last_update_at),
            ));
        }

        csv
    }
}

/// Day-sheet exporter.
pub struct DaySheetExporter<'a> {
    db: &'a Database,
}

impl<'a> DaySheetExporter<'a> {
    /// Create a new exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export every visit in every status, optionally one department.
    pub fn export_all(&self, department: Option<&str>) -> WorkflowResult<DaySheetExport> {
        let tracker = WorkflowTracker::new(self.db);
        let rows = tracker.list_patients(department, &VisitStatus::ALL)?;
        Ok(DaySheetExport::from_rows(rows))
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
    use crate::models::{Patient, VisitRecord};

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Rao, Asha".into(), Some("555-0101".into()));
        db.insert_patient(&patient).unwrap();

        let visit1 = VisitRecord::new(patient.patient_id.clone(), None, "general".into());
        db.insert_visit(&visit1).unwrap();

        let mut visit2 = VisitRecord::new(patient.patient_id.clone(), None, "dental".into());
        visit2.status = VisitStatus::Completed;
        db.insert_visit(&visit2).unwrap();

        db
    }

    #[test]
    fn test_export_all() {
        let db = seeded_db();
        let exporter = DaySheetExporter::new(&db);

        let export = exporter.export_all(None).unwrap();
        assert_eq!(export.total_visits, 2);
        assert_eq!(export.rows.len(), 2);

        let dental_only = exporter.export_all(Some("dental")).unwrap();
        assert_eq!(dental_only.total_visits, 1);
        assert_eq!(dental_only.rows[0].status, "completed");
    }

    #[test]
    fn test_export_json() {
        let db = seeded_db();
        let export = DaySheetExporter::new(&db).export_all(None).unwrap();

        let json = export.to_json().unwrap();
        assert!(json.contains("Rao, Asha"));
        assert!(json.contains("\"total_visits\": 2"));
    }

    #[test]
    fn test_export_csv_quotes_commas() {
        let db = seeded_db();
        let export = DaySheetExporter::new(&db).export_all(None).unwrap();

        let csv = export.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3); // Header + 2 rows
        assert!(lines[0].starts_with("visit_id,patient_name"));
        assert!(csv.contains("\"Rao, Asha\""));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
