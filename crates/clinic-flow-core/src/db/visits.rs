//! Visit record database operations.
//!
//! Every status write goes through the compare-and-swap in
//! [`Database::set_visit_status`]; nothing here deletes a visit row.

use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{ProcedureQuote, VisitOverview, VisitRecord, VisitStatus};

impl Database {
    /// Insert a new visit record.
    pub fn insert_visit(&self, visit: &VisitRecord) -> DbResult<()> {
        let quotes_json = serde_json::to_string(&visit.procedure_quotes)?;

        self.conn.execute(
            r#"
            INSERT INTO opd_visits (
                visit_id, patient_id, appointment_id, department, current_status,
                requires_procedures, requires_medicines, procedure_quotes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                visit.visit_id,
                visit.patient_id,
                visit.appointment_id,
                visit.department,
                visit.status.as_str(),
                visit.requires_procedures,
                visit.requires_medicines,
                quotes_json,
                visit.created_at,
                visit.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a visit by ID.
    pub fn get_visit(&self, visit_id: &str) -> DbResult<Option<VisitRecord>> {
        self.conn
            .query_row(
                r#"
                SELECT visit_id, patient_id, appointment_id, department, current_status,
                       requires_procedures, requires_medicines, procedure_quotes,
                       created_at, updated_at
                FROM opd_visits
                WHERE visit_id = ?
                "#,
                [visit_id],
                map_visit_row,
            )
            .optional()?
            .map(VisitRecord::try_from)
            .transpose()
    }

    /// Board query: all visits in the given statuses, with patient display
    /// fields joined and the appointment time when present.
    ///
    /// `department = None` means all departments. Ordering is stable across
    /// repeated calls with unchanged data (check-in time, then visit id).
    pub fn list_visits_by_status(
        &self,
        department: Option<&str>,
        statuses: &[VisitStatus],
    ) -> DbResult<Vec<VisitOverview>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!(
            r#"
            SELECT v.visit_id, v.patient_id, v.appointment_id, v.department, v.current_status,
                   v.requires_procedures, v.requires_medicines, v.procedure_quotes,
                   v.created_at, v.updated_at,
                   p.full_name, p.phone, a.scheduled_time
            FROM opd_visits v
            JOIN patients p ON p.patient_id = v.patient_id
            LEFT JOIN appointments a ON a.appointment_id = v.appointment_id
            WHERE v.current_status IN ({placeholders})
            "#
        );

        let mut args: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        if let Some(department) = department {
            sql.push_str(" AND v.department = ?");
            args.push(department.to_string());
        }
        sql.push_str(" ORDER BY v.created_at, v.visit_id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |row| {
            let visit = map_visit_row(row)?;
            Ok((visit, row.get::<_, String>(10)?, row.get(11)?, row.get(12)?))
        })?;

        let mut overviews = Vec::new();
        for row in rows {
            let (visit_row, patient_name, patient_phone, scheduled_time) = row?;
            overviews.push(VisitOverview {
                visit: visit_row.try_into()?,
                patient_name,
                patient_phone,
                scheduled_time,
            });
        }
        Ok(overviews)
    }

    /// Compare-and-swap status update. The expected current status is the
    /// precondition; returns false when the row is gone or another editor
    /// moved the status since it was read.
    pub fn set_visit_status(
        &self,
        visit_id: &str,
        expected: VisitStatus,
        new_status: VisitStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE opd_visits SET
                current_status = ?3,
                updated_at = datetime('now')
            WHERE visit_id = ?1 AND current_status = ?2
            "#,
            params![visit_id, expected.as_str(), new_status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Store the consultation outcome flags and quotes in one write.
    pub fn set_visit_flags_and_quotes(
        &self,
        visit_id: &str,
        requires_procedures: bool,
        requires_medicines: bool,
        quotes: &[ProcedureQuote],
    ) -> DbResult<bool> {
        let quotes_json = serde_json::to_string(quotes)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE opd_visits SET
                requires_procedures = ?2,
                requires_medicines = ?3,
                procedure_quotes = ?4,
                updated_at = datetime('now')
            WHERE visit_id = ?1
            "#,
            params![visit_id, requires_procedures, requires_medicines, quotes_json],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace the quote collection.
    pub fn set_visit_quotes(&self, visit_id: &str, quotes: &[ProcedureQuote]) -> DbResult<bool> {
        let quotes_json = serde_json::to_string(quotes)?;
        let rows_affected = self.conn.execute(
            "UPDATE opd_visits SET procedure_quotes = ?2, updated_at = datetime('now') WHERE visit_id = ?1",
            params![visit_id, quotes_json],
        )?;
        Ok(rows_affected > 0)
    }

    /// Update the medicines flag (set at procedure completion).
    pub fn set_requires_medicines(&self, visit_id: &str, requires_medicines: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE opd_visits SET requires_medicines = ?2, updated_at = datetime('now') WHERE visit_id = ?1",
            params![visit_id, requires_medicines],
        )?;
        Ok(rows_affected > 0)
    }

    /// Record counts per status, for statuses that have at least one row.
    pub fn count_visits_by_status(&self) -> DbResult<Vec<(VisitStatus, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT current_status, COUNT(*) FROM opd_visits GROUP BY current_status",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (status_str, count) = row?;
            let status = VisitStatus::parse(&status_str)
                .ok_or_else(|| DbError::Constraint(format!("Unknown visit status: {}", status_str)))?;
            counts.push((status, count));
        }
        Ok(counts)
    }
}

/// Intermediate row struct for database mapping.
pub(crate) struct VisitRow {
    visit_id: String,
    patient_id: String,
    appointment_id: Option<String>,
    department: String,
    status: String,
    requires_procedures: bool,
    requires_medicines: bool,
    procedure_quotes: String,
    created_at: String,
    updated_at: String,
}

fn map_visit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VisitRow> {
    Ok(VisitRow {
        visit_id: row.get(0)?,
        patient_id: row.get(1)?,
        appointment_id: row.get(2)?,
        department: row.get(3)?,
        status: row.get(4)?,
        requires_procedures: row.get(5)?,
        requires_medicines: row.get(6)?,
        procedure_quotes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<VisitRow> for VisitRecord {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        let procedure_quotes: Vec<ProcedureQuote> = serde_json::from_str(&row.procedure_quotes)?;
        let status = VisitStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown visit status: {}", row.status)))?;

        Ok(VisitRecord {
            visit_id: row.visit_id,
            patient_id: row.patient_id,
            appointment_id: row.appointment_id,
            department: row.department,
            status,
            requires_procedures: row.requires_procedures,
            requires_medicines: row.requires_medicines,
            procedure_quotes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
