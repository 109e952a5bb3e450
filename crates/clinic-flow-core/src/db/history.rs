//! Visit status history operations (append-only).

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{StatusChange, VisitStatus};

impl Database {
    /// Append one status change to the audit trail.
    pub fn record_status_change(
        &self,
        visit_id: &str,
        from_status: VisitStatus,
        to_status: VisitStatus,
        changed_by: &str,
    ) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO visit_status_history (visit_id, from_status, to_status, changed_by)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![visit_id, from_status.as_str(), to_status.as_str(), changed_by],
        )?;
        Ok(())
    }

    /// Status history for one visit, oldest first.
    pub fn list_status_history(&self, visit_id: &str) -> DbResult<Vec<StatusChange>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT history_id, visit_id, from_status, to_status, changed_by, changed_at
            FROM visit_status_history
            WHERE visit_id = ?
            ORDER BY history_id
            "#,
        )?;

        let rows = stmt.query_map([visit_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut changes = Vec::new();
        for row in rows {
            let (history_id, visit_id, from_str, to_str, changed_by, changed_at) = row?;
            let from_status = VisitStatus::parse(&from_str)
                .ok_or_else(|| DbError::Constraint(format!("Unknown visit status: {}", from_str)))?;
            let to_status = VisitStatus::parse(&to_str)
                .ok_or_else(|| DbError::Constraint(format!("Unknown visit status: {}", to_str)))?;
            changes.push(StatusChange {
                history_id,
                visit_id,
                from_status,
                to_status,
                changed_by,
                changed_at,
            });
        }
        Ok(changes)
    }
}
