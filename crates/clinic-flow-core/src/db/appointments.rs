//! Appointment database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Appointment;

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                appointment_id, patient_id, department, scheduled_time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                appointment.appointment_id,
                appointment.patient_id,
                appointment.department,
                appointment.scheduled_time,
                appointment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, appointment_id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                r#"
                SELECT appointment_id, patient_id, department, scheduled_time, created_at
                FROM appointments
                WHERE appointment_id = ?
                "#,
                [appointment_id],
                |row| {
                    Ok(Appointment {
                        appointment_id: row.get(0)?,
                        patient_id: row.get(1)?,
                        department: row.get(2)?,
                        scheduled_time: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}
