//! Patient database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Patient;

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                patient_id, full_name, phone, date_of_birth, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                patient.patient_id,
                patient.full_name,
                patient.phone,
                patient.date_of_birth,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT patient_id, full_name, phone, date_of_birth, created_at, updated_at
                FROM patients
                WHERE patient_id = ?
                "#,
                [patient_id],
                |row| {
                    Ok(Patient {
                        patient_id: row.get(0)?,
                        full_name: row.get(1)?,
                        phone: row.get(2)?,
                        date_of_birth: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by name or phone (prefix match).
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT patient_id, full_name, phone, date_of_birth, created_at, updated_at
            FROM patients
            WHERE full_name LIKE ?1 OR phone LIKE ?1
            ORDER BY full_name
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![pattern, limit as i64], |row| {
            Ok(Patient {
                patient_id: row.get(0)?,
                full_name: row.get(1)?,
                phone: row.get(2)?,
                date_of_birth: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT patient_id, full_name, phone, date_of_birth, created_at, updated_at
            FROM patients
            ORDER BY full_name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Patient {
                patient_id: row.get(0)?,
                full_name: row.get(1)?,
                phone: row.get(2)?,
                date_of_birth: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
