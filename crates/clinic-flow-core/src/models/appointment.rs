//! Appointment models.

use serde::{Deserialize, Serialize};

/// A scheduled appointment. The workflow core only joins `scheduled_time`
/// for display; the scheduling screens own the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub appointment_id: String,
    /// Patient ID
    pub patient_id: String,
    /// Department the slot belongs to
    pub department: String,
    /// Scheduled start time
    pub scheduled_time: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Appointment {
    /// Create a new appointment.
    pub fn new(patient_id: String, department: String, scheduled_time: String) -> Self {
        Self {
            appointment_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            department,
            scheduled_time,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
