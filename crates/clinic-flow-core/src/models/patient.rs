//! Patient models.

use serde::{Deserialize, Serialize};

/// A patient record. The workflow core only reads display fields from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Unique patient ID
    pub patient_id: String,
    /// Full name
    pub full_name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(full_name: String, phone: Option<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            patient_id: uuid::Uuid::new_v4().to_string(),
            full_name,
            phone,
            date_of_birth: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
