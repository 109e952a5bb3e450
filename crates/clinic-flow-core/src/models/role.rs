//! Staff roles and their workflow visibility.

use serde::{Deserialize, Serialize};

use super::visit::VisitStatus;

/// A staff role on the workflow board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Runs consultations
    Doctor,
    /// Reviews quotes and oversees the board
    Admin,
    /// Performs approved procedures
    Attendant,
    /// Dispenses medicines
    Pharmacist,
    /// Front desk: check-in, completion, billing
    Receptionist,
    /// Any unrecognized role string. Sees only the waiting queue.
    Unknown,
}

impl StaffRole {
    /// Parse a role string. Unrecognized values map to `Unknown`, not an error.
    pub fn parse(s: &str) -> StaffRole {
        match s.trim().to_lowercase().as_str() {
            "doctor" => StaffRole::Doctor,
            "admin" => StaffRole::Admin,
            "attendant" => StaffRole::Attendant,
            "pharmacist" => StaffRole::Pharmacist,
            "receptionist" => StaffRole::Receptionist,
            _ => StaffRole::Unknown,
        }
    }

    /// Canonical role string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Doctor => "doctor",
            StaffRole::Admin => "admin",
            StaffRole::Attendant => "attendant",
            StaffRole::Pharmacist => "pharmacist",
            StaffRole::Receptionist => "receptionist",
            StaffRole::Unknown => "unknown",
        }
    }

    /// Statuses this role sees on the board.
    ///
    /// `all_patients` widens admin and receptionist to the full board; the
    /// flag is ignored for every other role.
    pub fn visible_statuses(&self, all_patients: bool) -> &'static [VisitStatus] {
        match self {
            StaffRole::Doctor => &[VisitStatus::Waiting, VisitStatus::InConsultation],
            StaffRole::Admin if all_patients => &VisitStatus::ALL,
            StaffRole::Admin => &[VisitStatus::AdminReview],
            StaffRole::Attendant => &[VisitStatus::ProceduresPending],
            StaffRole::Pharmacist => &[VisitStatus::PharmacyPending],
            StaffRole::Receptionist if all_patients => &VisitStatus::ALL,
            StaffRole::Receptionist => &[VisitStatus::Completed, VisitStatus::Billed],
            StaffRole::Unknown => &[VisitStatus::Waiting],
        }
    }
}
