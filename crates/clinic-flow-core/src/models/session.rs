//! Request-scoped staff session.

use serde::{Deserialize, Serialize};

use super::role::StaffRole;
use super::visit::VisitStatus;

/// Who is acting. Passed explicitly into every mutating workflow operation;
/// nothing in the core reads an ambient logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffSession {
    /// Stable staff identifier, recorded in the status history
    pub staff_id: String,
    /// Display name
    pub display_name: String,
    /// Role driving board visibility
    pub role: StaffRole,
}

impl StaffSession {
    /// Create a session for one request.
    pub fn new(staff_id: String, display_name: String, role: StaffRole) -> Self {
        Self {
            staff_id,
            display_name,
            role,
        }
    }

    /// Statuses this session's role sees on the board.
    pub fn visible_statuses(&self, all_patients: bool) -> &'static [VisitStatus] {
        self.role.visible_statuses(all_patients)
    }
}
