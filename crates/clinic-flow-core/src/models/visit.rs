//! Visit record models for the clinical workflow.

use serde::{Deserialize, Serialize};

/// Clinical stage of a patient visit.
///
/// Statuses only ever move forward along the pipeline; the legality table
/// lives in the workflow module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    /// Checked in, waiting for a doctor
    Waiting,
    /// With the doctor
    InConsultation,
    /// Consultation done, awaiting admin approval of quotes
    AdminReview,
    /// Approved procedures not yet performed
    ProceduresPending,
    /// Medicines not yet dispensed
    PharmacyPending,
    /// Clinical pipeline finished
    Completed,
    /// Invoice raised
    Billed,
}

impl VisitStatus {
    /// All statuses, in pipeline order.
    pub const ALL: [VisitStatus; 7] = [
        VisitStatus::Waiting,
        VisitStatus::InConsultation,
        VisitStatus::AdminReview,
        VisitStatus::ProceduresPending,
        VisitStatus::PharmacyPending,
        VisitStatus::Completed,
        VisitStatus::Billed,
    ];

    /// Canonical column value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Waiting => "waiting",
            VisitStatus::InConsultation => "in_consultation",
            VisitStatus::AdminReview => "admin_review",
            VisitStatus::ProceduresPending => "procedures_pending",
            VisitStatus::PharmacyPending => "pharmacy_pending",
            VisitStatus::Completed => "completed",
            VisitStatus::Billed => "billed",
        }
    }

    /// Parse a canonical column value.
    pub fn parse(s: &str) -> Option<VisitStatus> {
        match s {
            "waiting" => Some(VisitStatus::Waiting),
            "in_consultation" => Some(VisitStatus::InConsultation),
            "admin_review" => Some(VisitStatus::AdminReview),
            "procedures_pending" => Some(VisitStatus::ProceduresPending),
            "pharmacy_pending" => Some(VisitStatus::PharmacyPending),
            "completed" => Some(VisitStatus::Completed),
            "billed" => Some(VisitStatus::Billed),
            _ => None,
        }
    }

    /// Position in the pipeline, 0-based.
    pub fn pipeline_index(&self) -> usize {
        match self {
            VisitStatus::Waiting => 0,
            VisitStatus::InConsultation => 1,
            VisitStatus::AdminReview => 2,
            VisitStatus::ProceduresPending => 3,
            VisitStatus::PharmacyPending => 4,
            VisitStatus::Completed => 5,
            VisitStatus::Billed => 6,
        }
    }

    /// True when no outgoing edges remain.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VisitStatus::Billed)
    }
}

/// Admin decision on a proposed procedure quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteApproval {
    /// Awaiting admin decision
    Pending,
    /// Approved for the attendant to perform
    Approved,
    /// Rejected, will not be performed
    Rejected,
}

/// A priced procedure line awaiting admin approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcedureQuote {
    /// Unique quote ID
    pub quote_id: String,
    /// Procedure name
    pub name: String,
    /// Proposed price
    pub price: f64,
    /// Admin approval status
    pub approval: QuoteApproval,
    /// Set once the attendant has performed the procedure
    pub performed: bool,
}

impl ProcedureQuote {
    /// Create a new quote pending admin approval.
    pub fn new(name: String, price: f64) -> Self {
        Self {
            quote_id: uuid::Uuid::new_v4().to_string(),
            name,
            price,
            approval: QuoteApproval::Pending,
            performed: false,
        }
    }
}

/// One clinical encounter for one patient.
///
/// The status field is driven exclusively through
/// [`crate::workflow::WorkflowTracker`]; visit rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRecord {
    /// Unique visit ID, immutable
    pub visit_id: String,
    /// Patient ID
    pub patient_id: String,
    /// Scheduled appointment, if the visit came from one
    pub appointment_id: Option<String>,
    /// Department tag used by board filters
    pub department: String,
    /// Current clinical stage
    pub status: VisitStatus,
    /// Set when the consultation outcome calls for procedures
    pub requires_procedures: bool,
    /// Set at consultation or procedure completion
    pub requires_medicines: bool,
    /// Priced procedure lines awaiting admin approval
    pub procedure_quotes: Vec<ProcedureQuote>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl VisitRecord {
    /// Create a new visit at check-in. Every visit starts in `Waiting`.
    pub fn new(patient_id: String, appointment_id: Option<String>, department: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            visit_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            appointment_id,
            department,
            status: VisitStatus::Waiting,
            requires_procedures: false,
            requires_medicines: false,
            procedure_quotes: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Quotes still awaiting an admin decision.
    pub fn pending_quote_count(&self) -> usize {
        self.procedure_quotes
            .iter()
            .filter(|q| q.approval == QuoteApproval::Pending)
            .count()
    }

    /// Approved quotes the attendant has not yet performed.
    pub fn unperformed_quote_count(&self) -> usize {
        self.procedure_quotes
            .iter()
            .filter(|q| q.approval == QuoteApproval::Approved && !q.performed)
            .count()
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// A board row: one visit joined with patient display fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitOverview {
    /// The visit itself
    pub visit: VisitRecord,
    /// Patient name for display
    pub patient_name: String,
    /// Patient phone for display
    pub patient_phone: Option<String>,
    /// Appointment time, when the visit came from one
    pub scheduled_time: Option<String>,
}

/// One entry in a visit's status audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    /// Row ID, monotonically increasing
    pub history_id: i64,
    /// Visit the change belongs to
    pub visit_id: String,
    /// Status before the change
    pub from_status: VisitStatus,
    /// Status after the change
    pub to_status: VisitStatus,
    /// Staff ID that made the change
    pub changed_by: String,
    /// Change timestamp
    pub changed_at: String,
}
