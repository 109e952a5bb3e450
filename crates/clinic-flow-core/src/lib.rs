//! ClinicFlow Core Library
//!
//! Patient workflow tracking for a multi-role clinic.
//!
//! # Architecture
//!
//! ```text
//! Reception check-in
//!         │
//!     [waiting] ──doctor──▶ [in_consultation]
//!                                   │
//!                        consultation outcome recorded
//!                     (requires_procedures / requires_medicines
//!                            + procedure quotes)
//!                                   │
//!                           [admin_review] ── quotes approved/rejected
//!                            │    │    │
//!              procedures ◀──┘    │    └──▶ completed   (no medicines)
//!                  │              └──▶ pharmacy_pending (no procedures)
//!         [procedures_pending]         ▲
//!                  │ last procedure    │
//!                  ├───────────────────┘ (medicines needed)
//!                  │ (no medicines)
//!                  ▼
//!             [completed] ──front desk──▶ [billed]
//! ```
//!
//! # Core Principle
//!
//! **Every status write is validated and compare-and-swapped.** A transition
//! that is not on the edge table is rejected, and a concurrent editor race
//! fails loudly instead of silently last-write-wins.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (VisitRecord, Patient, StaffRole, etc.)
//! - [`workflow`]: Status tracker — transitions, role boards, summary
//! - [`poll`]: Generation tickets for discarding stale poll results
//! - [`export`]: Day-sheet export

pub mod db;
pub mod export;
pub mod models;
pub mod poll;
pub mod workflow;

// Re-export commonly used types
pub use db::Database;
pub use export::{DaySheetExport, DaySheetExporter, DaySheetRow};
pub use models::{
    Appointment, Patient, ProcedureQuote, QuoteApproval, StaffRole, StaffSession, StatusChange,
    VisitOverview, VisitRecord, VisitStatus,
};
pub use poll::{PollGate, PollTicket};
pub use workflow::{QuoteDecision, WorkflowError, WorkflowSummary, WorkflowTracker};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for ClinicFlowError {
    fn from(e: db::DbError) -> Self {
        ClinicFlowError::DatabaseError(e.to_string())
    }
}

impl From<workflow::WorkflowError> for ClinicFlowError {
    fn from(e: workflow::WorkflowError) -> Self {
        match e {
            WorkflowError::VisitNotFound(id) => ClinicFlowError::NotFound(id),
            WorkflowError::IllegalTransition { .. } => {
                ClinicFlowError::IllegalTransition(e.to_string())
            }
            WorkflowError::StatusConflict(_) => ClinicFlowError::Conflict(e.to_string()),
            WorkflowError::InvalidRequest(msg) => ClinicFlowError::InvalidInput(msg),
            WorkflowError::Storage(e) => ClinicFlowError::DatabaseError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClinicFlowError {
    fn from(e: serde_json::Error) -> Self {
        ClinicFlowError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicFlowError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicFlowError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicFlowCore>, ClinicFlowError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(ClinicFlowCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ClinicFlowCore>, ClinicFlowError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ClinicFlowCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicFlowCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl ClinicFlowCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient.
    pub fn register_patient(
        &self,
        full_name: String,
        phone: Option<String>,
    ) -> Result<FfiPatient, ClinicFlowError> {
        let db = self.db.lock()?;
        let patient = Patient::new(full_name, phone);
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, ClinicFlowError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Search patients by name or phone.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ClinicFlowError> {
        let db = self.db.lock()?;
        let patients = db.search_patients(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Check a patient in. Every visit starts in `waiting`.
    pub fn check_in(
        &self,
        patient_id: String,
        appointment_id: Option<String>,
        department: String,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let db = self.db.lock()?;
        let visit = VisitRecord::new(patient_id, appointment_id, department);
        db.insert_visit(&visit)?;
        Ok(visit.into())
    }

    /// Get a visit by ID.
    pub fn get_visit(&self, visit_id: String) -> Result<Option<FfiVisit>, ClinicFlowError> {
        let db = self.db.lock()?;
        let visit = db.get_visit(&visit_id)?;
        Ok(visit.map(|v| v.into()))
    }

    // =========================================================================
    // Workflow Operations
    // =========================================================================

    /// Statuses a role sees on the board. Pure mapping, no I/O.
    pub fn visible_statuses(&self, role: String, all_patients: bool) -> Vec<String> {
        StaffRole::parse(&role)
            .visible_statuses(all_patients)
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }

    /// Board rows for one session, per its role's visibility table.
    pub fn board(
        &self,
        session: FfiStaffSession,
        all_patients: bool,
        department: Option<String>,
    ) -> Result<Vec<FfiVisitOverview>, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let rows = tracker.board(&session.into(), all_patients, department.as_deref())?;
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Move a visit to a new status.
    pub fn update_status(
        &self,
        session: FfiStaffSession,
        visit_id: String,
        new_status: String,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let status = parse_status(&new_status)?;
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let visit = tracker.update_status(&session.into(), &visit_id, status)?;
        Ok(visit.into())
    }

    /// Record the consultation outcome and move to admin review.
    pub fn record_consultation_outcome(
        &self,
        session: FfiStaffSession,
        visit_id: String,
        requires_procedures: bool,
        requires_medicines: bool,
        quotes: Vec<FfiQuoteInput>,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let quotes = quotes
            .into_iter()
            .map(|q| ProcedureQuote::new(q.name, q.price))
            .collect();
        let visit = tracker.record_consultation_outcome(
            &session.into(),
            &visit_id,
            requires_procedures,
            requires_medicines,
            quotes,
        )?;
        Ok(visit.into())
    }

    /// Admin decisions on individual quotes.
    pub fn review_procedure_quotes(
        &self,
        session: FfiStaffSession,
        visit_id: String,
        decisions: Vec<FfiQuoteDecision>,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let decisions: Vec<QuoteDecision> = decisions.into_iter().map(|d| d.into()).collect();
        let visit = tracker.review_procedure_quotes(&session.into(), &visit_id, &decisions)?;
        Ok(visit.into())
    }

    /// Mark one procedure performed; optionally leave the procedure stage.
    pub fn complete_procedure(
        &self,
        session: FfiStaffSession,
        visit_id: String,
        quote_id: String,
        more_pending: bool,
        requires_medicines: bool,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let visit = tracker.complete_procedure(
            &session.into(),
            &visit_id,
            &quote_id,
            more_pending,
            requires_medicines,
        )?;
        Ok(visit.into())
    }

    /// Dispense done: pharmacy -> completed.
    pub fn complete_pharmacy(
        &self,
        session: FfiStaffSession,
        visit_id: String,
    ) -> Result<FfiVisit, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let visit = tracker.complete_pharmacy(&session.into(), &visit_id)?;
        Ok(visit.into())
    }

    /// Record counts per status for dashboard tiles, zero-filled.
    pub fn workflow_summary(&self) -> Result<FfiWorkflowSummary, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let summary = tracker.summary()?;
        Ok(summary.into())
    }

    /// Status history for one visit, oldest first.
    pub fn visit_history(&self, visit_id: String) -> Result<Vec<FfiStatusChange>, ClinicFlowError> {
        let db = self.db.lock()?;
        let tracker = WorkflowTracker::new(&db);
        let history = tracker.history(&visit_id)?;
        Ok(history.into_iter().map(|h| h.into()).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the day sheet as JSON.
    pub fn export_day_sheet_json(
        &self,
        department: Option<String>,
    ) -> Result<String, ClinicFlowError> {
        let db = self.db.lock()?;
        let exporter = DaySheetExporter::new(&db);
        let export = exporter.export_all(department.as_deref())?;
        Ok(export.to_json()?)
    }

    /// Export the day sheet as CSV.
    pub fn export_day_sheet_csv(
        &self,
        department: Option<String>,
    ) -> Result<String, ClinicFlowError> {
        let db = self.db.lock()?;
        let exporter = DaySheetExporter::new(&db);
        let export = exporter.export_all(department.as_deref())?;
        Ok(export.to_csv())
    }
}

fn parse_status(s: &str) -> Result<VisitStatus, ClinicFlowError> {
    VisitStatus::parse(s)
        .ok_or_else(|| ClinicFlowError::InvalidInput(format!("Unknown visit status: {}", s)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe staff session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaffSession {
    pub staff_id: String,
    pub display_name: String,
    pub role: String,
}

impl From<FfiStaffSession> for StaffSession {
    fn from(session: FfiStaffSession) -> Self {
        StaffSession::new(
            session.staff_id,
            session.display_name,
            StaffRole::parse(&session.role),
        )
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            full_name: patient.full_name,
            phone: patient.phone,
            date_of_birth: patient.date_of_birth,
        }
    }
}

/// FFI-safe procedure quote.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuote {
    pub quote_id: String,
    pub name: String,
    pub price: f64,
    pub approval: String,
    pub performed: bool,
}

impl From<ProcedureQuote> for FfiQuote {
    fn from(quote: ProcedureQuote) -> Self {
        let approval = match quote.approval {
            QuoteApproval::Pending => "pending",
            QuoteApproval::Approved => "approved",
            QuoteApproval::Rejected => "rejected",
        };
        Self {
            quote_id: quote.quote_id,
            name: quote.name,
            price: quote.price,
            approval: approval.to_string(),
            performed: quote.performed,
        }
    }
}

/// A new quote proposed during consultation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuoteInput {
    pub name: String,
    pub price: f64,
}

/// An admin decision on one quote.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuoteDecision {
    pub quote_id: String,
    pub approve: bool,
}

impl From<FfiQuoteDecision> for QuoteDecision {
    fn from(decision: FfiQuoteDecision) -> Self {
        QuoteDecision {
            quote_id: decision.quote_id,
            approval: if decision.approve {
                QuoteApproval::Approved
            } else {
                QuoteApproval::Rejected
            },
        }
    }
}

/// FFI-safe visit record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub visit_id: String,
    pub patient_id: String,
    pub appointment_id: Option<String>,
    pub department: String,
    pub status: String,
    pub requires_procedures: bool,
    pub requires_medicines: bool,
    pub procedure_quotes: Vec<FfiQuote>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<VisitRecord> for FfiVisit {
    fn from(visit: VisitRecord) -> Self {
        Self {
            visit_id: visit.visit_id,
            patient_id: visit.patient_id,
            appointment_id: visit.appointment_id,
            department: visit.department,
            status: visit.status.as_str().to_string(),
            requires_procedures: visit.requires_procedures,
            requires_medicines: visit.requires_medicines,
            procedure_quotes: visit.procedure_quotes.into_iter().map(|q| q.into()).collect(),
            created_at: visit.created_at,
            updated_at: visit.updated_at,
        }
    }
}

/// FFI-safe board row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitOverview {
    pub visit: FfiVisit,
    pub patient_name: String,
    pub patient_phone: Option<String>,
    pub scheduled_time: Option<String>,
}

impl From<VisitOverview> for FfiVisitOverview {
    fn from(row: VisitOverview) -> Self {
        Self {
            visit: row.visit.into(),
            patient_name: row.patient_name,
            patient_phone: row.patient_phone,
            scheduled_time: row.scheduled_time,
        }
    }
}

/// FFI-safe workflow summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWorkflowSummary {
    pub waiting: u32,
    pub in_consultation: u32,
    pub admin_review: u32,
    pub procedures_pending: u32,
    pub pharmacy_pending: u32,
    pub completed: u32,
    pub billed: u32,
    pub total: u32,
}

impl From<WorkflowSummary> for FfiWorkflowSummary {
    fn from(summary: WorkflowSummary) -> Self {
        let total = summary.total();
        Self {
            waiting: summary.waiting,
            in_consultation: summary.in_consultation,
            admin_review: summary.admin_review,
            procedures_pending: summary.procedures_pending,
            pharmacy_pending: summary.pharmacy_pending,
            completed: summary.completed,
            billed: summary.billed,
            total,
        }
    }
}

/// FFI-safe status change.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatusChange {
    pub history_id: i64,
    pub visit_id: String,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: String,
    pub changed_at: String,
}

impl From<StatusChange> for FfiStatusChange {
    fn from(change: StatusChange) -> Self {
        Self {
            history_id: change.history_id,
            visit_id: change.visit_id,
            from_status: change.from_status.as_str().to_string(),
            to_status: change.to_status.as_str().to_string(),
            changed_by: change.changed_by,
            changed_at: change.changed_at,
        }
    }
}
