//! Patient workflow status tracker.
//!
//! Owns the visit status field: validates every requested transition against
//! the legality table, persists it with a compare-and-swap on the expected
//! current status, and appends to the audit trail. Also answers the two read
//! questions the boards ask: "who is where" and "how many in each stage".

mod transitions;

pub use transitions::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{Database, DbError};
use crate::models::{
    ProcedureQuote, QuoteApproval, StaffSession, StatusChange, VisitOverview, VisitRecord,
    VisitStatus,
};

/// Workflow errors.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Visit not found: {0}")]
    VisitNotFound(String),

    #[error("Illegal transition {from:?} -> {to:?}")]
    IllegalTransition { from: VisitStatus, to: VisitStatus },

    #[error("Visit {0} changed concurrently; reload and retry")]
    StatusConflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Per-status record counts for dashboard tiles.
///
/// Every status is always present; statuses with no records count zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub waiting: u32,
    pub in_consultation: u32,
    pub admin_review: u32,
    pub procedures_pending: u32,
    pub pharmacy_pending: u32,
    pub completed: u32,
    pub billed: u32,
}

impl WorkflowSummary {
    /// Count for one status.
    pub fn count(&self, status: VisitStatus) -> u32 {
        match status {
            VisitStatus::Waiting => self.waiting,
            VisitStatus::InConsultation => self.in_consultation,
            VisitStatus::AdminReview => self.admin_review,
            VisitStatus::ProceduresPending => self.procedures_pending,
            VisitStatus::PharmacyPending => self.pharmacy_pending,
            VisitStatus::Completed => self.completed,
            VisitStatus::Billed => self.billed,
        }
    }

    fn count_mut(&mut self, status: VisitStatus) -> &mut u32 {
        match status {
            VisitStatus::Waiting => &mut self.waiting,
            VisitStatus::InConsultation => &mut self.in_consultation,
            VisitStatus::AdminReview => &mut self.admin_review,
            VisitStatus::ProceduresPending => &mut self.procedures_pending,
            VisitStatus::PharmacyPending => &mut self.pharmacy_pending,
            VisitStatus::Completed => &mut self.completed,
            VisitStatus::Billed => &mut self.billed,
        }
    }

    /// Total records across all statuses.
    pub fn total(&self) -> u32 {
        VisitStatus::ALL.iter().map(|s| self.count(*s)).sum()
    }
}

/// An admin decision on one quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteDecision {
    /// Quote being decided
    pub quote_id: String,
    /// The decision
    pub approval: QuoteApproval,
}

/// Tracks visit statuses and produces role-scoped board views.
pub struct WorkflowTracker<'a> {
    db: &'a Database,
}

impl<'a> WorkflowTracker<'a> {
    /// Create a new tracker.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Board rows for one session, per its role's visibility table.
    pub fn board(
        &self,
        session: &StaffSession,
        all_patients: bool,
        department: Option<&str>,
    ) -> WorkflowResult<Vec<VisitOverview>> {
        self.list_patients(department, session.visible_statuses(all_patients))
    }

    /// All visits in the given statuses, with patient display fields joined.
    /// `department = None` means all departments.
    pub fn list_patients(
        &self,
        department: Option<&str>,
        statuses: &[VisitStatus],
    ) -> WorkflowResult<Vec<VisitOverview>> {
        Ok(self.db.list_visits_by_status(department, statuses)?)
    }

    /// Move a visit to a new status.
    pub fn update_status(
        &self,
        session: &StaffSession,
        visit_id: &str,
        new_status: VisitStatus,
    ) -> WorkflowResult<VisitRecord> {
        let visit = self.get_visit(visit_id)?;
        self.transition(session, &visit, new_status)
    }

    /// Store the consultation outcome, then move to admin review.
    ///
    /// Flags and quotes are written before the transition so the skip edges
    /// the admin sees match what was recorded here.
    pub fn record_consultation_outcome(
        &self,
        session: &StaffSession,
        visit_id: &str,
        requires_procedures: bool,
        requires_medicines: bool,
        quotes: Vec<ProcedureQuote>,
    ) -> WorkflowResult<VisitRecord> {
        if !requires_procedures && !quotes.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "procedure quotes supplied without requires_procedures".into(),
            ));
        }
        if requires_procedures && quotes.is_empty() {
            return Err(WorkflowError::InvalidRequest(
                "requires_procedures set but no quotes supplied".into(),
            ));
        }

        let mut visit = self.get_visit(visit_id)?;
        if visit.status != VisitStatus::InConsultation {
            return Err(WorkflowError::IllegalTransition {
                from: visit.status,
                to: VisitStatus::AdminReview,
            });
        }

        self.db
            .set_visit_flags_and_quotes(visit_id, requires_procedures, requires_medicines, &quotes)?;
        visit.requires_procedures = requires_procedures;
        visit.requires_medicines = requires_medicines;
        visit.procedure_quotes = quotes;

        self.transition(session, &visit, VisitStatus::AdminReview)
    }

    /// Admin decisions on individual quotes while the visit is in review.
    pub fn review_procedure_quotes(
        &self,
        session: &StaffSession,
        visit_id: &str,
        decisions: &[QuoteDecision],
    ) -> WorkflowResult<VisitRecord> {
        let mut visit = self.get_visit(visit_id)?;
        if visit.status != VisitStatus::AdminReview {
            return Err(WorkflowError::InvalidRequest(format!(
                "quotes can only be reviewed in admin_review, visit is {}",
                visit.status.as_str()
            )));
        }

        for decision in decisions {
            let quote = visit
                .procedure_quotes
                .iter_mut()
                .find(|q| q.quote_id == decision.quote_id)
                .ok_or_else(|| {
                    WorkflowError::InvalidRequest(format!("unknown quote: {}", decision.quote_id))
                })?;
            quote.approval = decision.approval;
        }

        self.db.set_visit_quotes(visit_id, &visit.procedure_quotes)?;
        info!(
            "{} reviewed {} quote(s) on visit {}",
            session.staff_id,
            decisions.len(),
            visit_id
        );
        self.get_visit(visit_id)
    }

    /// Mark one procedure performed; optionally leave the procedure stage.
    ///
    /// When `more_pending` is false, the branch taken comes from the
    /// caller-supplied `requires_medicines` (also persisted onto the record):
    /// pharmacy when medicines are needed, completed otherwise.
    pub fn complete_procedure(
        &self,
        session: &StaffSession,
        visit_id: &str,
        quote_id: &str,
        more_pending: bool,
        requires_medicines: bool,
    ) -> WorkflowResult<VisitRecord> {
        let mut visit = self.get_visit(visit_id)?;
        if visit.status != VisitStatus::ProceduresPending {
            return Err(WorkflowError::InvalidRequest(format!(
                "procedure completion only valid in procedures_pending, visit is {}",
                visit.status.as_str()
            )));
        }

        let quote = visit
            .procedure_quotes
            .iter_mut()
            .find(|q| q.quote_id == quote_id)
            .ok_or_else(|| WorkflowError::InvalidRequest(format!("unknown quote: {}", quote_id)))?;
        quote.performed = true;

        self.db.set_visit_quotes(visit_id, &visit.procedure_quotes)?;
        self.db.set_requires_medicines(visit_id, requires_medicines)?;
        visit.requires_medicines = requires_medicines;

        if more_pending {
            debug!(
                "procedure {} done on visit {}, more pending",
                quote_id, visit_id
            );
            return self.get_visit(visit_id);
        }

        let next = if requires_medicines {
            VisitStatus::PharmacyPending
        } else {
            VisitStatus::Completed
        };
        self.transition(session, &visit, next)
    }

    /// Dispense done: unconditional pharmacy -> completed.
    pub fn complete_pharmacy(
        &self,
        session: &StaffSession,
        visit_id: &str,
    ) -> WorkflowResult<VisitRecord> {
        let visit = self.get_visit(visit_id)?;
        if visit.status != VisitStatus::PharmacyPending {
            return Err(WorkflowError::IllegalTransition {
                from: visit.status,
                to: VisitStatus::Completed,
            });
        }
        self.transition(session, &visit, VisitStatus::Completed)
    }

    /// Counts per status for dashboard tiles, zero-filled.
    pub fn summary(&self) -> WorkflowResult<WorkflowSummary> {
        let mut summary = WorkflowSummary::default();
        for (status, count) in self.db.count_visits_by_status()? {
            *summary.count_mut(status) = count;
        }
        Ok(summary)
    }

    /// Status history for one visit, oldest first.
    pub fn history(&self, visit_id: &str) -> WorkflowResult<Vec<StatusChange>> {
        self.get_visit(visit_id)?;
        Ok(self.db.list_status_history(visit_id)?)
    }

    fn get_visit(&self, visit_id: &str) -> WorkflowResult<VisitRecord> {
        self.db
            .get_visit(visit_id)?
            .ok_or_else(|| WorkflowError::VisitNotFound(visit_id.to_string()))
    }

    /// Validate, compare-and-swap, record history, re-read.
    fn transition(
        &self,
        session: &StaffSession,
        visit: &VisitRecord,
        new_status: VisitStatus,
    ) -> WorkflowResult<VisitRecord> {
        debug!(
            "Validating status transition from {:?} to {:?} on visit {}",
            visit.status, new_status, visit.visit_id
        );

        if !transitions::is_legal(visit, new_status) {
            warn!(
                "Invalid status transition attempted: {:?} -> {:?} on visit {}",
                visit.status, new_status, visit.visit_id
            );
            return Err(WorkflowError::IllegalTransition {
                from: visit.status,
                to: new_status,
            });
        }

        let swapped = self
            .db
            .set_visit_status(&visit.visit_id, visit.status, new_status)?;
        if !swapped {
            // Row gone, or another editor moved the status since our read.
            return match self.db.get_visit(&visit.visit_id)? {
                Some(_) => Err(WorkflowError::StatusConflict(visit.visit_id.clone())),
                None => Err(WorkflowError::VisitNotFound(visit.visit_id.clone())),
            };
        }

        self.db.record_status_change(
            &visit.visit_id,
            visit.status,
            new_status,
            &session.staff_id,
        )?;
        info!(
            "Visit {} moved {:?} -> {:?} by {}",
            visit.visit_id, visit.status, new_status, session.staff_id
        );

        self.get_visit(&visit.visit_id)
    }
}
