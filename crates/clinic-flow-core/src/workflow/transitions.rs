//! Transition legality for the visit status machine.
//!
//! The pipeline is a forward-only chain. The two record flags never remove
//! the chain edge; they only add skip edges:
//! `admin_review -> pharmacy_pending` when no procedures are required, and
//! `admin_review`/`procedures_pending -> completed` when no medicines are
//! required.

use crate::models::{VisitRecord, VisitStatus};

/// Legal next statuses from `status`, branch skips included.
pub fn next_statuses(
    status: VisitStatus,
    requires_procedures: bool,
    requires_medicines: bool,
) -> Vec<VisitStatus> {
    match status {
        VisitStatus::Waiting => vec![VisitStatus::InConsultation],
        VisitStatus::InConsultation => vec![VisitStatus::AdminReview],
        VisitStatus::AdminReview => {
            let mut next = vec![VisitStatus::ProceduresPending];
            if !requires_procedures {
                next.push(VisitStatus::PharmacyPending);
            }
            if !requires_medicines {
                next.push(VisitStatus::Completed);
            }
            next
        }
        VisitStatus::ProceduresPending => {
            let mut next = vec![VisitStatus::PharmacyPending];
            if !requires_medicines {
                next.push(VisitStatus::Completed);
            }
            next
        }
        VisitStatus::PharmacyPending => vec![VisitStatus::Completed],
        VisitStatus::Completed => vec![VisitStatus::Billed],
        VisitStatus::Billed => vec![],
    }
}

/// Whether `to` is reachable in one step from the record's current state.
pub fn is_legal(record: &VisitRecord, to: VisitStatus) -> bool {
    next_statuses(
        record.status,
        record.requires_procedures,
        record.requires_medicines,
    )
    .contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_edges_always_present() {
        // With both flags set, only the plain chain remains
        let pairs = [
            (VisitStatus::Waiting, VisitStatus::InConsultation),
            (VisitStatus::InConsultation, VisitStatus::AdminReview),
            (VisitStatus::AdminReview, VisitStatus::ProceduresPending),
            (VisitStatus::ProceduresPending, VisitStatus::PharmacyPending),
            (VisitStatus::PharmacyPending, VisitStatus::Completed),
            (VisitStatus::Completed, VisitStatus::Billed),
        ];
        for (from, to) in pairs {
            assert_eq!(next_statuses(from, true, true), vec![to]);
        }
        assert!(next_statuses(VisitStatus::Billed, true, true).is_empty());
    }

    #[test]
    fn test_admin_review_skips() {
        // No procedures: may skip straight to pharmacy
        let next = next_statuses(VisitStatus::AdminReview, false, true);
        assert!(next.contains(&VisitStatus::PharmacyPending));
        assert!(!next.contains(&VisitStatus::Completed));

        // No medicines either: may skip straight to completed
        let next = next_statuses(VisitStatus::AdminReview, false, false);
        assert!(next.contains(&VisitStatus::PharmacyPending));
        assert!(next.contains(&VisitStatus::Completed));
    }

    #[test]
    fn test_procedures_pending_skip() {
        let next = next_statuses(VisitStatus::ProceduresPending, true, false);
        assert!(next.contains(&VisitStatus::Completed));

        let next = next_statuses(VisitStatus::ProceduresPending, true, true);
        assert_eq!(next, vec![VisitStatus::PharmacyPending]);
    }

    #[test]
    fn test_no_backward_edges() {
        // Every edge moves strictly forward in pipeline order, so no
        // sequence of legal transitions can revisit a status.
        for from in VisitStatus::ALL {
            for rp in [false, true] {
                for rm in [false, true] {
                    for to in next_statuses(from, rp, rm) {
                        assert!(
                            to.pipeline_index() > from.pipeline_index(),
                            "backward edge {:?} -> {:?}",
                            from,
                            to
                        );
                    }
                }
            }
        }
    }
}
