//! Property tests for the workflow status machine.

use proptest::prelude::*;

use clinic_flow_core::models::{Patient, StaffRole, StaffSession, VisitRecord, VisitStatus};
use clinic_flow_core::workflow::{next_statuses, WorkflowError, WorkflowTracker};
use clinic_flow_core::Database;

fn seed_visit_at(db: &Database, status: VisitStatus, rp: bool, rm: bool) -> VisitRecord {
    let patient = Patient::new("Asha Rao".into(), None);
    db.insert_patient(&patient).unwrap();
    let mut visit = VisitRecord::new(patient.patient_id, None, "general".into());
    visit.status = status;
    visit.requires_procedures = rp;
    visit.requires_medicines = rm;
    db.insert_visit(&visit).unwrap();
    visit
}

fn any_status() -> impl Strategy<Value = VisitStatus> {
    (0..VisitStatus::ALL.len()).prop_map(|i| VisitStatus::ALL[i])
}

proptest! {
    /// Every (from, to) pair outside the edge table is rejected without
    /// touching stored state; every pair inside it succeeds.
    #[test]
    fn transition_legality_grid(
        from in any_status(),
        to in any_status(),
        rp in any::<bool>(),
        rm in any::<bool>(),
    ) {
        let db = Database::open_in_memory().unwrap();
        let visit = seed_visit_at(&db, from, rp, rm);
        let tracker = WorkflowTracker::new(&db);
        let session = StaffSession::new("staff-1".into(), "Tester".into(), StaffRole::Admin);

        let legal = next_statuses(from, rp, rm).contains(&to);
        let result = tracker.update_status(&session, &visit.visit_id, to);

        if legal {
            let updated = result.unwrap();
            prop_assert_eq!(updated.status, to);
        } else {
            prop_assert!(matches!(result, Err(WorkflowError::IllegalTransition { .. })), "expected IllegalTransition");
            let stored = db.get_visit(&visit.visit_id).unwrap().unwrap();
            prop_assert_eq!(stored.status, from);
            prop_assert!(tracker.history(&visit.visit_id).unwrap().is_empty());
        }
    }

    /// No walk over legal edges ever revisits a status.
    #[test]
    fn legal_walks_are_forward_only(
        rp in any::<bool>(),
        rm in any::<bool>(),
        choices in proptest::collection::vec(any::<prop::sample::Index>(), 7),
    ) {
        let mut current = VisitStatus::Waiting;
        let mut seen = vec![current];

        for choice in choices {
            let next = next_statuses(current, rp, rm);
            if next.is_empty() {
                break;
            }
            current = *choice.get(&next);
            prop_assert!(!seen.contains(&current), "revisited {:?}", current);
            seen.push(current);
        }
    }

    /// The summary always covers all seven statuses and sums to the total
    /// record count.
    #[test]
    fn summary_is_complete(
        statuses in proptest::collection::vec(any_status(), 0..30),
    ) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Asha Rao".into(), None);
        db.insert_patient(&patient).unwrap();

        for status in &statuses {
            let mut visit = VisitRecord::new(patient.patient_id.clone(), None, "general".into());
            visit.status = *status;
            db.insert_visit(&visit).unwrap();
        }

        let summary = WorkflowTracker::new(&db).summary().unwrap();
        prop_assert_eq!(summary.total() as usize, statuses.len());
        for status in VisitStatus::ALL {
            let expected = statuses.iter().filter(|s| **s == status).count();
            prop_assert_eq!(summary.count(status) as usize, expected);
        }
    }
}
