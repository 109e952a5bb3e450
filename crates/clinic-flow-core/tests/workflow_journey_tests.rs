//! Golden journey tests for the workflow status tracker.
//!
//! Each scenario walks a visit through the pipeline the way the clinic staff
//! would and checks statuses, history, and summary along the way.

use anyhow::Result;

use clinic_flow_core::models::{
    Patient, ProcedureQuote, QuoteApproval, StaffRole, StaffSession, VisitRecord, VisitStatus,
};
use clinic_flow_core::workflow::{QuoteDecision, WorkflowError, WorkflowTracker};
use clinic_flow_core::Database;

fn session(role: StaffRole) -> StaffSession {
    StaffSession::new(
        format!("staff-{}", role.as_str()),
        format!("Test {}", role.as_str()),
        role,
    )
}

fn seed_visit(db: &Database) -> Result<VisitRecord> {
    let patient = Patient::new("Asha Rao".into(), Some("555-0101".into()));
    db.insert_patient(&patient)?;
    let visit = VisitRecord::new(patient.patient_id, None, "general".into());
    db.insert_visit(&visit)?;
    Ok(visit)
}

#[test]
fn full_journey_with_procedures_and_pharmacy() -> Result<()> {
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);

    let doctor = session(StaffRole::Doctor);
    tracker.update_status(&doctor, &visit.visit_id, VisitStatus::InConsultation)?;

    let quotes = vec![
        ProcedureQuote::new("Scaling".into(), 1500.0),
        ProcedureQuote::new("Root canal".into(), 8000.0),
    ];
    let quote_ids: Vec<String> = quotes.iter().map(|q| q.quote_id.clone()).collect();
    tracker.record_consultation_outcome(&doctor, &visit.visit_id, true, true, quotes)?;

    let admin = session(StaffRole::Admin);
    tracker.review_procedure_quotes(
        &admin,
        &visit.visit_id,
        &[
            QuoteDecision {
                quote_id: quote_ids[0].clone(),
                approval: QuoteApproval::Approved,
            },
            QuoteDecision {
                quote_id: quote_ids[1].clone(),
                approval: QuoteApproval::Approved,
            },
        ],
    )?;
    tracker.update_status(&admin, &visit.visit_id, VisitStatus::ProceduresPending)?;

    let attendant = session(StaffRole::Attendant);
    let mid = tracker.complete_procedure(&attendant, &visit.visit_id, &quote_ids[0], true, true)?;
    assert_eq!(mid.status, VisitStatus::ProceduresPending);
    assert_eq!(mid.unperformed_quote_count(), 1);

    let after =
        tracker.complete_procedure(&attendant, &visit.visit_id, &quote_ids[1], false, true)?;
    assert_eq!(after.status, VisitStatus::PharmacyPending);

    let pharmacist = session(StaffRole::Pharmacist);
    let done = tracker.complete_pharmacy(&pharmacist, &visit.visit_id)?;
    assert_eq!(done.status, VisitStatus::Completed);

    let receptionist = session(StaffRole::Receptionist);
    let billed = tracker.update_status(&receptionist, &visit.visit_id, VisitStatus::Billed)?;
    assert_eq!(billed.status, VisitStatus::Billed);

    // Every transition left exactly one history row
    let history = tracker.history(&visit.visit_id)?;
    let stages: Vec<VisitStatus> = history.iter().map(|h| h.to_status).collect();
    assert_eq!(
        stages,
        vec![
            VisitStatus::InConsultation,
            VisitStatus::AdminReview,
            VisitStatus::ProceduresPending,
            VisitStatus::PharmacyPending,
            VisitStatus::Completed,
            VisitStatus::Billed,
        ]
    );
    assert_eq!(history[0].changed_by, "staff-doctor");
    assert_eq!(history[5].changed_by, "staff-receptionist");

    Ok(())
}

#[test]
fn no_procedures_skips_to_pharmacy() -> Result<()> {
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);
    let doctor = session(StaffRole::Doctor);

    tracker.update_status(&doctor, &visit.visit_id, VisitStatus::InConsultation)?;
    tracker.record_consultation_outcome(&doctor, &visit.visit_id, false, true, vec![])?;

    let admin = session(StaffRole::Admin);
    let updated = tracker.update_status(&admin, &visit.visit_id, VisitStatus::PharmacyPending)?;
    assert_eq!(updated.status, VisitStatus::PharmacyPending);

    Ok(())
}

#[test]
fn no_procedures_no_medicines_skips_to_completed() -> Result<()> {
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);
    let doctor = session(StaffRole::Doctor);

    tracker.update_status(&doctor, &visit.visit_id, VisitStatus::InConsultation)?;
    tracker.record_consultation_outcome(&doctor, &visit.visit_id, false, false, vec![])?;

    let admin = session(StaffRole::Admin);
    let updated = tracker.update_status(&admin, &visit.visit_id, VisitStatus::Completed)?;
    assert_eq!(updated.status, VisitStatus::Completed);

    Ok(())
}

#[test]
fn completion_branching_follows_caller_flags() -> Result<()> {
    // requires_medicines = true branches to pharmacy
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);
    let doctor = session(StaffRole::Doctor);
    let attendant = session(StaffRole::Attendant);

    tracker.update_status(&doctor, &visit.visit_id, VisitStatus::InConsultation)?;
    let quote = ProcedureQuote::new("Dressing".into(), 300.0);
    let quote_id = quote.quote_id.clone();
    tracker.record_consultation_outcome(&doctor, &visit.visit_id, true, false, vec![quote])?;
    tracker.update_status(
        &session(StaffRole::Admin),
        &visit.visit_id,
        VisitStatus::ProceduresPending,
    )?;

    let updated = tracker.complete_procedure(&attendant, &visit.visit_id, &quote_id, false, true)?;
    assert_eq!(updated.status, VisitStatus::PharmacyPending);
    // The caller flag was persisted onto the record
    assert!(updated.requires_medicines);

    // requires_medicines = false goes straight to completed
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);

    tracker.update_status(&doctor, &visit.visit_id, VisitStatus::InConsultation)?;
    let quote = ProcedureQuote::new("Dressing".into(), 300.0);
    let quote_id = quote.quote_id.clone();
    tracker.record_consultation_outcome(&doctor, &visit.visit_id, true, true, vec![quote])?;
    tracker.update_status(
        &session(StaffRole::Admin),
        &visit.visit_id,
        VisitStatus::ProceduresPending,
    )?;

    let updated =
        tracker.complete_procedure(&attendant, &visit.visit_id, &quote_id, false, false)?;
    assert_eq!(updated.status, VisitStatus::Completed);
    assert!(!updated.requires_medicines);

    Ok(())
}

#[test]
fn illegal_jump_leaves_record_untouched() -> Result<()> {
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);
    let receptionist = session(StaffRole::Receptionist);

    let err = tracker
        .update_status(&receptionist, &visit.visit_id, VisitStatus::Billed)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::IllegalTransition { .. }));

    let stored = db.get_visit(&visit.visit_id)?.unwrap();
    assert_eq!(stored.status, VisitStatus::Waiting);
    assert!(tracker.history(&visit.visit_id)?.is_empty());

    Ok(())
}

#[test]
fn pharmacy_completion_requires_pharmacy_stage() -> Result<()> {
    let db = Database::open_in_memory()?;
    let visit = seed_visit(&db)?;
    let tracker = WorkflowTracker::new(&db);

    let err = tracker
        .complete_pharmacy(&session(StaffRole::Pharmacist), &visit.visit_id)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::IllegalTransition { .. }));

    Ok(())
}

#[test]
fn summary_counts_whole_board() -> Result<()> {
    let db = Database::open_in_memory()?;
    let tracker = WorkflowTracker::new(&db);

    // Empty dataset: all seven statuses present, all zero
    let summary = tracker.summary()?;
    for status in VisitStatus::ALL {
        assert_eq!(summary.count(status), 0);
    }
    assert_eq!(summary.total(), 0);

    let patient = Patient::new("Asha Rao".into(), None);
    db.insert_patient(&patient)?;
    for status in [
        VisitStatus::Waiting,
        VisitStatus::Waiting,
        VisitStatus::PharmacyPending,
        VisitStatus::Billed,
    ] {
        let mut visit = VisitRecord::new(patient.patient_id.clone(), None, "general".into());
        visit.status = status;
        db.insert_visit(&visit)?;
    }

    let summary = tracker.summary()?;
    assert_eq!(summary.waiting, 2);
    assert_eq!(summary.pharmacy_pending, 1);
    assert_eq!(summary.billed, 1);
    assert_eq!(summary.in_consultation, 0);
    assert_eq!(summary.total(), 4);

    Ok(())
}

#[test]
fn repeated_board_fetch_is_stable() -> Result<()> {
    let db = Database::open_in_memory()?;
    let patient = Patient::new("Asha Rao".into(), None);
    db.insert_patient(&patient)?;
    for _ in 0..5 {
        let visit = VisitRecord::new(patient.patient_id.clone(), None, "general".into());
        db.insert_visit(&visit)?;
    }

    let tracker = WorkflowTracker::new(&db);
    let first = tracker.list_patients(None, &[VisitStatus::Waiting])?;
    let second = tracker.list_patients(None, &[VisitStatus::Waiting])?;

    let first_ids: Vec<&str> = first.iter().map(|r| r.visit.visit_id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|r| r.visit.visit_id.as_str()).collect();
    assert_eq!(first.len(), 5);
    assert_eq!(first_ids, second_ids);

    Ok(())
}
