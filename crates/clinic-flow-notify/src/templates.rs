//! Stage-change notification templates.
//!
//! One message per stage arrival, addressed to the role that should act
//! next. The wording matches the toast copy the clinic screens show.

use clinic_flow_core::models::{StaffRole, VisitStatus};

/// Role that should act when a visit arrives in `status`.
pub fn recipient_role(status: VisitStatus) -> StaffRole {
    match status {
        VisitStatus::Waiting | VisitStatus::InConsultation => StaffRole::Doctor,
        VisitStatus::AdminReview => StaffRole::Admin,
        VisitStatus::ProceduresPending => StaffRole::Attendant,
        VisitStatus::PharmacyPending => StaffRole::Pharmacist,
        VisitStatus::Completed | VisitStatus::Billed => StaffRole::Receptionist,
    }
}

/// Title and body for a stage-arrival toast.
pub fn stage_change_message(patient_name: &str, status: VisitStatus) -> (String, String) {
    match status {
        VisitStatus::Waiting => (
            "Patient waiting".to_string(),
            format!("{} has checked in and is waiting", patient_name),
        ),
        VisitStatus::InConsultation => (
            "Consultation started".to_string(),
            format!("{} is now in consultation", patient_name),
        ),
        VisitStatus::AdminReview => (
            "Review required".to_string(),
            format!("{} has quotes awaiting review", patient_name),
        ),
        VisitStatus::ProceduresPending => (
            "Procedures approved".to_string(),
            format!("Approved procedures for {} are ready to perform", patient_name),
        ),
        VisitStatus::PharmacyPending => (
            "Prescription ready".to_string(),
            format!("{} is waiting at the pharmacy", patient_name),
        ),
        VisitStatus::Completed => (
            "Visit completed".to_string(),
            format!("{} has completed all stages", patient_name),
        ),
        VisitStatus::Billed => (
            "Invoice raised".to_string(),
            format!("Billing is done for {}", patient_name),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recipient_routing() {
        assert_eq!(recipient_role(VisitStatus::Waiting), StaffRole::Doctor);
        assert_eq!(recipient_role(VisitStatus::AdminReview), StaffRole::Admin);
        assert_eq!(
            recipient_role(VisitStatus::ProceduresPending),
            StaffRole::Attendant
        );
        assert_eq!(
            recipient_role(VisitStatus::PharmacyPending),
            StaffRole::Pharmacist
        );
        assert_eq!(recipient_role(VisitStatus::Billed), StaffRole::Receptionist);
    }

    proptest! {
        #[test]
        fn message_always_names_the_patient(
            name in "[A-Za-z][A-Za-z .']{0,40}",
            idx in 0..VisitStatus::ALL.len(),
        ) {
            let status = VisitStatus::ALL[idx];
            let (title, body) = stage_change_message(&name, status);
            prop_assert!(!title.is_empty());
            prop_assert!(body.contains(&name));
        }
    }
}
