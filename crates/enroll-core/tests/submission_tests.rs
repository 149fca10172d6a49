use enroll_core::prelude::*;
use enroll_core::{RejectionReason, SHIFT_DAY};
use enroll_store::{StoreAdapter, StoreError};
use enroll_test_utils::{
    cells, date, fast_retry, first_b1_day, init_test_tracing, internal_registration, partner_registration,
    rows_with_header, setup_enrollment, setup_enrollment_with, FailingStore, FlakyStore,
};
use pretty_assertions::assert_eq;

const B2: &str = "B2 - Substituir Cavaletes de Impacto articulado e rolos na mesa de impacto";

fn stored(name: &str, training: &str, date: &str, shift: &str) -> Vec<String> {
    cells(&["Parceira", name, "", "Usimig", training, date, shift, "Turno D"])
}

#[tokio::test]
async fn test_accepts_into_empty_store() {
    init_test_tracing();
    let (store, enrollment) = setup_enrollment();

    let accepted = enrollment
        .submit(internal_registration("Ana Silva", "12345678"))
        .await
        .unwrap();

    assert_eq!(accepted.seats_left, 3);
    assert_eq!(store.len(), 2);
    let seats = enrollment
        .available_seats("B1", first_b1_day(), SHIFT_DAY)
        .await
        .unwrap();
    assert_eq!(seats, 3);
}

#[tokio::test]
async fn test_fifth_registrant_finds_slot_full() {
    let store = MemoryStore::with_rows(rows_with_header(
        ["Ana", "Bia", "Caio", "Davi"]
            .iter()
            .map(|name| stored(name, "B1 - Substituir Caçamba Recuperadora Tipo Ponte", "2025-09-22", SHIFT_DAY)),
    ));
    let enrollment = Enrollment::new(store.clone(), EnrollConfig::new());

    let err = enrollment.submit(partner_registration("Eva")).await.unwrap_err();

    assert_eq!(
        err,
        EnrollError::SlotFull {
            date: first_b1_day(),
            shift: SHIFT_DAY.to_string()
        }
    );
    assert_eq!(err.reason(), RejectionReason::SlotFull);
    assert_eq!(store.len(), 5);
}

#[tokio::test]
async fn test_duplicate_ignores_case_and_padding() {
    let store = MemoryStore::with_rows(rows_with_header([stored(
        "Ana Silva",
        B2,
        "2025-10-02",
        SHIFT_DAY,
    )]));
    let enrollment = Enrollment::new(store.clone(), EnrollConfig::new());

    let mut again = partner_registration(" ana silva ");
    again.training_id = "B2".to_string();
    again.session_date = date(2025, 10, 2);

    let err = enrollment.submit(again).await.unwrap_err();
    assert!(matches!(err, EnrollError::DuplicateRegistration { .. }));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_duplicate_matches_training_stored_by_code() {
    let store = MemoryStore::with_rows(rows_with_header([stored(
        "Ana Silva",
        "B2",
        "2025-10-02",
        SHIFT_DAY,
    )]));
    let enrollment = Enrollment::new(store.clone(), EnrollConfig::new());

    let mut again = partner_registration(" ana silva ");
    again.training_id = "B2".to_string();
    again.session_date = date(2025, 10, 2);

    let err = enrollment.submit(again).await.unwrap_err();
    assert!(matches!(err, EnrollError::DuplicateRegistration { .. }));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_submit_sees_rows_written_by_another_instance() {
    let store = std::sync::Arc::new(MemoryStore::with_rows(vec![enroll_core::header_row()]));
    let desk_a = Enrollment::new(store.clone(), EnrollConfig::new());
    let desk_b = Enrollment::new(store.clone(), EnrollConfig::new());

    // desk A renders the form and caches an empty slot
    assert_eq!(desk_a.available_seats("B1", first_b1_day(), SHIFT_DAY).await.unwrap(), 4);

    for name in ["Ana", "Bia", "Caio", "Davi"] {
        desk_b.submit(partner_registration(name)).await.unwrap();
    }

    let err = desk_a.submit(partner_registration("Eva")).await.unwrap_err();
    assert!(matches!(err, EnrollError::SlotFull { .. }));
    assert_eq!(store.len(), 5);
    assert_eq!(desk_a.available_seats("B1", first_b1_day(), SHIFT_DAY).await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_written_by_another_instance_is_rejected() {
    let store = std::sync::Arc::new(MemoryStore::with_rows(vec![enroll_core::header_row()]));
    let desk_a = Enrollment::new(store.clone(), EnrollConfig::new());
    let desk_b = Enrollment::new(store.clone(), EnrollConfig::new());

    assert_eq!(desk_a.read_all_rows().await.unwrap().len(), 1);
    desk_b.submit(partner_registration("Ana Silva")).await.unwrap();

    let err = desk_a.submit(partner_registration("ana silva")).await.unwrap_err();
    assert!(matches!(err, EnrollError::DuplicateRegistration { .. }));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_invalid_input_never_touches_store() {
    let (store, enrollment) = setup_enrollment();

    let err = enrollment
        .submit(internal_registration("Ana Silva", "123"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrollError::InvalidInput(_)));
    assert_eq!(store.stats().total(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_write_failures_are_retried() {
    let store = FlakyStore::transient(2);
    let enrollment = Enrollment::new(store, EnrollConfig::new());

    let accepted = enrollment.submit(partner_registration("Bruno Lima")).await;

    assert!(accepted.is_ok());
    let store = enrollment.adapter().store();
    assert_eq!(store.append_calls(), 3);
    let names: Vec<_> = store.rows().iter().skip(1).map(|r| r[1].clone()).collect();
    assert_eq!(names, vec!["Bruno Lima".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_fail_the_write() {
    let config = EnrollConfig::new().with_retry(fast_retry());
    let enrollment = Enrollment::new(FlakyStore::transient(10), config);

    let err = enrollment.submit(partner_registration("Bruno Lima")).await.unwrap_err();

    assert_eq!(
        err,
        EnrollError::StoreWriteFailed(StoreError::Transient("backend error".to_string()))
    );
    assert!(err.is_retryable());
    assert_eq!(enrollment.adapter().store().append_calls(), 3);
    assert_eq!(enrollment.adapter().store().rows().len(), 1);
}

#[tokio::test]
async fn test_permission_error_is_not_retried() {
    let store = FlakyStore::failing_with(1, StoreError::Denied("read-only".to_string()));
    let enrollment = Enrollment::new(store, EnrollConfig::new());

    let err = enrollment.submit(partner_registration("Bruno Lima")).await.unwrap_err();

    assert!(matches!(err, EnrollError::StoreWriteFailed(StoreError::Denied(_))));
    assert_eq!(enrollment.adapter().store().append_calls(), 1);
}

#[tokio::test]
async fn test_unreadable_store_rejects_without_writing() {
    let enrollment = Enrollment::new(
        FailingStore::new(StoreError::Unavailable("connection refused".to_string())),
        EnrollConfig::new(),
    );

    let err = enrollment.submit(partner_registration("Bruno Lima")).await.unwrap_err();
    assert!(matches!(err, EnrollError::StoreUnavailable(_)));
    assert_eq!(err.reason(), RejectionReason::StoreUnavailable);
    assert!(enrollment.adapter().store().writes().is_empty());

    let err = enrollment
        .available_seats("B1", first_b1_day(), SHIFT_DAY)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollError::StoreUnavailable(_)));
}

#[tokio::test]
async fn test_same_person_other_date_is_accepted() {
    let (_, enrollment) = setup_enrollment();
    enrollment.submit(partner_registration("Bruno Lima")).await.unwrap();

    let mut next_week = partner_registration("Bruno Lima");
    next_week.session_date = date(2025, 9, 29);
    assert!(enrollment.submit(next_week).await.is_ok());

    let again = enrollment.submit(partner_registration("BRUNO LIMA")).await;
    assert!(matches!(again, Err(EnrollError::DuplicateRegistration { .. })));
}

#[tokio::test]
async fn test_trainings_on_one_slot_share_seats() {
    let source = r#"
        capacity = 2

        [catalog.teams]
        internal = ["Gerência de Pátio"]
        partner = ["Usimig"]

        [[catalog.trainings]]
        code = "T1"
        title = "T1 - Correias"

        [[catalog.trainings.shifts]]
        label = "ADM (09-16h)"
        dates = ["2025-09-22"]

        [[catalog.trainings]]
        code = "T2"
        title = "T2 - Freios"

        [[catalog.trainings.shifts]]
        label = "ADM (09-16h)"
        dates = ["2025-09-22"]
    "#;
    let config = EnrollConfig::from_toml_str(source).unwrap().with_retry(fast_retry());
    let (_, enrollment) = setup_enrollment_with(config);

    for name in ["Ana", "Bia"] {
        let mut registration = partner_registration(name);
        registration.training_id = "T1".to_string();
        enrollment.submit(registration).await.unwrap();
    }

    let mut other_training = partner_registration("Caio");
    other_training.training_id = "T2".to_string();
    let err = enrollment.submit(other_training).await.unwrap_err();
    assert!(matches!(err, EnrollError::SlotFull { .. }));
    assert_eq!(enrollment.available_seats("T2", first_b1_day(), SHIFT_DAY).await.unwrap(), 0);
}

#[tokio::test]
async fn test_arc_store_is_shared_between_adapters() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let writer = Enrollment::new(store.clone(), EnrollConfig::new());
    writer.ensure_header().await.unwrap();
    writer.submit(partner_registration("Bruno Lima")).await.unwrap();

    let reader = StoreAdapter::new(store);
    assert_eq!(reader.read_all_rows().await.unwrap().len(), 2);
}
