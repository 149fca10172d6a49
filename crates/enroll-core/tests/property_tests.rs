use enroll_core::prelude::*;
use enroll_core::duplicate::normalize;
use enroll_core::SHIFT_DAY;
use enroll_test_utils::{first_b1_day, partner_registration, setup_enrollment_with};
use proptest::prelude::*;
use std::collections::HashSet;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_sequential_submissions_never_overbook(capacity in 1..6u32, registrants in 0..12usize) {
        let accepted = block_on(async {
            let (store, enrollment) = setup_enrollment_with(EnrollConfig::new().with_capacity(capacity));
            let mut accepted = 0u32;
            for i in 0..registrants {
                match enrollment.submit(partner_registration(&format!("Pessoa {i}"))).await {
                    Ok(_) => accepted += 1,
                    Err(EnrollError::SlotFull { .. }) => {}
                    Err(other) => panic!("unexpected rejection: {other}"),
                }
            }
            let seats = enrollment.available_seats("B1", first_b1_day(), SHIFT_DAY).await.unwrap();
            (accepted, seats, store.len())
        });

        let (accepted, seats, stored) = accepted;
        let expected = capacity.min(u32::try_from(registrants).unwrap());
        prop_assert_eq!(accepted, expected);
        prop_assert_eq!(seats, capacity - expected);
        prop_assert_eq!(stored, 1 + expected as usize);
    }

    #[test]
    fn prop_no_two_rows_share_person_training_date(
        names in proptest::collection::vec(prop_oneof![
            Just("Ana Silva"),
            Just(" ana silva"),
            Just("ANA SILVA "),
            Just("Bruno Lima"),
            Just("bruno lima"),
        ], 0..10)
    ) {
        let rows = block_on(async {
            let (store, enrollment) = setup_enrollment_with(EnrollConfig::new().with_capacity(100));
            for name in &names {
                let _ = enrollment.submit(partner_registration(name)).await;
            }
            store.snapshot()
        });

        let mut seen = HashSet::new();
        for row in rows.iter().skip(1) {
            prop_assert!(seen.insert((normalize(&row[1]), normalize(&row[4]), row[5].clone())));
        }
        prop_assert!(rows.len() <= 3);
    }
}
