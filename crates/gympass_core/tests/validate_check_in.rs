use chrono::Duration;
use gympass_core::{
    CheckIn, CheckInRepository, CheckInService, CheckInServiceError, Clock,
    InMemoryCheckInRepository, InMemoryGymRepository, ManualClock,
};
use uuid::Uuid;

fn seeded(check_ins: &InMemoryCheckInRepository, clock: &ManualClock) -> CheckIn {
    let check_in = CheckIn::new(Uuid::new_v4(), Uuid::new_v4(), clock.now_ms());
    check_ins.create_check_in(&check_in).unwrap();
    check_in
}

#[test]
fn validate_sets_validated_at_within_window() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let clock = ManualClock::at_utc(2023, 1, 1, 13, 40);
    let created = seeded(&check_ins, &clock);
    let service = CheckInService::with_clock(&check_ins, &gyms, &clock);

    clock.advance(Duration::minutes(19));
    let validated = service.validate_check_in(created.id).unwrap();

    assert_eq!(validated.validated_at, Some(clock.now_ms()));
    assert_eq!(check_ins.items()[0].validated_at, Some(clock.now_ms()));
}

#[test]
fn validate_exactly_at_window_edge_succeeds() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let clock = ManualClock::at_utc(2023, 1, 1, 13, 40);
    let created = seeded(&check_ins, &clock);
    let service = CheckInService::with_clock(&check_ins, &gyms, &clock);

    clock.advance(Duration::minutes(20));
    assert!(service.validate_check_in(created.id).is_ok());
}

#[test]
fn validate_after_twenty_minutes_fails() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let clock = ManualClock::at_utc(2023, 1, 1, 13, 40);
    let created = seeded(&check_ins, &clock);
    let service = CheckInService::with_clock(&check_ins, &gyms, &clock);

    clock.advance(Duration::minutes(21));
    let err = service.validate_check_in(created.id).unwrap_err();

    assert!(matches!(
        err,
        CheckInServiceError::LateCheckInValidation { window_minutes: 20 }
    ));
    assert!(check_ins.items()[0].validated_at.is_none());
}

#[test]
fn validate_unknown_check_in_is_resource_not_found() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let service = CheckInService::new(&check_ins, &gyms);

    let err = service.validate_check_in(Uuid::new_v4()).unwrap_err();

    assert!(matches!(err, CheckInServiceError::CheckInNotFound(_)));
    assert!(err.is_resource_not_found());
}

#[test]
fn validate_twice_fails() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let clock = ManualClock::at_utc(2023, 1, 1, 13, 40);
    let created = seeded(&check_ins, &clock);
    let service = CheckInService::with_clock(&check_ins, &gyms, &clock);

    let first = service.validate_check_in(created.id).unwrap();
    clock.advance(Duration::minutes(1));
    let err = service.validate_check_in(created.id).unwrap_err();

    assert!(matches!(err, CheckInServiceError::AlreadyValidated(id) if id == created.id));
    assert_eq!(check_ins.items()[0].validated_at, first.validated_at);
}
