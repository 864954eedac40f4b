use chrono::Duration;
use gympass_core::{
    CheckInRequest, CheckInRules, CheckInService, CheckInServiceError, Clock, Gym,
    InMemoryCheckInRepository, InMemoryGymRepository, ManualClock,
};
use uuid::Uuid;

const GYM_LAT: f64 = -4.1722371;
const GYM_LON: f64 = -38.8623547;

struct Fixture {
    check_ins: InMemoryCheckInRepository,
    gyms: InMemoryGymRepository,
    clock: ManualClock,
    gym_id: Uuid,
    user_id: Uuid,
}

impl Fixture {
    fn new() -> Self {
        let gyms = InMemoryGymRepository::new();
        let gym = Gym::new("JavaScript Gym", GYM_LAT, GYM_LON);
        let gym_id = gym.id;
        gyms.insert(gym);

        Self {
            check_ins: InMemoryCheckInRepository::new(),
            gyms,
            clock: ManualClock::at_utc(2023, 1, 20, 8, 0),
            gym_id,
            user_id: Uuid::new_v4(),
        }
    }

    fn service(
        &self,
    ) -> CheckInService<&InMemoryCheckInRepository, &InMemoryGymRepository, &ManualClock> {
        CheckInService::with_clock(&self.check_ins, &self.gyms, &self.clock)
    }

    fn request_at(&self, gym_id: Uuid, latitude: f64, longitude: f64) -> CheckInRequest {
        CheckInRequest {
            user_id: self.user_id,
            gym_id,
            user_latitude: latitude,
            user_longitude: longitude,
        }
    }

    fn request(&self) -> CheckInRequest {
        self.request_at(self.gym_id, GYM_LAT, GYM_LON)
    }
}

#[test]
fn check_in_succeeds_next_to_gym() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let check_in = service.check_in(&fixture.request()).unwrap();

    assert!(!check_in.id.is_nil());
    assert_eq!(check_in.gym_id, fixture.gym_id);
    assert_eq!(check_in.user_id, fixture.user_id);
    assert_eq!(check_in.created_at, fixture.clock.now_ms());
    assert!(check_in.validated_at.is_none());
    assert_eq!(fixture.check_ins.items().len(), 1);
}

#[test]
fn check_in_twice_on_same_day_fails() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let first = service.check_in(&fixture.request()).unwrap();
    fixture.clock.advance(Duration::hours(10));
    let err = service.check_in(&fixture.request()).unwrap_err();

    assert!(matches!(
        err,
        CheckInServiceError::MaxNumberOfCheckInsReached { existing } if existing == first.id
    ));
    assert_eq!(fixture.check_ins.items().len(), 1);
}

#[test]
fn check_in_twice_on_different_days_succeeds() {
    let fixture = Fixture::new();
    let service = fixture.service();

    service.check_in(&fixture.request()).unwrap();
    fixture.clock.advance(Duration::days(1));
    service.check_in(&fixture.request()).unwrap();

    assert_eq!(fixture.check_ins.items().len(), 2);
}

#[test]
fn same_day_rule_is_scoped_per_gym() {
    let fixture = Fixture::new();
    let second_gym = Gym::new("TypeScript Gym", GYM_LAT, GYM_LON + 0.0001);
    let second_gym_id = second_gym.id;
    fixture.gyms.insert(second_gym);
    let service = fixture.service();

    service.check_in(&fixture.request()).unwrap();
    service
        .check_in(&fixture.request_at(second_gym_id, GYM_LAT, GYM_LON))
        .unwrap();

    assert_eq!(fixture.check_ins.items().len(), 2);
}

#[test]
fn check_in_at_distant_gym_fails() {
    let fixture = Fixture::new();
    let distant = Gym::new("Distant Gym", -4.0470753, -38.713181);
    let distant_id = distant.id;
    fixture.gyms.insert(distant);
    let service = fixture.service();

    let err = service
        .check_in(&fixture.request_at(distant_id, GYM_LAT, GYM_LON))
        .unwrap_err();

    match err {
        CheckInServiceError::MaxDistanceReached {
            distance_km,
            max_distance_km,
        } => {
            assert!(distance_km > 20.0);
            assert_eq!(max_distance_km, 0.1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(fixture.check_ins.items().is_empty());
}

#[test]
fn check_in_at_unknown_gym_is_resource_not_found() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let err = service
        .check_in(&fixture.request_at(Uuid::new_v4(), GYM_LAT, GYM_LON))
        .unwrap_err();

    assert!(err.is_resource_not_found());
}

#[test]
fn check_in_rejects_invalid_user_position() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let err = service
        .check_in(&fixture.request_at(fixture.gym_id, 120.0, GYM_LON))
        .unwrap_err();

    assert!(matches!(err, CheckInServiceError::Validation(_)));
}

#[test]
fn custom_rules_widen_the_distance_limit() {
    let fixture = Fixture::new();
    let service = fixture.service().with_rules(CheckInRules {
        max_distance_km: 1.0,
        ..CheckInRules::default()
    });

    // roughly 0.5 km north of the gym
    service
        .check_in(&fixture.request_at(fixture.gym_id, GYM_LAT + 0.0045, GYM_LON))
        .unwrap();
}

#[test]
fn default_rules_are_one_hundred_meters_and_twenty_minutes() {
    let fixture = Fixture::new();
    let rules = fixture.service().rules();

    assert_eq!(rules.max_distance_km, 0.1);
    assert_eq!(rules.validation_window, Duration::minutes(20));

    let widened = fixture.service().with_rules(CheckInRules {
        max_distance_km: 1.0,
        ..rules
    });
    assert_eq!(widened.rules().max_distance_km, 1.0);
    assert_eq!(widened.rules().validation_window, rules.validation_window);
}
