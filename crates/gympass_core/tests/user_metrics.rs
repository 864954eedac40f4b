use chrono::Duration;
use gympass_core::{
    CheckIn, CheckInRepository, CheckInService, Clock, InMemoryCheckInRepository,
    InMemoryGymRepository, ManualClock, MetricsService, PAGE_SIZE,
};
use uuid::Uuid;

#[test]
fn metrics_count_matches_created_check_ins() {
    let check_ins = InMemoryCheckInRepository::new();
    let user_id = Uuid::new_v4();
    let gym_id = Uuid::new_v4();
    check_ins
        .create_check_in(&CheckIn::new(gym_id, user_id, 1_000))
        .unwrap();
    check_ins
        .create_check_in(&CheckIn::new(gym_id, user_id, 2_000))
        .unwrap();
    check_ins
        .create_check_in(&CheckIn::new(gym_id, Uuid::new_v4(), 3_000))
        .unwrap();
    let service = MetricsService::new(&check_ins);

    let metrics = service.get_user_metrics(user_id).unwrap();

    assert_eq!(metrics.check_ins_count, 2);
    assert_eq!(
        service.get_user_metrics(Uuid::new_v4()).unwrap().check_ins_count,
        0
    );
}

#[test]
fn history_is_newest_first_and_paginated() {
    let check_ins = InMemoryCheckInRepository::new();
    let gyms = InMemoryGymRepository::new();
    let clock = ManualClock::at_utc(2023, 3, 1, 9, 0);
    let user_id = Uuid::new_v4();
    for _ in 0..22 {
        check_ins
            .create_check_in(&CheckIn::new(Uuid::new_v4(), user_id, clock.now_ms()))
            .unwrap();
        clock.advance(Duration::minutes(1));
    }
    let service = CheckInService::with_clock(&check_ins, &gyms, &clock);

    let first_page = service.fetch_user_check_ins_history(user_id, 1).unwrap();
    let second_page = service.fetch_user_check_ins_history(user_id, 2).unwrap();

    assert_eq!(first_page.len(), PAGE_SIZE as usize);
    assert_eq!(second_page.len(), 2);
    assert!(first_page
        .windows(2)
        .all(|pair| pair[0].created_at > pair[1].created_at));
    assert!(first_page.last().unwrap().created_at > second_page[0].created_at);
}
