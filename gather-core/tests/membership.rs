mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::YieldingRepository;
use gather_core::repository::InMemoryRepository;
use gather_core::{Event, EventKind, Membership, MembershipController, MembershipError, Series};

fn football(max: u32) -> Event {
    let start = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
    Event::new(EventKind::Sports, "Football", start, 90, max, "owner")
}

fn controller_with(event: &Event, series: Vec<Series>) -> Arc<MembershipController> {
    let repo = YieldingRepository(InMemoryRepository::with(vec![event.clone()], series));
    Arc::new(MembershipController::new(Arc::new(repo)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_never_exceed_capacity() {
    const CAPACITY: u32 = 5;
    const JOINERS: usize = 20;

    let event = football(CAPACITY);
    let controller = controller_with(&event, vec![]);

    let mut handles = Vec::new();
    for i in 0..JOINERS {
        let controller = controller.clone();
        let event = event.clone();
        handles.push(tokio::spawn(async move {
            controller.join(&event, &format!("user-{i}")).await
        }));
    }

    let mut joined = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => joined += 1,
            Err(MembershipError::CapacityExceeded { max, .. }) => {
                assert_eq!(max, CAPACITY);
                full += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // The owner already holds one seat.
    assert_eq!(joined, CAPACITY as usize - 1);
    assert_eq!(full, JOINERS - joined);

    let stored = controller.repository().get_event(&event.id).await.unwrap();
    assert_eq!(stored.participants.len(), CAPACITY as usize);
    assert!(stored.validate().is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_users_race_for_the_last_seat() {
    let event = football(2);
    let controller = controller_with(&event, vec![]);

    let (a, b) = tokio::join!(
        {
            let controller = controller.clone();
            let event = event.clone();
            tokio::spawn(async move { controller.join(&event, "alice").await })
        },
        {
            let controller = controller.clone();
            let event = event.clone();
            tokio::spawn(async move { controller.join(&event, "bob").await })
        }
    );
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(MembershipError::CapacityExceeded { .. })))
            .count(),
        1
    );

    let stored = controller.repository().get_event(&event.id).await.unwrap();
    assert_eq!(stored.participants.len(), 2);
    assert_eq!(stored.participants[0], "owner");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_joins_and_quits_keep_invariant() {
    let start = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
    let series = Series::new("Sunday hikes", start, 3, "owner");
    let event = football(3);
    let controller = controller_with(&event, vec![series.clone()]);

    let mut handles = Vec::new();
    for round in 0..10 {
        for user in ["ann", "ben", "cat", "dan"] {
            let controller = controller.clone();
            let series = series.clone();
            handles.push(tokio::spawn(async move {
                if round % 2 == 0 {
                    controller.join(&series, user).await.map(|_| ())
                } else {
                    controller.quit(&series, user).await.map(|_| ())
                }
            }));
        }
    }
    for handle in handles {
        // Rejections are expected; only the invariant matters here.
        let _ = handle.await.unwrap();
        let stored = controller.repository().get_series(&series.id).await.unwrap();
        assert!(stored.participants.len() <= stored.max_participants() as usize);
        assert!(stored.is_participant("owner"));
    }
}

#[tokio::test]
async fn quit_by_stranger_is_rejected_without_mutation() {
    let event = football(4);
    let controller = controller_with(&event, vec![]);

    let result = controller.quit(&event, "stranger").await;

    assert!(matches!(result, Err(MembershipError::NotAMember { .. })));
    let stored = controller.repository().get_event(&event.id).await.unwrap();
    assert_eq!(stored.participants, vec!["owner"]);
}
