mod common;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use common::YieldingRepository;
use gather_core::repository::InMemoryRepository;
use gather_core::{Catalog, Event, EventKind, GatherError, Series};

fn at(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 2, h, 0, 0).unwrap()
}

fn catalog_with(event: &Event) -> Arc<Catalog> {
    let repo = YieldingRepository(InMemoryRepository::with(vec![event.clone()], vec![]));
    Arc::new(Catalog::new(Arc::new(repo)))
}

fn claiming(title: &str, event: &Event) -> Series {
    let mut series = Series::new(title, at(9), 8, "alice");
    series.events.push(event.id.clone());
    series
}

async fn owners_of(catalog: &Catalog, event: &Event) -> usize {
    let all = catalog.repository().list_series().await.unwrap();
    all.iter().filter(|s| s.owns(&event.id)).count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_series_cannot_claim_the_same_event() {
    let event = Event::new(EventKind::Sports, "Morning ride", at(10), 90, 8, "alice");
    let catalog = catalog_with(&event);

    let (a, b) = tokio::join!(
        {
            let catalog = catalog.clone();
            let series = claiming("Rides A", &event);
            tokio::spawn(async move { catalog.create_series(series).await })
        },
        {
            let catalog = catalog.clone();
            let series = claiming("Rides B", &event);
            tokio::spawn(async move { catalog.create_series(series).await })
        }
    );
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(GatherError::EventAlreadyInSeries { .. })))
    );
    assert_eq!(owners_of(&catalog, &event).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn create_and_attach_cannot_both_claim_an_event() {
    let event = Event::new(EventKind::Sports, "Morning ride", at(10), 90, 8, "alice");
    let catalog = catalog_with(&event);
    let existing = catalog
        .create_series(Series::new("Existing", at(9), 8, "alice"))
        .await
        .unwrap();

    let (created, attached) = tokio::join!(
        {
            let catalog = catalog.clone();
            let series = claiming("New", &event);
            tokio::spawn(async move { catalog.create_series(series).await.map(|_| ()) })
        },
        {
            let catalog = catalog.clone();
            let (series_id, event_id) = (existing.id.clone(), event.id.clone());
            tokio::spawn(async move {
                catalog
                    .attach_event(&series_id, &event_id, "alice")
                    .await
                    .map(|_| ())
            })
        }
    );
    let results = [created.unwrap(), attached.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(owners_of(&catalog, &event).await, 1);
}
