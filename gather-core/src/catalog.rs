//! Lifecycle of events and series on top of a [`Repository`].
//!
//! Keeps the series-ownership rules (an event belongs to at most one series)
//! and the cached `last_event_end` of each series in step with every edit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{GatherError, GatherResult};
use crate::event::Event;
use crate::feed::{Feed, build_feed};
use crate::membership::{EntityKind, Membership, MembershipController};
use crate::repository::Repository;
use crate::series::Series;

pub struct Catalog {
    repo: Arc<dyn Repository>,
    members: MembershipController,
}

impl Catalog {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        let members = MembershipController::new(repo.clone());
        Catalog { repo, members }
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    /// Join/quit for the entities of this catalog.
    pub fn membership(&self) -> &MembershipController {
        &self.members
    }

    // FEED:

    pub async fn feed(&self, now: DateTime<Utc>) -> GatherResult<Feed> {
        let events = self.repo.list_events().await?;
        let series = self.repo.list_series().await?;
        Ok(build_feed(now, &events, &series))
    }

    pub async fn personal_feed(&self, now: DateTime<Utc>, user_id: &str) -> GatherResult<Feed> {
        Ok(self.feed(now).await?.for_participant(user_id))
    }

    // EVENTS:

    pub async fn create_event(&self, event: Event) -> GatherResult<Event> {
        event.validate()?;
        self.repo.save_event(&event).await?;
        info!(id = %event.id, title = %event.title, "Created event");
        Ok(event)
    }

    /// Create `event` directly inside `series_id`. Nothing is left behind when
    /// the series is missing or not owned by the event owner.
    pub async fn create_event_in_series(
        &self,
        series_id: &str,
        event: Event,
    ) -> GatherResult<(Event, Series)> {
        let series = self.repo.get_series(series_id).await?;
        ensure_owner(&series, &event.owner)?;

        let event = self.create_event(event).await?;
        match self.attach_event(series_id, &event.id, &event.owner).await {
            Ok(series) => Ok((event, series)),
            Err(e) => {
                if let Err(cleanup) = self.repo.delete_event(&event.id).await {
                    warn!(id = %event.id, error = %cleanup, "Could not remove unattached event");
                }
                Err(e)
            }
        }
    }

    /// Move an event in time. Refreshes the cached end of its series, if any.
    pub async fn reschedule_event(
        &self,
        event_id: &str,
        actor: &str,
        start: DateTime<Utc>,
        duration_minutes: u32,
    ) -> GatherResult<Event> {
        let event = {
            let lock = self.members.lock_for(EntityKind::Event, event_id);
            let _guard = lock.lock().await;

            let mut event = self.repo.get_event(event_id).await?;
            ensure_owner(&event, actor)?;
            event.start = start;
            event.duration_minutes = duration_minutes;
            event.validate()?;
            self.repo.save_event(&event).await?;
            event
        };

        if let Some(series) = self.owning_series(event_id).await? {
            self.refresh_series(&series.id).await?;
        }
        Ok(event)
    }

    /// Delete an event and drop it from the series that owned it.
    pub async fn delete_event(&self, event_id: &str, actor: &str) -> GatherResult<()> {
        {
            let lock = self.members.lock_for(EntityKind::Event, event_id);
            let _guard = lock.lock().await;

            let event = self.repo.get_event(event_id).await?;
            ensure_owner(&event, actor)?;
            self.repo.delete_event(event_id).await?;
        }

        if let Some(series) = self.owning_series(event_id).await? {
            let lock = self.members.lock_for(EntityKind::Series, &series.id);
            let _guard = lock.lock().await;

            let mut series = self.repo.get_series(&series.id).await?;
            series.events.retain(|id| id != event_id);
            self.store_series_with_fresh_end(&mut series).await?;
        }
        info!(id = event_id, "Deleted event");
        Ok(())
    }

    // SERIES:

    /// Store a new series. Every owned event must exist, belong to the series
    /// owner and not be owned by another series.
    pub async fn create_series(&self, mut series: Series) -> GatherResult<Series> {
        series.validate()?;

        // Lock order: events sorted by id, then the series.
        let mut event_ids: Vec<&str> = series.events.iter().map(String::as_str).collect();
        event_ids.sort_unstable();
        let mut guards = Vec::with_capacity(event_ids.len() + 1);
        for event_id in event_ids {
            let lock = self.members.lock_for(EntityKind::Event, event_id);
            guards.push(lock.lock_owned().await);
        }
        let lock = self.members.lock_for(EntityKind::Series, &series.id);
        guards.push(lock.lock_owned().await);

        let all_series = self.repo.list_series().await?;
        for event_id in &series.events {
            let event = self.repo.get_event(event_id).await?;
            ensure_owner(&event, &series.owner)?;
            if let Some(other) = all_series.iter().find(|s| s.id != series.id && s.owns(event_id)) {
                return Err(GatherError::EventAlreadyInSeries {
                    event: event_id.clone(),
                    series: other.id.clone(),
                });
            }
        }

        self.store_series_with_fresh_end(&mut series).await?;
        drop(guards);

        info!(id = %series.id, title = %series.title, "Created series");
        Ok(series)
    }

    /// Hand `event_id` over to `series_id`. The actor must own both.
    pub async fn attach_event(
        &self,
        series_id: &str,
        event_id: &str,
        actor: &str,
    ) -> GatherResult<Series> {
        // Lock order: event, then series.
        let event_lock = self.members.lock_for(EntityKind::Event, event_id);
        let _event_guard = event_lock.lock().await;
        let lock = self.members.lock_for(EntityKind::Series, series_id);
        let _guard = lock.lock().await;

        let mut series = self.repo.get_series(series_id).await?;
        ensure_owner(&series, actor)?;
        let event = self.repo.get_event(event_id).await?;
        ensure_owner(&event, actor)?;

        if let Some(owner) = self.owning_series(event_id).await? {
            return Err(GatherError::EventAlreadyInSeries {
                event: event_id.to_string(),
                series: owner.id,
            });
        }

        series.events.push(event_id.to_string());
        self.store_series_with_fresh_end(&mut series).await?;
        info!(series = series_id, event = event_id, "Attached event");
        Ok(series)
    }

    /// Release `event_id` from `series_id`; the event becomes standalone.
    pub async fn detach_event(
        &self,
        series_id: &str,
        event_id: &str,
        actor: &str,
    ) -> GatherResult<Series> {
        let lock = self.members.lock_for(EntityKind::Series, series_id);
        let _guard = lock.lock().await;

        let mut series = self.repo.get_series(series_id).await?;
        ensure_owner(&series, actor)?;
        if !series.owns(event_id) {
            return Err(GatherError::EventNotInSeries {
                event: event_id.to_string(),
                series: series_id.to_string(),
            });
        }

        series.events.retain(|id| id != event_id);
        self.store_series_with_fresh_end(&mut series).await?;
        info!(series = series_id, event = event_id, "Detached event");
        Ok(series)
    }

    /// Delete a series. Its events are kept and become standalone.
    /// Returns the ids of the detached events.
    pub async fn delete_series(&self, series_id: &str, actor: &str) -> GatherResult<Vec<String>> {
        let lock = self.members.lock_for(EntityKind::Series, series_id);
        let _guard = lock.lock().await;

        let series = self.repo.get_series(series_id).await?;
        ensure_owner(&series, actor)?;
        self.repo.delete_series(series_id).await?;

        info!(id = series_id, detached = series.events.len(), "Deleted series");
        Ok(series.events)
    }

    /// Recompute and persist the cached end of `series_id`.
    pub async fn refresh_series(&self, series_id: &str) -> GatherResult<Series> {
        let lock = self.members.lock_for(EntityKind::Series, series_id);
        let _guard = lock.lock().await;

        let mut series = self.repo.get_series(series_id).await?;
        self.store_series_with_fresh_end(&mut series).await?;
        Ok(series)
    }

    pub async fn owning_series(&self, event_id: &str) -> GatherResult<Option<Series>> {
        let all_series = self.repo.list_series().await?;
        Ok(all_series.into_iter().find(|s| s.owns(event_id)))
    }

    async fn store_series_with_fresh_end(&self, series: &mut Series) -> GatherResult<()> {
        let mut owned = Vec::with_capacity(series.events.len());
        for event_id in &series.events {
            match self.repo.get_event(event_id).await {
                Ok(event) => owned.push(event),
                Err(GatherError::EventNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        let by_id: HashMap<&str, &Event> = owned.iter().map(|e| (e.id.as_str(), e)).collect();

        series.refresh_last_event_end(|id| by_id.get(id).copied());
        self.repo.save_series(series).await
    }
}

fn ensure_owner<E: Membership>(entity: &E, actor: &str) -> GatherResult<()> {
    if entity.owner() != actor {
        return Err(GatherError::NotOwner {
            id: entity.id().to_string(),
            user: actor.to_string(),
        });
    }
    Ok(())
}
