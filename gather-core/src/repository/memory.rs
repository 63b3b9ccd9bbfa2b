use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{GatherError, GatherResult};
use crate::event::Event;
use crate::repository::Repository;
use crate::series::Series;

/// Process-local repository backed by two maps.
#[derive(Default)]
pub struct InMemoryRepository {
    events: RwLock<HashMap<String, Event>>,
    series: RwLock<HashMap<String, Series>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(events: Vec<Event>, series: Vec<Series>) -> Self {
        InMemoryRepository {
            events: RwLock::new(events.into_iter().map(|e| (e.id.clone(), e)).collect()),
            series: RwLock::new(series.into_iter().map(|s| (s.id.clone(), s)).collect()),
        }
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_events(&self) -> GatherResult<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    async fn list_series(&self) -> GatherResult<Vec<Series>> {
        let mut series: Vec<Series> = self.series.read().await.values().cloned().collect();
        series.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(series)
    }

    async fn get_event(&self, id: &str) -> GatherResult<Event> {
        self.events
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GatherError::EventNotFound(id.to_string()))
    }

    async fn get_series(&self, id: &str) -> GatherResult<Series> {
        self.series
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GatherError::SeriesNotFound(id.to_string()))
    }

    async fn save_event(&self, event: &Event) -> GatherResult<()> {
        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn save_series(&self, series: &Series) -> GatherResult<()> {
        self.series
            .write()
            .await
            .insert(series.id.clone(), series.clone());
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> GatherResult<()> {
        self.events
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatherError::EventNotFound(id.to_string()))
    }

    async fn delete_series(&self, id: &str) -> GatherResult<()> {
        self.series
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatherError::SeriesNotFound(id.to_string()))
    }
}
