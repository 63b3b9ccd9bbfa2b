use async_trait::async_trait;
use gather_core::repository::{InMemoryRepository, Repository};
use gather_core::{Event, GatherResult, Series};

/// Yields between every read and write so that unserialized edits would interleave.
pub struct YieldingRepository(pub InMemoryRepository);

#[async_trait]
impl Repository for YieldingRepository {
    async fn list_events(&self) -> GatherResult<Vec<Event>> {
        self.0.list_events().await
    }

    async fn list_series(&self) -> GatherResult<Vec<Series>> {
        let series = self.0.list_series().await;
        tokio::task::yield_now().await;
        series
    }

    async fn get_event(&self, id: &str) -> GatherResult<Event> {
        let event = self.0.get_event(id).await;
        tokio::task::yield_now().await;
        event
    }

    async fn get_series(&self, id: &str) -> GatherResult<Series> {
        let series = self.0.get_series(id).await;
        tokio::task::yield_now().await;
        series
    }

    async fn save_event(&self, event: &Event) -> GatherResult<()> {
        tokio::task::yield_now().await;
        self.0.save_event(event).await
    }

    async fn save_series(&self, series: &Series) -> GatherResult<()> {
        tokio::task::yield_now().await;
        self.0.save_series(series).await
    }

    async fn delete_event(&self, id: &str) -> GatherResult<()> {
        self.0.delete_event(id).await
    }

    async fn delete_series(&self, id: &str) -> GatherResult<()> {
        self.0.delete_series(id).await
    }
}
