//! Storage interface for events and series.
//!
//! Writes are last-write-wins. Anything that reads, modifies and writes back a
//! roster must go through [`crate::membership::MembershipController`].

mod file;
mod memory;

pub use file::FileRepository;
pub use memory::InMemoryRepository;

use async_trait::async_trait;

use crate::error::GatherResult;
use crate::event::Event;
use crate::series::Series;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_events(&self) -> GatherResult<Vec<Event>>;
    async fn list_series(&self) -> GatherResult<Vec<Series>>;

    /// Fails with `GatherError::EventNotFound` when `id` is unknown.
    async fn get_event(&self, id: &str) -> GatherResult<Event>;
    /// Fails with `GatherError::SeriesNotFound` when `id` is unknown.
    async fn get_series(&self, id: &str) -> GatherResult<Series>;

    async fn save_event(&self, event: &Event) -> GatherResult<()>;
    async fn save_series(&self, series: &Series) -> GatherResult<()>;

    async fn delete_event(&self, id: &str) -> GatherResult<()>;
    async fn delete_series(&self, id: &str) -> GatherResult<()>;
}
