//! Directory-backed repository: one JSON document per entity.
//!
//! Layout:
//! ```text
//! <data_dir>/events/<id>.json
//! <data_dir>/series/<id>.json
//! ```
//!
//! Listing skips documents that cannot be parsed and logs a warning for each.
//! A skipped series no longer claims its events, so they show up in the feed
//! as standalone items until the series document is repaired.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{GatherError, GatherResult};
use crate::event::Event;
use crate::repository::Repository;
use crate::series::Series;

const EVENTS_DIR: &str = "events";
const SERIES_DIR: &str = "series";

pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileRepository { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, dir: &str, id: &str) -> GatherResult<PathBuf> {
        let is_plain = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_plain {
            return Err(GatherError::Invalid {
                kind: "id",
                id: id.to_string(),
                reason: "ids may only contain letters, digits, '-' and '_'".into(),
            });
        }
        Ok(self.root.join(dir).join(format!("{}.json", id)))
    }

    async fn read<T: DeserializeOwned>(path: &Path) -> GatherResult<Option<T>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file and rename, so readers never see a partial document.
    async fn write<T: Serialize>(path: &Path, value: &T) -> GatherResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(value)?;
        let temp = path.with_extension("json.tmp");

        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, path).await?;
        debug!(path = %path.display(), "Wrote document");
        Ok(())
    }

    async fn list<T: DeserializeOwned>(&self, dir: &str) -> GatherResult<Vec<T>> {
        let dir = self.root.join(dir);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        // Sort for deterministic output
        paths.sort();

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read::<T>(&path).await {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }
        Ok(items)
    }

    async fn remove(path: &Path) -> GatherResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn list_events(&self) -> GatherResult<Vec<Event>> {
        self.list(EVENTS_DIR).await
    }

    async fn list_series(&self) -> GatherResult<Vec<Series>> {
        self.list(SERIES_DIR).await
    }

    async fn get_event(&self, id: &str) -> GatherResult<Event> {
        let path = self.path_for(EVENTS_DIR, id)?;
        Self::read::<Event>(&path)
            .await?
            .ok_or_else(|| GatherError::EventNotFound(id.to_string()))
    }

    async fn get_series(&self, id: &str) -> GatherResult<Series> {
        let path = self.path_for(SERIES_DIR, id)?;
        Self::read::<Series>(&path)
            .await?
            .ok_or_else(|| GatherError::SeriesNotFound(id.to_string()))
    }

    async fn save_event(&self, event: &Event) -> GatherResult<()> {
        let path = self.path_for(EVENTS_DIR, &event.id)?;
        Self::write(&path, event).await
    }

    async fn save_series(&self, series: &Series) -> GatherResult<()> {
        let path = self.path_for(SERIES_DIR, &series.id)?;
        Self::write(&path, series).await
    }

    async fn delete_event(&self, id: &str) -> GatherResult<()> {
        let path = self.path_for(EVENTS_DIR, id)?;
        if !Self::remove(&path).await? {
            return Err(GatherError::EventNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_series(&self, id: &str) -> GatherResult<()> {
        let path = self.path_for(SERIES_DIR, id)?;
        if !Self::remove(&path).await? {
            return Err(GatherError::SeriesNotFound(id.to_string()));
        }
        Ok(())
    }
}
