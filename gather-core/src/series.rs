//! Series: a recurring group of events sharing one roster.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GatherError, GatherResult};
use crate::event::{Event, Visibility};
use crate::membership::validate_roster;
use crate::time::Span;

/// A recurring activity made of owned events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Recorded start, independent of the owned events
    pub start: DateTime<Utc>,
    /// Owned event ids. An event belongs to at most one series.
    pub events: Vec<String>,

    pub participants: Vec<String>,
    pub max_participants: u32,
    pub visibility: Visibility,
    pub owner: String,

    /// End of the chronologically last owned event (`start` when there are none)
    pub last_event_end: DateTime<Utc>,
}

/// An owned event id that no longer resolves to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub series_id: String,
    pub event_id: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "series '{}' references missing event '{}'",
            self.series_id, self.event_id
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanResolution {
    pub span: Span,
    pub dangling: Vec<DanglingReference>,
}

impl Series {
    pub fn new(title: &str, start: DateTime<Utc>, max_participants: u32, owner: &str) -> Self {
        Series {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: String::new(),
            start,
            events: Vec::new(),
            participants: vec![owner.to_string()],
            max_participants,
            visibility: Visibility::Public,
            owner: owner.to_string(),
            last_event_end: start,
        }
    }

    pub fn owns(&self, event_id: &str) -> bool {
        self.events.iter().any(|id| id == event_id)
    }

    /// Resolve the (start, end) window from the owned events.
    ///
    /// The end is the latest end among the owned events that `lookup` can find.
    /// Ids it cannot find are skipped and reported back.
    pub fn resolve_span<'a, F>(&self, lookup: F) -> SpanResolution
    where
        F: Fn(&str) -> Option<&'a Event>,
    {
        let mut end: Option<DateTime<Utc>> = None;
        let mut dangling = Vec::new();

        for event_id in &self.events {
            match lookup(event_id) {
                Some(event) => {
                    let event_end = event.end();
                    end = Some(end.map_or(event_end, |e| e.max(event_end)));
                }
                None => {
                    warn!(series = %self.id, event = %event_id, "Skipping dangling event reference");
                    dangling.push(DanglingReference {
                        series_id: self.id.clone(),
                        event_id: event_id.clone(),
                    });
                }
            }
        }

        SpanResolution {
            span: Span::new(self.start, end.unwrap_or(self.start)),
            dangling,
        }
    }

    /// Recompute the cached `last_event_end`. Returns true if it changed.
    pub fn refresh_last_event_end<'a, F>(&mut self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<&'a Event>,
    {
        let end = self.resolve_span(lookup).span.end;
        let changed = end != self.last_event_end;
        self.last_event_end = end;
        changed
    }

    /// Span from the cached end, without touching the owned events.
    pub fn cached_span(&self) -> Span {
        Span::new(self.start, self.last_event_end)
    }

    pub fn validate(&self) -> GatherResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.events.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(GatherError::Invalid {
                kind: "series",
                id: self.id.clone(),
                reason: format!("event '{}' is listed more than once", dup),
            });
        }
        validate_roster("series", self)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
