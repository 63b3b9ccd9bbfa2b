//! Events: one-off activities with a start, a duration and a capped roster.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GatherError, GatherResult};
use crate::membership::validate_roster;
use crate::time::Span;

/// A single scheduled activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub location: Option<Location>,

    // Schedule
    pub start: DateTime<Utc>,
    /// Always > 0 for a valid event
    pub duration_minutes: u32,

    // Membership
    /// User ids in join order. The owner is always first.
    pub participants: Vec<String>,
    pub max_participants: u32,
    pub visibility: Visibility,
    pub owner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Sports,
    Social,
    Activity,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Sports => write!(f, "sports"),
            EventKind::Social => write!(f, "social"),
            EventKind::Activity => write!(f, "activity"),
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sports" => Ok(EventKind::Sports),
            "social" => Ok(EventKind::Social),
            "activity" => Ok(EventKind::Activity),
            other => Err(format!(
                "Unknown event kind '{}'. Expected sports, social or activity",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl Event {
    /// Create a new event owned (and joined) by `owner`, with a fresh id.
    pub fn new(
        kind: EventKind,
        title: &str,
        start: DateTime<Utc>,
        duration_minutes: u32,
        max_participants: u32,
        owner: &str,
    ) -> Self {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            description: String::new(),
            location: None,
            start,
            duration_minutes,
            participants: vec![owner.to_string()],
            max_participants,
            visibility: Visibility::Public,
            owner: owner.to_string(),
        }
    }

    /// Saturates at the latest representable instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }

    pub fn validate(&self) -> GatherResult<()> {
        if self.duration_minutes == 0 {
            return Err(GatherError::Invalid {
                kind: "event",
                id: self.id.clone(),
                reason: "duration must be greater than zero".into(),
            });
        }
        validate_roster("event", self)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_is_start_plus_duration() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        let event = Event::new(EventKind::Sports, "Climbing", start, 90, 4, "alice");

        assert_eq!(event.end(), Utc.with_ymd_and_hms(2025, 1, 15, 16, 0, 0).unwrap());
        assert_eq!(event.participants, vec!["alice".to_string()]);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        let event = Event::new(EventKind::Social, "Drinks", start, 0, 4, "alice");

        assert!(matches!(
            event.validate(),
            Err(GatherError::Invalid { kind: "event", .. })
        ));
    }

    #[test]
    fn test_kind_parses_case_insensitively() {
        assert_eq!("Sports".parse::<EventKind>().unwrap(), EventKind::Sports);
        assert!("chess".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_end_saturates_near_max_instant() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);
        let event = Event::new(EventKind::Social, "Forever", start, 60, 4, "alice");

        assert_eq!(event.end(), DateTime::<Utc>::MAX_UTC);
        assert!(event.span().contains(start));
    }
}
