//! Feed aggregation.
//!
//! Merges standalone events and series into one classified list. Events owned
//! by a series are represented by their series and never appear on their own.
//! PAST items are dropped; history is not part of the feed.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::event::Event;
use crate::label::{ONGOING_PLURAL, ONGOING_SINGULAR, UPCOMING_PLURAL, UPCOMING_SINGULAR, label};
use crate::membership::Membership;
use crate::series::{DanglingReference, Series};
use crate::time::{Span, TimeBucket};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEntry {
    Event(Event),
    Series(Series),
}

impl FeedEntry {
    pub fn id(&self) -> &str {
        match self {
            FeedEntry::Event(e) => &e.id,
            FeedEntry::Series(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FeedEntry::Event(e) => &e.title,
            FeedEntry::Series(s) => &s.title,
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        match self {
            FeedEntry::Event(e) => e.is_participant(user_id),
            FeedEntry::Series(s) => s.is_participant(user_id),
        }
    }

    // Events sort before series on equal (start, id)
    fn rank(&self) -> u8 {
        match self {
            FeedEntry::Event(_) => 0,
            FeedEntry::Series(_) => 1,
        }
    }
}

/// An event or series with its classification at feed build time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub entry: FeedEntry,
    pub span: Span,
    pub bucket: TimeBucket,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub ongoing: Vec<FeedItem>,
    pub upcoming: Vec<FeedItem>,
    /// Owned event ids that could not be resolved while building the feed
    pub dangling: Vec<DanglingReference>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.ongoing.len() + self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ongoing.is_empty() && self.upcoming.is_empty()
    }

    pub fn ongoing_heading(&self) -> String {
        label(self.ongoing.len(), ONGOING_SINGULAR, ONGOING_PLURAL)
    }

    pub fn upcoming_heading(&self) -> String {
        label(self.upcoming.len(), UPCOMING_SINGULAR, UPCOMING_PLURAL)
    }

    /// Keep only the items `user_id` participates in.
    ///
    /// Filtering happens after deduplication, so an owned event never surfaces
    /// here even if the user joined the event but not its series.
    pub fn for_participant(mut self, user_id: &str) -> Feed {
        self.ongoing.retain(|item| item.entry.has_participant(user_id));
        self.upcoming.retain(|item| item.entry.has_participant(user_id));
        self
    }
}

/// Build the ongoing/upcoming feed at `now`.
pub fn build_feed(now: DateTime<Utc>, events: &[Event], series: &[Series]) -> Feed {
    let owned: HashSet<&str> = series
        .iter()
        .flat_map(|s| s.events.iter().map(String::as_str))
        .collect();

    let by_id: HashMap<&str, &Event> = events.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut feed = Feed::default();
    let mut items = Vec::with_capacity(events.len() + series.len());

    for event in events.iter().filter(|e| !owned.contains(e.id.as_str())) {
        items.push((FeedEntry::Event(event.clone()), event.span()));
    }

    for s in series {
        let resolution = s.resolve_span(|id| by_id.get(id).copied());
        feed.dangling.extend(resolution.dangling);
        items.push((FeedEntry::Series(s.clone()), resolution.span));
    }

    for (entry, span) in items {
        let bucket = span.classify(now);
        let item = FeedItem {
            entry,
            span,
            bucket,
        };
        match bucket {
            TimeBucket::Ongoing => feed.ongoing.push(item),
            TimeBucket::Upcoming => feed.upcoming.push(item),
            TimeBucket::Past => {}
        }
    }

    sort_bucket(&mut feed.ongoing);
    sort_bucket(&mut feed.upcoming);
    feed
}

fn sort_bucket(items: &mut [FeedItem]) {
    items.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| a.entry.id().cmp(b.entry.id()))
            .then_with(|| a.entry.rank().cmp(&b.entry.rank()))
    });
}
