//! Core of gather: events, series, the activity feed and membership.
//!
//! - `time` and `series` classify events and series as past/ongoing/upcoming
//! - `feed` merges standalone events and series into one de-duplicated feed
//! - `membership` governs join/quit under a hard capacity limit
//! - `catalog` and `repository` handle the lifecycle and storage around them

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod label;
pub mod membership;
pub mod repository;
pub mod series;
pub mod time;

pub use catalog::Catalog;
pub use error::{GatherError, GatherResult, MembershipError};
pub use event::{Event, EventKind, Location, Visibility};
pub use feed::{Feed, FeedEntry, FeedItem, build_feed};
pub use membership::{EntityKind, Membership, MembershipController, Role, Stored};
pub use series::{DanglingReference, Series};
pub use time::{Span, TimeBucket, classify};
