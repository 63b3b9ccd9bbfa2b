//! Membership of events and series.
//!
//! Membership is list containment: a user belongs to an entity when their id is
//! in its `participants`. Events and series share one implementation through
//! the [`Membership`] trait.

mod controller;

pub use controller::{EntityKind, MembershipController, Stored};

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::{GatherError, GatherResult, MembershipError};
use crate::event::Event;
use crate::series::Series;

/// A capacity-bounded entity with a fixed owner.
pub trait Membership {
    fn id(&self) -> &str;
    fn owner(&self) -> &str;
    fn participants(&self) -> &[String];
    fn participants_mut(&mut self) -> &mut Vec<String>;
    fn max_participants(&self) -> u32;

    fn is_participant(&self, user_id: &str) -> bool {
        self.participants().iter().any(|p| p == user_id)
    }

    fn is_full(&self) -> bool {
        self.participants().len() >= self.max_participants() as usize
    }

    fn free_seats(&self) -> usize {
        (self.max_participants() as usize).saturating_sub(self.participants().len())
    }

    fn role_of(&self, user_id: &str) -> Role {
        Role::of(self, user_id)
    }
}

impl Membership for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn participants(&self) -> &[String] {
        &self.participants
    }

    fn participants_mut(&mut self) -> &mut Vec<String> {
        &mut self.participants
    }

    fn max_participants(&self) -> u32 {
        self.max_participants
    }
}

impl Membership for Series {
    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn participants(&self) -> &[String] {
        &self.participants
    }

    fn participants_mut(&mut self) -> &mut Vec<String> {
        &mut self.participants
    }

    fn max_participants(&self) -> u32 {
        self.max_participants
    }
}

/// A user's relationship to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Member,
    NonMember,
}

impl Role {
    pub fn of<E: Membership + ?Sized>(entity: &E, user_id: &str) -> Role {
        if entity.owner() == user_id {
            Role::Owner
        } else if entity.is_participant(user_id) {
            Role::Member
        } else {
            Role::NonMember
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Member => write!(f, "member"),
            Role::NonMember => write!(f, "not a member"),
        }
    }
}

/// Add `user_id` to the roster. Returns the updated entity; `entity` is untouched.
pub fn join<E: Membership + Clone>(entity: &E, user_id: &str) -> Result<E, MembershipError> {
    match Role::of(entity, user_id) {
        Role::Owner | Role::Member => Err(MembershipError::AlreadyMember {
            id: entity.id().to_string(),
            user: user_id.to_string(),
        }),
        Role::NonMember if entity.is_full() => Err(MembershipError::CapacityExceeded {
            id: entity.id().to_string(),
            max: entity.max_participants(),
        }),
        Role::NonMember => {
            let mut updated = entity.clone();
            updated.participants_mut().push(user_id.to_string());
            debug!(entity = %entity.id(), user = %user_id, "Joined");
            Ok(updated)
        }
    }
}

/// Remove `user_id` from the roster. Returns the updated entity; `entity` is untouched.
pub fn quit<E: Membership + Clone>(entity: &E, user_id: &str) -> Result<E, MembershipError> {
    match Role::of(entity, user_id) {
        Role::Owner => Err(MembershipError::OwnerCannotQuit {
            id: entity.id().to_string(),
        }),
        Role::NonMember => Err(MembershipError::NotAMember {
            id: entity.id().to_string(),
            user: user_id.to_string(),
        }),
        Role::Member => {
            let mut updated = entity.clone();
            updated.participants_mut().retain(|p| p != user_id);
            debug!(entity = %entity.id(), user = %user_id, "Quit");
            Ok(updated)
        }
    }
}

/// Check the roster invariants shared by events and series.
pub(crate) fn validate_roster<E: Membership>(kind: &'static str, entity: &E) -> GatherResult<()> {
    let invalid = |reason: &str| GatherError::Invalid {
        kind,
        id: entity.id().to_string(),
        reason: reason.to_string(),
    };

    if entity.max_participants() == 0 {
        return Err(invalid("max participants must be at least 1"));
    }
    if !entity.is_participant(entity.owner()) {
        return Err(invalid("owner must be a participant"));
    }
    let unique: HashSet<&str> = entity.participants().iter().map(String::as_str).collect();
    if unique.len() != entity.participants().len() {
        return Err(invalid("participants must be unique"));
    }
    if entity.participants().len() > entity.max_participants() as usize {
        return Err(invalid("more participants than allowed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::{TimeZone, Utc};

    fn event(max: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        Event::new(EventKind::Sports, "Football", start, 90, max, "owner")
    }

    #[test]
    fn test_roles() {
        let mut e = event(3);
        e.participants.push("bob".to_string());

        assert_eq!(e.role_of("owner"), Role::Owner);
        assert_eq!(e.role_of("bob"), Role::Member);
        assert_eq!(e.role_of("carol"), Role::NonMember);
    }

    #[test]
    fn test_join_appends_in_join_order() {
        let e = event(3);

        let e = join(&e, "bob").unwrap();
        let e = join(&e, "carol").unwrap();

        assert_eq!(e.participants, vec!["owner", "bob", "carol"]);
    }

    #[test]
    fn test_join_twice_is_rejected() {
        let e = join(&event(3), "bob").unwrap();

        assert!(matches!(
            join(&e, "bob"),
            Err(MembershipError::AlreadyMember { .. })
        ));
        assert!(matches!(
            join(&e, "owner"),
            Err(MembershipError::AlreadyMember { .. })
        ));
    }

    #[test]
    fn test_join_at_capacity_leaves_entity_unchanged() {
        let e = join(&event(2), "bob").unwrap();
        let before = e.clone();

        let result = join(&e, "carol");

        assert!(matches!(
            result,
            Err(MembershipError::CapacityExceeded { max: 2, .. })
        ));
        assert_eq!(e, before);
    }

    #[test]
    fn test_owner_cannot_quit() {
        let e = join(&event(3), "bob").unwrap();

        assert!(matches!(
            quit(&e, "owner"),
            Err(MembershipError::OwnerCannotQuit { .. })
        ));
        assert_eq!(e.participants, vec!["owner", "bob"]);
    }

    #[test]
    fn test_quit_non_member_is_rejected() {
        let e = event(3);

        assert!(matches!(
            quit(&e, "mallory"),
            Err(MembershipError::NotAMember { .. })
        ));
        assert_eq!(e.participants, vec!["owner"]);
    }

    #[test]
    fn test_quit_frees_a_seat() {
        let e = join(&event(2), "bob").unwrap();
        assert!(e.is_full());

        let e = quit(&e, "bob").unwrap();

        assert_eq!(e.free_seats(), 1);
        assert!(join(&e, "carol").is_ok());
    }

    #[test]
    fn test_series_shares_the_same_rules() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        let s = Series::new("Weekly", start, 1, "owner");

        assert!(matches!(
            join(&s, "bob"),
            Err(MembershipError::CapacityExceeded { max: 1, .. })
        ));
    }

    #[test]
    fn test_validate_roster() {
        let mut e = event(2);
        assert!(e.validate().is_ok());

        e.participants = vec!["bob".to_string()];
        assert!(e.validate().is_err());

        e.participants = vec!["owner".to_string(), "bob".to_string(), "carol".to_string()];
        assert!(e.validate().is_err());

        e.participants = vec!["owner".to_string(), "owner".to_string()];
        assert!(e.validate().is_err());
    }
}
