//! Persisted join/quit with per-entity serialization.
//!
//! Two joins against the same entity must not both observe a free seat before
//! either writes. Every transition therefore runs under a lock keyed by
//! (kind, id): re-read the entity, apply the pure transition, save, release.
//! Different entities never share a lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{GatherResult, MembershipError};
use crate::event::Event;
use crate::membership::{self, Membership};
use crate::repository::Repository;
use crate::series::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Series,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Event => write!(f, "event"),
            EntityKind::Series => write!(f, "series"),
        }
    }
}

/// An entity the controller can load and save through a [`Repository`].
#[async_trait]
pub trait Stored: Membership + Clone + Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    async fn load(repo: &dyn Repository, id: &str) -> GatherResult<Self>;
    async fn store(&self, repo: &dyn Repository) -> GatherResult<()>;
}

#[async_trait]
impl Stored for Event {
    const KIND: EntityKind = EntityKind::Event;

    async fn load(repo: &dyn Repository, id: &str) -> GatherResult<Self> {
        repo.get_event(id).await
    }

    async fn store(&self, repo: &dyn Repository) -> GatherResult<()> {
        repo.save_event(self).await
    }
}

#[async_trait]
impl Stored for Series {
    const KIND: EntityKind = EntityKind::Series;

    async fn load(repo: &dyn Repository, id: &str) -> GatherResult<Self> {
        repo.get_series(id).await
    }

    async fn store(&self, repo: &dyn Repository) -> GatherResult<()> {
        repo.save_series(self).await
    }
}

type EntityLock = Arc<tokio::sync::Mutex<()>>;

/// Serializes membership transitions per entity.
///
/// All writers of a store must share one controller for the capacity
/// invariant to hold.
pub struct MembershipController {
    repo: Arc<dyn Repository>,
    locks: Mutex<HashMap<(EntityKind, String), EntityLock>>,
}

impl MembershipController {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        MembershipController {
            repo,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    /// The lock guarding `(kind, id)`. Lifecycle edits that rewrite a document
    /// take the same lock as membership changes to it.
    ///
    /// Entries nobody holds a handle to are dropped on the way in, so the map
    /// only tracks entities with a transition in flight.
    pub(crate) fn lock_for(&self, kind: EntityKind, id: &str) -> EntityLock {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry((kind, id.to_string()))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Join `entity` as `user_id`, against its latest stored state.
    pub async fn join<E: Stored>(&self, entity: &E, user_id: &str) -> Result<E, MembershipError> {
        self.join_by_id::<E>(entity.id(), user_id).await
    }

    /// Leave `entity` as `user_id`, against its latest stored state.
    pub async fn quit<E: Stored>(&self, entity: &E, user_id: &str) -> Result<E, MembershipError> {
        self.quit_by_id::<E>(entity.id(), user_id).await
    }

    pub async fn join_by_id<E: Stored>(&self, id: &str, user_id: &str) -> Result<E, MembershipError> {
        self.transition(id, user_id, membership::join::<E>).await
    }

    pub async fn quit_by_id<E: Stored>(&self, id: &str, user_id: &str) -> Result<E, MembershipError> {
        self.transition(id, user_id, membership::quit::<E>).await
    }

    async fn transition<E, F>(&self, id: &str, user_id: &str, apply: F) -> Result<E, MembershipError>
    where
        E: Stored,
        F: Fn(&E, &str) -> Result<E, MembershipError>,
    {
        let lock = self.lock_for(E::KIND, id);
        let _guard = lock.lock().await;

        let current = E::load(self.repo.as_ref(), id).await?;
        let updated = match apply(&current, user_id) {
            Ok(updated) => updated,
            Err(e) => {
                debug!(kind = %E::KIND, id, user = user_id, reason = %e, "Membership change rejected");
                return Err(e);
            }
        };
        updated.store(self.repo.as_ref()).await?;

        info!(
            kind = %E::KIND,
            id,
            user = user_id,
            participants = updated.participants().len(),
            max = updated.max_participants(),
            "Membership updated"
        );
        Ok(updated)
    }
}
