//! Command execution pipeline.
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the current snapshot (or a fresh empty aggregate)
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events to the snapshot
//!   ↓
//! 4. Save (or remove, once deleted) with an optimistic version check
//! ```
//!
//! This module contains no IO itself; it composes a [`Repository`].

use thiserror::Error;

use storefront_core::{Aggregate, Event, ExpectedVersion};

use crate::repository::{Repository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError<E> {
    /// The aggregate refused the command.
    #[error("command rejected: {0:?}")]
    Rejected(E),

    /// Another writer changed the aggregate between load and save.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// The repository could not be used.
    #[error("store error: {0}")]
    Store(String),
}

impl<E> From<RepositoryError> for DispatchError<E> {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => DispatchError::Concurrency(msg),
            RepositoryError::Unavailable(msg) => DispatchError::Store(msg),
        }
    }
}

/// Reusable command execution engine for snapshot-stored aggregates.
#[derive(Debug)]
pub struct CommandDispatcher<R> {
    repository: R,
}

impl<R> CommandDispatcher<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R> CommandDispatcher<R> {
    /// Run `command` against the aggregate stored under `id` and persist the
    /// result. Returns the aggregate state after the new events.
    ///
    /// `make_aggregate` builds the empty instance used when nothing is stored
    /// yet. A command that yields no events leaves the store untouched.
    pub fn dispatch<A>(
        &self,
        id: A::Id,
        command: A::Command,
        make_aggregate: impl FnOnce(A::Id) -> A,
    ) -> Result<A, DispatchError<A::Error>>
    where
        A: Aggregate + Clone,
        A::Event: Event,
        R: Repository<A::Id, A>,
    {
        // 1) Load
        let (mut aggregate, expected) = match self.repository.get(&id)? {
            Some(current) => {
                let version = current.version();
                (current, ExpectedVersion::Exact(version))
            }
            None => (make_aggregate(id.clone()), ExpectedVersion::Exact(0)),
        };

        // 2) Decide events (no mutation)
        let decided = aggregate.handle(&command).map_err(DispatchError::Rejected)?;
        if decided.is_empty() {
            return Ok(aggregate);
        }

        // 3) Evolve
        for event in &decided {
            aggregate.apply(event);
            tracing::debug!(event_type = event.event_type(), aggregate_id = ?id, "event applied");
        }

        // 4) Persist
        if aggregate.is_live() {
            self.repository.upsert(id, aggregate.clone(), expected)?;
        } else {
            self.repository.remove(&id, expected)?;
        }

        Ok(aggregate)
    }
}
