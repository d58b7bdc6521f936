//! Aggregate storage.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use storefront_core::{AggregateRoot, ExpectedVersion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored version did not match the caller's expectation.
    #[error("{0}")]
    Conflict(String),

    /// The backing store cannot be used (e.g. a poisoned lock).
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store of aggregate snapshots with an optimistic version check on
/// every write. A missing key counts as version 0.
pub trait Repository<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Result<Option<V>, RepositoryError>;
    fn list(&self) -> Result<Vec<V>, RepositoryError>;
    fn upsert(&self, key: K, value: V, expected: ExpectedVersion) -> Result<(), RepositoryError>;
    fn remove(&self, key: &K, expected: ExpectedVersion) -> Result<Option<V>, RepositoryError>;
}

impl<K, V, S> Repository<K, V> for Arc<S>
where
    S: Repository<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        (**self).get(key)
    }

    fn list(&self) -> Result<Vec<V>, RepositoryError> {
        (**self).list()
    }

    fn upsert(&self, key: K, value: V, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).upsert(key, value, expected)
    }

    fn remove(&self, key: &K, expected: ExpectedVersion) -> Result<Option<V>, RepositoryError> {
        (**self).remove(key, expected)
    }
}

/// In-memory repository for tests/dev.
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryRepository<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_version<V: AggregateRoot>(
    current: Option<&V>,
    expected: ExpectedVersion,
) -> Result<(), RepositoryError> {
    let actual = current.map(|v| v.version()).unwrap_or(0);
    expected
        .check(actual)
        .map_err(|e| RepositoryError::Conflict(e.to_string()))
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: AggregateRoot + Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        let map = self
            .inner
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn list(&self) -> Result<Vec<V>, RepositoryError> {
        let map = self
            .inner
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(map.values().cloned().collect())
    }

    fn upsert(&self, key: K, value: V, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        check_version(map.get(&key), expected)?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K, expected: ExpectedVersion) -> Result<Option<V>, RepositoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        check_version(map.get(key), expected)?;
        Ok(map.remove(key))
    }
}
