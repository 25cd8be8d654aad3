//! Generic collection repository.
//!
//! # Responsibility
//! - Provide CRUD over one `Entity` collection stored under its key.
//! - Keep JSON and key details inside the persistence boundary.
//!
//! # Invariants
//! - Lookups are linear scans by id; there is no index.
//! - Update/delete never reorder the remaining records.
//! - No locking: concurrent read-modify-write cycles are last-write-wins.
//! - Mutations never overwrite a collection that exists but cannot be
//!   decoded; they fail with a store error instead.

use crate::model::{Entity, RecordId};
use crate::store::{get_item, set_item, try_get_item, KeyValueStore, StoreError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection mutations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    NotFound { entity: &'static str, id: RecordId },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository for every record of entity type `T`.
pub struct CollectionRepository<'s, S: ?Sized, T> {
    store: &'s S,
    _entity: PhantomData<fn() -> T>,
}

impl<'s, S, T> CollectionRepository<'s, S, T>
where
    S: KeyValueStore + ?Sized,
    T: Entity,
{
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Reads the full collection; absent or unreadable means empty.
    pub fn load_all(&self) -> Vec<T> {
        get_item::<Vec<T>, _>(self.store, T::COLLECTION.as_str()).unwrap_or_default()
    }

    /// Reads the full collection for a read-modify-write cycle.
    ///
    /// # Errors
    /// - `Store` when the stored collection cannot be read or decoded.
    pub fn load_for_write(&self) -> RepoResult<Vec<T>> {
        let items = try_get_item::<Vec<T>, _>(self.store, T::COLLECTION.as_str())?;
        Ok(items.unwrap_or_default())
    }

    /// Replaces the full collection.
    pub fn save_all(&self, items: &[T]) -> RepoResult<()> {
        set_item(self.store, T::COLLECTION.as_str(), items)?;
        debug!(
            "event=collection_write module=repo status=ok collection={} len={}",
            T::COLLECTION,
            items.len()
        );
        Ok(())
    }

    /// Records matching `predicate`, in stored order.
    pub fn list_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.load_all()
            .into_iter()
            .filter(|item| predicate(item))
            .collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.load_all().into_iter().find(|item| predicate(item))
    }

    pub fn get(&self, id: RecordId) -> Option<T> {
        self.find(|item| item.id() == id)
    }

    /// Appends one record and returns it.
    pub fn insert(&self, item: T) -> RepoResult<T> {
        let mut items = self.load_for_write()?;
        items.push(item.clone());
        self.save_all(&items)?;
        Ok(item)
    }

    /// Applies `change` to the record with `id` and returns the new state.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`; nothing is written.
    pub fn update(&self, id: RecordId, change: impl FnOnce(&mut T)) -> RepoResult<T> {
        let mut items = self.load_for_write()?;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(RepoError::NotFound {
                entity: T::NAME,
                id,
            })?;
        change(item);
        let updated = item.clone();
        self.save_all(&items)?;
        Ok(updated)
    }

    /// Applies `change` to every matching record. Returns how many matched.
    pub fn update_where(
        &self,
        predicate: impl Fn(&T) -> bool,
        mut change: impl FnMut(&mut T),
    ) -> RepoResult<usize> {
        let mut items = self.load_for_write()?;
        let mut matched = 0_usize;
        for item in items.iter_mut().filter(|item| predicate(item)) {
            change(item);
            matched += 1;
        }
        self.save_all(&items)?;
        Ok(matched)
    }

    /// Drops the record with `id`. Returns whether it existed.
    ///
    /// The collection is rewritten even when `id` is absent.
    pub fn delete(&self, id: RecordId) -> RepoResult<bool> {
        self.delete_where(|item| item.id() == id)
            .map(|removed| removed > 0)
    }

    /// Drops every matching record. Returns how many were removed.
    pub fn delete_where(&self, predicate: impl Fn(&T) -> bool) -> RepoResult<usize> {
        let mut items = self.load_for_write()?;
        let before = items.len();
        items.retain(|item| !predicate(item));
        let removed = before - items.len();
        self.save_all(&items)?;
        Ok(removed)
    }
}
