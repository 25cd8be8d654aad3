//! Domain model for vehicle-maintenance tracking.
//!
//! # Responsibility
//! - Define the persisted entity shapes and their creation/update inputs.
//! - Keep input validation next to the data it guards.
//!
//! # Invariants
//! - Every entity is identified by a generated `RecordId`.
//! - Every entity except `User` references its owner through `user_id`;
//!   references are weak and never checked.

use crate::store::CollectionKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub mod appointment;
pub mod diagnostic;
pub mod maintenance;
pub mod notification;
pub mod user;
pub mod validation;

/// Stable identifier shared by every entity type.
pub type RecordId = Uuid;

/// Entity stored as one element of a serialized collection.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Key of the collection holding every record of this type.
    const COLLECTION: CollectionKey;
    /// Human-readable entity name used in errors and logs.
    const NAME: &'static str;

    fn id(&self) -> RecordId;
}
