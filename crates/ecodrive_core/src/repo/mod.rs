//! Repository layer over serialized entity collections.
//!
//! # Responsibility
//! - Read, filter and rewrite whole entity collections in the key-value
//!   store.
//! - Report semantic `NotFound` errors next to store transport errors.
//!
//! # Invariants
//! - Every mutation rewrites the full collection.
//! - Reads never fail; an unreadable collection is treated as empty.
//! - Writes never replace a collection they could not decode.

pub mod collection_repo;
