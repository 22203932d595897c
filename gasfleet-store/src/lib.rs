// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for gasfleet role groups, individual user overrides and user records.
//!
//! All records are accessed through the [`RecordStore`] trait which offers the usual
//! select / insert / update / upsert / delete operations over typed collections. Errors of every
//! implementation can be classified with [`StoreError::kind`], allowing callers to react to
//! conflicts on unique fields without knowing the backend.
//!
//! Two implementations are provided: [`MemoryStore`] for development and tests, gated by the
//! `memory` feature, and [`SqliteStore`](sqlite::SqliteStore) backed by `sqlx`, gated by the
//! `sqlite` feature. Both are enabled by default.
pub mod codec;
#[cfg(feature = "memory")]
pub mod memory;
pub mod records;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod traits;

#[cfg(feature = "memory")]
pub use memory::{MemoryStore, MemoryStoreError};
pub use records::{
    Collection, Conflict, Filter, GroupPatch, GroupRecord, OrderBy, Record, RecordId,
    RecordStore, USER_SUBJECT_PREFIX, UserOverridePatch, UserOverrideRecord, UserPatch,
    UserRecord, user_subject_name,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder};
pub use traits::{StoreError, StoreErrorKind};
