// SPDX-License-Identifier: MIT OR Apache-2.0

//! `RecordStore` trait for persisting role groups, user overrides and users, with in-memory and
//! SQLite implementations.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;
mod types;

pub use traits::RecordStore;
pub use types::{
    Collection, Conflict, Filter, GroupPatch, GroupRecord, OrderBy, Record, RecordId,
    USER_SUBJECT_PREFIX, UserOverridePatch, UserOverrideRecord, UserPatch, UserRecord,
    user_subject_name,
};
