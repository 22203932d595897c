// SPDX-License-Identifier: MIT OR Apache-2.0

use gasfleet_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`AccessControl`](crate::AccessControl), generic over the error type of the
/// underlying store.
///
/// Validation errors are detected before anything is written. Errors of the store are passed
/// through as they are, only wrapped to tell unique violations apart from other failures.
#[derive(Debug, Error)]
pub enum AuthError<E> {
    /// Another group already uses this name.
    #[error("group with name '{0}' already exists")]
    DuplicateName(String),

    /// The store rejected a write on a unique field, for example because a concurrent write
    /// claimed the name first.
    #[error("store rejected write on unique field: {0}")]
    UniqueViolation(#[source] E),

    #[error("group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("user '{0}' does not exist")]
    UnknownUser(String),

    /// The override record of a user was written or removed, but the following update of the
    /// user record failed. The first write is not rolled back.
    #[error("override of user '{username}' changed but updating the user record failed: {source}")]
    PartialWrite {
        username: String,
        #[source]
        source: E,
    },

    #[error("store error: {0}")]
    Gateway(#[source] E),

    #[error("group name must not be empty")]
    EmptyName,

    #[error("group name '{0}' uses a reserved prefix")]
    ReservedName(String),
}

impl<E: StoreError> AuthError<E> {
    /// Wraps an error returned by the store.
    pub(crate) fn store(err: E) -> Self {
        if err.is_unique_violation() {
            Self::UniqueViolation(err)
        } else {
            Self::Gateway(err)
        }
    }
}
