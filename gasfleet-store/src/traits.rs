// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

/// Coarse classification of store errors.
///
/// Callers of a store usually need to distinguish conflicts on unique fields and missing records
/// from generic I/O failures without knowing anything about the concrete backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A write was rejected because another record already holds the same unique value.
    UniqueViolation,

    /// The record addressed by a write does not exist.
    NotFound,

    /// Any other failure, for example an unavailable database.
    Other,
}

/// Error type returned by store implementations.
pub trait StoreError: Error {
    fn kind(&self) -> StoreErrorKind;

    fn is_unique_violation(&self) -> bool {
        self.kind() == StoreErrorKind::UniqueViolation
    }

    fn is_not_found(&self) -> bool {
        self.kind() == StoreErrorKind::NotFound
    }
}
