// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::records::{Conflict, Filter, OrderBy, Record, RecordId};
use crate::traits::StoreError;

/// Interface for creating, querying, updating and deleting typed records.
///
/// The collection is determined by the record type, see [`Record::COLLECTION`]. Every write is
/// applied on its own: implementations do not group several calls into one transaction, callers
/// issuing multiple dependent writes need to handle partial failures themselves.
pub trait RecordStore {
    type Error: StoreError;

    /// Get the first record matching the filter.
    ///
    /// Returns `None` when no record was found.
    fn select_one<R: Record>(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<R>, Self::Error>>;

    /// Get all records matching the optional filter, in ascending order.
    fn select_many<R: Record>(
        &self,
        filter: Option<&Filter>,
        order_by: Option<OrderBy>,
    ) -> impl Future<Output = Result<Vec<R>, Self::Error>>;

    /// Insert a new record and return it with its assigned id.
    ///
    /// Fails with a unique violation error if another record holds the same key. Ids set on the
    /// given record are ignored.
    fn insert<R: Record>(&self, record: R) -> impl Future<Output = Result<R, Self::Error>>;

    /// Apply a partial update to the record with the given id and return the updated record.
    ///
    /// Fails with a not found error if the record does not exist and with a unique violation
    /// error if the update changes the key to one which is already taken.
    fn update<R: Record>(
        &self,
        id: &RecordId,
        patch: R::Patch,
    ) -> impl Future<Output = Result<R, Self::Error>>;

    /// Insert a record or replace the existing one conflicting on the given field.
    ///
    /// Returns the stored record with its id. Replacing never fails because the record already
    /// exists.
    fn upsert<R: Record>(
        &self,
        record: R,
        conflict: Conflict,
    ) -> impl Future<Output = Result<R, Self::Error>>;

    /// Delete a record.
    ///
    /// Returns `true` when the removal occurred and `false` when the record was not found in the
    /// store.
    fn delete<R: Record>(&self, id: &RecordId) -> impl Future<Output = Result<bool, Self::Error>>;
}
