// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::codec::{decode_record, encode_record};
use crate::memory::{MemoryStore, MemoryStoreError, Row};
use crate::records::{Conflict, Filter, OrderBy, Record, RecordId, RecordStore};

fn matches(id: i64, row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::Id(filter_id) => filter_id.as_i64() == id,
        Filter::Key(key) => &row.key == key,
    }
}

impl RecordStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn select_one<R: Record>(&self, filter: &Filter) -> Result<Option<R>, Self::Error> {
        let tables = self.tables.borrow();
        let Some(table) = tables.get(&R::COLLECTION) else {
            return Ok(None);
        };

        match table.rows.iter().find(|(id, row)| matches(**id, row, filter)) {
            Some((id, row)) => Ok(Some(decode_record(RecordId::from(*id), &row.body)?)),
            None => Ok(None),
        }
    }

    async fn select_many<R: Record>(
        &self,
        filter: Option<&Filter>,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<R>, Self::Error> {
        let tables = self.tables.borrow();
        let Some(table) = tables.get(&R::COLLECTION) else {
            return Ok(Vec::new());
        };

        // Rows are kept ordered by id already.
        let mut rows: Vec<(&i64, &Row)> = table
            .rows
            .iter()
            .filter(|(id, row)| filter.is_none_or(|filter| matches(**id, row, filter)))
            .collect();

        if order_by.unwrap_or_default() == OrderBy::Key {
            rows.sort_by(|(_, a), (_, b)| a.key.cmp(&b.key));
        }

        rows.into_iter()
            .map(|(id, row)| {
                decode_record(RecordId::from(*id), &row.body).map_err(MemoryStoreError::from)
            })
            .collect()
    }

    async fn insert<R: Record>(&self, mut record: R) -> Result<R, Self::Error> {
        let mut tables = self.tables.borrow_mut();
        let table = tables.entry(R::COLLECTION).or_default();

        if table.find_key(record.key()).is_some() {
            return Err(MemoryStoreError::UniqueViolation(
                R::COLLECTION,
                record.key().to_string(),
            ));
        }

        let body = encode_record(&record)?;
        let id = table.next_id();
        table.rows.insert(
            id,
            Row {
                key: record.key().to_string(),
                body,
            },
        );

        record.set_id(RecordId::from(id));
        Ok(record)
    }

    async fn update<R: Record>(&self, id: &RecordId, patch: R::Patch) -> Result<R, Self::Error> {
        let mut tables = self.tables.borrow_mut();
        let table = tables.entry(R::COLLECTION).or_default();

        let Some(row) = table.rows.get(&id.as_i64()) else {
            return Err(MemoryStoreError::NotFound(R::COLLECTION, *id));
        };

        let mut record: R = decode_record(*id, &row.body)?;
        record.apply(patch);

        if table
            .find_key(record.key())
            .is_some_and(|existing| existing != id.as_i64())
        {
            return Err(MemoryStoreError::UniqueViolation(
                R::COLLECTION,
                record.key().to_string(),
            ));
        }

        let body = encode_record(&record)?;
        table.rows.insert(
            id.as_i64(),
            Row {
                key: record.key().to_string(),
                body,
            },
        );

        Ok(record)
    }

    async fn upsert<R: Record>(&self, mut record: R, conflict: Conflict) -> Result<R, Self::Error> {
        let mut tables = self.tables.borrow_mut();
        let table = tables.entry(R::COLLECTION).or_default();

        let holder = table.find_key(record.key());
        let id = match conflict {
            Conflict::Key => holder.unwrap_or_else(|| table.next_id()),
            Conflict::Id => {
                let id = match record.id() {
                    Some(id) => {
                        let id = id.as_i64();
                        table.last_id = table.last_id.max(id);
                        id
                    }
                    None => table.next_id(),
                };
                if holder.is_some_and(|holder| holder != id) {
                    return Err(MemoryStoreError::UniqueViolation(
                        R::COLLECTION,
                        record.key().to_string(),
                    ));
                }
                id
            }
        };

        let body = encode_record(&record)?;
        table.rows.insert(
            id,
            Row {
                key: record.key().to_string(),
                body,
            },
        );

        record.set_id(RecordId::from(id));
        Ok(record)
    }

    async fn delete<R: Record>(&self, id: &RecordId) -> Result<bool, Self::Error> {
        let mut tables = self.tables.borrow_mut();
        Ok(tables
            .get_mut(&R::COLLECTION)
            .is_some_and(|table| table.rows.remove(&id.as_i64()).is_some()))
    }
}
