// SPDX-License-Identifier: MIT OR Apache-2.0

use sqlx::{FromRow, query_as};

use crate::codec::{CodecError, decode_record, encode_record};
use crate::records::{Conflict, Filter, OrderBy, Record, RecordId, RecordStore};
use crate::sqlite::{SqliteError, SqliteStore, table, write_error};

/// Single record row as it is stored in the SQLite database.
#[derive(Debug, FromRow)]
struct RecordRow {
    id: i64,
    key: String,
    body: Vec<u8>,
}

impl RecordRow {
    /// Decodes the body, which needs to carry the same key as the indexed column.
    fn decode<R: Record>(&self) -> Result<R, SqliteError> {
        let record: R = decode_record(RecordId::from(self.id), &self.body)?;
        if record.key() != self.key {
            return Err(CodecError::Decode(
                R::COLLECTION.as_str(),
                format!("body key '{}' differs from column '{}'", record.key(), self.key),
            )
            .into());
        }
        Ok(record)
    }
}

fn where_clause(filter: &Filter) -> &'static str {
    match filter {
        Filter::Id(_) => "WHERE id = ?",
        Filter::Key(_) => "WHERE key = ?",
    }
}

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::Id => "ORDER BY id ASC",
        OrderBy::Key => "ORDER BY key ASC",
    }
}

impl RecordStore for SqliteStore {
    type Error = SqliteError;

    async fn select_one<R: Record>(&self, filter: &Filter) -> Result<Option<R>, Self::Error> {
        let sql = format!(
            "
            SELECT
                id,
                key,
                body
            FROM
                {}
            {}
            LIMIT 1
            ",
            table(R::COLLECTION),
            where_clause(filter),
        );

        let row = self
            .execute(async |pool| {
                let query = query_as::<_, RecordRow>(&sql);
                let query = match filter {
                    Filter::Id(id) => query.bind(id.as_i64()),
                    Filter::Key(key) => query.bind(key.clone()),
                };
                query.fetch_optional(pool).await.map_err(SqliteError::Sqlite)
            })
            .await?;

        match row {
            Some(row) => Ok(Some(row.decode()?)),
            None => Ok(None),
        }
    }

    async fn select_many<R: Record>(
        &self,
        filter: Option<&Filter>,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<R>, Self::Error> {
        let sql = format!(
            "
            SELECT
                id,
                key,
                body
            FROM
                {}
            {}
            {}
            ",
            table(R::COLLECTION),
            filter.map(where_clause).unwrap_or_default(),
            order_clause(order_by.unwrap_or_default()),
        );

        let rows = self
            .execute(async |pool| {
                let query = query_as::<_, RecordRow>(&sql);
                let query = match filter {
                    Some(Filter::Id(id)) => query.bind(id.as_i64()),
                    Some(Filter::Key(key)) => query.bind(key.clone()),
                    None => query,
                };
                query.fetch_all(pool).await.map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.iter().map(|row| row.decode()).collect()
    }

    async fn insert<R: Record>(&self, mut record: R) -> Result<R, Self::Error> {
        let body = encode_record(&record)?;
        let sql = format!(
            "
            INSERT INTO
                {} (
                    key,
                    body
                )
            VALUES
                (?, ?)
            RETURNING
                id
            ",
            table(R::COLLECTION),
        );

        let (id,) = self
            .execute(async |pool| {
                query_as::<_, (i64,)>(&sql)
                    .bind(record.key())
                    .bind(body.as_slice())
                    .fetch_one(pool)
                    .await
                    .map_err(|err| write_error(R::COLLECTION, record.key(), err))
            })
            .await?;

        record.set_id(RecordId::from(id));
        Ok(record)
    }

    async fn update<R: Record>(&self, id: &RecordId, patch: R::Patch) -> Result<R, Self::Error> {
        let select = format!(
            "
            SELECT
                id,
                key,
                body
            FROM
                {}
            WHERE
                id = ?
            ",
            table(R::COLLECTION),
        );

        let update = format!(
            "
            UPDATE
                {}
            SET
                key = ?,
                body = ?
            WHERE
                id = ?
            ",
            table(R::COLLECTION),
        );

        self.execute(async |pool| {
            // Read and write within one transaction, any error rolls it back when `tx` is dropped.
            let mut tx = pool.begin().await?;

            let row = query_as::<_, RecordRow>(&select)
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(SqliteError::NotFound(R::COLLECTION, *id))?;

            let mut record: R = row.decode()?;
            record.apply(patch);
            let body = encode_record(&record)?;

            sqlx::query(&update)
                .bind(record.key())
                .bind(body.as_slice())
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await
                .map_err(|err| write_error(R::COLLECTION, record.key(), err))?;

            tx.commit().await?;

            Ok(record)
        })
        .await
    }

    async fn upsert<R: Record>(&self, mut record: R, conflict: Conflict) -> Result<R, Self::Error> {
        let body = encode_record(&record)?;

        let (id,) = match (conflict, record.id()) {
            (Conflict::Key, _) => {
                let sql = format!(
                    "
                    INSERT INTO
                        {} (
                            key,
                            body
                        )
                    VALUES
                        (?, ?)
                    ON CONFLICT(key) DO UPDATE SET
                        body = excluded.body
                    RETURNING
                        id
                    ",
                    table(R::COLLECTION),
                );

                self.execute(async |pool| {
                    query_as::<_, (i64,)>(&sql)
                        .bind(record.key())
                        .bind(body.as_slice())
                        .fetch_one(pool)
                        .await
                        .map_err(|err| write_error(R::COLLECTION, record.key(), err))
                })
                .await?
            }
            (Conflict::Id, Some(id)) => {
                let sql = format!(
                    "
                    INSERT INTO
                        {} (
                            id,
                            key,
                            body
                        )
                    VALUES
                        (?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        key = excluded.key,
                        body = excluded.body
                    RETURNING
                        id
                    ",
                    table(R::COLLECTION),
                );

                self.execute(async |pool| {
                    query_as::<_, (i64,)>(&sql)
                        .bind(id.as_i64())
                        .bind(record.key())
                        .bind(body.as_slice())
                        .fetch_one(pool)
                        .await
                        .map_err(|err| write_error(R::COLLECTION, record.key(), err))
                })
                .await?
            }
            // Without an id there is nothing to conflict with.
            (Conflict::Id, None) => return self.insert(record).await,
        };

        record.set_id(RecordId::from(id));
        Ok(record)
    }

    async fn delete<R: Record>(&self, id: &RecordId) -> Result<bool, Self::Error> {
        let sql = format!(
            "
            DELETE FROM
                {}
            WHERE
                id = ?
            ",
            table(R::COLLECTION),
        );

        let result = self
            .execute(async |pool| {
                sqlx::query(&sql)
                    .bind(id.as_i64())
                    .execute(pool)
                    .await
                    .map_err(SqliteError::Sqlite)
            })
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
