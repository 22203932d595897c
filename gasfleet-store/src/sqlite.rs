// SPDX-License-Identifier: MIT OR Apache-2.0

use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, migrate};
use thiserror::Error;
use tracing::debug;

use crate::codec::CodecError;
use crate::records::{Collection, RecordId};
use crate::traits::{StoreError, StoreErrorKind};

/// Create SQLite database if it doesn't already exist.
pub async fn create_database(url: &str) -> Result<(), SqliteError> {
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?
    }
    Ok(())
}

/// Get migrations from folder without running them.
pub fn migrations() -> Migrator {
    migrate!()
}

/// Run any pending database migrations from inside the application.
pub async fn run_pending_migrations(pool: &sqlx::SqlitePool) -> Result<(), SqliteError> {
    migrations().run(pool).await?;
    Ok(())
}

/// Configures and opens a [`SqliteStore`].
///
/// ```no_run
/// # use gasfleet_store::sqlite::SqliteStoreBuilder;
/// # async fn run() -> Result<(), gasfleet_store::sqlite::SqliteError> {
/// let store = SqliteStoreBuilder::new()
///     .database_url("sqlite://gasfleet.db")
///     .max_connections(4)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SqliteStoreBuilder {
    url: String,
    max_connections: u32,
    run_migrations: bool,
    create_database: bool,
}

impl Default for SqliteStoreBuilder {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 16,
            create_database: true,
            run_migrations: true,
        }
    }
}

impl SqliteStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub fn random_memory_url(mut self) -> Self {
        // Combining Rust tests with in-memory databases can lead to unsound behaviour, this
        // "workaround" assigns every temporary database a different, random name and keeps them
        // isolated from other tests.
        //
        // See related issue: https://github.com/launchbadge/sqlx/issues/2510
        self.url = format!(
            "sqlite://dbmem{}?mode=memory&cache=private",
            rand::random::<u32>()
        );
        self
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn create_database(mut self, create_database: bool) -> Self {
        self.create_database = create_database;
        self
    }

    pub fn run_default_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub async fn build(self) -> Result<SqliteStore, SqliteError> {
        if self.create_database {
            create_database(&self.url).await?;
        }

        let pool: sqlx::SqlitePool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.url)
            .await?;

        if self.run_migrations {
            run_pending_migrations(&pool).await?;
        }

        debug!(max_connections = self.max_connections, "opened sqlite store");

        Ok(SqliteStore::new(pool))
    }
}

/// SQLite database with connection pool.
///
/// This struct can be cloned and used in multiple places in the application. Every cloned
/// instance re-uses the same connection pool.
///
/// Each collection lives in its own table holding the record id, the unique key and the CBOR
/// encoded record body. Every write is committed on its own; partial updates read and write the
/// record within one short transaction.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: sqlx::SqlitePool,
}

impl SqliteStore {
    pub(crate) fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Shortcut building an in-memory SQLite database with a randomised name for testing purposes.
    #[cfg(any(test, feature = "test_utils"))]
    pub async fn temporary() -> Self {
        SqliteStoreBuilder::new()
            .random_memory_url()
            .max_connections(1)
            .build()
            .await
            .expect("migrations succeeded")
    }

    /// Execute SQL query directly on the pool.
    pub async fn execute<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&sqlx::SqlitePool) -> Result<R, SqliteError>,
    {
        f(&self.pool).await
    }
}

/// Table holding the records of a collection.
pub(crate) fn table(collection: Collection) -> &'static str {
    match collection {
        Collection::Groups => "groups_v1",
        Collection::UserOverrides => "user_overrides_v1",
        Collection::Users => "users_v1",
    }
}

/// Maps unique constraint failures of a write to [`SqliteError::UniqueViolation`].
pub(crate) fn write_error(collection: Collection, key: &str, err: sqlx::Error) -> SqliteError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            SqliteError::UniqueViolation(collection, key.to_string())
        }
        err => SqliteError::Sqlite(err),
    }
}

#[derive(Debug, Error)]
pub enum SqliteError {
    /// Another record in the same table already holds this key.
    #[error("record with key '{1}' already exists in '{0}'")]
    UniqueViolation(Collection, String),

    #[error("record {1} not found in '{0}'")]
    NotFound(Collection, RecordId),

    /// SQLite database and connection error.
    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    /// SQL table schema migration error.
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Record body could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError for SqliteError {
    fn kind(&self) -> StoreErrorKind {
        match self {
            SqliteError::UniqueViolation(..) => StoreErrorKind::UniqueViolation,
            SqliteError::NotFound(..) => StoreErrorKind::NotFound,
            _ => StoreErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use gasfleet_core::PermissionMatrix;
    use sqlx::{Executor, query_as};

    use crate::codec::{CodecError, encode_record};
    use crate::records::{Collection, Filter, GroupRecord, RecordStore};
    use crate::sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder, table, write_error};
    use crate::traits::StoreError;

    #[tokio::test]
    async fn migrations_create_tables() {
        let store = SqliteStoreBuilder::new()
            .random_memory_url()
            .max_connections(1)
            .build()
            .await
            .unwrap();

        for collection in [Collection::Groups, Collection::UserOverrides, Collection::Users] {
            let count = store
                .execute(async |pool| {
                    let row: (i64,) = query_as(&format!("SELECT COUNT(*) FROM {}", table(collection)))
                        .fetch_one(pool)
                        .await?;
                    Ok(row.0)
                })
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[tokio::test]
    async fn classifies_unique_violations() {
        let store = SqliteStoreBuilder::new()
            .run_default_migrations(false)
            .random_memory_url()
            .max_connections(1)
            .build()
            .await
            .unwrap();

        let result = store
            .execute(async |pool| {
                pool.execute("CREATE TABLE test(x TEXT UNIQUE)").await?;
                pool.execute("INSERT INTO test (x) VALUES ('a')").await?;
                pool.execute("INSERT INTO test (x) VALUES ('a')")
                    .await
                    .map_err(|err| write_error(Collection::Groups, "a", err))?;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, SqliteError::UniqueViolation(Collection::Groups, _)));
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn rejects_rows_with_mismatching_key() {
        let store = SqliteStore::temporary().await;
        let body = encode_record(&GroupRecord::new("Admin", PermissionMatrix::default())).unwrap();

        store
            .execute(async |pool| {
                sqlx::query("INSERT INTO groups_v1 (key, body) VALUES (?, ?)")
                    .bind("Kế toán")
                    .bind(body.as_slice())
                    .execute(pool)
                    .await?;
                Ok(())
            })
            .await
            .unwrap();

        let result = store.select_one::<GroupRecord>(&Filter::key("Kế toán")).await;
        assert!(matches!(
            result,
            Err(SqliteError::Codec(CodecError::Decode("groups", _)))
        ));
    }
}
