// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use thiserror::Error;

use crate::codec::CodecError;
use crate::records::{Collection, RecordId};
use crate::traits::{StoreError, StoreErrorKind};

/// Encoded record as it is kept in a memory table.
#[derive(Clone, Debug)]
pub(crate) struct Row {
    pub(crate) key: String,
    pub(crate) body: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Table {
    pub(crate) last_id: i64,
    pub(crate) rows: BTreeMap<i64, Row>,
}

impl Table {
    pub(crate) fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Returns the id of the row holding this key, if any.
    pub(crate) fn find_key(&self, key: &str) -> Option<i64> {
        self.rows
            .iter()
            .find(|(_, row)| row.key == key)
            .map(|(id, _)| *id)
    }
}

/// In-memory store.
///
/// This does not persist data permanently, all changes are lost when the process ends. Use this
/// only in development or test contexts.
///
/// Cloned instances share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub(crate) tables: Rc<RefCell<HashMap<Collection, Table>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Trait implementations are in the regarding modules, see for example `records`.

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("record with key '{1}' already exists in '{0}'")]
    UniqueViolation(Collection, String),

    #[error("record {1} not found in '{0}'")]
    NotFound(Collection, RecordId),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError for MemoryStoreError {
    fn kind(&self) -> StoreErrorKind {
        match self {
            MemoryStoreError::UniqueViolation(..) => StoreErrorKind::UniqueViolation,
            MemoryStoreError::NotFound(..) => StoreErrorKind::NotFound,
            MemoryStoreError::Codec(_) => StoreErrorKind::Other,
        }
    }
}
