// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Debug};

use gasfleet_core::PermissionMatrix;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Prefix reserved for the subject names of individual user overrides.
pub const USER_SUBJECT_PREFIX: &str = "@user:";

/// Store-assigned identifier of a record, unique within its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named collections held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Groups,
    UserOverrides,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Groups => "groups",
            Collection::UserOverrides => "user-overrides",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed record living in exactly one collection.
///
/// Every record has one unique "key" field (a group name or a username) next to the
/// store-assigned id. The id is not part of the serialized body, stores set it when reading or
/// inserting a record.
///
/// The body carries no `kind` tag: the record type decides the collection through
/// [`Record::COLLECTION`], so group and user override records can never be confused.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Partial update which can be applied to this record.
    type Patch: Debug;

    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);

    /// Value of the unique field of this record.
    fn key(&self) -> &str;

    fn apply(&mut self, patch: Self::Patch);
}

/// Selects records by id or by their unique key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Id(RecordId),
    Key(String),
}

impl Filter {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

/// Ascending order of records returned from a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Id,
    Key,
}

/// Field used to detect an existing record during an upsert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conflict {
    Id,
    Key,
}

/// Named role group with its permission matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(skip)]
    pub id: Option<RecordId>,
    pub name: String,
    pub permissions: PermissionMatrix,
}

impl GroupRecord {
    pub fn new(name: impl Into<String>, permissions: PermissionMatrix) -> Self {
        Self {
            id: None,
            name: name.into(),
            permissions,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub permissions: Option<PermissionMatrix>,
}

impl Record for GroupRecord {
    const COLLECTION: Collection = Collection::Groups;

    type Patch = GroupPatch;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, patch: GroupPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
    }
}

/// Individual permission matrix of one user, replacing the matrix of the user's group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOverrideRecord {
    #[serde(skip)]
    pub id: Option<RecordId>,
    pub name: String,
    pub permissions: PermissionMatrix,
}

impl UserOverrideRecord {
    pub fn for_user(username: &str, permissions: PermissionMatrix) -> Self {
        Self {
            id: None,
            name: user_subject_name(username),
            permissions,
        }
    }

    /// Returns the username this override belongs to.
    pub fn username(&self) -> Option<&str> {
        self.name.strip_prefix(USER_SUBJECT_PREFIX)
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserOverridePatch {
    pub permissions: Option<PermissionMatrix>,
}

impl Record for UserOverrideRecord {
    const COLLECTION: Collection = Collection::UserOverrides;

    type Patch = UserOverridePatch;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, patch: UserOverridePatch) {
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
    }
}

/// Application user referencing its group by name.
///
/// `permissions` holds a denormalized copy of the user's override matrix, if one was assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(skip)]
    pub id: Option<RecordId>,
    pub username: String,
    pub role: Option<String>,
    pub permissions: Option<PermissionMatrix>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, role: Option<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            role,
            permissions: None,
        }
    }
}

/// Partial update of a user record.
///
/// Fields set to `None` are left untouched, `Some(None)` clears an optional field.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub role: Option<Option<String>>,
    pub permissions: Option<Option<PermissionMatrix>>,
}

impl Record for UserRecord {
    const COLLECTION: Collection = Collection::Users;

    type Patch = UserPatch;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn key(&self) -> &str {
        &self.username
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
    }
}

/// Derives the reserved subject name of a user's override record.
pub fn user_subject_name(username: &str) -> String {
    format!("{USER_SUBJECT_PREFIX}{username}")
}

#[cfg(test)]
mod tests {
    use gasfleet_core::PermissionMatrix;

    use super::{
        GroupPatch, GroupRecord, Record, UserOverrideRecord, UserPatch, UserRecord,
        user_subject_name,
    };
    use crate::codec::encode_record;

    #[test]
    fn override_subject_name() {
        assert_eq!(user_subject_name("an"), "@user:an");

        let record = UserOverrideRecord::for_user("an", PermissionMatrix::default());
        assert_eq!(record.key(), "@user:an");
        assert_eq!(record.username(), Some("an"));
    }

    #[test]
    fn apply_patches() {
        let mut group = GroupRecord::new("Thủ kho", PermissionMatrix::default());
        group.apply(GroupPatch {
            name: Some("Thủ kho tổng".into()),
            permissions: None,
        });
        assert_eq!(group.key(), "Thủ kho tổng");

        let mut user = UserRecord::new("an", Some("Thủ kho".into()));
        user.permissions = Some(PermissionMatrix::default());
        user.apply(UserPatch {
            role: None,
            permissions: Some(None),
        });
        assert_eq!(user.role.as_deref(), Some("Thủ kho"));
        assert_eq!(user.permissions, None);
    }

    #[test]
    fn bodies_carry_no_kind_or_id() {
        let mut group = GroupRecord::new("Admin", PermissionMatrix::default());
        group.set_id(7.into());

        let bytes = encode_record(&group).unwrap();
        let value: ciborium::Value = ciborium::from_reader(bytes.as_slice()).unwrap();
        let fields: Vec<&str> = value
            .as_map()
            .unwrap()
            .iter()
            .map(|(key, _)| key.as_text().unwrap())
            .collect();
        assert_eq!(fields, vec!["name", "permissions"]);
    }
}
