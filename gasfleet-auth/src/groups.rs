// SPDX-License-Identifier: MIT OR Apache-2.0

use gasfleet_core::PermissionMatrix;
use gasfleet_store::{
    Filter, GroupPatch, GroupRecord, OrderBy, RecordStore, USER_SUBJECT_PREFIX,
};
use tracing::debug;

use crate::{AccessControl, AuthError};

/// Changes applied to an existing group. Fields left as `None` are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub permissions: Option<PermissionMatrix>,
}

impl<S> AccessControl<S>
where
    S: RecordStore,
{
    /// Creates a new group.
    ///
    /// The name is trimmed and must be unique among all groups, compared case-sensitively. The
    /// matrix is stored with an explicit value for every cell of the catalog.
    pub async fn create_group(
        &self,
        name: &str,
        mut permissions: PermissionMatrix,
    ) -> Result<GroupRecord, AuthError<S::Error>> {
        let name = normalize_group_name(name)?;

        if self.group(&name).await?.is_some() {
            return Err(AuthError::DuplicateName(name));
        }

        permissions.complete_for(&self.catalog);

        let group = self
            .store
            .insert(GroupRecord::new(name, permissions))
            .await
            .map_err(AuthError::store)?;

        debug!(name = %group.name, "created group");

        Ok(group)
    }

    /// Renames a group and/or replaces its permission matrix.
    ///
    /// Uniqueness of the name is only checked again when it actually changes. Users referencing
    /// the group by its previous name are not updated.
    pub async fn update_group(
        &self,
        current_name: &str,
        update: GroupUpdate,
    ) -> Result<GroupRecord, AuthError<S::Error>> {
        let Some(current) = self.group(current_name).await? else {
            return Err(AuthError::UnknownGroup(current_name.to_string()));
        };
        let Some(id) = current.id else {
            return Err(AuthError::UnknownGroup(current_name.to_string()));
        };

        let name = match update.name {
            Some(name) => {
                let name = normalize_group_name(&name)?;
                if name != current.name && self.group(&name).await?.is_some() {
                    return Err(AuthError::DuplicateName(name));
                }
                Some(name)
            }
            None => None,
        };

        let permissions = update.permissions.map(|mut permissions| {
            permissions.complete_for(&self.catalog);
            permissions
        });

        let group: GroupRecord = self
            .store
            .update(&id, GroupPatch { name, permissions })
            .await
            .map_err(AuthError::store)?;

        debug!(previous = current_name, name = %group.name, "updated group");

        Ok(group)
    }

    /// Removes a group.
    ///
    /// Returns `false` if no group with this name exists. Users referencing the group keep their
    /// role and resolve to an empty matrix from now on.
    pub async fn delete_group(&self, name: &str) -> Result<bool, AuthError<S::Error>> {
        let Some(id) = self.group(name).await?.and_then(|group| group.id) else {
            return Ok(false);
        };

        let removed = self
            .store
            .delete::<GroupRecord>(&id)
            .await
            .map_err(AuthError::store)?;

        if removed {
            debug!(name, "deleted group");
        }

        Ok(removed)
    }

    /// Returns all groups ordered by name.
    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>, AuthError<S::Error>> {
        self.store
            .select_many(None, Some(OrderBy::Key))
            .await
            .map_err(AuthError::store)
    }

    /// Returns the group with exactly this name.
    pub async fn group(&self, name: &str) -> Result<Option<GroupRecord>, AuthError<S::Error>> {
        self.store
            .select_one(&Filter::key(name))
            .await
            .map_err(AuthError::store)
    }
}

/// Trims a group name and rejects empty names or names which could be mistaken for the subject
/// of a user override.
pub(crate) fn normalize_group_name<E>(name: &str) -> Result<String, AuthError<E>> {
    let name = name.trim();

    if name.is_empty() {
        return Err(AuthError::EmptyName);
    }

    if name.starts_with(USER_SUBJECT_PREFIX) {
        return Err(AuthError::ReservedName(name.to_string()));
    }

    Ok(name.to_string())
}
