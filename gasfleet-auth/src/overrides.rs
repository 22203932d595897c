// SPDX-License-Identifier: MIT OR Apache-2.0

use gasfleet_core::PermissionMatrix;
use gasfleet_store::{
    Conflict, Filter, RecordId, RecordStore, UserOverrideRecord, UserPatch, UserRecord,
    user_subject_name,
};
use tracing::{debug, warn};

use crate::{AccessControl, AuthError};

impl<S> AccessControl<S>
where
    S: RecordStore,
{
    /// Assigns an individual permission matrix to a user, replacing any previous override.
    ///
    /// The override record is written first, the copy held on the user record second. Both
    /// writes are independent: when the second one fails the override stays in place and
    /// [`AuthError::PartialWrite`] is returned. The user's group is never changed.
    pub async fn assign_user_override(
        &self,
        username: &str,
        mut permissions: PermissionMatrix,
    ) -> Result<UserOverrideRecord, AuthError<S::Error>> {
        let user_id = self.user_id(username).await?;

        permissions.complete_for(&self.catalog);

        let user_override = self
            .store
            .upsert(
                UserOverrideRecord::for_user(username, permissions.clone()),
                Conflict::Key,
            )
            .await
            .map_err(AuthError::store)?;

        debug!(username, "assigned user override");

        let patch = UserPatch {
            role: None,
            permissions: Some(Some(permissions)),
        };
        self.update_user_copy(username, &user_id, patch).await?;

        Ok(user_override)
    }

    /// Removes the override of a user, who falls back to the permissions of their group again.
    ///
    /// Returns `false` if the user had no override. Failing to clear the copy on the user record
    /// after the override was removed is reported as [`AuthError::PartialWrite`].
    pub async fn clear_user_override(&self, username: &str) -> Result<bool, AuthError<S::Error>> {
        let user_id = self.user_id(username).await?;

        let Some(override_id) = self
            .user_override(username)
            .await?
            .and_then(|user_override| user_override.id)
        else {
            return Ok(false);
        };

        let removed = self
            .store
            .delete::<UserOverrideRecord>(&override_id)
            .await
            .map_err(AuthError::store)?;

        if !removed {
            return Ok(false);
        }

        debug!(username, "cleared user override");

        let patch = UserPatch {
            role: None,
            permissions: Some(None),
        };
        self.update_user_copy(username, &user_id, patch).await?;

        Ok(true)
    }

    /// Returns the override assigned to a user, if any.
    pub async fn user_override(
        &self,
        username: &str,
    ) -> Result<Option<UserOverrideRecord>, AuthError<S::Error>> {
        self.store
            .select_one(&Filter::key(user_subject_name(username)))
            .await
            .map_err(AuthError::store)
    }

    /// Moves a user into another group or removes them from any group with `None`.
    ///
    /// Only the role reference changes, an existing override stays in place and keeps taking
    /// precedence.
    pub async fn set_user_group(
        &self,
        username: &str,
        group: Option<&str>,
    ) -> Result<UserRecord, AuthError<S::Error>> {
        let user_id = self.user_id(username).await?;

        if let Some(group) = group {
            if self.group(group).await?.is_none() {
                return Err(AuthError::UnknownGroup(group.to_string()));
            }
        }

        let user: UserRecord = self
            .store
            .update(
                &user_id,
                UserPatch {
                    role: Some(group.map(str::to_string)),
                    permissions: None,
                },
            )
            .await
            .map_err(AuthError::store)?;

        debug!(username, ?group, "changed group of user");

        Ok(user)
    }

    async fn user_id(&self, username: &str) -> Result<RecordId, AuthError<S::Error>> {
        let user: Option<UserRecord> = self
            .store
            .select_one(&Filter::key(username))
            .await
            .map_err(AuthError::store)?;

        user.and_then(|user| user.id)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))
    }

    /// Second write of the override protocol, a failure here leaves the override record changed.
    async fn update_user_copy(
        &self,
        username: &str,
        user_id: &RecordId,
        patch: UserPatch,
    ) -> Result<(), AuthError<S::Error>> {
        match self.store.update::<UserRecord>(user_id, patch).await {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(username, %err, "override changed but user record could not be updated");
                Err(AuthError::PartialWrite {
                    username: username.to_string(),
                    source: err,
                })
            }
        }
    }
}
