// SPDX-License-Identifier: MIT OR Apache-2.0

use gasfleet_core::{Action, Catalog, Module, PermissionMatrix};
use gasfleet_store::{
    Filter, GroupRecord, RecordStore, UserOverrideRecord, UserRecord, user_subject_name,
};
use tracing::debug;

use crate::{Actor, AuthError};

/// Origin of a resolved permission matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// Individual override of the user.
    UserOverride,

    /// Matrix of the named group.
    Group(String),

    /// No matching record was found, nothing is granted.
    Default,
}

/// Resolves and manages the permissions of role groups and users held in a record store.
///
/// Resolution follows a strict precedence for users: an individual override replaces the matrix
/// of the user's group entirely. When no override exists the group referenced by the user's role
/// is used, and when neither exists nothing is granted. Matrices are never merged.
///
/// Every call reads from the store again, no results are cached.
#[derive(Clone, Debug)]
pub struct AccessControl<S> {
    pub(crate) store: S,
    pub(crate) catalog: Catalog,
}

impl<S> AccessControl<S>
where
    S: RecordStore,
{
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the effective permission matrix of an actor.
    ///
    /// Unknown groups and users resolve to a matrix denying everything, only failures of the
    /// store are returned as errors.
    pub async fn resolve(&self, actor: &Actor) -> Result<PermissionMatrix, AuthError<S::Error>> {
        let (matrix, _) = self.resolve_with_source(actor).await?;
        Ok(matrix)
    }

    /// Returns the effective permission matrix of an actor together with its origin.
    ///
    /// The returned matrix holds an explicit value for every cell of the catalog.
    pub async fn resolve_with_source(
        &self,
        actor: &Actor,
    ) -> Result<(PermissionMatrix, Resolution), AuthError<S::Error>> {
        let (mut matrix, resolution) = match actor {
            Actor::Group { name } => self.resolve_group(name).await?,
            Actor::User { username } => self.resolve_user(username).await?,
        };

        matrix.complete_for(&self.catalog);
        debug!(%actor, ?resolution, "resolved permissions");

        Ok((matrix, resolution))
    }

    /// Returns `true` if the actor is granted the action on the module.
    pub async fn is_allowed(
        &self,
        actor: &Actor,
        module: &Module,
        action: &Action,
    ) -> Result<bool, AuthError<S::Error>> {
        let matrix = self.resolve(actor).await?;
        Ok(matrix.get(module, action))
    }

    async fn resolve_group(
        &self,
        name: &str,
    ) -> Result<(PermissionMatrix, Resolution), AuthError<S::Error>> {
        let group: Option<GroupRecord> = self
            .store
            .select_one(&Filter::key(name))
            .await
            .map_err(AuthError::store)?;

        match group {
            Some(group) => Ok((group.permissions, Resolution::Group(group.name))),
            None => Ok((self.catalog.empty_matrix(), Resolution::Default)),
        }
    }

    async fn resolve_user(
        &self,
        username: &str,
    ) -> Result<(PermissionMatrix, Resolution), AuthError<S::Error>> {
        // An override always wins over the user's group.
        let user_override: Option<UserOverrideRecord> = self
            .store
            .select_one(&Filter::key(user_subject_name(username)))
            .await
            .map_err(AuthError::store)?;

        if let Some(user_override) = user_override {
            return Ok((user_override.permissions, Resolution::UserOverride));
        }

        let user: Option<UserRecord> = self
            .store
            .select_one(&Filter::key(username))
            .await
            .map_err(AuthError::store)?;

        match user.and_then(|user| user.role) {
            Some(role) => self.resolve_group(&role).await,
            None => Ok((self.catalog.empty_matrix(), Resolution::Default)),
        }
    }
}
