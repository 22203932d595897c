// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves which actions a role group or a single user may perform on the fleet modules.
//!
//! Every subject is granted a [`PermissionMatrix`](gasfleet_core::PermissionMatrix). Groups carry
//! the matrix shared by all their members, a user can additionally hold an individual override.
//! When present, the override fully replaces the matrix of the user's group: both are never merged.
//!
//! [`AccessControl`] combines a [`RecordStore`](gasfleet_store::RecordStore) with the
//! [`Catalog`](gasfleet_core::Catalog) of known modules and actions and offers:
//!
//! - resolution of the effective matrix of an [`Actor`],
//! - creating, renaming and removing groups with unique names,
//! - assigning and clearing individual user overrides.
//!
//! ```
//! # use gasfleet_auth::{AccessControl, Actor};
//! # use gasfleet_core::{Action, Catalog, Module, PermissionMatrix};
//! # use gasfleet_store::{MemoryStore, RecordStore, UserRecord};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let control = AccessControl::new(MemoryStore::default(), Catalog::default());
//!
//! let cylinders: Module = "cylinders".parse()?;
//! let view: Action = "view".parse()?;
//!
//! let permissions = PermissionMatrix::from_iter([(cylinders.clone(), view.clone())]);
//! control.create_group("Thủ kho", permissions).await?;
//! control
//!     .store()
//!     .insert(UserRecord::new("an", Some("Thủ kho".into())))
//!     .await?;
//!
//! let actor = Actor::user("an");
//! assert!(control.is_allowed(&actor, &cylinders, &view).await?);
//! # Ok(())
//! # }
//! ```
mod errors;
mod groups;
mod overrides;
mod resolver;
mod subject;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use errors::AuthError;
pub use groups::GroupUpdate;
pub use resolver::{AccessControl, Resolution};
pub use subject::Actor;
