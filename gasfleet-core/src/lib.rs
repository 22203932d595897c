// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-types describing who may do what in the gasfleet fleet management application.
//!
//! Access is expressed as a [`PermissionMatrix`]: a boolean grant for every [`Module`] (functional
//! area like "cylinders" or "orders") and every [`Action`] (operation kind like "view" or
//! "delete"). The set of known modules and actions is fixed at configuration time and described
//! by a [`Catalog`].
//!
//! Matrices are edited with pure operations (see [`editor`]) which never mutate the caller's
//! copy, making it easy to apply them in UI state handlers and persist the result later.
mod catalog;
pub mod editor;
mod identifier;
mod matrix;

pub use catalog::Catalog;
pub use editor::{toggle_cell, toggle_column, toggle_row};
pub use identifier::{Action, IdentifierError, Module};
pub use matrix::PermissionMatrix;
