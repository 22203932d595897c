// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Subject whose permissions are resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Actor {
    /// Role group, identified by its exact (case-sensitive) name.
    Group { name: String },

    /// Single user, identified by their username.
    User { username: String },
}

impl Actor {
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group { name: name.into() }
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self::User {
            username: username.into(),
        }
    }
}

impl Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Group { name } => write!(f, "group '{}'", name),
            Actor::User { username } => write!(f, "user '{}'", username),
        }
    }
}
