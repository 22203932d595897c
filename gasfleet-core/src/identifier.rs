// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generates a validated string identifier type.
///
/// Identifiers are never empty and never carry surrounding whitespace, they are compared
/// case-sensitively.
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
                let value = value.into();
                validate(&value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

identifier!(
    /// Functional area of the fleet application, for example "orders" or "cylinders".
    Module
);

identifier!(
    /// Kind of operation which can be performed within a module, for example "view" or "delete".
    Action
);

fn validate(value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if value.trim() != value {
        return Err(IdentifierError::SurroundingWhitespace(value.to_string()));
    }

    Ok(())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier can not be empty")]
    Empty,

    #[error("identifier '{0}' has leading or trailing whitespace")]
    SurroundingWhitespace(String),
}

#[cfg(test)]
mod tests {
    use super::{Action, IdentifierError, Module};

    #[test]
    fn validates_identifiers() {
        assert!(Module::new("cylinders").is_ok());
        assert!(Action::new("view").is_ok());
        assert_eq!(Module::new(""), Err(IdentifierError::Empty));
        assert_eq!(
            Action::new(" view"),
            Err(IdentifierError::SurroundingWhitespace(" view".into()))
        );
    }

    #[test]
    fn serde_as_plain_string() {
        let module: Module = "orders".parse().unwrap();
        let json = serde_json::to_string(&module).unwrap();
        assert_eq!(json, "\"orders\"");

        let decoded: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, module);

        assert!(serde_json::from_str::<Action>("\"\"").is_err());
    }
}
