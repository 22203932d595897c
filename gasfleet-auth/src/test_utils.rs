// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.

use gasfleet_core::{Action, Module, PermissionMatrix};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Builds a matrix granting exactly the given `(module, action)` pairs.
///
/// Panics on invalid identifiers.
pub fn grants(cells: &[(&str, &str)]) -> PermissionMatrix {
    cells
        .iter()
        .map(|(module, action)| {
            (
                Module::new(*module).expect("valid module"),
                Action::new(*action).expect("valid action"),
            )
        })
        .collect()
}
