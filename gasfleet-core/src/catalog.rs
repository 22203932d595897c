// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::identifier::{Action, Module};
use crate::matrix::PermissionMatrix;

const DEFAULT_MODULES: [&str; 6] = ["orders", "customers", "cylinders", "machines", "users", "roles"];

const DEFAULT_ACTIONS: [&str; 4] = ["view", "create", "edit", "delete"];

/// Modules and actions known to the application.
///
/// The catalog is fixed at configuration time and defines the shape of every permission matrix:
/// complete matrices hold exactly one cell for every (module, action) pair listed here. It can be
/// deserialized from the application configuration, duplicate entries are dropped while keeping
/// the order of first appearance.
///
/// ```
/// # use gasfleet_core::Catalog;
/// let catalog: Catalog = serde_json::from_str(
///     r#"{ "modules": ["orders", "users"], "actions": ["view", "create"] }"#,
/// )
/// .unwrap();
/// assert_eq!(catalog.modules().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCatalog")]
pub struct Catalog {
    modules: Vec<Module>,
    actions: Vec<Action>,
}

impl Catalog {
    pub fn new(
        modules: impl IntoIterator<Item = Module>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        Self {
            modules: dedup(modules),
            actions: dedup(actions),
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn contains_module(&self, module: &Module) -> bool {
        self.modules.contains(module)
    }

    pub fn contains_action(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    /// Returns the baseline matrix denying every action in every module.
    pub fn empty_matrix(&self) -> PermissionMatrix {
        PermissionMatrix::empty(&self.modules, &self.actions)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_MODULES
                .iter()
                .map(|name| Module::new(*name).expect("valid default module")),
            DEFAULT_ACTIONS
                .iter()
                .map(|name| Action::new(*name).expect("valid default action")),
        )
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    modules: Vec<Module>,
    actions: Vec<Action>,
}

impl From<RawCatalog> for Catalog {
    fn from(raw: RawCatalog) -> Self {
        Self::new(raw.modules, raw.actions)
    }
}

fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut result = Vec::new();
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn default_fleet_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.modules().len(), 6);
        assert_eq!(catalog.actions().len(), 4);
        assert!(catalog.contains_module(&"cylinders".parse().unwrap()));
        assert!(!catalog.contains_action(&"approve".parse().unwrap()));
    }

    #[test]
    fn drops_duplicates_from_config() {
        let catalog: Catalog = serde_json::from_str(
            r#"{
                "modules": ["orders", "users", "orders"],
                "actions": ["view", "view", "create"]
            }"#,
        )
        .unwrap();

        let modules: Vec<&str> = catalog.modules().iter().map(|m| m.as_str()).collect();
        let actions: Vec<&str> = catalog.actions().iter().map(|a| a.as_str()).collect();
        assert_eq!(modules, vec!["orders", "users"]);
        assert_eq!(actions, vec!["view", "create"]);
    }

    #[test]
    fn rejects_empty_identifiers_in_config() {
        let result = serde_json::from_str::<Catalog>(r#"{ "modules": [""], "actions": [] }"#);
        assert!(result.is_err());
    }
}
