// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::identifier::{Action, Module};

/// Per-module and per-action access grants.
///
/// A matrix maps every module to a set of actions, each either granted (`true`) or denied
/// (`false`). Cells which are not present are always treated as denied, reading from a matrix
/// never fails. Matrices are compared by their meaning: an absent cell equals an explicit `false`
/// cell.
///
/// Matrices handed to the persistence layer are expected to be _complete_, meaning they hold an
/// explicit cell for every module and action of the [`Catalog`]. Use [`PermissionMatrix::complete`]
/// or [`PermissionMatrix::complete_for`] to materialize missing cells before writing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<Module, BTreeMap<Action, bool>>);

impl PermissionMatrix {
    /// Returns a matrix with every (module, action) pair denied.
    pub fn empty(modules: &[Module], actions: &[Action]) -> Self {
        let mut matrix = Self::default();
        matrix.complete(modules, actions);
        matrix
    }

    /// Returns the stored value for a cell or `false` if it is absent.
    pub fn get(&self, module: &Module, action: &Action) -> bool {
        self.0
            .get(module)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(false)
    }

    /// Sets a cell to the given value, materializing it when absent.
    pub fn set(&mut self, module: &Module, action: &Action, value: bool) {
        self.0
            .entry(module.clone())
            .or_default()
            .insert(action.clone(), value);
    }

    /// Returns `true` if every given action is granted for this module.
    pub fn is_row_fully_granted(&self, module: &Module, actions: &[Action]) -> bool {
        actions.iter().all(|action| self.get(module, action))
    }

    /// Returns `true` if every given module grants this action.
    pub fn is_column_fully_granted(&self, modules: &[Module], action: &Action) -> bool {
        modules.iter().all(|module| self.get(module, action))
    }

    /// Materializes all missing cells as denied, existing cells keep their value.
    pub fn complete(&mut self, modules: &[Module], actions: &[Action]) {
        for module in modules {
            let row = self.0.entry(module.clone()).or_default();
            for action in actions {
                row.entry(action.clone()).or_insert(false);
            }
        }
    }

    pub fn complete_for(&mut self, catalog: &Catalog) {
        self.complete(catalog.modules(), catalog.actions());
    }

    /// Returns `true` if an explicit cell exists for every module and action.
    pub fn is_complete(&self, modules: &[Module], actions: &[Action]) -> bool {
        modules.iter().all(|module| {
            self.0
                .get(module)
                .is_some_and(|row| actions.iter().all(|action| row.contains_key(action)))
        })
    }

    /// Removes all cells of modules or actions unknown to the catalog.
    pub fn restrict_to(&mut self, catalog: &Catalog) {
        self.0.retain(|module, _| catalog.contains_module(module));
        for row in self.0.values_mut() {
            row.retain(|action, _| catalog.contains_action(action));
        }
    }

    /// Iterates over all granted (module, action) pairs.
    pub fn granted(&self) -> impl Iterator<Item = (&Module, &Action)> {
        self.0.iter().flat_map(|(module, row)| {
            row.iter()
                .filter(|(_, granted)| **granted)
                .map(move |(action, _)| (module, action))
        })
    }

    /// Returns `true` if not a single action is granted.
    pub fn denies_all(&self) -> bool {
        self.granted().next().is_none()
    }
}

impl PartialEq for PermissionMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.granted().eq(other.granted())
    }
}

impl Eq for PermissionMatrix {}

impl FromIterator<(Module, Action)> for PermissionMatrix {
    fn from_iter<T: IntoIterator<Item = (Module, Action)>>(iter: T) -> Self {
        let mut matrix = Self::default();
        for (module, action) in iter {
            matrix.set(&module, &action, true);
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Action, Catalog, Module};

    use super::PermissionMatrix;

    fn module(name: &str) -> Module {
        name.parse().unwrap()
    }

    fn action(name: &str) -> Action {
        name.parse().unwrap()
    }

    #[test]
    fn empty_matrix_denies_everything() {
        let catalog = Catalog::default();
        let matrix = PermissionMatrix::empty(catalog.modules(), catalog.actions());

        for module in catalog.modules() {
            for action in catalog.actions() {
                assert!(!matrix.get(module, action));
            }
        }

        assert!(matrix.denies_all());
        assert!(matrix.is_complete(catalog.modules(), catalog.actions()));
    }

    #[test]
    fn absent_cells_read_as_denied() {
        let matrix = PermissionMatrix::default();
        assert!(!matrix.get(&module("tanks"), &action("refill")));
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&["view"], false)]
    #[case(&["view", "create"], true)]
    fn row_fully_granted(#[case] grants: &[&str], #[case] expected: bool) {
        let actions = [action("view"), action("create")];
        let mut matrix = PermissionMatrix::default();
        for name in grants {
            matrix.set(&module("orders"), &action(name), true);
        }
        assert_eq!(
            matrix.is_row_fully_granted(&module("orders"), &actions),
            expected
        );
    }

    #[test]
    fn column_fully_granted() {
        let modules = [module("orders"), module("users")];
        let mut matrix = PermissionMatrix::default();
        matrix.set(&module("orders"), &action("view"), true);
        assert!(!matrix.is_column_fully_granted(&modules, &action("view")));

        matrix.set(&module("users"), &action("view"), true);
        assert!(matrix.is_column_fully_granted(&modules, &action("view")));
        assert!(!matrix.is_column_fully_granted(&modules, &action("create")));
    }

    #[test]
    fn complete_keeps_existing_cells() {
        let catalog = Catalog::default();
        let mut matrix = PermissionMatrix::from_iter([(module("cylinders"), action("view"))]);
        assert!(!matrix.is_complete(catalog.modules(), catalog.actions()));

        matrix.complete_for(&catalog);
        assert!(matrix.is_complete(catalog.modules(), catalog.actions()));
        assert!(matrix.get(&module("cylinders"), &action("view")));
        assert_eq!(matrix.granted().count(), 1);
    }

    #[test]
    fn semantic_equality() {
        let catalog = Catalog::default();
        let sparse = PermissionMatrix::from_iter([(module("cylinders"), action("delete"))]);
        let mut complete = catalog.empty_matrix();
        complete.set(&module("cylinders"), &action("delete"), true);

        assert_eq!(sparse, complete);
        assert_eq!(PermissionMatrix::default(), catalog.empty_matrix());
        assert_ne!(sparse, catalog.empty_matrix());
    }

    #[test]
    fn restrict_to_catalog() {
        let catalog = Catalog::default();
        let mut matrix = PermissionMatrix::from_iter([
            (module("cylinders"), action("view")),
            (module("legacy"), action("view")),
            (module("orders"), action("approve")),
        ]);
        matrix.restrict_to(&catalog);

        let granted: Vec<(&str, &str)> = matrix
            .granted()
            .map(|(m, a)| (m.as_str(), a.as_str()))
            .collect();
        assert_eq!(granted, vec![("cylinders", "view")]);
    }

    #[test]
    fn serialize_as_nested_map() {
        let matrix = PermissionMatrix::from_iter([(module("orders"), action("view"))]);
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"orders":{"view":true}}"#);

        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&matrix, &mut bytes).unwrap();
        let decoded: PermissionMatrix = ciborium::from_reader(&bytes[..]).unwrap();
        assert_eq!(decoded, matrix);
    }
}
