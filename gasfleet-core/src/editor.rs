// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure editing operations over a [`PermissionMatrix`].
//!
//! Every operation takes the matrix by reference and returns an edited copy, the caller decides
//! which version to keep and when to persist it. The same operations are used for group matrices
//! and individual user overrides.
//!
//! Row and column toggles behave like "select all" / "clear all" checkboxes: when every cell of
//! the row (or column) is granted they are all cleared, otherwise they are all granted. Cells
//! missing from the matrix count as denied and get materialized by the toggle.
use crate::identifier::{Action, Module};
use crate::matrix::PermissionMatrix;

impl PermissionMatrix {
    /// Returns a copy with exactly one cell flipped.
    pub fn toggled_cell(&self, module: &Module, action: &Action) -> Self {
        let mut matrix = self.clone();
        matrix.set(module, action, !self.get(module, action));
        matrix
    }

    /// Returns a copy where all given actions of one module are granted, or all cleared if they
    /// were fully granted before.
    ///
    /// An empty action list counts as fully granted and leaves the matrix unchanged.
    pub fn toggled_row(&self, module: &Module, actions: &[Action]) -> Self {
        let value = !self.is_row_fully_granted(module, actions);
        let mut matrix = self.clone();
        for action in actions {
            matrix.set(module, action, value);
        }
        matrix
    }

    /// Returns a copy where one action is granted in all given modules, or cleared in all of them
    /// if it was fully granted before.
    ///
    /// An empty module list counts as fully granted and leaves the matrix unchanged.
    pub fn toggled_column(&self, modules: &[Module], action: &Action) -> Self {
        let value = !self.is_column_fully_granted(modules, action);
        let mut matrix = self.clone();
        for module in modules {
            matrix.set(module, action, value);
        }
        matrix
    }
}

/// Flips a single cell, see [`PermissionMatrix::toggled_cell`].
pub fn toggle_cell(
    matrix: &PermissionMatrix,
    module: &Module,
    action: &Action,
) -> PermissionMatrix {
    matrix.toggled_cell(module, action)
}

pub fn toggle_row(
    matrix: &PermissionMatrix,
    module: &Module,
    actions: &[Action],
) -> PermissionMatrix {
    matrix.toggled_row(module, actions)
}

pub fn toggle_column(
    matrix: &PermissionMatrix,
    modules: &[Module],
    action: &Action,
) -> PermissionMatrix {
    matrix.toggled_column(modules, action)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Action, Catalog, Module, PermissionMatrix};

    use super::{toggle_cell, toggle_column, toggle_row};

    fn module(name: &str) -> Module {
        name.parse().unwrap()
    }

    fn action(name: &str) -> Action {
        name.parse().unwrap()
    }

    fn orders_and_users() -> Catalog {
        Catalog::new(
            [module("orders"), module("users")],
            [action("view"), action("create")],
        )
    }

    #[test]
    fn toggle_cell_flips_one_cell() {
        let catalog = orders_and_users();
        let matrix = catalog.empty_matrix();

        let toggled = toggle_cell(&matrix, &module("orders"), &action("view"));
        assert!(toggled.get(&module("orders"), &action("view")));
        assert_eq!(toggled.granted().count(), 1);

        // Caller's copy is untouched.
        assert!(matrix.denies_all());
    }

    #[rstest]
    #[case("orders", "view")]
    #[case("users", "create")]
    #[case("machines", "delete")]
    fn toggle_cell_is_its_own_inverse(#[case] m: &str, #[case] a: &str) {
        let catalog = orders_and_users();
        let mut matrix = catalog.empty_matrix();
        matrix.set(&module("users"), &action("view"), true);

        let twice = toggle_cell(
            &toggle_cell(&matrix, &module(m), &action(a)),
            &module(m),
            &action(a),
        );
        assert_eq!(twice, matrix);
    }

    #[test]
    fn orders_row_scenario() {
        let catalog = orders_and_users();
        let actions = catalog.actions();
        let orders = module("orders");
        let users = module("users");

        let step_1 = toggle_cell(&catalog.empty_matrix(), &orders, &action("view"));
        assert!(step_1.get(&orders, &action("view")));
        assert!(!step_1.get(&orders, &action("create")));
        assert!(!step_1.get(&users, &action("view")));
        assert!(!step_1.get(&users, &action("create")));

        // Row is not fully granted yet, so both actions get granted.
        let step_2 = toggle_row(&step_1, &orders, actions);
        assert!(step_2.get(&orders, &action("view")));
        assert!(step_2.get(&orders, &action("create")));
        assert!(!step_2.get(&users, &action("view")));

        // Row is fully granted now, toggling clears it.
        let step_3 = toggle_row(&step_2, &orders, actions);
        assert!(!step_3.get(&orders, &action("view")));
        assert!(!step_3.get(&orders, &action("create")));
        assert!(step_3.denies_all());
    }

    #[rstest]
    #[case(&[])]
    #[case(&["view"])]
    #[case(&["view", "create"])]
    fn toggle_row_flips_fully_granted_state(#[case] grants: &[&str]) {
        let catalog = orders_and_users();
        let orders = module("orders");
        let mut matrix = catalog.empty_matrix();
        for name in grants {
            matrix.set(&orders, &action(name), true);
        }

        let before = matrix.is_row_fully_granted(&orders, catalog.actions());
        let toggled = toggle_row(&matrix, &orders, catalog.actions());
        assert_eq!(
            toggled.is_row_fully_granted(&orders, catalog.actions()),
            !before
        );

        // Other rows are not affected.
        assert!(!toggled.get(&module("users"), &action("view")));
    }

    #[test]
    fn toggle_column_mirrors_toggle_row() {
        let catalog = orders_and_users();
        let view = action("view");

        let matrix = toggle_cell(&catalog.empty_matrix(), &module("users"), &view);
        let granted = toggle_column(&matrix, catalog.modules(), &view);
        assert!(granted.is_column_fully_granted(catalog.modules(), &view));
        assert!(!granted.get(&module("orders"), &action("create")));

        let cleared = toggle_column(&granted, catalog.modules(), &view);
        assert!(!cleared.is_column_fully_granted(catalog.modules(), &view));
        assert!(cleared.denies_all());
    }

    #[test]
    fn toggles_over_empty_lists_change_nothing() {
        let catalog = orders_and_users();
        let matrix = toggle_cell(&catalog.empty_matrix(), &module("orders"), &action("view"));

        let row = toggle_row(&matrix, &module("orders"), &[]);
        assert!(row.is_row_fully_granted(&module("orders"), &[]));
        assert_eq!(row, matrix);
        assert!(row.is_complete(catalog.modules(), catalog.actions()));

        let column = toggle_column(&matrix, &[], &action("create"));
        assert!(column.is_column_fully_granted(&[], &action("create")));
        assert_eq!(column, matrix);
    }

    #[test]
    fn toggles_materialize_missing_cells() {
        let catalog = orders_and_users();
        let legacy = PermissionMatrix::from_iter([(module("orders"), action("view"))]);
        assert!(!legacy.is_complete(catalog.modules(), catalog.actions()));

        let row = toggle_row(&legacy, &module("users"), catalog.actions());
        assert!(row.is_row_fully_granted(&module("users"), catalog.actions()));

        let column = toggle_column(&legacy, catalog.modules(), &action("create"));
        assert!(column.is_column_fully_granted(catalog.modules(), &action("create")));

        let cleared = toggle_column(&column, catalog.modules(), &action("create"));
        assert!(!cleared.get(&module("users"), &action("create")));
        assert!(cleared.get(&module("orders"), &action("view")));
    }
}
