//! Rows that carry an identity of their own.

use std::collections::HashMap;
use std::hash::Hash;

/// A row addressable by a strongly-typed key.
///
/// Lets the folds build join indexes without knowing the concrete row type.
pub trait Entity {
    type Id: Clone + Eq + Ord + Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Index `rows` by id. On duplicate ids the last row wins.
pub fn index_by_id<E: Entity>(rows: &[E]) -> HashMap<&E::Id, &E> {
    rows.iter().map(|row| (row.id(), row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Customer, CustomerId, Employee, EmployeeId};

    #[test]
    fn indexes_rows_by_their_key() {
        let employees = vec![
            Employee::new(EmployeeId::new(2), "Andrew", "Fuller"),
            Employee::new(EmployeeId::new(1), "Nancy", "Davolio"),
        ];
        let index = index_by_id(&employees);
        assert_eq!(index.len(), 2);
        assert_eq!(index[&EmployeeId::new(1)].last_name, "Davolio");
    }

    #[test]
    fn last_duplicate_wins() {
        let customers = vec![Customer::new("ALFKI", "Old name"), Customer::new("ALFKI", "New name")];
        let index = index_by_id(&customers);
        assert_eq!(index[&CustomerId::from("ALFKI")].company_name, "New name");
    }
}
