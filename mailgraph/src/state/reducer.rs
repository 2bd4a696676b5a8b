//! Per-field reducers: how a patch value combines with the current value.

use serde::Serialize;

/// Reducer kind of a state field, chosen where the schema is declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Reducer {
    /// A present patch value overwrites the old one.
    Replace,
    /// A present patch sequence is concatenated after the old one.
    Append,
}

/// Replace reducer. `None` keeps `old`.
pub fn replace<T: Clone>(old: &mut T, new: &Option<T>) {
    if let Some(value) = new {
        *old = value.clone();
    }
}

/// Append reducer. Order and duplicates are preserved.
pub fn append<T: Clone>(old: &mut Vec<T>, new: &Option<Vec<T>>) {
    if let Some(values) = new {
        old.extend_from_slice(values);
    }
}
