//! Checks over collections of ids, names and rows.

use std::{collections::HashSet, hash::Hash};

/// Returns the first element that appears more than once.
pub fn first_duplicate<'a, T: Eq + Hash>(items: impl IntoIterator<Item = &'a T>) -> Option<&'a T> {
    let mut seen = HashSet::new();
    items.into_iter().find(|item| !seen.insert(*item))
}

/// Asserts no element repeats, naming the first repeated one.
#[macro_export]
macro_rules! assert_unique {
    ($items:expr) => {{
        let items = &$items;
        if let Some(dup) = $crate::slice::first_duplicate(items.iter()) {
            panic!(
                "`{}` repeats {:?}; all={:?}",
                stringify!($items),
                dup,
                items,
            );
        }
    }};
}

/// Asserts a collection that supports `is_empty` and `Debug` holds nothing.
#[macro_export]
macro_rules! assert_empty {
    ($items:expr) => {{
        let items = &$items;
        if !items.is_empty() {
            panic!("expected `{}` to be empty; got {:?}", stringify!($items), items);
        }
    }};
}
