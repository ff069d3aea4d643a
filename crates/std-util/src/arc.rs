//! Pointer identity checks for shared snapshots.

/// Asserts two `Arc`s point at the same allocation.
#[macro_export]
macro_rules! assert_same {
    ($left:expr, $right:expr $(,)?) => {{
        let left = &$left;
        let left: &std::sync::Arc<_> = left;
        let right = &$right;
        let right: &std::sync::Arc<_> = right;
        assert!(
            std::sync::Arc::ptr_eq(left, right),
            "expected `{}` and `{}` to share one allocation",
            stringify!($left),
            stringify!($right),
        );
    }};
}

/// Asserts two `Arc`s point at different allocations.
#[macro_export]
macro_rules! assert_not_same {
    ($left:expr, $right:expr $(,)?) => {{
        let left = &$left;
        let left: &std::sync::Arc<_> = left;
        let right = &$right;
        let right: &std::sync::Arc<_> = right;
        assert!(
            !std::sync::Arc::ptr_eq(left, right),
            "expected `{}` and `{}` to be distinct allocations",
            stringify!($left),
            stringify!($right),
        );
    }};
}
