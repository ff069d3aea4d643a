pub mod arc;
pub mod option;
pub mod result;
pub mod slice;

pub mod prelude {
    pub use crate::{
        assert_empty, assert_err, assert_none, assert_not_same, assert_ok, assert_same,
        assert_some, assert_unique,
    };
}
