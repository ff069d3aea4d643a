use ormlet_core::stmt::{Props, Record};

use std::fmt;
use std::rc::Rc;

/// A row condition used by `filter` and `exclude`.
#[derive(Clone)]
pub enum Lookup<'a> {
    /// Every listed field equals the given value
    Props(Props),

    /// A user predicate over the row
    Predicate(Rc<dyn Fn(&Record) -> bool + 'a>),
}

/// Sort direction for [`QuerySet::order_by`](super::QuerySet::order_by).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Lookup<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Lookup::Props(props) => record.matches(props),
            Lookup::Predicate(f) => f(record),
        }
    }
}

impl fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Props(props) => f.debug_tuple("Props").field(props).finish(),
            Lookup::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
