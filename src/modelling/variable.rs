use std::fmt;

/// A decision variable of a [`Model`](crate::modelling::Model).
///
/// A variable is a handle carrying its zero based column index.  Equality
/// and hashing use the index only, so a variable must never be combined
/// with expressions belonging to a different model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    index: usize,
}

impl Variable {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    /// column of the variable in the assembled problem
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.index)
    }
}
