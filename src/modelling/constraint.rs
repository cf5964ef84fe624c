use super::{LinExpr, ModelError};
use std::fmt;

/// A two sided bound `lower ≤ expression ≤ upper`.
///
/// The expression never carries a constant; it is folded into the bounds
/// on construction.  The bounds may be changed afterwards and are not
/// checked against each other until the model is solved.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) expression: LinExpr,
    pub lower: f64,
    pub upper: f64,
}

/// Comparison operators accepted by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

/// Handle of a constraint within its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// row of the constraint in the assembled problem
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Constraint {
    /// Build `lower ≤ expr ≤ upper`, moving the constant of `expr`
    /// into both bounds.
    pub fn new(expr: impl Into<LinExpr>, lower: f64, upper: f64) -> Self {
        let (expression, c) = expr.into().split_constant();
        Self {
            expression,
            lower: lower - c,
            upper: upper - c,
        }
    }

    /// `lhs ≤ rhs`
    pub fn le(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let diff = lhs.into().minus(&rhs.into());
        Self::new(diff, f64::NEG_INFINITY, 0.)
    }

    /// `lhs ≥ rhs`
    pub fn ge(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let diff = lhs.into().minus(&rhs.into());
        Self::new(diff, 0., f64::INFINITY)
    }

    /// `lhs == rhs`
    pub fn eq_to(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let diff = lhs.into().minus(&rhs.into());
        Self::new(diff, 0., 0.)
    }

    pub fn expression(&self) -> &LinExpr {
        &self.expression
    }

    /// True if the bounds hold at `values` within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let v = self.expression.evaluate(values);
        v >= self.lower - tol && v <= self.upper + tol
    }
}

/// Compare two expressions.  Strict comparisons have no meaning for a
/// QP and fail with [`ModelError::StrictInequality`].
///
/// ```
/// use qpmodel::modelling::{compare, Comparison, Model};
///
/// let mut model = Model::new();
/// let x = model.add_variable();
/// let c = compare(x + 5., Comparison::LessEqual, 10.).unwrap();
/// assert_eq!((c.lower, c.upper), (f64::NEG_INFINITY, 5.));
/// assert!(compare(x, Comparison::Less, 1.).is_err());
/// ```
pub fn compare(
    lhs: impl Into<LinExpr>,
    op: Comparison,
    rhs: impl Into<LinExpr>,
) -> Result<Constraint, ModelError> {
    match op {
        Comparison::LessEqual => Ok(Constraint::le(lhs, rhs)),
        Comparison::GreaterEqual => Ok(Constraint::ge(lhs, rhs)),
        Comparison::Equal => Ok(Constraint::eq_to(lhs, rhs)),
        Comparison::Less | Comparison::Greater => Err(ModelError::StrictInequality),
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{} == {}", self.expression, self.upper)
        } else if self.lower == f64::NEG_INFINITY {
            write!(f, "{} <= {}", self.expression, self.upper)
        } else if self.upper == f64::INFINITY {
            write!(f, "{} >= {}", self.expression, self.lower)
        } else {
            write!(f, "{} <= {} <= {}", self.lower, self.expression, self.upper)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modelling::Variable;

    #[test]
    fn test_constraint_bound_folding() {
        let x = Variable::new(0);
        let y = Variable::new(1);

        let c = Constraint::le(x + 5., 10.);
        assert_eq!(c.expression().constant(), 0.);
        assert_eq!((c.lower, c.upper), (f64::NEG_INFINITY, 5.));
        assert_eq!(c.to_string(), "1 x0 <= 5");

        let c = Constraint::eq_to(x + 5., 10.);
        assert_eq!((c.lower, c.upper), (5., 5.));

        let c = Constraint::ge(2. * x - 1., 3.);
        assert_eq!((c.lower, c.upper), (4., f64::INFINITY));

        // expression against expression reduces to a difference
        let c = Constraint::le(x + 1., y - 1.);
        assert_eq!(c.expression().coefficient(x), Some(1.));
        assert_eq!(c.expression().coefficient(y), Some(-1.));
        assert_eq!(c.upper, -2.);
        assert!(c.is_satisfied(&[0., 2.], 0.));
        assert!(!c.is_satisfied(&[0., 1.], 1e-9));

        assert!(matches!(
            compare(x, Comparison::Greater, y),
            Err(ModelError::StrictInequality)
        ));
        assert!(compare(x, Comparison::GreaterEqual, y).is_ok());
    }
}
