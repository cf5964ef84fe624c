use super::{QuadExpr, Variable};
use std::collections::HashMap;
use std::fmt;

/// An affine expression `Σ aᵢxᵢ + c`.
///
/// Each variable appears at most once.  Combining expressions sums
/// coefficients and never drops an entry, so a coefficient of exactly
/// zero may remain stored.  Iteration order over the terms is not
/// significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    pub(crate) coefficients: HashMap<Variable, f64>,
    pub(crate) constant: f64,
}

impl LinExpr {
    /// the empty expression `0`
    pub fn new() -> Self {
        Self::default()
    }

    /// a constant expression
    pub fn constant_expr(c: f64) -> Self {
        Self {
            coefficients: HashMap::new(),
            constant: c,
        }
    }

    pub fn coefficients(&self) -> &HashMap<Variable, f64> {
        &self.coefficients
    }

    /// stored coefficient of `var`, if any
    pub fn coefficient(&self, var: Variable) -> Option<f64> {
        self.coefficients.get(&var).copied()
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// number of stored terms, including zero coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    // ---------------------------------
    // in place accumulation
    // ---------------------------------

    /// add `coeff * var`
    pub fn add_term(&mut self, var: Variable, coeff: f64) -> &mut Self {
        *self.coefficients.entry(var).or_insert(0.) += coeff;
        self
    }

    pub fn add_variable(&mut self, var: Variable) -> &mut Self {
        self.add_term(var, 1.)
    }

    pub fn add_expr(&mut self, other: &LinExpr) -> &mut Self {
        for (&var, &coeff) in other.coefficients.iter() {
            self.add_term(var, coeff);
        }
        self.constant += other.constant;
        self
    }

    pub fn add_constant(&mut self, c: f64) -> &mut Self {
        self.constant += c;
        self
    }

    pub fn subtract_variable(&mut self, var: Variable) -> &mut Self {
        self.add_term(var, -1.)
    }

    pub fn subtract_expr(&mut self, other: &LinExpr) -> &mut Self {
        for (&var, &coeff) in other.coefficients.iter() {
            self.add_term(var, -coeff);
        }
        self.constant -= other.constant;
        self
    }

    pub fn subtract_constant(&mut self, c: f64) -> &mut Self {
        self.constant -= c;
        self
    }

    /// multiply every coefficient and the constant by `k`
    pub fn scale(&mut self, k: f64) -> &mut Self {
        self.coefficients.values_mut().for_each(|c| *c *= k);
        self.constant *= k;
        self
    }

    // ---------------------------------
    // copy on combine
    // ---------------------------------

    pub fn plus(&self, other: &LinExpr) -> LinExpr {
        let mut out = self.clone();
        out.add_expr(other);
        out
    }

    pub fn minus(&self, other: &LinExpr) -> LinExpr {
        let mut out = self.clone();
        out.subtract_expr(other);
        out
    }

    pub fn scaled(&self, k: f64) -> LinExpr {
        let mut out = self.clone();
        out.scale(k);
        out
    }

    /// Bilinear expansion of `self * other`.
    ///
    /// Pairs of terms give quadratic terms, terms multiplied by the other
    /// side's constant give linear terms and the two constants give the
    /// constant.  Terms with a zero coefficient are skipped.
    pub fn multiply(&self, other: &LinExpr) -> QuadExpr {
        let mut out = QuadExpr::new();

        for (&v1, &c1) in self.coefficients.iter().filter(|&(_, &c)| c != 0.) {
            for (&v2, &c2) in other.coefficients.iter().filter(|&(_, &c)| c != 0.) {
                out.add_quad_term(v1, v2, c1 * c2);
            }
        }
        if other.constant != 0. {
            for (&v, &c) in self.coefficients.iter().filter(|&(_, &c)| c != 0.) {
                out.linear.add_term(v, c * other.constant);
            }
        }
        if self.constant != 0. {
            for (&v, &c) in other.coefficients.iter().filter(|&(_, &c)| c != 0.) {
                out.linear.add_term(v, c * self.constant);
            }
        }
        out.linear.constant = self.constant * other.constant;
        out
    }

    /// The expression without its constant, together with the constant.
    pub(crate) fn split_constant(&self) -> (LinExpr, f64) {
        let expr = LinExpr {
            coefficients: self.coefficients.clone(),
            constant: 0.,
        };
        (expr, self.constant)
    }

    /// Evaluate at the point `values`, indexed by variable.
    ///
    /// # Panics
    /// Panics if a variable's index is out of range of `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .fold(self.constant, |acc, (v, &c)| acc + c * values[v.index()])
    }

    /// largest variable index referenced by a stored term
    pub(crate) fn max_index(&self) -> Option<usize> {
        self.coefficients.keys().map(|v| v.index()).max()
    }
}

impl From<Variable> for LinExpr {
    fn from(var: Variable) -> Self {
        let mut expr = LinExpr::new();
        expr.add_variable(var);
        expr
    }
}

impl From<f64> for LinExpr {
    fn from(c: f64) -> Self {
        LinExpr::constant_expr(c)
    }
}

// writes `a b + c d - e f + k` from (label, coefficient) pairs.  An
// expression with no terms prints its constant alone.
pub(crate) fn fmt_terms(
    f: &mut fmt::Formatter<'_>,
    terms: impl IntoIterator<Item = (String, f64)>,
    constant: f64,
) -> fmt::Result {
    let mut first = true;
    for (label, c) in terms {
        match (first, c < 0.) {
            (true, false) => write!(f, "{c} {label}")?,
            (true, true) => write!(f, "-{} {label}", -c)?,
            (false, false) => write!(f, " + {c} {label}")?,
            (false, true) => write!(f, " - {} {label}", -c)?,
        }
        first = false;
    }
    if first {
        write!(f, "{constant}")
    } else if constant > 0. {
        write!(f, " + {constant}")
    } else if constant < 0. {
        write!(f, " - {}", -constant)
    } else {
        Ok(())
    }
}

impl fmt::Display for LinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<_> = self.coefficients.iter().collect();
        terms.sort_unstable_by_key(|(v, _)| **v);
        fmt_terms(
            f,
            terms.into_iter().map(|(v, &c)| (v.to_string(), c)),
            self.constant,
        )
    }
}
