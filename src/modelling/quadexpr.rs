use super::linexpr::fmt_terms;
use super::{LinExpr, Variable};
use std::collections::HashMap;
use std::fmt;

/// A quadratic expression `Σ cᵢⱼxᵢxⱼ + Σ aᵢxᵢ + k`.
///
/// A quadratic term `c·xᵢ·xⱼ` means exactly that product, so `x*x` has
/// coefficient one.  Pair keys are stored with the lower variable index
/// first, so `x*y` and `y*x` always land in the same entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadExpr {
    pub(crate) quadratic: HashMap<(Variable, Variable), f64>,
    pub(crate) linear: LinExpr,
}

#[inline]
fn canonical(a: Variable, b: Variable) -> (Variable, Variable) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl QuadExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quadratic(&self) -> &HashMap<(Variable, Variable), f64> {
        &self.quadratic
    }

    /// stored coefficient of `a*b`, in either order
    pub fn quad_coefficient(&self, a: Variable, b: Variable) -> Option<f64> {
        self.quadratic.get(&canonical(a, b)).copied()
    }

    /// the linear and constant part
    pub fn linear(&self) -> &LinExpr {
        &self.linear
    }

    pub fn constant(&self) -> f64 {
        self.linear.constant
    }

    // ---------------------------------
    // in place accumulation
    // ---------------------------------

    /// add `coeff * a * b`
    pub fn add_quad_term(&mut self, a: Variable, b: Variable, coeff: f64) -> &mut Self {
        *self.quadratic.entry(canonical(a, b)).or_insert(0.) += coeff;
        self
    }

    pub fn add_quad_expr(&mut self, other: &QuadExpr) -> &mut Self {
        for (&(a, b), &c) in other.quadratic.iter() {
            self.add_quad_term(a, b, c);
        }
        self.linear.add_expr(&other.linear);
        self
    }

    pub fn add_expr(&mut self, other: &LinExpr) -> &mut Self {
        self.linear.add_expr(other);
        self
    }

    pub fn add_variable(&mut self, var: Variable) -> &mut Self {
        self.linear.add_variable(var);
        self
    }

    pub fn add_constant(&mut self, c: f64) -> &mut Self {
        self.linear.add_constant(c);
        self
    }

    pub fn subtract_quad_expr(&mut self, other: &QuadExpr) -> &mut Self {
        for (&(a, b), &c) in other.quadratic.iter() {
            self.add_quad_term(a, b, -c);
        }
        self.linear.subtract_expr(&other.linear);
        self
    }

    pub fn subtract_expr(&mut self, other: &LinExpr) -> &mut Self {
        self.linear.subtract_expr(other);
        self
    }

    pub fn subtract_variable(&mut self, var: Variable) -> &mut Self {
        self.linear.subtract_variable(var);
        self
    }

    pub fn subtract_constant(&mut self, c: f64) -> &mut Self {
        self.linear.subtract_constant(c);
        self
    }

    pub fn scale(&mut self, k: f64) -> &mut Self {
        self.quadratic.values_mut().for_each(|c| *c *= k);
        self.linear.scale(k);
        self
    }

    // ---------------------------------
    // copy on combine
    // ---------------------------------

    pub fn plus(&self, other: &QuadExpr) -> QuadExpr {
        let mut out = self.clone();
        out.add_quad_expr(other);
        out
    }

    pub fn minus(&self, other: &QuadExpr) -> QuadExpr {
        let mut out = self.clone();
        out.subtract_quad_expr(other);
        out
    }

    pub fn scaled(&self, k: f64) -> QuadExpr {
        let mut out = self.clone();
        out.scale(k);
        out
    }

    /// Evaluate at the point `values`, indexed by variable.
    ///
    /// # Panics
    /// Panics if a variable's index is out of range of `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.quadratic
            .iter()
            .fold(self.linear.evaluate(values), |acc, (&(a, b), &c)| {
                acc + c * values[a.index()] * values[b.index()]
            })
    }

    pub(crate) fn max_index(&self) -> Option<usize> {
        // keys are canonical, so the second entry carries the larger index
        let quad = self.quadratic.keys().map(|(_, b)| b.index()).max();
        quad.max(self.linear.max_index())
    }
}

impl From<LinExpr> for QuadExpr {
    fn from(linear: LinExpr) -> Self {
        Self {
            quadratic: HashMap::new(),
            linear,
        }
    }
}

impl From<Variable> for QuadExpr {
    fn from(var: Variable) -> Self {
        QuadExpr::from(LinExpr::from(var))
    }
}

impl From<f64> for QuadExpr {
    fn from(c: f64) -> Self {
        QuadExpr::from(LinExpr::from(c))
    }
}

impl fmt::Display for QuadExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut quad: Vec<_> = self.quadratic.iter().collect();
        quad.sort_unstable_by_key(|(k, _)| **k);
        let mut lin: Vec<_> = self.linear.coefficients.iter().collect();
        lin.sort_unstable_by_key(|(v, _)| **v);

        let terms = quad
            .into_iter()
            .map(|(&(a, b), &c)| {
                if a == b {
                    (format!("{a}²"), c)
                } else {
                    (format!("{a} {b}"), c)
                }
            })
            .chain(lin.into_iter().map(|(v, &c)| (v.to_string(), c)));

        fmt_terms(f, terms, self.linear.constant)
    }
}
