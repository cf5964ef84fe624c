#![allow(non_snake_case)]

use super::{Constraint, ModelError, QuadExpr};
use crate::algebra::CscMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A model in the form accepted by a QP engine
///
/// ```text
/// minimize    0.5 xᵀPx + qᵀx + constant
/// subject to  l ≤ Ax ≤ u
/// ```
///
/// where `P` holds the upper triangle only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandardForm {
    pub P: CscMatrix<f64>,
    pub q: Vec<f64>,
    pub A: CscMatrix<f64>,
    pub l: Vec<f64>,
    pub u: Vec<f64>,
    /// objective constant, which the engine never sees
    pub constant: f64,
}

impl StandardForm {
    /// Assemble an objective and constraints over `n` variables.
    ///
    /// A term `c·xᵢ·xᵢ` becomes `Pᵢᵢ = 2c` while `c·xᵢ·xⱼ` becomes
    /// `Pᵢⱼ = c` for `i < j`, so that `0.5 xᵀPx` reproduces the objective
    /// with the lower triangle mirrored.
    pub fn assemble(
        n: usize,
        objective: &QuadExpr,
        constraints: &[Constraint],
    ) -> Result<Self, ModelError> {
        let check = |idx: Option<usize>| match idx {
            Some(i) if i >= n => Err(ModelError::UnknownVariable(i)),
            _ => Ok(()),
        };
        check(objective.max_index())?;
        for c in constraints {
            check(c.expression.max_index())?;
        }

        let nnzP = objective.quadratic.len();
        let (mut I, mut J, mut V) = (
            Vec::with_capacity(nnzP),
            Vec::with_capacity(nnzP),
            Vec::with_capacity(nnzP),
        );
        for (&(a, b), &c) in objective.quadratic.iter() {
            // keys are canonical, so (a, b) is in the upper triangle
            let (i, j) = (a.index(), b.index());
            I.push(i);
            J.push(j);
            V.push(if i == j { 2. * c } else { c });
        }
        let P = CscMatrix::new_from_triplets(n, n, I, J, V);

        let mut q = vec![0.; n];
        for (&v, &c) in objective.linear.coefficients.iter() {
            q[v.index()] = c;
        }

        let m = constraints.len();
        let nnzA = constraints.iter().map(|c| c.expression.len()).sum();
        let (mut I, mut J, mut V) = (
            Vec::with_capacity(nnzA),
            Vec::with_capacity(nnzA),
            Vec::with_capacity(nnzA),
        );
        for (row, c) in constraints.iter().enumerate() {
            for (&v, &coeff) in c.expression.coefficients.iter() {
                I.push(row);
                J.push(v.index());
                V.push(coeff);
            }
        }
        let A = CscMatrix::new_from_triplets(m, n, I, J, V);

        let l = constraints.iter().map(|c| c.lower).collect();
        let u = constraints.iter().map(|c| c.upper).collect();

        Ok(Self {
            P,
            q,
            A,
            l,
            u,
            constant: objective.linear.constant,
        })
    }

    /// number of variables
    pub fn n(&self) -> usize {
        self.A.n
    }

    /// number of constraints
    pub fn m(&self) -> usize {
        self.A.m
    }
}
