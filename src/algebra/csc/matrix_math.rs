#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;

impl<T: FloatT> CscMatrix<T> {
    // row indices and values stored in column `col`
    fn column(&self, col: usize) -> (&[usize], &[T]) {
        let rng = self.colptr[col]..self.colptr[col + 1];
        (&self.rowval[rng.clone()], &self.nzval[rng])
    }
}

// y = b*y, skipping the work for the common cases b = 0 and b = 1
fn prescale<T: FloatT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }
}

impl<T: FloatT> MatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    // y = a*A*x + b*y
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        prescale(y, b);
        if a == T::zero() {
            return;
        }
        for (col, &xj) in x.iter().enumerate() {
            let (rows, vals) = self.column(col);
            for (&row, &v) in zip(rows, vals) {
                y[row] += a * v * xj;
            }
        }
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, CscMatrix<T>> {
    type T = T;

    // y = a*Aᵀ*x + b*y, one dot product per column of A
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert_eq!(x.len(), A.m);
        assert_eq!(y.len(), A.n);

        prescale(y, b);
        if a == T::zero() {
            return;
        }
        for (col, yj) in y.iter_mut().enumerate() {
            let (rows, vals) = A.column(col);
            let dot = zip(rows, vals).fold(T::zero(), |acc, (&row, &v)| acc + v * x[row]);
            *yj += a * dot;
        }
    }
}

impl<T: FloatT> SymMatrixVectorMultiply for Symmetric<'_, CscMatrix<T>> {
    type T = T;

    // y = a*M*x + b*y with M the symmetric matrix whose upper
    // triangle is stored
    fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let M = self.src;
        assert_eq!(M.m, M.n);
        assert_eq!(x.len(), M.n);
        assert_eq!(y.len(), M.n);

        prescale(y, b);
        for col in 0..M.n {
            let (rows, vals) = M.column(col);
            for (&row, &v) in zip(rows, vals) {
                y[row] += a * v * x[col];
                if row != col {
                    y[col] += a * v * x[row];
                }
            }
        }
    }
}

impl<T: FloatT> MatrixMath for CscMatrix<T> {
    type T = T;

    fn col_norms_no_reset(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (col, norm) in norms.iter_mut().enumerate() {
            *norm = self.column(col).1.iter().fold(*norm, |acc, v| T::max(acc, v.abs()));
        }
    }

    fn col_norms_sym_no_reset(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (row, col, v) in self.triplet_iter() {
            norms[col] = T::max(norms[col], v.abs());
            norms[row] = T::max(norms[row], v.abs());
        }
    }

    fn row_norms_no_reset(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.m);
        for (&row, v) in zip(&self.rowval, &self.nzval) {
            norms[row] = T::max(norms[row], v.abs());
        }
    }

    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(l.len(), self.m);
        assert_eq!(r.len(), self.n);
        for (col, &rc) in r.iter().enumerate() {
            let rng = self.colptr[col]..self.colptr[col + 1];
            for (v, &row) in zip(&mut self.nzval[rng.clone()], &self.rowval[rng]) {
                *v *= l[row] * rc;
            }
        }
    }
}
