#![allow(non_snake_case)]
use crate::algebra::*;
use core::cmp::{max, min};
use derive_builder::Builder;
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorisation`] operations

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot at index {0}")]
    ZeroPivot(usize),
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Unable to compute a fill-reducing ordering")]
    OrderingFailure,
}

/// Settings for [`LdlFactorisation`]

#[derive(Builder, Debug, Clone)]
pub struct LdlSettings {
    /// multiplier on the AMD threshold above which rows count as dense
    #[builder(default = "1.0")]
    pub amd_dense_scale: f64,
    /// elimination order to use in place of AMD
    #[builder(default = "None", setter(strip_option))]
    pub perm: Option<Vec<usize>>,
}

impl Default for LdlSettings {
    fn default() -> LdlSettings {
        LdlSettingsBuilder::default().build().unwrap()
    }
}

/// LDLᵀ factorization of a symmetric quasidefinite matrix `A`, computed
/// as `PAPᵀ = LDLᵀ` for a fill-reducing permutation `P`.
///
/// Construction performs the symbolic analysis only.  Values are
/// factored by [`refactor`](LdlFactorisation::refactor), after which
/// [`solve`](LdlFactorisation::solve) may be called.

#[derive(Debug)]
pub struct LdlFactorisation<T = f64> {
    /// elimination order
    pub perm: Vec<usize>,
    /// strictly lower triangular factor
    pub L: CscMatrix<T>,
    pub D: Vec<T>,
    pub Dinv: Vec<T>,

    // upper triangle of PAPᵀ, which is what gets factored
    triuA: CscMatrix<T>,
    // entry k of the input is held at triuA.nzval[AtoPAPt[k]]
    AtoPAPt: Vec<usize>,

    etree: Vec<usize>,
    Lnz: Vec<usize>,
    iwork: Vec<usize>,
    bwork: Vec<bool>,
    fwork: Vec<T>,

    positive_inertia: usize,
    is_factored: bool,
}

impl<T> LdlFactorisation<T>
where
    T: FloatT,
{
    /// Order and analyse the upper triangular matrix `A`.  Every column
    /// of `A` must hold at least one entry.
    pub fn new(A: &CscMatrix<T>, opts: Option<LdlSettings>) -> Result<Self, LdlError> {
        check_structure(A)?;
        let opts = opts.unwrap_or_default();
        let n = A.n;

        let (perm, iperm) = match opts.perm {
            Some(perm) => {
                let iperm = invperm(&perm)?;
                (perm, iperm)
            }
            None => amd_ordering(A, opts.amd_dense_scale)?,
        };

        let (triuA, AtoPAPt) = permute_symmetric(A, &iperm);

        let mut etree = vec![0; n];
        let mut Lnz = vec![0; n];
        let mut iwork = vec![0; 3 * n];
        elimination_tree(&triuA, &mut iwork, &mut Lnz, &mut etree);

        let mut Lp = vec![0; n + 1];
        for (k, &nz) in Lnz.iter().enumerate() {
            Lp[k + 1] = Lp[k] + nz;
        }
        let nnzL = Lp[n];
        let L = CscMatrix::new(n, n, Lp, vec![0; nnzL], vec![T::zero(); nnzL]);

        Ok(Self {
            perm,
            L,
            D: vec![T::zero(); n],
            Dinv: vec![T::zero(); n],
            triuA,
            AtoPAPt,
            etree,
            Lnz,
            iwork,
            bwork: vec![false; n],
            fwork: vec![T::zero(); n],
            positive_inertia: 0,
            is_factored: false,
        })
    }

    /// number of positive entries in `D` after the last factorization
    pub fn positive_inertia(&self) -> usize {
        self.positive_inertia
    }

    pub fn is_factored(&self) -> bool {
        self.is_factored
    }

    /// Overwrite the values of the matrix given at construction.  The
    /// values are in that matrix's own entry order.
    pub fn set_values(&mut self, values: &[T]) {
        assert_eq!(values.len(), self.AtoPAPt.len());
        let nzval = &mut self.triuA.nzval;
        for (&v, &idx) in zip(values, &self.AtoPAPt) {
            nzval[idx] = v;
        }
        self.is_factored = false;
    }

    /// Numeric factorization of the current values.  Returns the number
    /// of positive pivots.
    pub fn refactor(&mut self) -> Result<usize, LdlError> {
        self.is_factored = false;
        let positive = factor_numeric(
            &self.triuA,
            &mut self.L,
            &mut self.D,
            &mut self.Dinv,
            &self.Lnz,
            &self.etree,
            &mut self.bwork,
            &mut self.iwork,
            &mut self.fwork,
        )?;
        self.positive_inertia = positive;
        self.is_factored = true;
        Ok(positive)
    }

    /// Solves `Ax = b` using the LDLᵀ factors, in place (x replaces b).
    ///
    /// # Panics
    /// Panics if there is no valid factorization or if `b` has the
    /// wrong length.
    pub fn solve(&mut self, b: &mut [T]) {
        assert!(self.is_factored);
        assert_eq!(b.len(), self.D.len());

        let x = &mut self.fwork;
        permute(x, b, &self.perm);
        solve_factored(&self.L, &self.Dinv, x);
        ipermute(b, x, &self.perm);
    }
}

fn check_structure<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    if A.m != A.n || A.check_format().is_err() {
        return Err(LdlError::IncompatibleDimension);
    }
    if !A.is_triu() {
        return Err(LdlError::NotUpperTriangular);
    }
    if A.colptr.windows(2).any(|c| c[0] == c[1]) {
        return Err(LdlError::EmptyColumn);
    }
    Ok(())
}

fn amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    amd_dense_scale: f64,
) -> Result<(Vec<usize>, Vec<usize>), LdlError> {
    if A.n == 0 {
        return Ok((vec![], vec![]));
    }
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, iperm, _info) = amd::order(A.n, &A.colptr, &A.rowval, &control)
        .map_err(|_| LdlError::OrderingFailure)?;
    Ok((perm, iperm))
}

const UNKNOWN: usize = usize::MAX;

// Parent of each column in the elimination tree, and the number of
// entries in each column of L.
fn elimination_tree<T: FloatT>(
    A: &CscMatrix<T>,
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) {
    work.fill(0);
    Lnz.fill(0);
    etree.fill(UNKNOWN);

    for j in 0..A.n {
        work[j] = j;
        for &row in &A.rowval[A.colptr[j]..A.colptr[j + 1]] {
            let mut i = row;
            while work[i] != j {
                if etree[i] == UNKNOWN {
                    etree[i] = j;
                }
                Lnz[i] += 1;
                work[i] = j;
                i = etree[i];
            }
        }
    }
}

// Row k of L solves L[0..k, 0..k] y = A[0..k, k].  The nonzero pattern
// of y is found by walking the elimination tree up from every nonzero
// of that column of A.
#[allow(clippy::too_many_arguments)]
fn factor_numeric<T: FloatT>(
    A: &CscMatrix<T>,
    L: &mut CscMatrix<T>,
    D: &mut [T],
    Dinv: &mut [T],
    Lnz: &[usize],
    etree: &[usize],
    bwork: &mut [bool],
    iwork: &mut [usize],
    fwork: &mut [T],
) -> Result<usize, LdlError> {
    let n = A.n;
    let (Ap, Ai, Ax) = (&A.colptr, &A.rowval, &A.nzval);
    let (Lp, Li, Lx) = (&L.colptr, &mut L.rowval, &mut L.nzval);
    debug_assert!(zip(Lnz, Lp.windows(2)).all(|(&nz, p)| p[1] - p[0] == nz));

    let visited = bwork;
    let (y_idx, iwork) = iwork.split_at_mut(n);
    let (elim_buffer, next_colspace) = iwork.split_at_mut(n);
    let y_vals = fwork;

    visited.fill(false);
    y_vals.fill(T::zero());
    D.fill(T::zero());
    next_colspace.copy_from_slice(&Lp[..n]);

    let mut positive = 0;

    for k in 0..n {
        let mut nnz_y = 0;

        for p in Ap[k]..Ap[k + 1] {
            let bidx = Ai[p];
            if bidx == k {
                D[k] = Ax[p];
                continue;
            }
            y_vals[bidx] = Ax[p];

            let mut nnz_e = 0;
            let mut next = bidx;
            while next != UNKNOWN && next < k && !visited[next] {
                visited[next] = true;
                elim_buffer[nnz_e] = next;
                nnz_e += 1;
                next = etree[next];
            }
            // the path is appended to the pattern in reverse
            while nnz_e != 0 {
                nnz_e -= 1;
                y_idx[nnz_y] = elim_buffer[nnz_e];
                nnz_y += 1;
            }
        }

        for &cidx in y_idx[..nnz_y].iter().rev() {
            let yc = y_vals[cidx];
            let slot = next_colspace[cidx];
            let start = Lp[cidx];
            for (&Lij, &Lxj) in zip(&Li[start..slot], &Lx[start..slot]) {
                y_vals[Lij] -= Lxj * yc;
            }

            Lx[slot] = yc * Dinv[cidx];
            D[k] -= yc * Lx[slot];
            Li[slot] = k;
            next_colspace[cidx] += 1;

            y_vals[cidx] = T::zero();
            visited[cidx] = false;
        }

        if D[k] == T::zero() || !D[k].is_finite() {
            return Err(LdlError::ZeroPivot(k));
        }
        if D[k] > T::zero() {
            positive += 1;
        }
        Dinv[k] = T::recip(D[k]);
    }

    Ok(positive)
}

// (I + L)x = b, with x replacing b
fn lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        let rng = L.colptr[i]..L.colptr[i + 1];
        for (&row, &v) in zip(&L.rowval[rng.clone()], &L.nzval[rng]) {
            x[row] -= v * xi;
        }
    }
}

// (I + L)ᵀx = b, with x replacing b
fn ltsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let rng = L.colptr[i]..L.colptr[i + 1];
        let s = zip(&L.rowval[rng.clone()], &L.nzval[rng])
            .fold(T::zero(), |acc, (&row, &v)| acc + v * x[row]);
        x[i] -= s;
    }
}

// (I + L)D(I + L)ᵀx = b, with x replacing b
fn solve_factored<T: FloatT>(L: &CscMatrix<T>, Dinv: &[T], x: &mut [T]) {
    lsolve(L, x);
    x.hadamard(Dinv);
    ltsolve(L, x);
}

fn invperm(p: &[usize]) -> Result<Vec<usize>, LdlError> {
    let mut b = vec![UNKNOWN; p.len()];
    for (i, &j) in p.iter().enumerate() {
        if j >= p.len() || b[j] != UNKNOWN {
            return Err(LdlError::InvalidPermutation);
        }
        b[j] = i;
    }
    Ok(b)
}

// x = b[p]
fn permute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(x, p).for_each(|(x, &p)| *x = b[p]);
}

// x[p] = b
fn ipermute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(b, p).for_each(|(&b, &p)| x[p] = b);
}

// Upper triangle of PAPᵀ for an upper triangular A, together with the
// position in it of every entry of A.  Rows are left unsorted within
// each column, which the factorization does not need.
fn permute_symmetric<T: FloatT>(A: &CscMatrix<T>, iperm: &[usize]) -> (CscMatrix<T>, Vec<usize>) {
    let n = A.n;
    let nnz = A.nnz();

    let mut next = vec![0; n + 1];
    for (row, col, _) in A.triplet_iter() {
        next[max(iperm[row], iperm[col]) + 1] += 1;
    }
    for k in 0..n {
        next[k + 1] += next[k];
    }
    let colptr = next.clone();

    let mut rowval = vec![0; nnz];
    let mut nzval = vec![T::zero(); nnz];
    let mut AtoPAPt = vec![0; nnz];

    for (k, (row, col, v)) in A.triplet_iter().enumerate() {
        let (rowP, colP) = (iperm[row], iperm[col]);
        let dest = &mut next[max(rowP, colP)];
        rowval[*dest] = min(rowP, colP);
        nzval[*dest] = v;
        AtoPAPt[k] = *dest;
        *dest += 1;
    }

    (CscMatrix::new(n, n, colptr, rowval, nzval), AtoPAPt)
}

//configure tests of internals
#[path = "test.rs"]
#[cfg(test)]
mod test;
