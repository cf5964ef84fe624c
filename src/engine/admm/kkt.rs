#![allow(non_snake_case)]
use super::kkt_assembly::*;
use super::*;
use crate::qdldl::*;
use itertools::izip;

/// Classification of a constraint row, which decides its step size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ConstraintType {
    Free,
    Inequality,
    Equality,
}

impl ConstraintType {
    fn classify<T: FloatT>(l: T, u: T) -> Self {
        let inf: T = (INFTY * MIN_SCALING).as_T();
        if l < -inf && u > inf {
            ConstraintType::Free
        } else if u - l < RHO_TOL.as_T() {
            ConstraintType::Equality
        } else {
            ConstraintType::Inequality
        }
    }
}

/// The ADMM linear system
///
/// ```text
/// [P + σI   Aᵀ  ]
/// [A       -R⁻¹ ]
/// ```
///
/// held as a sparse LDLᵀ factorization.  The sparsity pattern is fixed
/// when the system is created, and every refactorization reuses it.
pub(crate) struct KktSystem<T> {
    n: usize,
    K: CscMatrix<T>,
    map: KktDataMap,
    ldl: LdlFactorisation<T>,
    pub rho_vec: Vec<T>,
    pub rho_inv_vec: Vec<T>,
    pub constr_type: Vec<ConstraintType>,
    work: Vec<T>,
}

impl<T> KktSystem<T>
where
    T: FloatT,
{
    /// Analyse the sparsity of the system built from `P` and `A`.
    /// Nothing is factored until [`factor`](KktSystem::factor).
    pub fn new(P: &CscMatrix<T>, A: &CscMatrix<T>) -> Result<Self, LdlError> {
        let (m, n) = A.size();
        let (K, map) = assemble_kkt_matrix(P, A);

        let opts = LdlSettings {
            amd_dense_scale: 1.5,
            perm: None,
        };
        let ldl = LdlFactorisation::new(&K, Some(opts))?;

        Ok(Self {
            n,
            K,
            map,
            ldl,
            rho_vec: vec![T::zero(); m],
            rho_inv_vec: vec![T::zero(); m],
            constr_type: vec![ConstraintType::Inequality; m],
            work: vec![T::zero(); n + m],
        })
    }

    /// Reclassify the rows from scaled bounds.  Returns true if any row
    /// changed type.
    pub fn update_constr_types(&mut self, l: &[T], u: &[T]) -> bool {
        let mut changed = false;
        for (ct, &l, &u) in izip!(self.constr_type.iter_mut(), l, u) {
            let new = ConstraintType::classify(l, u);
            changed |= new != *ct;
            *ct = new;
        }
        changed
    }

    /// Set the per-row step sizes from the scalar `rho`.
    pub fn set_rho(&mut self, rho: T) {
        let rho_min: T = RHO_MIN.as_T();
        let rho_eq: T = RHO_EQ_OVER_RHO_INEQ.as_T();
        for (r, rinv, ct) in izip!(
            self.rho_vec.iter_mut(),
            self.rho_inv_vec.iter_mut(),
            &self.constr_type
        ) {
            *r = match ct {
                ConstraintType::Free => rho_min,
                ConstraintType::Equality => rho_eq * rho,
                ConstraintType::Inequality => rho,
            };
            *rinv = T::recip(*r);
        }
    }

    /// Write the scaled data into the system and factor it.  Returns
    /// the number of positive pivots, which is `n` exactly when
    /// `P + σI + AᵀRA` is positive definite.
    pub fn factor(&mut self, P: &CscMatrix<T>, A: &CscMatrix<T>, sigma: T) -> Result<usize, LdlError> {
        fill_kkt_values(&mut self.K, &self.map, P, A, sigma, &self.rho_inv_vec);
        self.ldl.set_values(&self.K.nzval);
        self.ldl.refactor()
    }

    /// Solve for the ADMM intermediate point `(x̃, z̃)` given the previous
    /// iterate `(x, z, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn solve_tilde(
        &mut self,
        xtilde: &mut [T],
        ztilde: &mut [T],
        x: &[T],
        z: &[T],
        y: &[T],
        q: &[T],
        sigma: T,
    ) {
        let n = self.n;
        let (wx, wz) = self.work.split_at_mut(n);

        // [σx - q; z - R⁻¹y]
        wx.waxpby(sigma, x, -T::one(), q);
        for (w, &z, &y, &rinv) in izip!(wz.iter_mut(), z, y, &self.rho_inv_vec) {
            *w = z - rinv * y;
        }

        self.ldl.solve(&mut self.work);

        let (wx, nu) = self.work.split_at(n);
        xtilde.copy_from(wx);
        for (zt, &z, &nu, &y, &rinv) in izip!(ztilde.iter_mut(), z, nu, y, &self.rho_inv_vec) {
            *zt = z + rinv * (nu - y);
        }
    }
}

#[test]
fn test_kkt_solve_tilde() {
    // minimize x² subject to x = 1, one step from the origin with a
    // large step size should land close to the constraint
    let P = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![2.]);
    let A = CscMatrix::identity(1);
    let l = [1.];
    let u = [1.];

    let mut kkt = KktSystem::new(&P, &A).unwrap();
    assert!(kkt.update_constr_types(&l, &u));
    assert_eq!(kkt.constr_type[0], ConstraintType::Equality);
    kkt.set_rho(0.1);
    assert_eq!(kkt.rho_vec[0], 100.);

    assert_eq!(kkt.factor(&P, &A, 1e-6).unwrap(), 1);

    let mut xt = [0.];
    let mut zt = [0.];
    kkt.solve_tilde(&mut xt, &mut zt, &[0.], &[1.], &[0.], &[0.], 1e-6);

    // (2 + σ)x + ν = 0,  x - ν/ρ = 1
    let rho: f64 = 100.;
    let x = 1. / (1. + (2. + 1e-6) / rho);
    assert!((xt[0] - x).abs() < 1e-12);
    assert!((zt[0] - x).abs() < 1e-12);
}

#[test]
fn test_constraint_classification() {
    let l = [f64::NEG_INFINITY, 0., -INFTY, 2.];
    let u = [f64::INFINITY, 1., INFTY, 2. + 1e-6];
    let P = CscMatrix::<f64>::identity(2);
    let A = CscMatrix::from(&[[1., 0.], [0., 1.], [1., 1.], [1., -1.]]);
    let mut kkt = KktSystem::new(&P, &A).unwrap();
    kkt.update_constr_types(&l, &u);
    assert_eq!(
        kkt.constr_type,
        vec![
            ConstraintType::Free,
            ConstraintType::Inequality,
            ConstraintType::Free,
            ConstraintType::Equality
        ]
    );
    assert!(!kkt.update_constr_types(&l, &u));
    kkt.set_rho(0.5);
    assert_eq!(kkt.rho_vec, vec![RHO_MIN, 0.5, RHO_MIN, 500.]);
}

#[test]
fn test_kkt_chain_has_no_fill() {
    // the KKT graph of a chain is a path, which an AMD ordering
    // factors without fill
    let n = 500;
    let P = CscMatrix::<f64>::identity(n);
    let (mut I, mut J, mut V) = (vec![], vec![], vec![]);
    for i in 0..n - 1 {
        I.extend([i, i]);
        J.extend([i, i + 1]);
        V.extend([1., -1.]);
    }
    let A = CscMatrix::new_from_triplets(n - 1, n, I, J, V);
    let l = vec![-1.; n - 1];
    let u = vec![1.; n - 1];

    let mut kkt = KktSystem::new(&P, &A).unwrap();
    kkt.update_constr_types(&l, &u);
    kkt.set_rho(0.1);
    assert_eq!(kkt.factor(&P, &A, 1e-6).unwrap(), n);

    let offdiag = kkt.K.nnz() - (2 * n - 1);
    assert!(kkt.ldl.L.nnz() <= 2 * offdiag);

    // new values in the same pattern refactor in place
    let mut P2 = P.clone();
    P2.nzval.fill(-1.);
    assert!(kkt.factor(&P2, &A, 1e-6).unwrap() < n);
}
