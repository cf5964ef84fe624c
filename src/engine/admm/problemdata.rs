#![allow(non_snake_case)]
use super::equilibration::EquilibrationData;
use super::*;
use crate::engine::EngineError;

// ---------------
// Data type for the standard form problem
// ---------------

/// Problem data held by a session.  The user data is kept with its
/// bounds clamped to `±INFTY`, and an equilibrated working copy is
/// derived from it.
pub(crate) struct ProblemData<T> {
    // user data
    pub P0: CscMatrix<T>,
    pub q0: Vec<T>,
    pub A0: CscMatrix<T>,
    pub l0: Vec<T>,
    pub u0: Vec<T>,

    // equilibrated data
    pub P: CscMatrix<T>,
    pub q: Vec<T>,
    pub A: CscMatrix<T>,
    pub l: Vec<T>,
    pub u: Vec<T>,

    pub n: usize,
    pub m: usize,
    pub equilibration: EquilibrationData<T>,
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    pub fn new(P: &CscMatrix<T>, q: &[T], A: &CscMatrix<T>, l: &[T], u: &[T]) -> Self {
        // dimension checks will have already been
        // performed during setup, so skip here
        let (m, n) = A.size();

        let mut l0 = l.to_vec();
        let mut u0 = u.to_vec();
        clamp_bounds(&mut l0, &mut u0);

        Self {
            P0: P.clone(),
            q0: q.to_vec(),
            A0: A.clone(),
            P: P.clone(),
            q: q.to_vec(),
            A: A.clone(),
            l: l0.clone(),
            u: u0.clone(),
            l0,
            u0,
            n,
            m,
            equilibration: EquilibrationData::new(n, m),
        }
    }

    /// Recompute `q`, `l` and `u` from the user data using the current
    /// scaling.
    pub fn rescale_vectors(&mut self) {
        let eq = &self.equilibration;
        self.q.copy_from(&self.q0).scale(eq.c).hadamard(&eq.d);
        self.l.copy_from(&self.l0).hadamard(&eq.e);
        self.u.copy_from(&self.u0).hadamard(&eq.e);
    }
}

/// Clamp bounds to `±INFTY` so that infinite values survive scaling.
pub(crate) fn clamp_bounds<T: FloatT>(l: &mut [T], u: &mut [T]) {
    let inf: T = INFTY.as_T();
    l.scalarop(|x| T::max(x, -inf));
    u.scalarop(|x| T::min(x, inf));
}

/// Check dimensions, formats and values of the problem data.
pub(crate) fn validate_data<T: FloatT>(
    P: &CscMatrix<T>,
    q: &[T],
    A: &CscMatrix<T>,
    l: &[T],
    u: &[T],
) -> Result<(), EngineError> {
    let (m, n) = A.size();
    let fail = |msg: String| Err(EngineError::DataValidation(msg));

    if P.size() != (n, n) {
        return fail(format!("P has size {:?}, expected ({n}, {n})", P.size()));
    }
    if q.len() != n {
        return fail(format!("q has length {}, expected {n}", q.len()));
    }
    if l.len() != m || u.len() != m {
        return fail(format!(
            "bounds have lengths ({}, {}), expected {m}",
            l.len(),
            u.len()
        ));
    }
    if let Err(e) = P.check_format() {
        return fail(format!("P is badly formatted: {e}"));
    }
    if let Err(e) = A.check_format() {
        return fail(format!("A is badly formatted: {e}"));
    }
    if !P.is_triu() {
        return fail("P is not upper triangular".to_string());
    }
    if !P.nzval.is_finite() || !A.nzval.is_finite() || !q.is_finite() {
        return fail("problem data contains non-finite values".to_string());
    }
    if l.iter().chain(u.iter()).any(|x| x.is_nan()) {
        return fail("bounds contain NaN".to_string());
    }
    if let Some(i) = (0..m).find(|&i| l[i] > u[i]) {
        return fail(format!("lower bound exceeds upper bound in row {i}"));
    }
    Ok(())
}

#[test]
fn test_problem_data_unscaled_copy() {
    let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1., 2.]);
    let A = CscMatrix::from(&[[1., 1.]]);
    let q = [3., -4.];
    let l = [f64::NEG_INFINITY];
    let u = [1e40];

    assert!(validate_data(&P, &q, &A, &l, &u).is_ok());
    let mut data = ProblemData::new(&P, &q, &A, &l, &u);

    // bounds are clamped, and a fresh scaling is the identity
    assert_eq!(data.l0, vec![-INFTY]);
    assert_eq!(data.u0, vec![INFTY]);
    assert_eq!(data.equilibration.d, vec![1., 1.]);
    assert_eq!(data.equilibration.e, vec![1.]);

    data.q.set(0.);
    data.rescale_vectors();
    assert_eq!(data.q, q.to_vec());
    assert_eq!(data.u, vec![INFTY]);

    assert!(matches!(
        validate_data(&P, &q, &A, &[2.], &[1.]),
        Err(EngineError::DataValidation(_))
    ));
}
