#![allow(non_snake_case)]
use super::problemdata::ProblemData;
use super::*;

// ---------------
// equilibration data
// ---------------

/// Data from the Ruiz equilibration procedure.  The scaled problem is
///
/// ```text
/// P̄ = c·D·P·D,  q̄ = c·D·q,  Ā = E·A·D,  l̄ = E·l,  ū = E·u
/// ```
pub(crate) struct EquilibrationData<T> {
    /// Vector of variable scaling terms
    pub d: Vec<T>,
    /// Vector of inverse variable scaling terms
    pub dinv: Vec<T>,
    /// Vector of constraint scaling terms
    pub e: Vec<T>,
    /// Vector of inverse constraint scaling terms
    pub einv: Vec<T>,
    /// overall scaling for objective function
    pub c: T,
    pub cinv: T,
}

impl<T> EquilibrationData<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            dinv: vec![T::one(); n],
            e: vec![T::one(); m],
            einv: vec![T::one(); m],
            c: T::one(),
            cinv: T::one(),
        }
    }

    fn reset(&mut self) {
        self.d.set(T::one());
        self.e.set(T::one());
        self.c = T::one();
    }
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    /// Rebuild the working data from the user data, applying `iters`
    /// rounds of Ruiz equilibration followed by cost scaling.
    pub fn equilibrate(&mut self, iters: u32) {
        self.P.nzval.copy_from(&self.P0.nzval);
        self.A.nzval.copy_from(&self.A0.nzval);
        self.q.copy_from(&self.q0);

        let eq = &mut self.equilibration;
        eq.reset();

        let mut dwork = vec![T::zero(); self.n];
        let mut ework = vec![T::zero(); self.m];

        for _ in 0..iters {
            // column norms of [P; A] and row norms of A
            dwork.set(T::zero());
            self.P.col_norms_sym_no_reset(&mut dwork);
            self.A.col_norms_no_reset(&mut dwork);
            ework.set(T::zero());
            self.A.row_norms_no_reset(&mut ework);

            limit_scaling(&mut dwork);
            limit_scaling(&mut ework);
            dwork.scalarop(|x| T::recip(T::sqrt(x)));
            ework.scalarop(|x| T::recip(T::sqrt(x)));

            self.P.lrscale(&dwork, &dwork);
            self.A.lrscale(&ework, &dwork);
            self.q.hadamard(&dwork);
            eq.d.hadamard(&dwork);
            eq.e.hadamard(&ework);

            // cost scaling from the mean column norm of P and the norm of q
            dwork.set(T::zero());
            self.P.col_norms_sym_no_reset(&mut dwork);
            let mut ctmp = limit_scaling_scalar(dwork.mean());
            ctmp = limit_scaling_scalar(T::max(ctmp, self.q.norm_inf()));
            ctmp = T::recip(ctmp);

            self.P.scale(ctmp);
            self.q.scale(ctmp);
            eq.c *= ctmp;
        }

        eq.dinv.copy_from(&eq.d).recip();
        eq.einv.copy_from(&eq.e).recip();
        eq.cinv = T::recip(eq.c);

        self.l.copy_from(&self.l0).hadamard(&eq.e);
        self.u.copy_from(&self.u0).hadamard(&eq.e);
    }
}

// small norms are left unscaled and large ones are capped
fn limit_scaling<T: FloatT>(v: &mut [T]) {
    v.scalarop(limit_scaling_scalar);
}

fn limit_scaling_scalar<T: FloatT>(x: T) -> T {
    if x < MIN_SCALING.as_T() {
        T::one()
    } else {
        T::min(x, MAX_SCALING.as_T())
    }
}

#[test]
fn test_equilibrate_balances_norms() {
    let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![400., 1e-2]);
    let A = CscMatrix::from(&[[1., 2.], [300., 0.]]);
    let q = [1., -1.];
    let l = [-1., f64::NEG_INFINITY];
    let u = [1., 3.];

    let mut data = ProblemData::new(&P, &q, &A, &l, &u);
    data.equilibrate(10);

    // the scaled data reproduces the user data exactly
    let eq = &data.equilibration;
    let mut P1 = data.P.clone();
    P1.lrscale(&eq.dinv, &eq.dinv);
    P1.scale(eq.cinv);
    for (a, b) in P1.nzval.iter().zip(P.nzval.iter()) {
        assert!((a - b).abs() < 1e-9 * b.abs());
    }
    let mut A1 = data.A.clone();
    A1.lrscale(&eq.einv, &eq.dinv);
    for (a, b) in A1.nzval.iter().zip(A.nzval.iter()) {
        assert!((a - b).abs() < 1e-9 * b.abs());
    }

    // infinite bounds remain beyond the infinity threshold
    assert!(data.l[1] < -INFTY * MIN_SCALING);

    // scaled column norms are much closer to one
    let mut norms = vec![0.; 2];
    data.P.col_norms_sym_no_reset(&mut norms);
    data.A.col_norms_no_reset(&mut norms);
    assert!(norms.iter().all(|&x| x > 0.1 && x < 10.));

    // no scaling leaves the data untouched
    data.equilibrate(0);
    assert_eq!(data.P, P);
    assert_eq!(data.equilibration.c, 1.);
}
