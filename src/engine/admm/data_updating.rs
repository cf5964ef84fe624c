#![allow(non_snake_case)]
use super::problemdata::clamp_bounds;
use super::session::AdmmSession;
use crate::algebra::*;
use crate::engine::{EngineError, Settings, SolverStatus};
use core::iter::Zip;
use core::slice::Iter;

// Trait for overwriting the nonzero values of P and A from various
// data types
trait MatrixDataUpdate<T: FloatT> {
    fn update_values(&self, nzval: &mut [T]) -> Result<(), EngineError>;
}

// a full replacement of all nonzero values
impl<T> MatrixDataUpdate<T> for [T]
where
    T: FloatT,
{
    fn update_values(&self, nzval: &mut [T]) -> Result<(), EngineError> {
        if self.len() != nzval.len() {
            return Err(EngineError::DataUpdate(format!(
                "expected {} values, found {}",
                nzval.len(),
                self.len()
            )));
        }
        nzval.copy_from_slice(self);
        Ok(())
    }
}

// a partial update of (index, value) pairs
impl<'a, T> MatrixDataUpdate<T> for Zip<Iter<'a, usize>, Iter<'a, T>>
where
    T: FloatT,
{
    fn update_values(&self, nzval: &mut [T]) -> Result<(), EngineError> {
        if let Some((&idx, _)) = self.clone().find(|&(&idx, _)| idx >= nzval.len()) {
            return Err(EngineError::DataUpdate(format!(
                "index {idx} out of range for {} values",
                nzval.len()
            )));
        }
        for (&idx, &v) in self.clone() {
            nzval[idx] = v;
        }
        Ok(())
    }
}

fn update_matrix_values<T: FloatT>(
    name: &str,
    nzval: &mut [T],
    values: Option<&[T]>,
    indices: Option<&[usize]>,
) -> Result<(), EngineError> {
    match (values, indices) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(EngineError::DataUpdate(format!(
            "indices for {name} given without values"
        ))),
        (Some(v), None) => v.update_values(nzval),
        (Some(v), Some(idx)) => {
            if v.len() != idx.len() {
                return Err(EngineError::DataUpdate(format!(
                    "{name} has {} values but {} indices",
                    v.len(),
                    idx.len()
                )));
            }
            idx.iter().zip(v.iter()).update_values(nzval)
        }
    }
}

fn check_length(name: &str, v: Option<&[impl Sized]>, len: usize) -> Result<(), EngineError> {
    match v {
        Some(v) if v.len() != len => Err(EngineError::DataUpdate(format!(
            "{name} has length {}, expected {len}",
            v.len()
        ))),
        _ => Ok(()),
    }
}

impl<T> AdmmSession<T>
where
    T: FloatT,
{
    /// Overwrite `q`, `l` and/or `u`.  Invalid inputs are rejected before
    /// anything is written.  If the new bounds change a row's type and the
    /// refactorization then fails, the new values are kept.
    pub(crate) fn update_vectors(
        &mut self,
        q: Option<&[T]>,
        l: Option<&[T]>,
        u: Option<&[T]>,
    ) -> Result<(), EngineError> {
        let (n, m) = (self.data.n, self.data.m);
        check_length("q", q, n)?;
        check_length("l", l, m)?;
        check_length("u", u, m)?;

        if let Some(q) = q {
            if !q.is_finite() {
                return Err(EngineError::DataUpdate("q contains non-finite values".into()));
            }
        }

        if l.into_iter().chain(u).flatten().any(|v| v.is_nan()) {
            return Err(EngineError::DataUpdate("bounds contain NaN values".into()));
        }

        let mut lnew = l.unwrap_or(&self.data.l0).to_vec();
        let mut unew = u.unwrap_or(&self.data.u0).to_vec();
        clamp_bounds(&mut lnew, &mut unew);
        if let Some(i) = (0..m).find(|&i| !(lnew[i] <= unew[i])) {
            return Err(EngineError::DataUpdate(format!(
                "lower bound exceeds upper bound in row {i}"
            )));
        }

        if let Some(q) = q {
            self.data.q0.copy_from(q);
        }
        self.data.l0 = lnew;
        self.data.u0 = unew;
        self.data.rescale_vectors();

        if self.kkt.update_constr_types(&self.data.l, &self.data.u) {
            self.kkt.set_rho(self.rho);
            self.refactor()?;
        }

        self.info.status = SolverStatus::Unsolved;
        Ok(())
    }

    /// Overwrite nonzero values of `P` and/or `A`, then re-equilibrate
    /// and refactor.  The iterates are carried over in user coordinates.
    /// A failed refactorization leaves the new values in place.
    pub(crate) fn update_matrices(
        &mut self,
        Px: Option<&[T]>,
        Px_idx: Option<&[usize]>,
        Ax: Option<&[T]>,
        Ax_idx: Option<&[usize]>,
    ) -> Result<(), EngineError> {
        if Px.is_none() && Ax.is_none() && Px_idx.is_none() && Ax_idx.is_none() {
            return Ok(());
        }

        // invalid values are rejected before the stored data is touched
        let mut Pnz = self.data.P0.nzval.clone();
        let mut Anz = self.data.A0.nzval.clone();
        update_matrix_values("P", &mut Pnz, Px, Px_idx)?;
        update_matrix_values("A", &mut Anz, Ax, Ax_idx)?;
        if !Pnz.is_finite() || !Anz.is_finite() {
            return Err(EngineError::DataUpdate(
                "matrix values contain non-finite entries".into(),
            ));
        }

        let (x, y) = self.unscaled_iterates();

        self.data.P0.nzval = Pnz;
        self.data.A0.nzval = Anz;
        self.data.equilibrate(self.settings.scaling);

        self.set_scaled_iterates(Some(x.as_slice()), Some(y.as_slice()));

        self.kkt.update_constr_types(&self.data.l, &self.data.u);
        self.kkt.set_rho(self.rho);
        self.refactor()?;

        self.info.status = SolverStatus::Unsolved;
        Ok(())
    }

    /// Set the starting point of the next solve from user coordinates.
    pub(crate) fn set_warm_start(
        &mut self,
        x: Option<&[T]>,
        y: Option<&[T]>,
    ) -> Result<(), EngineError> {
        let (n, m) = (self.data.n, self.data.m);
        for (name, v, len) in [("x", x, n), ("y", y, m)] {
            if let Some(v) = v {
                if v.len() != len {
                    return Err(EngineError::DataValidation(format!(
                        "warm start {name} has length {}, expected {len}",
                        v.len()
                    )));
                }
            }
        }
        self.set_scaled_iterates(x, y);
        self.warm_start_pending = true;
        Ok(())
    }

    /// Replace the session settings.  A new step size triggers a
    /// refactorization.
    pub(crate) fn replace_settings(&mut self, settings: &Settings<T>) -> Result<(), EngineError> {
        settings.validate_as_update(&self.settings)?;

        let rho_changed = settings.rho != self.settings.rho;
        self.settings = settings.clone();

        if rho_changed {
            self.rho = settings.rho;
            self.info.rho_estimate = settings.rho;
            self.kkt.set_rho(self.rho);
            self.refactor()?;
        }
        Ok(())
    }

    fn unscaled_iterates(&self) -> (Vec<T>, Vec<T>) {
        let eq = &self.data.equilibration;
        let mut x = self.vars.x.clone();
        let mut y = self.vars.y.clone();
        x.hadamard(&eq.d);
        y.hadamard(&eq.e).scale(eq.cinv);
        (x, y)
    }

    // x̄ = D⁻¹x, ȳ = cE⁻¹y and z̄ = Āx̄
    fn set_scaled_iterates(&mut self, x: Option<&[T]>, y: Option<&[T]>) {
        let eq = &self.data.equilibration;
        let v = &mut self.vars;
        if let Some(x) = x {
            v.x.copy_from(x).hadamard(&eq.dinv);
            self.data.A.gemv(&mut v.z, &v.x, T::one(), T::zero());
        }
        if let Some(y) = y {
            v.y.copy_from(y).hadamard(&eq.einv).scale(eq.c);
        }
    }
}
