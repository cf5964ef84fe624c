//! An operator splitting (ADMM) engine for convex QPs.
//!
//! Each iteration solves one linear system with the quasidefinite matrix
//!
//! ```text
//! [P + σI   Aᵀ  ]
//! [A       -R⁻¹ ]
//! ```
//!
//! where `R = diag(ρ)`.  The matrix is refactored only when `ρ` is
//! adapted or the problem matrices change.

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::engine::{EngineError, QpEngine, Settings};

mod data_updating;
mod equilibration;
mod kkt;
mod kkt_assembly;
mod polish;
mod problemdata;
mod residuals;
mod session;
mod variables;

pub use session::AdmmSession;

// bounds beyond this magnitude are treated as infinite
pub(crate) const INFTY: f64 = 1e30;
pub(crate) const MIN_SCALING: f64 = 1e-4;
pub(crate) const MAX_SCALING: f64 = 1e4;
pub(crate) const RHO_MIN: f64 = 1e-6;
pub(crate) const RHO_MAX: f64 = 1e6;
pub(crate) const RHO_EQ_OVER_RHO_INEQ: f64 = 1e3;
// rows with u - l below this are equality constraints
pub(crate) const RHO_TOL: f64 = 1e-4;
pub(crate) const DIVISION_TOL: f64 = 1e-10;
// tolerance multiplier for the inaccurate statuses
pub(crate) const INACCURATE_FACTOR: f64 = 10.;

/// The bundled ADMM engine.
///
/// ```no_run
/// use qpmodel::algebra::CscMatrix;
/// use qpmodel::engine::{AdmmEngine, QpEngine, QpSession, SolverStatus};
///
/// // minimize x² - 2x subject to 0 ≤ x ≤ 0.5
/// let P = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![2.]);
/// let A = CscMatrix::identity(1);
///
/// let engine = AdmmEngine;
/// let settings = engine.default_settings();
/// let mut session = engine.setup(&P, &[-2.], &A, &[0.], &[0.5], settings).unwrap();
/// session.solve().unwrap();
/// assert_eq!(session.info().status, SolverStatus::Solved);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AdmmEngine;

impl<T> QpEngine<T> for AdmmEngine
where
    T: FloatT,
{
    type Session = AdmmSession<T>;

    fn default_settings(&self) -> Settings<T> {
        Settings::default()
    }

    fn setup(
        &self,
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
        settings: Settings<T>,
    ) -> Result<AdmmSession<T>, EngineError> {
        AdmmSession::new(P, q, A, l, u, settings)
    }
}
