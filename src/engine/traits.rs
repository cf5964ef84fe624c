#![allow(non_snake_case)]

use crate::algebra::*;
use crate::engine::{EngineError, Info, Settings, Solution};

/// A factory for QP sessions solving
///
/// ```text
/// minimize    0.5 xᵀPx + qᵀx
/// subject to  l ≤ Ax ≤ u
/// ```
///
/// with `P` given in upper triangular form.  The problem dimensions
/// are read from `A`, which is `m x n`.
pub trait QpEngine<T: FloatT = f64> {
    type Session: QpSession<T>;

    /// the engine's default settings
    fn default_settings(&self) -> Settings<T>;

    /// Validate the problem data and settings and create a session,
    /// including any scaling and factorization work.
    fn setup(
        &self,
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
        settings: Settings<T>,
    ) -> Result<Self::Session, EngineError>;
}

/// A live QP session created by a [`QpEngine`].  The session holds all
/// engine memory, which is released when the session is dropped.
pub trait QpSession<T: FloatT = f64> {
    /// Solve the problem.  The outcome is reported through the status
    /// in [`info`](QpSession::info).
    fn solve(&mut self) -> Result<(), EngineError>;

    /// Replace any of `q`, `l` and `u`.  `None` leaves a vector unchanged.
    fn update_data_vectors(
        &mut self,
        q: Option<&[T]>,
        l: Option<&[T]>,
        u: Option<&[T]>,
    ) -> Result<(), EngineError>;

    /// Replace nonzero values of `P` and/or `A` without changing their
    /// sparsity.  With an index slice only the listed entries of `nzval`
    /// are written, otherwise the values must cover all of `nzval`.
    fn update_data_matrices(
        &mut self,
        Px: Option<&[T]>,
        Px_idx: Option<&[usize]>,
        Ax: Option<&[T]>,
        Ax_idx: Option<&[usize]>,
    ) -> Result<(), EngineError>;

    /// Provide a starting point for the next solve.
    fn warm_start(&mut self, x: Option<&[T]>, y: Option<&[T]>) -> Result<(), EngineError>;

    /// Replace the settings of the live session.  Settings that are
    /// fixed at setup must not change.
    fn update_settings(&mut self, settings: &Settings<T>) -> Result<(), EngineError>;

    fn solution(&self) -> &Solution<T>;
    fn info(&self) -> &Info<T>;
    fn settings(&self) -> &Settings<T>;
}
