use crate::engine::EngineError;
use thiserror::Error;

/// Error type returned by the modelling layer.
///
/// Engine failures are wrapped by the phase in which they occurred.
/// Infeasible or inaccurate solves are not errors; they are reported
/// through [`Model::status`](crate::modelling::Model::status).
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Strict inequalities are not supported")]
    StrictInequality,
    #[error("The model's engine session has been released")]
    Released,
    #[error("No solution is available")]
    NoSolution,
    #[error("Variable x{0} does not belong to this model")]
    UnknownVariable(usize),
    #[error("Constraint {0} does not belong to this model")]
    UnknownConstraint(usize),
    #[error("Engine setup failed: {0}")]
    Setup(EngineError),
    #[error("Engine solve failed: {0}")]
    Solve(EngineError),
    #[error("Engine update failed: {0}")]
    Update(EngineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
