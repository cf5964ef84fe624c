use super::SolvePath;
use crate::engine::SolverStatus;

/// The outcome of the last [`Model::solve`](crate::modelling::Model::solve),
/// in the model's own coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSolution {
    pub status: SolverStatus,
    /// primal values, indexed by variable
    pub x: Vec<f64>,
    /// constraint multipliers, indexed by constraint
    pub y: Vec<f64>,
    /// engine objective plus the objective constant
    pub objective_value: f64,
    pub iterations: u32,
    pub solve_time: f64,
    pub path: SolvePath,
}
