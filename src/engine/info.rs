use crate::engine::SolverStatus;

/// Outcome of the optional polishing step
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum PolishStatus {
    #[default]
    NotPerformed,
    Succeeded,
    /// polishing ran but its result was discarded
    Failed,
}

/// Statistics of the most recent solve of a session
#[derive(Default, Debug, Clone)]
pub struct Info<T> {
    /// iterations taken
    pub iter: u32,
    pub status: SolverStatus,
    /// primal objective value, excluding any constant term
    pub obj_val: T,
    /// primal residual `‖Ax - z‖∞`
    pub prim_res: T,
    /// dual residual `‖Px + q + Aᵀy‖∞`
    pub dual_res: T,

    // times in seconds
    pub setup_time: f64,
    pub solve_time: f64,
    pub update_time: f64,
    pub polish_time: f64,
    /// setup (first solve only) + update + solve time
    pub run_time: f64,

    pub rho_updates: u32,
    /// most recent step size estimate
    pub rho_estimate: T,
    pub status_polish: PolishStatus,
}
