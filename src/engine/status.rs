#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a QP session after a solve

#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Solver terminated with a solution.
    Solved,
    /// Solver terminated with a solution (reduced accuracy)
    SolvedInaccurate,
    /// Problem is primal infeasible.  A certificate is returned in `prim_inf_cert`.
    PrimalInfeasible,
    /// Problem is primal infeasible (reduced accuracy)
    PrimalInfeasibleInaccurate,
    /// Problem is dual infeasible.  A certificate is returned in `dual_inf_cert`.
    DualInfeasible,
    /// Problem is dual infeasible (reduced accuracy)
    DualInfeasibleInaccurate,
    /// Iteration limit reached before solution or infeasibility certificate found.
    MaxIterReached,
    /// Time limit reached before solution or infeasibility certificate found.
    TimeLimitReached,
    /// The objective matrix is not positive semidefinite.
    NonConvex,
    /// Solve was interrupted by the caller.
    Interrupted,
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
}

impl SolverStatus {
    /// true for both accurate and inaccurate solutions
    pub fn is_solved(&self) -> bool {
        matches!(self, SolverStatus::Solved | SolverStatus::SolvedInaccurate)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            *self,
            SolverStatus::PrimalInfeasible
                | SolverStatus::PrimalInfeasibleInaccurate
                | SolverStatus::DualInfeasible
                | SolverStatus::DualInfeasibleInaccurate
        )
    }

    pub fn is_inaccurate(&self) -> bool {
        matches!(
            *self,
            SolverStatus::SolvedInaccurate
                | SolverStatus::PrimalInfeasibleInaccurate
                | SolverStatus::DualInfeasibleInaccurate
        )
    }

    /// True if the session holds a primal point after terminating with
    /// this status.  Limits and interruptions leave the last iterate.
    pub fn has_solution(&self) -> bool {
        !(self.is_infeasible() || matches!(self, SolverStatus::NonConvex | SolverStatus::Unsolved))
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[test]
fn test_status_classes() {
    assert!(SolverStatus::default() == SolverStatus::Unsolved);
    assert!(SolverStatus::SolvedInaccurate.is_solved());
    assert!(SolverStatus::SolvedInaccurate.has_solution());
    assert!(SolverStatus::MaxIterReached.has_solution());
    assert!(!SolverStatus::MaxIterReached.is_solved());
    assert!(SolverStatus::DualInfeasibleInaccurate.is_infeasible());
    assert!(!SolverStatus::PrimalInfeasible.has_solution());
    assert!(!SolverStatus::NonConvex.has_solution());
    assert!(!SolverStatus::Unsolved.has_solution());
    assert_eq!(SolverStatus::TimeLimitReached.to_string(), "TimeLimitReached");
}
