use crate::algebra::*;

/// Primal-dual solution of a QP session.
///
/// If the problem was found infeasible, `x` and `y` are filled with NaN
/// and the matching certificate is populated instead.
#[derive(Debug, Clone)]
pub struct Solution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// constraint multipliers
    pub y: Vec<T>,
    /// certificate of primal infeasibility
    pub prim_inf_cert: Vec<T>,
    /// certificate of dual infeasibility
    pub dual_inf_cert: Vec<T>,
}

impl<T> Solution<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            y: vec![T::zero(); m],
            prim_inf_cert: vec![T::zero(); m],
            dual_inf_cert: vec![T::zero(); n],
        }
    }
}
