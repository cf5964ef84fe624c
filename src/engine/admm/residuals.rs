#![allow(non_snake_case)]
use super::session::AdmmSession;
use super::*;
use crate::engine::{Settings, SolverStatus};
use itertools::izip;

/// Residuals of the current iterate, in both user and scaled coordinates.
#[derive(Debug, Clone, Default)]
pub(crate) struct Residuals<T> {
    /// `‖Ax - z‖∞`
    pub prim_res: T,
    /// `‖Px + q + Aᵀy‖∞`
    pub dual_res: T,
    /// `max(‖Ax‖∞, ‖z‖∞)`
    pub prim_norm: T,
    /// `max(‖Px‖∞, ‖Aᵀy‖∞, ‖q‖∞)`
    pub dual_norm: T,

    pub prim_res_scaled: T,
    pub dual_res_scaled: T,
    pub prim_norm_scaled: T,
    pub dual_norm_scaled: T,

    /// `0.5 xᵀPx + qᵀx`
    pub obj_val: T,
}

impl<T> AdmmSession<T>
where
    T: FloatT,
{
    /// Recompute the residuals and objective at the current iterate.
    pub(crate) fn update_residuals(&mut self) {
        let d = &self.data;
        let v = &mut self.vars;
        let eq = &d.equilibration;
        let r = &mut self.res;

        d.A.gemv(&mut v.Ax, &v.x, T::one(), T::zero());
        d.P.sym().symv(&mut v.Px, &v.x, T::one(), T::zero());
        d.A.t().gemv(&mut v.Aty, &v.y, T::one(), T::zero());

        // primal residual, Ax - z.  The unscaled value is E⁻¹(Āx̄ - z̄)
        v.work_m.waxpby(T::one(), &v.Ax, -T::one(), &v.z);
        r.prim_res_scaled = v.work_m.norm_inf();
        r.prim_res = v.work_m.norm_inf_scaled(&eq.einv);
        r.prim_norm_scaled = T::max(v.Ax.norm_inf(), v.z.norm_inf());
        r.prim_norm = T::max(
            v.Ax.norm_inf_scaled(&eq.einv),
            v.z.norm_inf_scaled(&eq.einv),
        );

        // dual residual, Px + q + Aᵀy.  The unscaled value is c⁻¹D⁻¹(...)
        for (w, &px, &q, &aty) in izip!(v.work_n.iter_mut(), &v.Px, &d.q, &v.Aty) {
            *w = px + q + aty;
        }
        r.dual_res_scaled = v.work_n.norm_inf();
        r.dual_res = eq.cinv * v.work_n.norm_inf_scaled(&eq.dinv);
        r.dual_norm_scaled = T::max(
            T::max(v.Px.norm_inf(), v.Aty.norm_inf()),
            d.q.norm_inf(),
        );
        r.dual_norm = eq.cinv
            * T::max(
                T::max(
                    v.Px.norm_inf_scaled(&eq.dinv),
                    v.Aty.norm_inf_scaled(&eq.dinv),
                ),
                d.q.norm_inf_scaled(&eq.dinv),
            );

        let half: T = (0.5).as_T();
        r.obj_val = eq.cinv * (half * v.x.dot(&v.Px) + d.q.dot(&v.x));
    }

    /// Check for convergence or infeasibility using the current
    /// residuals.  With `approximate` set, all tolerances are relaxed
    /// and the inaccurate statuses are returned.
    pub(crate) fn check_termination(
        &mut self,
        settings: &Settings<T>,
        approximate: bool,
    ) -> Option<SolverStatus> {
        let factor: T = if approximate {
            INACCURATE_FACTOR.as_T()
        } else {
            T::one()
        };
        let eps_abs = settings.eps_abs * factor;
        let eps_rel = settings.eps_rel * factor;
        let eps_prim_inf = settings.eps_prim_inf * factor;
        let eps_dual_inf = settings.eps_dual_inf * factor;

        let r = &self.res;
        let prim_ok = self.data.m == 0 || r.prim_res <= eps_abs + eps_rel * r.prim_norm;
        let dual_ok = r.dual_res <= eps_abs + eps_rel * r.dual_norm;

        if prim_ok && dual_ok {
            Some(if approximate {
                SolverStatus::SolvedInaccurate
            } else {
                SolverStatus::Solved
            })
        } else if self.is_primal_infeasible(eps_prim_inf) {
            Some(if approximate {
                SolverStatus::PrimalInfeasibleInaccurate
            } else {
                SolverStatus::PrimalInfeasible
            })
        } else if self.is_dual_infeasible(eps_dual_inf) {
            Some(if approximate {
                SolverStatus::DualInfeasibleInaccurate
            } else {
                SolverStatus::DualInfeasible
            })
        } else {
            None
        }
    }

    // The last change in y certifies primal infeasibility if, after
    // projection onto the normal cone of the bounds, it satisfies
    // Aᵀδy ≈ 0 and uᵀmax(δy,0) + lᵀmin(δy,0) < 0.
    fn is_primal_infeasible(&mut self, eps: T) -> bool {
        let d = &self.data;
        let v = &mut self.vars;
        let eq = &d.equilibration;
        let inf: T = (INFTY * MIN_SCALING).as_T();

        let dy = &mut v.work_m;
        dy.copy_from(&v.delta_y);
        for (dy, &l, &u) in izip!(dy.iter_mut(), &d.l, &d.u) {
            if u > inf && l < -inf {
                *dy = T::zero();
            } else if u > inf {
                *dy = T::min(*dy, T::zero());
            } else if l < -inf {
                *dy = T::max(*dy, T::zero());
            }
        }

        let norm = dy.norm_inf_scaled(&eq.e);
        if !(norm > eps) {
            return false;
        }

        // the support function has the same sign in scaled coordinates
        let support = izip!(dy.iter(), &d.l, &d.u).fold(T::zero(), |acc, (&dy, &l, &u)| {
            acc + u * T::max(dy, T::zero()) + l * T::min(dy, T::zero())
        });
        if !(support < T::zero()) {
            return false;
        }

        d.A.t().gemv(&mut v.work_n, dy, T::one(), T::zero());
        if !(v.work_n.norm_inf_scaled(&eq.dinv) < eps * norm) {
            return false;
        }

        let cert = &mut self.solution.prim_inf_cert;
        cert.copy_from(dy).hadamard(&eq.e).scale(T::recip(norm));
        true
    }

    // The last change in x certifies dual infeasibility if qᵀδx < 0,
    // Pδx ≈ 0 and Aδx lies in the recession cone of [l,u].
    fn is_dual_infeasible(&mut self, eps: T) -> bool {
        let d = &self.data;
        let v = &mut self.vars;
        let eq = &d.equilibration;
        let inf: T = (INFTY * MIN_SCALING).as_T();

        let dx = &v.delta_x;
        let norm = dx.norm_inf_scaled(&eq.d);
        if !(norm > eps) {
            return false;
        }

        // q̄ᵀδx̄ = c qᵀδx
        if !(d.q.dot(dx) < -eq.c * eps * norm) {
            return false;
        }

        d.P.sym().symv(&mut v.work_n, dx, T::one(), T::zero());
        if !(v.work_n.norm_inf_scaled(&eq.dinv) < eq.c * eps * norm) {
            return false;
        }

        d.A.gemv(&mut v.work_m, dx, T::one(), T::zero());
        let tol = eps * norm;
        for (&adx, &einv, &l, &u) in izip!(&v.work_m, &eq.einv, &d.l, &d.u) {
            let adx = adx * einv;
            if (u < inf && adx > tol) || (l > -inf && adx < -tol) {
                return false;
            }
        }

        let cert = &mut self.solution.dual_inf_cert;
        cert.copy_from(dx).hadamard(&eq.d).scale(T::recip(norm));
        true
    }
}
