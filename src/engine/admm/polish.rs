#![allow(non_snake_case)]
use super::session::AdmmSession;
use super::kkt_assembly::*;
use super::*;
use crate::engine::PolishStatus;
use crate::qdldl::LdlFactorisation;
use itertools::izip;

impl<T> AdmmSession<T>
where
    T: FloatT,
{
    /// Refine a solved iterate by solving the equality constrained QP
    /// on the guessed active set.  The refined point replaces the
    /// iterate only if neither residual gets worse.
    pub(crate) fn polish(&mut self) {
        let before = self.res.clone();
        let saved = (
            self.vars.x.clone(),
            self.vars.z.clone(),
            self.vars.y.clone(),
        );

        let polished = match self.polished_iterate() {
            Some(polished) => polished,
            None => {
                self.info.status_polish = PolishStatus::Failed;
                return;
            }
        };
        (self.vars.x, self.vars.z, self.vars.y) = polished;
        self.update_residuals();

        let tol: T = DIVISION_TOL.as_T();
        let accepted = self.res.prim_res <= T::max(before.prim_res, tol)
            && self.res.dual_res <= T::max(before.dual_res, tol);

        if accepted {
            self.info.status_polish = PolishStatus::Succeeded;
        } else {
            (self.vars.x, self.vars.z, self.vars.y) = saved;
            self.res = before;
            self.info.status_polish = PolishStatus::Failed;
        }
    }

    // returns the polished (x, z, y), or None if the reduced system
    // could not be factored
    fn polished_iterate(&self) -> Option<(Vec<T>, Vec<T>, Vec<T>)> {
        let d = &self.data;
        let v = &self.vars;
        let (n, m) = (d.n, d.m);
        let delta = self.settings.delta;

        // rows at their lower bound have y < 0, at their upper y > 0
        let mut active = Vec::new();
        for (i, (&z, &y, &l, &u)) in izip!(&v.z, &v.y, &d.l, &d.u).enumerate() {
            if z - l < -y {
                active.push((i, l));
            } else if u - z < y {
                active.push((i, u));
            }
        }
        let mred = active.len();

        let mut row_map = vec![None; m];
        for (k, &(i, _)) in active.iter().enumerate() {
            row_map[i] = Some(k);
        }
        let (mut I, mut J, mut V) = (vec![], vec![], vec![]);
        for (row, col, val) in d.A.triplet_iter() {
            if let Some(k) = row_map[row] {
                I.push(k);
                J.push(col);
                V.push(val);
            }
        }
        let Ared = CscMatrix::new_from_triplets(mred, n, I, J, V);

        // [P + δI   Aredᵀ]
        // [Ared    -δI   ]
        let dim = n + mred;
        let (mut K, map) = assemble_kkt_matrix(&d.P, &Ared);
        fill_kkt_values(&mut K, &map, &d.P, &Ared, delta, &vec![delta; mred]);
        let mut ldl = LdlFactorisation::new(&K, None).ok()?;
        ldl.refactor().ok()?;

        // [-q; bounds of the active rows]
        let mut rhs = vec![T::zero(); dim];
        rhs[..n].copy_from(&d.q).negate();
        for (r, &(_, b)) in rhs[n..].iter_mut().zip(active.iter()) {
            *r = b;
        }

        let mut sol = rhs.clone();
        ldl.solve(&mut sol);

        // iterative refinement against the unregularized system
        let mut resid = vec![T::zero(); dim];
        for _ in 0..self.settings.polish_refine_iter {
            resid.copy_from(&rhs);
            let (rx, ry) = resid.split_at_mut(n);
            let (sx, sy) = sol.split_at(n);
            d.P.sym().symv(rx, sx, -T::one(), T::one());
            Ared.t().gemv(rx, sy, -T::one(), T::one());
            Ared.gemv(ry, sx, -T::one(), T::one());
            ldl.solve(&mut resid);
            sol.axpby(T::one(), &resid, T::one());
        }

        let (xp, yred) = sol.split_at(n);
        let x = xp.to_vec();

        let mut z = vec![T::zero(); m];
        d.A.gemv(&mut z, &x, T::one(), T::zero());
        z.clip_to(&d.l, &d.u);

        let mut y = vec![T::zero(); m];
        for (&(i, _), &yk) in active.iter().zip(yred) {
            y[i] = yk;
        }

        Some((x, z, y))
    }
}
