#![allow(non_snake_case)]
use super::kkt::KktSystem;
use super::problemdata::{validate_data, ProblemData};
use super::residuals::Residuals;
use super::variables::Variables;
use super::*;
use crate::engine::*;
use crate::timers::*;
use itertools::izip;

/// A live session of the [`AdmmEngine`].
///
/// All iterates are held in equilibrated coordinates and are mapped
/// back to the user's coordinates in [`solution`](QpSession::solution)
/// at the end of every solve.
pub struct AdmmSession<T: FloatT = f64> {
    pub(crate) data: ProblemData<T>,
    pub(crate) vars: Variables<T>,
    pub(crate) kkt: KktSystem<T>,
    pub(crate) res: Residuals<T>,
    pub(crate) settings: Settings<T>,
    pub(crate) info: Info<T>,
    pub(crate) solution: Solution<T>,
    pub(crate) timers: Timers,
    // current step size, which adapts over the session's lifetime
    pub(crate) rho: T,
    pub(crate) warm_start_pending: bool,
    first_run: bool,
}

impl<T> AdmmSession<T>
where
    T: FloatT,
{
    /// Validate the data, equilibrate and factor the KKT system.
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
        settings: Settings<T>,
    ) -> Result<Self, EngineError> {
        let mut timers = Timers::default();

        let session = timeit! {timers => "setup";
            Self::build(P, q, A, l, u, settings)
        };
        let mut session = session?;

        session.info.setup_time = timers.elapsed_secs(&["setup"]);
        session.timers = timers;
        Ok(session)
    }

    fn build(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        l: &[T],
        u: &[T],
        settings: Settings<T>,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        validate_data(P, q, A, l, u)?;

        let mut data = ProblemData::new(P, q, A, l, u);
        data.equilibrate(settings.scaling);
        let (n, m) = (data.n, data.m);

        let mut kkt = KktSystem::new(&data.P, &data.A)?;
        kkt.update_constr_types(&data.l, &data.u);
        kkt.set_rho(settings.rho);

        let info = Info {
            obj_val: T::nan(),
            prim_res: T::nan(),
            dual_res: T::nan(),
            rho_estimate: settings.rho,
            ..Info::default()
        };

        let mut session = Self {
            data,
            vars: Variables::new(n, m),
            kkt,
            res: Residuals::default(),
            rho: settings.rho,
            settings,
            info,
            solution: Solution::new(n, m),
            timers: Timers::default(),
            warm_start_pending: false,
            first_run: true,
        };
        session.refactor()?;

        Ok(session)
    }

    /// Factor the KKT system for the current data and step size.  A
    /// positive pivot count other than `n` means that `P` is not
    /// positive semidefinite.
    pub(crate) fn refactor(&mut self) -> Result<(), EngineError> {
        let positive = self
            .kkt
            .factor(&self.data.P, &self.data.A, self.settings.sigma)?;
        if positive != self.data.n {
            self.info.status = SolverStatus::NonConvex;
            return Err(EngineError::NonConvex);
        }
        Ok(())
    }

    fn solve_inner(&mut self) -> Result<(), EngineError> {
        let settings = self.settings.clone();

        self.info.status = SolverStatus::Unsolved;
        self.info.iter = 0;
        self.info.rho_updates = 0;
        self.info.status_polish = PolishStatus::NotPerformed;

        if !settings.warm_starting && !self.warm_start_pending {
            self.vars.cold_start();
        }
        self.warm_start_pending = false;

        let start = Instant::now();
        let mut status = None;
        let mut limit_status = SolverStatus::MaxIterReached;
        let mut residuals_current = false;

        for iter in 1..=settings.max_iter {
            self.info.iter = iter;
            self.admm_step(settings.alpha, settings.sigma);
            residuals_current = false;

            if settings.check_termination > 0 && iter % settings.check_termination == 0 {
                self.update_residuals();
                residuals_current = true;
                status = self.check_termination(&settings, false);
                if status.is_some() {
                    break;
                }
            }

            if settings.adaptive_rho
                && settings.adaptive_rho_interval > 0
                && iter % settings.adaptive_rho_interval == 0
            {
                if !residuals_current {
                    self.update_residuals();
                    residuals_current = true;
                }
                self.adapt_rho(&settings)?;
            }

            if start.elapsed().as_secs_f64() > settings.time_limit {
                limit_status = SolverStatus::TimeLimitReached;
                break;
            }
        }

        // out of iterations or time, so settle for reduced accuracy
        let status = match status {
            Some(status) => status,
            None => {
                if !residuals_current {
                    self.update_residuals();
                }
                self.check_termination(&settings, true)
                    .unwrap_or(limit_status)
            }
        };
        self.info.status = status;

        if settings.polishing && status == SolverStatus::Solved {
            timeit! {self.timers => "polish";
                self.polish()
            };
        }

        self.store_solution();
        Ok(())
    }

    // one ADMM iteration
    fn admm_step(&mut self, alpha: T, sigma: T) {
        let v = &mut self.vars;
        let d = &self.data;
        let kkt = &mut self.kkt;

        std::mem::swap(&mut v.x, &mut v.x_prev);
        std::mem::swap(&mut v.z, &mut v.z_prev);

        kkt.solve_tilde(
            &mut v.xtilde,
            &mut v.ztilde,
            &v.x_prev,
            &v.z_prev,
            &v.y,
            &d.q,
            sigma,
        );

        v.x.waxpby(alpha, &v.xtilde, T::one() - alpha, &v.x_prev);
        v.delta_x.waxpby(T::one(), &v.x, -T::one(), &v.x_prev);

        for (z, y, dy, &zt, &zp, &l, &u, &r, &rinv) in izip!(
            v.z.iter_mut(),
            v.y.iter_mut(),
            v.delta_y.iter_mut(),
            &v.ztilde,
            &v.z_prev,
            &d.l,
            &d.u,
            &kkt.rho_vec,
            &kkt.rho_inv_vec
        ) {
            let zrelax = alpha * zt + (T::one() - alpha) * zp;
            *z = T::min(T::max(zrelax + rinv * (*y), l), u);
            *dy = r * (zrelax - *z);
            *y += *dy;
        }
    }

    fn adapt_rho(&mut self, settings: &Settings<T>) -> Result<(), EngineError> {
        let tol: T = DIVISION_TOL.as_T();
        let r = &self.res;
        let prim = r.prim_res_scaled / (r.prim_norm_scaled + tol);
        let dual = r.dual_res_scaled / (r.dual_norm_scaled + tol);

        let rho_new = self.rho * T::sqrt(prim / (dual + tol));
        let rho_new = T::min(T::max(rho_new, RHO_MIN.as_T()), RHO_MAX.as_T());
        self.info.rho_estimate = rho_new;

        let factor = settings.adaptive_rho_tolerance;
        if rho_new > self.rho * factor || rho_new < self.rho / factor {
            self.rho = rho_new;
            self.kkt.set_rho(rho_new);
            self.refactor()?;
            self.info.rho_updates += 1;
        }
        Ok(())
    }

    // map the iterate or the certificates back to user coordinates
    fn store_solution(&mut self) {
        let status = self.info.status;
        let eq = &self.data.equilibration;
        let sol = &mut self.solution;

        self.info.prim_res = self.res.prim_res;
        self.info.dual_res = self.res.dual_res;

        if status.is_infeasible() {
            sol.x.set(T::nan());
            sol.y.set(T::nan());
            self.info.obj_val = match status {
                SolverStatus::PrimalInfeasible | SolverStatus::PrimalInfeasibleInaccurate => {
                    T::infinity()
                }
                _ => T::neg_infinity(),
            };
        } else {
            sol.x.copy_from(&self.vars.x).hadamard(&eq.d);
            sol.y.copy_from(&self.vars.y).hadamard(&eq.e).scale(eq.cinv);
            self.info.obj_val = self.res.obj_val;
        }
    }

    fn finalize_times(&mut self) {
        let info = &mut self.info;
        info.solve_time = self.timers.elapsed_secs(&["solve"]);
        info.polish_time = self.timers.elapsed_secs(&["solve", "polish"]);
        info.update_time = self.timers.elapsed_secs(&["update"]);
        info.run_time = info.solve_time + info.update_time;
        if self.first_run {
            info.run_time += info.setup_time;
            self.first_run = false;
        }
        self.timers.reset_timer("update");
    }
}

impl<T> QpSession<T> for AdmmSession<T>
where
    T: FloatT,
{
    fn solve(&mut self) -> Result<(), EngineError> {
        self.timers.reset_timer("solve");
        let result = timeit! {self.timers => "solve";
            self.solve_inner()
        };
        self.finalize_times();
        result
    }

    fn update_data_vectors(
        &mut self,
        q: Option<&[T]>,
        l: Option<&[T]>,
        u: Option<&[T]>,
    ) -> Result<(), EngineError> {
        timeit! {self.timers => "update";
            self.update_vectors(q, l, u)
        }
    }

    fn update_data_matrices(
        &mut self,
        Px: Option<&[T]>,
        Px_idx: Option<&[usize]>,
        Ax: Option<&[T]>,
        Ax_idx: Option<&[usize]>,
    ) -> Result<(), EngineError> {
        timeit! {self.timers => "update";
            self.update_matrices(Px, Px_idx, Ax, Ax_idx)
        }
    }

    fn warm_start(&mut self, x: Option<&[T]>, y: Option<&[T]>) -> Result<(), EngineError> {
        self.set_warm_start(x, y)
    }

    fn update_settings(&mut self, settings: &Settings<T>) -> Result<(), EngineError> {
        self.replace_settings(settings)
    }

    fn solution(&self) -> &Solution<T> {
        &self.solution
    }

    fn info(&self) -> &Info<T> {
        &self.info
    }

    fn settings(&self) -> &Settings<T> {
        &self.settings
    }
}
