#![allow(non_snake_case)]

use super::reuse::select_path;
use super::*;
use crate::algebra::CscMatrix;
use crate::engine::{AdmmEngine, Info, QpEngine, QpSession, Settings, SolverStatus};
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use std::io::Write;

/// Lifecycle of the engine session owned by a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// no session exists yet, or the last setup failed
    Uninitialized,
    /// a live session holds the most recently solved problem
    Built,
    /// the session was released and the model can no longer be solved
    Released,
}

// the live session, with the matrices it was last given
struct Workspace<S> {
    session: S,
    P: CscMatrix<f64>,
    A: CscMatrix<f64>,
}

/// A convex QP assembled from variables, constraints and a quadratic
/// objective, solved through a session of the engine `E`.
///
/// The session is created on the first [`solve`](Model::solve).  Later
/// solves reassemble the problem and push the new values into the live
/// session if the sparsity of `P` and `A` is unchanged, or recreate the
/// session otherwise.
///
/// ```
/// use qpmodel::modelling::{Constraint, Model};
///
/// let mut model = Model::new();
/// let x = model.add_variable();
/// model.set_objective(0.5 * (x * x) - 5. * x);
/// model.add_constraint(Constraint::ge(x, 0.));
///
/// model.settings_mut().eps_abs = 1e-6;
/// model.settings_mut().eps_rel = 1e-6;
/// model.solve().unwrap();
/// assert!((model.value(x).unwrap() - 5.).abs() < 1e-3);
/// ```
pub struct Model<E: QpEngine<f64> = AdmmEngine> {
    engine: E,
    nvars: usize,
    constraints: Vec<Constraint>,
    objective: QuadExpr,
    settings: Settings<f64>,
    workspace: Option<Workspace<E::Session>>,
    state: SessionState,
    solution: Option<ModelSolution>,
    initial_values: Option<(Option<Vec<f64>>, Option<Vec<f64>>)>,
    stream: PrintTarget,
}

impl Model<AdmmEngine> {
    /// An empty model solved with the bundled [`AdmmEngine`].
    pub fn new() -> Self {
        Self::with_engine(AdmmEngine)
    }
}

impl Default for Model<AdmmEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Model<E>
where
    E: QpEngine<f64>,
{
    /// An empty model solved with `engine`, starting from the engine's
    /// default settings.
    pub fn with_engine(engine: E) -> Self {
        let settings = engine.default_settings();
        Self {
            engine,
            nvars: 0,
            constraints: Vec::new(),
            objective: QuadExpr::new(),
            settings,
            workspace: None,
            state: SessionState::Uninitialized,
            solution: None,
            initial_values: None,
            stream: PrintTarget::default(),
        }
    }

    // ---------------------------------
    // building
    // ---------------------------------

    /// Create a new variable.  Variables may be added at any time.
    pub fn add_variable(&mut self) -> Variable {
        let var = Variable::new(self.nvars);
        self.nvars += 1;
        var
    }

    /// Create `count` new variables with consecutive indices.
    pub fn add_variables(&mut self, count: usize) -> Vec<Variable> {
        (0..count).map(|_| self.add_variable()).collect()
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(constraint);
        ConstraintId(self.constraints.len() - 1)
    }

    pub fn constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.0)
            .ok_or(ModelError::UnknownConstraint(id.0))
    }

    /// Access a constraint to change its bounds.
    pub fn constraint_mut(&mut self, id: ConstraintId) -> Result<&mut Constraint, ModelError> {
        self.constraints
            .get_mut(id.0)
            .ok_or(ModelError::UnknownConstraint(id.0))
    }

    /// Replace the objective.
    pub fn set_objective(&mut self, objective: impl Into<QuadExpr>) {
        self.objective = objective.into();
    }

    pub fn objective(&self) -> &QuadExpr {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.nvars
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn settings(&self) -> &Settings<f64> {
        &self.settings
    }

    /// Settings used by the next solve.  Changes to settings that a live
    /// session cannot accept force the session to be rebuilt.
    pub fn settings_mut(&mut self) -> &mut Settings<f64> {
        &mut self.settings
    }

    /// Supply a starting point for the next solve.  `x` is indexed by
    /// variable and `y` by constraint.
    pub fn set_initial_values(
        &mut self,
        x: Option<&[f64]>,
        y: Option<&[f64]>,
    ) -> Result<(), ModelError> {
        self.check_not_released()?;
        check_dimension("initial x", self.nvars, x)?;
        check_dimension("initial y", self.constraints.len(), y)?;
        self.initial_values = Some((x.map(<[f64]>::to_vec), y.map(<[f64]>::to_vec)));
        Ok(())
    }

    /// Assemble the problem in engine form.
    pub fn standard_form(&self) -> Result<StandardForm, ModelError> {
        StandardForm::assemble(self.nvars, &self.objective, &self.constraints)
    }

    // ---------------------------------
    // solving
    // ---------------------------------

    /// Assemble and solve the problem, reusing the live session when
    /// the sparsity of `P` and `A` is unchanged.
    ///
    /// Returns the engine's status.  Infeasibility and inaccurate results
    /// are statuses, not errors.
    pub fn solve(&mut self) -> Result<SolverStatus, ModelError> {
        self.check_not_released()?;
        self.solution = None;

        let sf = self.standard_form()?;

        let path = match &self.workspace {
            None => SolvePath::Setup,
            Some(ws) => select_path(&ws.P, &ws.A, &sf, ws.session.settings(), &self.settings),
        };

        self.print_configuration(&sf, path)?;

        match path {
            SolvePath::Setup | SolvePath::Rebuild => {
                // the old session is dropped before the new one is created
                self.workspace = None;
                self.state = SessionState::Uninitialized;

                let session = self
                    .engine
                    .setup(&sf.P, &sf.q, &sf.A, &sf.l, &sf.u, self.settings.clone())
                    .map_err(ModelError::Setup)?;

                self.workspace = Some(Workspace {
                    session,
                    P: sf.P.clone(),
                    A: sf.A.clone(),
                });
                self.state = SessionState::Built;
            }
            SolvePath::Update => {
                if let Some(ws) = self.workspace.as_mut() {
                    if let Err(e) = update_workspace(ws, &sf, &self.settings) {
                        // the session may hold part of the new data, so
                        // the next solve starts from a fresh one
                        self.workspace = None;
                        self.state = SessionState::Uninitialized;
                        return Err(ModelError::Update(e));
                    }
                }
            }
        }

        let Some(ws) = self.workspace.as_mut() else {
            return Err(ModelError::NoSolution);
        };

        if let Some((x, y)) = self.initial_values.take() {
            check_dimension("initial x", sf.n(), x.as_deref())?;
            check_dimension("initial y", sf.m(), y.as_deref())?;
            ws.session
                .warm_start(x.as_deref(), y.as_deref())
                .map_err(ModelError::Update)?;
        }

        ws.session.solve().map_err(ModelError::Solve)?;

        let info = ws.session.info();
        let engine_solution = ws.session.solution();
        let solution = ModelSolution {
            status: info.status,
            x: engine_solution.x.clone(),
            y: engine_solution.y.clone(),
            objective_value: info.obj_val + sf.constant,
            iterations: info.iter,
            solve_time: info.solve_time,
            path,
        };
        let status = solution.status;
        self.solution = Some(solution);

        self.print_footer()?;

        Ok(status)
    }

    /// Free the engine session.  The model can no longer be solved or
    /// queried afterwards.  Dropping the model also frees the session.
    pub fn release(&mut self) {
        self.workspace = None;
        self.solution = None;
        self.initial_values = None;
        self.state = SessionState::Released;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// the path taken by the most recent successful solve
    pub fn last_path(&self) -> Option<SolvePath> {
        self.solution.as_ref().map(|s| s.path)
    }

    // ---------------------------------
    // results
    // ---------------------------------

    /// Status of the most recent solve, or `Unsolved` if no solve has
    /// completed.
    pub fn status(&self) -> SolverStatus {
        self.solution
            .as_ref()
            .map_or(SolverStatus::Unsolved, |s| s.status)
    }

    /// engine statistics of the live session
    pub fn info(&self) -> Option<&Info<f64>> {
        self.workspace.as_ref().map(|ws| ws.session.info())
    }

    /// the last solution, including statuses without a primal point
    pub fn solution(&self) -> Option<&ModelSolution> {
        self.solution.as_ref()
    }

    /// Value of `var` in the last solution.
    pub fn value(&self, var: Variable) -> Result<f64, ModelError> {
        let sol = self.primal_solution()?;
        sol.x.get(var.index()).copied().ok_or(ModelError::NoSolution)
    }

    /// Values of all variables in the last solution.
    pub fn values(&self) -> Result<&[f64], ModelError> {
        Ok(&self.primal_solution()?.x)
    }

    /// Multiplier of a constraint in the last solution.
    pub fn dual_value(&self, id: ConstraintId) -> Result<f64, ModelError> {
        let sol = self.primal_solution()?;
        if id.0 >= self.constraints.len() {
            return Err(ModelError::UnknownConstraint(id.0));
        }
        sol.y.get(id.0).copied().ok_or(ModelError::NoSolution)
    }

    /// Objective value of the last solution, including its constant.
    pub fn objective_value(&self) -> Result<f64, ModelError> {
        Ok(self.primal_solution()?.objective_value)
    }

    fn primal_solution(&self) -> Result<&ModelSolution, ModelError> {
        self.check_not_released()?;
        match &self.solution {
            Some(sol) if sol.status.has_solution() => Ok(sol),
            _ => Err(ModelError::NoSolution),
        }
    }

    fn check_not_released(&self) -> Result<(), ModelError> {
        match self.state {
            SessionState::Released => Err(ModelError::Released),
            _ => Ok(()),
        }
    }

    // ---------------------------------
    // printing
    // ---------------------------------

    fn print_configuration(&mut self, sf: &StandardForm, path: SolvePath) -> std::io::Result<()> {
        if !self.settings.verbose {
            return Ok(());
        }
        let set = &self.settings;
        let out = &mut self.stream;

        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(out, "           qpmodel v{}", crate::VERSION)?;
        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(out, "problem:")?;
        writeln!(out, "  variables     = {}", sf.n())?;
        writeln!(out, "  constraints   = {}", sf.m())?;
        writeln!(out, "  nnz(P)        = {}", sf.P.nnz())?;
        writeln!(out, "  nnz(A)        = {}", sf.A.nnz())?;
        writeln!(out, "  session       = {}", path)?;
        writeln!(out)?;

        let time_lim_str = if set.time_limit.is_infinite() {
            "Inf".to_string()
        } else {
            format!("{:?}", set.time_limit)
        };
        writeln!(out, "settings:")?;
        writeln!(
            out,
            "  max iter = {}, time limit = {}, check every {}",
            set.max_iter, time_lim_str, set.check_termination
        )?;
        writeln!(
            out,
            "  eps_abs = {:.1e}, eps_rel = {:.1e}, eps_prim_inf = {:.1e}, eps_dual_inf = {:.1e}",
            set.eps_abs, set.eps_rel, set.eps_prim_inf, set.eps_dual_inf
        )?;
        writeln!(
            out,
            "  rho = {:.2e} ({}), sigma = {:.2e}, alpha = {:.2}",
            set.rho,
            if set.adaptive_rho { "adaptive" } else { "fixed" },
            set.sigma,
            set.alpha
        )?;
        writeln!(
            out,
            "  scaling: {} iter, polishing: {}, warm starting: {}",
            set.scaling,
            bool_on_off(set.polishing),
            bool_on_off(set.warm_starting)
        )?;
        writeln!(out)?;
        out.flush()
    }

    fn print_footer(&mut self) -> std::io::Result<()> {
        if !self.settings.verbose {
            return Ok(());
        }
        let Some(sol) = self.solution.as_ref() else {
            return Ok(());
        };
        let out = &mut self.stream;

        writeln!(out, "-------------------------------------------------------------")?;
        writeln!(out, "Terminated with status = {}", sol.status)?;
        writeln!(out, "iterations = {}", sol.iterations)?;
        if sol.status.has_solution() {
            writeln!(out, "objective = {:+.6e}", sol.objective_value)?;
        }
        writeln!(
            out,
            "solve time = {:?}",
            std::time::Duration::from_secs_f64(sol.solve_time)
        )?;
        out.flush()
    }
}

impl<E> Drop for Model<E>
where
    E: QpEngine<f64>,
{
    fn drop(&mut self) {
        self.release();
    }
}

impl<E> ConfigurablePrintTarget for Model<E>
where
    E: QpEngine<f64>,
{
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

// push new values into a session whose sparsity already matches
fn update_workspace<S>(
    ws: &mut Workspace<S>,
    sf: &StandardForm,
    settings: &Settings<f64>,
) -> Result<(), crate::engine::EngineError>
where
    S: QpSession<f64>,
{
    if ws.session.settings() != settings {
        ws.session.update_settings(settings)?;
    }

    // matrices go first, as a matrix update re-scales the stored vectors
    let Px = (ws.P.nzval != sf.P.nzval).then_some(sf.P.nzval.as_slice());
    let Ax = (ws.A.nzval != sf.A.nzval).then_some(sf.A.nzval.as_slice());
    if Px.is_some() || Ax.is_some() {
        ws.session.update_data_matrices(Px, None, Ax, None)?;
        ws.P.nzval.copy_from_slice(&sf.P.nzval);
        ws.A.nzval.copy_from_slice(&sf.A.nzval);
    }

    ws.session
        .update_data_vectors(
            Some(sf.q.as_slice()),
            Some(sf.l.as_slice()),
            Some(sf.u.as_slice()),
        )
}

fn check_dimension(what: &'static str, expected: usize, v: Option<&[f64]>) -> Result<(), ModelError> {
    match v {
        Some(v) if v.len() != expected => Err(ModelError::DimensionMismatch {
            what,
            expected,
            found: v.len(),
        }),
        _ => Ok(()),
    }
}

fn bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}
