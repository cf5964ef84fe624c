#![allow(non_snake_case)]

use qpmodel::{algebra::*, engine::*, modelling::*};
use std::cell::RefCell;
use std::rc::Rc;

type CallLog = Rc<RefCell<Vec<&'static str>>>;

// An engine that forwards to the ADMM engine and records every call
// made on it.
struct RecordingEngine {
    log: CallLog,
}

struct RecordingSession {
    inner: AdmmSession<f64>,
    log: CallLog,
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.log.borrow_mut().push("drop");
    }
}

impl QpEngine<f64> for RecordingEngine {
    type Session = RecordingSession;

    fn default_settings(&self) -> Settings<f64> {
        AdmmEngine.default_settings()
    }

    fn setup(
        &self,
        P: &CscMatrix<f64>,
        q: &[f64],
        A: &CscMatrix<f64>,
        l: &[f64],
        u: &[f64],
        settings: Settings<f64>,
    ) -> Result<RecordingSession, EngineError> {
        self.log.borrow_mut().push("setup");
        let inner = AdmmEngine.setup(P, q, A, l, u, settings)?;
        Ok(RecordingSession {
            inner,
            log: self.log.clone(),
        })
    }
}

impl QpSession<f64> for RecordingSession {
    fn solve(&mut self) -> Result<(), EngineError> {
        self.log.borrow_mut().push("solve");
        self.inner.solve()
    }
    fn update_data_vectors(
        &mut self,
        q: Option<&[f64]>,
        l: Option<&[f64]>,
        u: Option<&[f64]>,
    ) -> Result<(), EngineError> {
        self.log.borrow_mut().push("update_data_vectors");
        self.inner.update_data_vectors(q, l, u)
    }
    fn update_data_matrices(
        &mut self,
        Px: Option<&[f64]>,
        Px_idx: Option<&[usize]>,
        Ax: Option<&[f64]>,
        Ax_idx: Option<&[usize]>,
    ) -> Result<(), EngineError> {
        self.log.borrow_mut().push("update_data_matrices");
        self.inner.update_data_matrices(Px, Px_idx, Ax, Ax_idx)
    }
    fn warm_start(&mut self, x: Option<&[f64]>, y: Option<&[f64]>) -> Result<(), EngineError> {
        self.log.borrow_mut().push("warm_start");
        self.inner.warm_start(x, y)
    }
    fn update_settings(&mut self, settings: &Settings<f64>) -> Result<(), EngineError> {
        self.log.borrow_mut().push("update_settings");
        self.inner.update_settings(settings)
    }
    fn solution(&self) -> &Solution<f64> {
        self.inner.solution()
    }
    fn info(&self) -> &Info<f64> {
        self.inner.info()
    }
    fn settings(&self) -> &Settings<f64> {
        self.inner.settings()
    }
}

fn recording_model() -> (Model<RecordingEngine>, CallLog) {
    let log = CallLog::default();
    let model = Model::with_engine(RecordingEngine { log: log.clone() });
    (model, log)
}

fn take(log: &CallLog) -> Vec<&'static str> {
    std::mem::take(&mut *log.borrow_mut())
}

#[test]
fn test_engine_calls_per_path() {
    let (mut model, log) = recording_model();
    let x = model.add_variable();
    let y = model.add_variable();
    model.set_objective(x * x + y * y - x);
    let c = model.add_constraint(Constraint::le(x + y, 1.));

    model.solve().unwrap();
    assert_eq!(take(&log), vec!["setup", "solve"]);

    // bounds only
    model.constraint_mut(c).unwrap().upper = 0.2;
    model.solve().unwrap();
    assert_eq!(take(&log), vec!["update_data_vectors", "solve"]);

    // new values in an existing pattern
    model.set_objective(3. * (x * x) + y * y - x);
    model.solve().unwrap();
    assert_eq!(
        take(&log),
        vec!["update_data_matrices", "update_data_vectors", "solve"]
    );

    // a mutable setting
    model.settings_mut().max_iter = 100;
    model.solve().unwrap();
    assert_eq!(
        take(&log),
        vec!["update_settings", "update_data_vectors", "solve"]
    );

    // a new pattern drops the old session before the new setup
    model.add_constraint(Constraint::ge(y, -1.));
    model.solve().unwrap();
    assert_eq!(take(&log), vec!["drop", "setup", "solve"]);
    assert_eq!(model.last_path(), Some(SolvePath::Rebuild));

    model.set_initial_values(Some(&[0., 0.]), None).unwrap();
    model.solve().unwrap();
    assert_eq!(
        take(&log),
        vec!["update_data_vectors", "warm_start", "solve"]
    );

    model.release();
    assert_eq!(take(&log), vec!["drop"]);
    model.release();
    assert!(take(&log).is_empty());
}

#[test]
fn test_failed_setup_stores_no_session() {
    let (mut model, log) = recording_model();
    let x = model.add_variable();
    model.set_objective(-1. * (x * x));

    assert!(matches!(
        model.solve(),
        Err(ModelError::Setup(EngineError::NonConvex))
    ));
    assert_eq!(take(&log), vec!["setup"]);
    assert_eq!(model.state(), SessionState::Uninitialized);

    // the next attempt is a fresh setup
    model.set_objective(x * x);
    model.solve().unwrap();
    assert_eq!(take(&log), vec!["setup", "solve"]);
    assert_eq!(model.last_path(), Some(SolvePath::Setup));
}

#[test]
fn test_drop_releases_session() {
    let (mut model, log) = recording_model();
    let x = model.add_variable();
    model.set_objective(x * x);
    model.solve().unwrap();
    take(&log);

    drop(model);
    assert_eq!(take(&log), vec!["drop"]);
}

#[test]
fn test_failed_update_drops_session() {
    let (mut model, log) = recording_model();
    let x = model.add_variable();
    model.add_constraint(Constraint::new(x, -5., 5.));
    model.set_objective(x * x - 2. * x);
    model.solve().unwrap();
    take(&log);

    model.set_objective(-1. * (x * x) - 2. * x);
    assert!(matches!(
        model.solve(),
        Err(ModelError::Update(EngineError::NonConvex))
    ));
    assert_eq!(take(&log), vec!["update_data_matrices", "drop"]);

    // restoring the objective builds a new session
    model.set_objective(x * x - 2. * x);
    model.solve().unwrap();
    assert_eq!(take(&log), vec!["setup", "solve"]);
}
