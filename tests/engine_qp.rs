#![allow(non_snake_case)]
#[cfg(target_family = "wasm")]
use wasm_bindgen_test::*;

use qpmodel::{algebra::*, engine::*};

fn tight_settings() -> Settings<f64> {
    SettingsBuilder::default()
        .eps_abs(1e-7)
        .eps_rel(1e-7)
        .build()
        .unwrap()
}

#[allow(clippy::type_complexity)]
fn basic_qp_data() -> (CscMatrix<f64>, Vec<f64>, CscMatrix<f64>, Vec<f64>, Vec<f64>) {
    // P = [4. 1;1 2], upper triangle only
    let P = CscMatrix::new(
        2,                // m
        2,                // n
        vec![0, 1, 3],    // colptr
        vec![0, 0, 1],    // rowval
        vec![4., 1., 2.], // nzval
    );

    // A = [1. 1;1 0; 0 1]
    let A = CscMatrix::new(
        3,                    // m
        2,                    // n
        vec![0, 2, 4],        //colptr
        vec![0, 1, 0, 2],     //rowval
        vec![1., 1., 1., 1.], //nzval
    );

    let q = vec![1., 1.];
    let l = vec![1., 0., 0.];
    let u = vec![1., 0.7, 0.7];

    (P, q, A, l, u)
}

#[test]
fn test_qp_feasible() {
    let (P, q, A, l, u) = basic_qp_data();

    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, tight_settings()).unwrap();
    session.solve().unwrap();

    assert_eq!(session.info().status, SolverStatus::Solved);

    let refsol = [0.3, 0.7];
    let x = &session.solution().x;
    assert!((x[0] - refsol[0]).abs() < 1e-4);
    assert!((x[1] - refsol[1]).abs() < 1e-4);

    let refobj = 1.88;
    assert!((session.info().obj_val - refobj).abs() < 1e-4);
    assert!(session.info().setup_time >= 0.);
    assert!(session.info().solve_time >= 0.);
    assert!(session.info().run_time >= session.info().solve_time);
}

#[test]
fn test_qp_polishing() {
    let (P, q, A, l, u) = basic_qp_data();
    let settings = Settings {
        polishing: true,
        ..Settings::default()
    };

    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, settings).unwrap();
    session.solve().unwrap();

    assert_eq!(session.info().status, SolverStatus::Solved);
    assert_eq!(session.info().status_polish, PolishStatus::Succeeded);
    let x = &session.solution().x;
    assert!((x[0] - 0.3).abs() < 1e-6);
    assert!((x[1] - 0.7).abs() < 1e-6);
    assert!(session.info().polish_time <= session.info().solve_time);
}

#[test]
fn test_qp_primal_infeasible() {
    // x ≥ 1 and x ≤ 0
    let P = CscMatrix::<f64>::zeros((1, 1));
    let q = [1.];
    let A = CscMatrix::new(2, 1, vec![0, 2], vec![0, 1], vec![1., 1.]);
    let l = [1., f64::NEG_INFINITY];
    let u = [f64::INFINITY, 0.];

    let mut session = AdmmEngine
        .setup(&P, &q, &A, &l, &u, Settings::default())
        .unwrap();
    session.solve().unwrap();

    let info = session.info();
    assert_eq!(info.status, SolverStatus::PrimalInfeasible);
    assert_eq!(info.obj_val, f64::INFINITY);
    assert!(session.solution().x[0].is_nan());

    // the certificate satisfies Aᵀy = 0 and uᵀy₊ + lᵀy₋ < 0
    let y = &session.solution().prim_inf_cert;
    assert!((y[0] + y[1]).abs() < 1e-3);
    assert!(y[0] < 0. && y[1] > 0.);
}

#[test]
fn test_qp_dual_infeasible() {
    // minimize -x - y subject to x - y == 0, x ≥ 0
    let P = CscMatrix::<f64>::zeros((2, 2));
    let q = [-1., -1.];
    let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 0], vec![1., 1., -1.]);
    let l = [0., 0.];
    let u = [0., f64::INFINITY];

    let mut session = AdmmEngine
        .setup(&P, &q, &A, &l, &u, Settings::default())
        .unwrap();
    session.solve().unwrap();

    let info = session.info();
    assert_eq!(info.status, SolverStatus::DualInfeasible);
    assert_eq!(info.obj_val, f64::NEG_INFINITY);

    // the certificate is a descent direction along the recession cone
    let dx = &session.solution().dual_inf_cert;
    assert!(q[0] * dx[0] + q[1] * dx[1] < 0.);
    assert!((dx[0] - dx[1]).abs() < 1e-3);
    assert!(dx[0] > 0.);
}

#[test]
fn test_qp_nonconvex() {
    let P = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1., -1.]);
    let q = [0., 0.];
    let A = CscMatrix::<f64>::identity(2);
    let l = [-1., -1.];
    let u = [1., 1.];

    let result = AdmmEngine.setup(&P, &q, &A, &l, &u, Settings::default());
    assert!(matches!(result, Err(EngineError::NonConvex)));
}

#[test]
fn test_qp_bad_data() {
    let (P, q, A, l, u) = basic_qp_data();
    let settings = Settings::<f64>::default();

    // wrong vector lengths
    let result = AdmmEngine.setup(&P, &q[0..1], &A, &l, &u, settings.clone());
    assert!(matches!(result, Err(EngineError::DataValidation(_))));
    let result = AdmmEngine.setup(&P, &q, &A, &l[0..2], &u, settings.clone());
    assert!(matches!(result, Err(EngineError::DataValidation(_))));

    // lower triangular P
    let Pfull = CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![4., 1., 1., 2.]);
    let result = AdmmEngine.setup(&Pfull, &q, &A, &l, &u, settings.clone());
    assert!(matches!(result, Err(EngineError::DataValidation(_))));

    // crossed bounds
    let result = AdmmEngine.setup(&P, &q, &A, &u, &l, settings.clone());
    assert!(matches!(result, Err(EngineError::DataValidation(_))));

    // bad settings
    let bad = Settings {
        alpha: 3.,
        ..settings
    };
    let result = AdmmEngine.setup(&P, &q, &A, &l, &u, bad);
    assert!(matches!(
        result,
        Err(EngineError::SettingsValidation(SettingsError::BadFieldValue("alpha")))
    ));
}

#[test]
fn test_update_vectors_matches_setup() {
    let (P, q, A, l, u) = basic_qp_data();

    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, tight_settings()).unwrap();
    session.solve().unwrap();

    let q2 = vec![2., -1.];
    let l2 = vec![1., -0.5, 0.];
    let u2 = vec![1., 0.4, 0.9];
    session
        .update_data_vectors(Some(q2.as_slice()), Some(l2.as_slice()), Some(u2.as_slice()))
        .unwrap();
    session.solve().unwrap();
    assert_eq!(session.info().status, SolverStatus::Solved);

    let mut fresh = AdmmEngine.setup(&P, &q2, &A, &l2, &u2, tight_settings()).unwrap();
    fresh.solve().unwrap();

    for (a, b) in session.solution().x.iter().zip(fresh.solution().x.iter()) {
        assert!((a - b).abs() < 1e-4);
    }
    assert!((session.info().obj_val - fresh.info().obj_val).abs() < 1e-4);
}

#[test]
fn test_update_matrices_matches_setup() {
    let (P, q, A, l, u) = basic_qp_data();

    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, tight_settings()).unwrap();
    session.solve().unwrap();

    // full update of P, partial update of A
    let P2 = CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![3., 0.5, 6.]);
    let mut A2 = A.clone();
    A2.nzval[1] = 2.;
    A2.nzval[3] = 0.5;

    session
        .update_data_matrices(
            Some(P2.nzval.as_slice()),
            None,
            Some([2., 0.5].as_slice()),
            Some([1, 3].as_slice()),
        )
        .unwrap();
    session.solve().unwrap();
    assert_eq!(session.info().status, SolverStatus::Solved);

    let mut fresh = AdmmEngine.setup(&P2, &q, &A2, &l, &u, tight_settings()).unwrap();
    fresh.solve().unwrap();

    for (a, b) in session.solution().x.iter().zip(fresh.solution().x.iter()) {
        assert!((a - b).abs() < 1e-4);
    }
}

#[test]
fn test_bad_updates_leave_session_intact() {
    let (P, q, A, l, u) = basic_qp_data();
    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, tight_settings()).unwrap();

    let short = [1.];
    assert!(matches!(
        session.update_data_vectors(Some(short.as_slice()), None, None),
        Err(EngineError::DataUpdate(_))
    ));
    assert!(matches!(
        session.update_data_vectors(None, Some(u.as_slice()), Some(l.as_slice())),
        Err(EngineError::DataUpdate(_))
    ));
    assert!(matches!(
        session.update_data_matrices(None, None, Some([1.].as_slice()), Some([9].as_slice())),
        Err(EngineError::DataUpdate(_))
    ));
    assert!(matches!(
        session.warm_start(Some(short.as_slice()), None),
        Err(EngineError::DataValidation(_))
    ));

    session.solve().unwrap();
    let x = &session.solution().x;
    assert!((x[0] - 0.3).abs() < 1e-4);
    assert!((x[1] - 0.7).abs() < 1e-4);
}

#[test]
fn test_warm_start_and_settings_update() {
    let (P, q, A, l, u) = basic_qp_data();
    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, tight_settings()).unwrap();
    session.solve().unwrap();
    let cold_iters = session.info().iter;
    let x = session.solution().x.clone();
    let y = session.solution().y.clone();

    // restarting from the solution terminates almost immediately
    session.warm_start(Some(x.as_slice()), Some(y.as_slice())).unwrap();
    session.solve().unwrap();
    assert_eq!(session.info().status, SolverStatus::Solved);
    assert!(session.info().iter <= cold_iters);

    // setup-only settings are rejected on a live session
    let bad = Settings {
        scaling: 3,
        ..session.settings().clone()
    };
    assert!(matches!(
        session.update_settings(&bad),
        Err(EngineError::SettingsValidation(SettingsError::ImmutableSetting("scaling")))
    ));

    let good = Settings {
        rho: 1.,
        max_iter: 5,
        warm_starting: false,
        ..session.settings().clone()
    };
    session.update_settings(&good).unwrap();
    assert_eq!(session.settings().max_iter, 5);
    assert_eq!(session.info().rho_estimate, 1.);
    session.solve().unwrap();
    assert!(session.info().iter <= 5);
    assert_ne!(session.info().status, SolverStatus::Unsolved);
}

// a minimal test to check that the wasm build is working

#[cfg(target_family = "wasm")]
#[wasm_bindgen_test]
fn test_qp_feasible_wasm() {
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
    test_qp_feasible();
}

#[test]
fn test_long_chain_qp() {
    // minimize ½‖x‖² - sᵀx with s alternating ±1, subject to
    // |x_i - x_{i+1}| ≤ 0.1.  The solution is x = 0.05 s.
    let n = 2000;
    let P = CscMatrix::identity(n);
    let s: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1. } else { -1. }).collect();
    let q: Vec<f64> = s.iter().map(|v| -v).collect();

    let (mut I, mut J, mut V) = (vec![], vec![], vec![]);
    for i in 0..n - 1 {
        I.extend([i, i]);
        J.extend([i, i + 1]);
        V.extend([1., -1.]);
    }
    let A = CscMatrix::new_from_triplets(n - 1, n, I, J, V);
    let l = vec![-0.1; n - 1];
    let u = vec![0.1; n - 1];

    let settings = Settings {
        polishing: true,
        ..Settings::default()
    };
    let mut session = AdmmEngine.setup(&P, &q, &A, &l, &u, settings).unwrap();
    session.solve().unwrap();

    assert!(session.info().status.is_solved());
    let x = &session.solution().x;
    for (xi, si) in x.iter().zip(&s) {
        assert!((xi - 0.05 * si).abs() < 1e-3);
    }
}
