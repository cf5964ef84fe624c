#![allow(non_snake_case)]

use qpmodel::{algebra::*, modelling::*};

#[test]
fn test_triplet_duplicates_are_summed() {
    let A = CscMatrix::new_from_triplets(1, 1, vec![0, 0], vec![0, 0], vec![3.0, 4.0]);
    assert_eq!(A.colptr, vec![0, 1]);
    assert_eq!(A.rowval, vec![0]);
    assert_eq!(A.nzval, vec![7.0]);
}

#[test]
fn test_triplet_assembly_is_order_independent() {
    let triplets = vec![
        (2, 1, 1.5),
        (0, 0, 1.0),
        (1, 2, -2.0),
        (0, 0, 0.5),
        (2, 0, 4.0),
        (0, 2, 3.0),
    ];
    let build = |t: &[(usize, usize, f64)]| {
        let I = t.iter().map(|e| e.0).collect();
        let J = t.iter().map(|e| e.1).collect();
        let V = t.iter().map(|e| e.2).collect();
        CscMatrix::new_from_triplets(3, 3, I, J, V)
    };

    let reference = build(&triplets);
    assert!(reference.check_format().is_ok());
    assert_eq!(reference.colptr, vec![0, 2, 3, 5]);
    assert_eq!(reference.rowval, vec![0, 2, 2, 0, 1]);
    assert_eq!(reference.nzval, vec![1.5, 4.0, 1.5, 3.0, -2.0]);

    let mut shuffled = triplets.clone();
    for k in 0..shuffled.len() {
        shuffled.rotate_left(1);
        if k % 2 == 0 {
            shuffled.swap(0, 3);
        }
        let A = build(&shuffled);
        assert_eq!(A.colptr, reference.colptr);
        assert_eq!(A.rowval, reference.rowval);
        assert_eq!(A.nzval, reference.nzval);
    }
}

#[test]
fn test_empty_triplets() {
    let A = CscMatrix::<f64>::new_from_triplets(2, 4, vec![], vec![], vec![]);
    assert_eq!(A.colptr, vec![0; 5]);
    assert!(A.rowval.is_empty());
    assert!(A.nzval.is_empty());
    assert!(A.check_format().is_ok());
}

#[test]
fn test_bad_triplets() {
    assert_eq!(
        CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![2], vec![0], vec![1.]),
        Err(SparseFormatError::BadRowval)
    );
    assert_eq!(
        CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![0], vec![5], vec![1.]),
        Err(SparseFormatError::BadColval)
    );
    assert_eq!(
        CscMatrix::<f64>::try_new_from_triplets(2, 2, vec![0, 1], vec![0], vec![1.]),
        Err(SparseFormatError::IncompatibleDimension)
    );
}

#[test]
fn test_diagonal_doubling() {
    let mut model = Model::new();
    let x = model.add_variable();
    let y = model.add_variable();

    model.set_objective(x * x);
    let sf = model.standard_form().unwrap();
    assert_eq!(sf.P.get_entry((0, 0)), Some(2.0));

    model.set_objective(x * y);
    let sf = model.standard_form().unwrap();
    assert_eq!(sf.P.get_entry((0, 1)), Some(1.0));
    assert_eq!(sf.P.get_entry((1, 0)), None);

    // y*x is stored in the upper triangle as well
    model.set_objective(y * x + 3. * (y * y));
    let sf = model.standard_form().unwrap();
    assert!(sf.P.is_triu());
    assert_eq!(sf.P.get_entry((0, 1)), Some(1.0));
    assert_eq!(sf.P.get_entry((1, 1)), Some(6.0));
    assert_eq!(sf.P.nnz(), 2);
}

#[test]
fn test_standard_form_vectors() {
    let mut model = Model::new();
    let x = model.add_variable();
    let y = model.add_variable();
    let z = model.add_variable();

    model.set_objective(x * x + 4. * z - 2.5);
    model.add_constraint(Constraint::le(x + y + 5., 10.));
    model.add_constraint(Constraint::eq_to(2. * z, 1.));
    model.add_constraint(Constraint::ge(y - z, -1.));

    let sf = model.standard_form().unwrap();
    assert_eq!(sf.q, vec![0., 0., 4.]);
    assert_eq!(sf.constant, -2.5);
    assert_eq!((sf.m(), sf.n()), (3, 3));
    assert_eq!(sf.l, vec![f64::NEG_INFINITY, 1., -1.]);
    assert_eq!(sf.u, vec![5., 1., f64::INFINITY]);

    // A = [1 1 0; 0 0 2; 0 1 -1]
    assert_eq!(sf.A.colptr, vec![0, 1, 3, 5]);
    assert_eq!(sf.A.rowval, vec![0, 0, 2, 1, 2]);
    assert_eq!(sf.A.nzval, vec![1., 1., 1., 2., -1.]);
}

#[test]
fn test_foreign_variable_is_rejected() {
    let mut other = Model::new();
    let _ = other.add_variable();
    let foreign = other.add_variable();

    let mut model = Model::new();
    let x = model.add_variable();
    model.set_objective(x * x);
    model.add_constraint(Constraint::le(x + foreign, 1.));

    assert!(matches!(
        model.standard_form(),
        Err(ModelError::UnknownVariable(1))
    ));
    assert!(matches!(model.solve(), Err(ModelError::UnknownVariable(1))));
}
