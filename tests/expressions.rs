#![allow(non_snake_case)]
#[cfg(target_family = "wasm")]
use wasm_bindgen_test::*;

use qpmodel::modelling::*;

fn three_vars() -> (Model, Variable, Variable, Variable) {
    let mut model = Model::new();
    let x = model.add_variable();
    let y = model.add_variable();
    let z = model.add_variable();
    (model, x, y, z)
}

#[test]
fn test_variable_indices() {
    let (mut model, x, y, z) = three_vars();
    assert_eq!((x.index(), y.index(), z.index()), (0, 1, 2));

    let more = model.add_variables(2);
    assert_eq!(more[0].index(), 3);
    assert_eq!(more[1].index(), 4);
    assert_eq!(model.num_variables(), 5);
    assert_eq!(x.to_string(), "x0");
}

#[test]
fn test_canonical_quad_key() {
    let (_model, x, y, z) = three_vars();

    let q = z * x + x * z + y * x;
    assert_eq!(q.quad_coefficient(x, z), Some(2.));
    assert_eq!(q.quad_coefficient(z, x), Some(2.));
    assert_eq!(q.quad_coefficient(x, y), Some(1.));

    // only the ordered pair is ever stored
    assert!(q.quadratic().contains_key(&(x, z)));
    assert!(!q.quadratic().contains_key(&(z, x)));
    assert!(q.quadratic().contains_key(&(x, y)));
    assert!(!q.quadratic().contains_key(&(y, x)));
    for &(a, b) in q.quadratic().keys() {
        assert!(a.index() <= b.index());
    }
}

#[test]
fn test_coefficient_merge() {
    let (_model, x, y, _z) = three_vars();

    let a = 2. * x + 3. * y + 1.;
    let b = 4. * x - y + 2.;
    let s = a.plus(&b);
    assert_eq!(s.coefficient(x), Some(6.));
    assert_eq!(s.coefficient(y), Some(2.));
    assert_eq!(s.constant(), 3.);
    assert_eq!(s.len(), 2);

    let qa = x * y + 2. * x;
    let qb = y * x + x * x;
    let qs = qa.plus(&qb);
    assert_eq!(qs.quad_coefficient(x, y), Some(2.));
    assert_eq!(qs.quad_coefficient(x, x), Some(1.));
    assert_eq!(qs.linear().coefficient(x), Some(2.));

    // a coefficient summing to zero is kept
    let c = x - x;
    assert_eq!(c.coefficient(x), Some(0.));
}

#[test]
fn test_copy_on_combine() {
    let (_model, x, y, _z) = three_vars();

    let a = x + y;
    let b = 2. * x;
    let _ = &a + &b;
    let _ = &a - &b;
    let _ = &a * &b;
    assert_eq!(a.coefficient(x), Some(1.));
    assert_eq!(b.coefficient(x), Some(2.));

    let mut c = a.clone();
    c.add_expr(&b).scale(2.);
    assert_eq!(c.coefficient(x), Some(6.));
    assert_eq!(a.coefficient(x), Some(1.));
}

#[test]
fn test_bilinear_expansion() {
    let (_model, x, y, z) = three_vars();

    // (x + y + 1)(2z - 3)
    let p = (x + y + 1.) * (2. * z - 3.);
    assert_eq!(p.quad_coefficient(x, z), Some(2.));
    assert_eq!(p.quad_coefficient(y, z), Some(2.));
    assert_eq!(p.linear().coefficient(x), Some(-3.));
    assert_eq!(p.linear().coefficient(y), Some(-3.));
    assert_eq!(p.linear().coefficient(z), Some(2.));
    assert_eq!(p.constant(), -3.);

    let point = [0.5, -1.5, 2.];
    let expected = (0.5 - 1.5 + 1.) * (4. - 3.);
    assert!((p.evaluate(&point) - expected).abs() < 1e-12);

    // the product of variables is the generalized form
    let v = x * y;
    assert_eq!(v, LinExpr::from(x).multiply(&LinExpr::from(y)));
}

#[test]
fn test_bound_folding() {
    let (_model, x, y, _z) = three_vars();
    let expr = x + 2. * y;

    let c = Constraint::le(expr.clone() + 5., 10.);
    assert_eq!(c.expression(), &expr);
    assert_eq!((c.lower, c.upper), (f64::NEG_INFINITY, 5.));

    let c = Constraint::eq_to(expr.clone() + 5., 10.);
    assert_eq!((c.lower, c.upper), (5., 5.));

    let c = Constraint::ge(expr.clone() + 5., 10.);
    assert_eq!((c.lower, c.upper), (5., f64::INFINITY));

    let c = Constraint::new(expr.clone() - 1., -1., 1.);
    assert_eq!((c.lower, c.upper), (0., 2.));
    assert_eq!(c.to_string(), "0 <= 1 x0 + 2 x1 <= 2");
}

#[test]
fn test_compare_rejects_strict() {
    let (_model, x, y, _z) = three_vars();

    for op in [Comparison::Less, Comparison::Greater] {
        assert!(matches!(
            compare(x, op, y),
            Err(ModelError::StrictInequality)
        ));
    }

    let c = compare(x + 1., Comparison::Equal, y).unwrap();
    assert_eq!(c.expression().coefficient(x), Some(1.));
    assert_eq!(c.expression().coefficient(y), Some(-1.));
    assert_eq!((c.lower, c.upper), (-1., -1.));
}
