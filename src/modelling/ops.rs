//! Operator overloads for building expressions.
//!
//! Every operator copies its operands into a new expression and combines
//! them with [`LinExpr::plus`], [`LinExpr::minus`], [`LinExpr::multiply`]
//! or their [`QuadExpr`] counterparts, so binary operators never mutate
//! an operand.  The assigning forms (`+=`, `-=`, `*=`) accumulate in
//! place.

use super::{LinExpr, QuadExpr, Variable};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

impl From<&LinExpr> for LinExpr {
    fn from(e: &LinExpr) -> Self {
        e.clone()
    }
}

impl From<&QuadExpr> for QuadExpr {
    fn from(e: &QuadExpr) -> Self {
        e.clone()
    }
}

// sums and differences of operands that convert into `$out`
macro_rules! impl_add_sub {
    ($out:ident; $(($lhs:ty, $rhs:ty)),+ $(,)?) => {$(
        impl Add<$rhs> for $lhs {
            type Output = $out;
            fn add(self, rhs: $rhs) -> $out {
                $out::from(self).plus(&$out::from(rhs))
            }
        }

        impl Sub<$rhs> for $lhs {
            type Output = $out;
            fn sub(self, rhs: $rhs) -> $out {
                $out::from(self).minus(&$out::from(rhs))
            }
        }
    )+};
}

impl_add_sub!(LinExpr;
    (Variable, Variable),
    (Variable, f64),
    (f64, Variable),
    (Variable, LinExpr),
    (LinExpr, Variable),
    (LinExpr, LinExpr),
    (LinExpr, f64),
    (f64, LinExpr),
    (&LinExpr, &LinExpr),
    (&LinExpr, Variable),
    (&LinExpr, f64),
);

impl_add_sub!(QuadExpr;
    (QuadExpr, QuadExpr),
    (QuadExpr, LinExpr),
    (LinExpr, QuadExpr),
    (QuadExpr, Variable),
    (Variable, QuadExpr),
    (QuadExpr, f64),
    (f64, QuadExpr),
    (&QuadExpr, &QuadExpr),
);

// bilinear products
macro_rules! impl_mul_bilinear {
    ($(($lhs:ty, $rhs:ty)),+ $(,)?) => {$(
        impl Mul<$rhs> for $lhs {
            type Output = QuadExpr;
            fn mul(self, rhs: $rhs) -> QuadExpr {
                LinExpr::from(self).multiply(&LinExpr::from(rhs))
            }
        }
    )+};
}

impl_mul_bilinear!(
    (Variable, Variable),
    (Variable, LinExpr),
    (LinExpr, Variable),
    (LinExpr, LinExpr),
    (&LinExpr, &LinExpr),
);

// scaling by a constant, from either side
macro_rules! impl_mul_scalar {
    ($out:ident; $($lhs:ty),+ $(,)?) => {$(
        impl Mul<f64> for $lhs {
            type Output = $out;
            fn mul(self, k: f64) -> $out {
                $out::from(self).scaled(k)
            }
        }

        impl Mul<$lhs> for f64 {
            type Output = $out;
            fn mul(self, rhs: $lhs) -> $out {
                $out::from(rhs).scaled(self)
            }
        }
    )+};
}

impl_mul_scalar!(LinExpr; Variable, LinExpr, &LinExpr);
impl_mul_scalar!(QuadExpr; QuadExpr, &QuadExpr);

impl Neg for Variable {
    type Output = LinExpr;
    fn neg(self) -> LinExpr {
        LinExpr::from(self).scaled(-1.)
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;
    fn neg(mut self) -> LinExpr {
        self.scale(-1.);
        self
    }
}

impl Neg for QuadExpr {
    type Output = QuadExpr;
    fn neg(mut self) -> QuadExpr {
        self.scale(-1.);
        self
    }
}

// ---------------------------------
// in place
// ---------------------------------

macro_rules! impl_assign {
    ($out:ident; $(|$s:ident, $r:ident: $rhs:ty| $add:expr, $sub:expr);+ $(;)?) => {$(
        impl AddAssign<$rhs> for $out {
            fn add_assign(&mut self, $r: $rhs) {
                let $s = self;
                $add;
            }
        }

        impl SubAssign<$rhs> for $out {
            fn sub_assign(&mut self, $r: $rhs) {
                let $s = self;
                $sub;
            }
        }
    )+};
}

impl_assign!(LinExpr;
    |e, v: Variable| e.add_variable(v), e.subtract_variable(v);
    |e, rhs: LinExpr| e.add_expr(&rhs), e.subtract_expr(&rhs);
    |e, rhs: &LinExpr| e.add_expr(rhs), e.subtract_expr(rhs);
    |e, c: f64| e.add_constant(c), e.subtract_constant(c);
);

impl_assign!(QuadExpr;
    |e, rhs: QuadExpr| e.add_quad_expr(&rhs), e.subtract_quad_expr(&rhs);
    |e, rhs: &QuadExpr| e.add_quad_expr(rhs), e.subtract_quad_expr(rhs);
    |e, rhs: LinExpr| e.add_expr(&rhs), e.subtract_expr(&rhs);
    |e, v: Variable| e.add_variable(v), e.subtract_variable(v);
    |e, c: f64| e.add_constant(c), e.subtract_constant(c);
);

impl MulAssign<f64> for LinExpr {
    fn mul_assign(&mut self, k: f64) {
        self.scale(k);
    }
}

impl MulAssign<f64> for QuadExpr {
    fn mul_assign(&mut self, k: f64) {
        self.scale(k);
    }
}
