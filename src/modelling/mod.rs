//! Algebraic modelling of convex QPs.
//!
//! Variables are created by a [`Model`] and combined with ordinary
//! arithmetic into [`LinExpr`] and [`QuadExpr`] values.  Constraints
//! compare affine expressions and the objective is any quadratic
//! expression.  On [`Model::solve`] the model is assembled into a
//! [`StandardForm`] and handed to a [`QpEngine`](crate::engine::QpEngine)
//! session, which is kept alive across solves while the sparsity of the
//! problem is unchanged.
//!
//! ```
//! use qpmodel::modelling::*;
//!
//! // minimize (x - 10)²  subject to  x ≤ 5
//! let mut model = Model::new();
//! let x = model.add_variable();
//! model.set_objective((x - 10.) * (x - 10.));
//! let c = model.add_constraint(Constraint::le(x, 5.));
//!
//! model.solve().unwrap();
//! assert!((model.value(x).unwrap() - 5.).abs() < 1e-2);
//!
//! // relax the bound and solve again in the same session
//! model.constraint_mut(c).unwrap().upper = 8.;
//! model.solve().unwrap();
//! assert_eq!(model.last_path(), Some(SolvePath::Update));
//! ```

mod constraint;
mod error;
mod linexpr;
mod model;
mod ops;
mod quadexpr;
mod reuse;
mod solution;
mod standard_form;
mod variable;

#[cfg(feature = "serde")]
mod json;

pub use constraint::*;
pub use error::*;
pub use linexpr::LinExpr;
pub use model::{Model, SessionState};
pub use quadexpr::QuadExpr;
pub use reuse::SolvePath;
pub use solution::*;
pub use standard_form::*;
pub use variable::*;
