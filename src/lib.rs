//! __qpmodel__ is an algebraic modelling layer for convex quadratic
//! programs.  Problems are described with variables, affine and quadratic
//! expressions and bound constraints, and are solved in the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T P x + q^T x + c\\\\\[2ex\]
//!  \text{subject to} & l \le Ax \le u
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, data matrices
//! $P=P^\top \succeq 0$ and $A \in \mathbb{R}^{m \times n}$, and bounds
//! $l, u \in \mathbb{R}^m$, which may be infinite.
//!
//! ## Features
//!
//! * __Expression algebra__: expressions are built with ordinary
//!   arithmetic on [`Variable`](modelling::Variable)s, or with the explicit
//!   methods of [`LinExpr`](modelling::LinExpr) and
//!   [`QuadExpr`](modelling::QuadExpr).
//!
//! * __Incremental re-solving__: a [`Model`](modelling::Model) keeps its
//!   engine session alive between solves.  When only values change, the new
//!   data is pushed into the live session and the previous iterate is used
//!   as a warm start.  Structural changes rebuild the session.
//!
//! * __Pluggable engines__: models talk to their engine through the
//!   [`QpEngine`](engine::QpEngine) and [`QpSession`](engine::QpSession)
//!   traits.  The crate ships [`AdmmEngine`](engine::AdmmEngine), an
//!   operator splitting solver with infeasibility detection and solution
//!   polishing.
//!
//! ```
//! use qpmodel::modelling::*;
//!
//! let mut model = Model::new();
//! let x = model.add_variable();
//! let y = model.add_variable();
//!
//! // minimize x² + xy + y² - x  subject to  x + y == 1, x ≥ 0, y ≥ 0
//! model.set_objective(x * x + x * y + y * y - x);
//! model.add_constraint(Constraint::eq_to(x + y, 1.));
//! model.add_constraint(Constraint::ge(x, 0.));
//! model.add_constraint(Constraint::ge(y, 0.));
//!
//! let status = model.solve().unwrap();
//! assert!(status.is_solved());
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod engine;
pub mod io;
pub mod modelling;
pub mod qdldl;
pub(crate) mod timers;
