//! Sparse linear algebra used by the modelling layer and the QP engine.
//!
//! The central type is [`CscMatrix`], a matrix in compressed sparse column
//! format.  Problems built by a [`Model`](crate::modelling::Model) are
//! assembled into `CscMatrix` form from unordered triplets with
//! [`CscMatrix::new_from_triplets`], and successive assemblies are compared
//! with [`CscMatrix::check_equal_sparsity`].

mod error_types;
mod floats;
mod math_traits;
mod matrix_types;
mod vecmath;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_types::*;

mod csc;
pub use csc::*;

#[cfg(test)]
mod tests;
