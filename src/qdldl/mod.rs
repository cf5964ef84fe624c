//! Sparse LDLᵀ factorization of symmetric quasidefinite matrices.
//!
//! The matrix is given by its upper triangle in CSC format.  A
//! fill-reducing ordering is computed with AMD unless a permutation is
//! supplied, after which the values can be refactored any number of
//! times against the same sparsity pattern.

#[allow(clippy::module_inception)]
mod qdldl;
pub use qdldl::*;
