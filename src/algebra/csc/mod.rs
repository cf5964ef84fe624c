#![allow(non_snake_case)]

mod core;
pub use self::core::*;

// these add methods and trait impls to CscMatrix only
mod assembly;
mod matrix_math;
mod sparsity;
