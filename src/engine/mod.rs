//! QP engine interface and the bundled ADMM engine.
//!
//! The modelling layer talks to an engine only through the [`QpEngine`]
//! and [`QpSession`] traits.  [`AdmmEngine`] implements them with an
//! operator splitting method that factors its KKT system densely, and
//! so is intended for small and medium sized problems.

mod error;
mod info;
mod settings;
mod solution;
mod status;
mod traits;

pub use error::*;
pub use info::*;
pub use settings::*;
pub use solution::*;
pub use status::*;
pub use traits::*;

pub mod admm;
pub use admm::{AdmmEngine, AdmmSession};
