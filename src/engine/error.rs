use crate::qdldl::LdlError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside of its legal range
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
    /// A field that is fixed at setup was changed on a live session
    #[error("Setting \"{0}\" cannot be changed after setup")]
    ImmutableSetting(&'static str),
}

/// Error type returned by a [`QpEngine`](crate::engine::QpEngine) or
/// [`QpSession`](crate::engine::QpSession).
///
/// Infeasible or inaccurate outcomes are not errors.  They are reported
/// through [`SolverStatus`](crate::engine::SolverStatus).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Problem data validation failed: {0}")]
    DataValidation(String),
    #[error("Settings validation failed: {0}")]
    SettingsValidation(#[from] SettingsError),
    #[error("Linear system initialization failed: {0}")]
    LinsysInit(#[from] LdlError),
    #[error("Problem is non-convex")]
    NonConvex,
    #[error("Memory allocation failed")]
    MemAlloc,
    #[error("Data update failed: {0}")]
    DataUpdate(String),
}
