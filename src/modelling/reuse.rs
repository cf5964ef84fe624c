#![allow(non_snake_case)]

use super::StandardForm;
use crate::algebra::{CscMatrix, SparseFormatError};
use crate::engine::Settings;
use std::fmt;

/// The way a solve reached a live engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePath {
    /// first solve, a new session was created
    Setup,
    /// the sparsity was unchanged and values were pushed into the session
    Update,
    /// the structure or a setup-only setting changed and the session was
    /// recreated
    Rebuild,
}

impl fmt::Display for SolvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolvePath::Setup => "setup",
            SolvePath::Update => "update in place",
            SolvePath::Rebuild => "rebuild",
        };
        f.write_str(s)
    }
}

/// Check that a newly assembled `(P, A)` can replace the values of the
/// previous pair.  Dimensions and both sparsity patterns must match.
pub(crate) fn check_reusable(
    P_old: &CscMatrix<f64>,
    A_old: &CscMatrix<f64>,
    new: &StandardForm,
) -> Result<(), SparseFormatError> {
    P_old.check_equal_sparsity(&new.P)?;
    A_old.check_equal_sparsity(&new.A)?;
    Ok(())
}

/// Decide between an in place update and a rebuild of a live session.
pub(crate) fn select_path(
    P_old: &CscMatrix<f64>,
    A_old: &CscMatrix<f64>,
    new: &StandardForm,
    live: &Settings<f64>,
    requested: &Settings<f64>,
) -> SolvePath {
    if check_reusable(P_old, A_old, new).is_err() {
        return SolvePath::Rebuild;
    }
    if requested.validate_as_update(live).is_err() {
        return SolvePath::Rebuild;
    }
    SolvePath::Update
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modelling::{Constraint, QuadExpr, Variable};

    #[test]
    fn test_select_path() {
        let (x, y) = (Variable::new(0), Variable::new(1));
        let settings = Settings::default();

        let objective = x * x + y * y;
        let mut cons = vec![Constraint::le(x + y, 1.)];
        let old = StandardForm::assemble(2, &objective, &cons).unwrap();

        // new values, same pattern
        cons[0].upper = 4.;
        let objective2: QuadExpr = 3. * (x * x) + y * y - x;
        let new = StandardForm::assemble(2, &objective2, &cons).unwrap();
        assert!(check_reusable(&old.P, &old.A, &new).is_ok());
        assert_eq!(
            select_path(&old.P, &old.A, &new, &settings, &settings),
            SolvePath::Update
        );

        // a new objective cell
        let objective3 = x * x + y * y + x * y;
        let new = StandardForm::assemble(2, &objective3, &cons).unwrap();
        assert_eq!(
            check_reusable(&old.P, &old.A, &new),
            Err(SparseFormatError::SparsityMismatch)
        );

        // a new variable
        let new = StandardForm::assemble(3, &objective, &cons).unwrap();
        assert_eq!(
            check_reusable(&old.P, &old.A, &new),
            Err(SparseFormatError::IncompatibleDimension)
        );

        // a setup only setting
        let new = StandardForm::assemble(2, &objective, &cons).unwrap();
        let requested = Settings {
            scaling: 0,
            ..Settings::default()
        };
        assert_eq!(
            select_path(&old.P, &old.A, &new, &settings, &requested),
            SolvePath::Rebuild
        );
        let requested = Settings {
            max_iter: 100,
            ..Settings::default()
        };
        assert_eq!(
            select_path(&old.P, &old.A, &new, &settings, &requested),
            SolvePath::Update
        );
    }
}
