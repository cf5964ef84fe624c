use crate::algebra::*;
use crate::engine::SettingsError;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Settings for a QP engine session.
///
/// Construct with [`Settings::default()`] or through [`SettingsBuilder`],
/// which validates the values on `build()`.  Fields may then be changed
/// individually; [`validate`](Settings::validate) is rerun at setup.
///
/// ```no_run
/// use qpmodel::engine::SettingsBuilder;
///
/// let settings = SettingsBuilder::<f64>::default()
///     .eps_abs(1e-6)
///     .eps_rel(1e-6)
///     .polishing(true)
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings<T: FloatT> {
    ///ADMM step size
    #[builder(default = "(0.1).as_T()")]
    pub rho: T,

    ///ADMM primal regularization
    #[builder(default = "(1e-6).as_T()")]
    pub sigma: T,

    ///ADMM relaxation parameter, in (0,2)
    #[builder(default = "(1.6).as_T()")]
    pub alpha: T,

    ///absolute convergence tolerance
    #[builder(default = "(1e-3).as_T()")]
    pub eps_abs: T,

    ///relative convergence tolerance
    #[builder(default = "(1e-3).as_T()")]
    pub eps_rel: T,

    ///primal infeasibility tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_prim_inf: T,

    ///dual infeasibility tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_dual_inf: T,

    ///maximum number of iterations
    #[builder(default = "4000")]
    pub max_iter: u32,

    ///maximum run time (seconds)
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///number of Ruiz equilibration iterations.  Zero disables scaling
    #[builder(default = "10")]
    pub scaling: u32,

    ///enable adaptive step size
    #[builder(default = "true")]
    pub adaptive_rho: bool,

    ///iterations between step size updates
    #[builder(default = "25")]
    pub adaptive_rho_interval: u32,

    ///the step size is updated only if the new estimate differs from the
    ///current value by more than this factor
    #[builder(default = "(5.).as_T()")]
    pub adaptive_rho_tolerance: T,

    ///iterations between termination checks.  Zero disables checking
    #[builder(default = "1")]
    pub check_termination: u32,

    ///start from the previous iterate
    #[builder(default = "true")]
    pub warm_starting: bool,

    ///refine the solution on the detected active set
    #[builder(default = "false")]
    pub polishing: bool,

    ///regularization of the polishing linear system
    #[builder(default = "(1e-6).as_T()")]
    pub delta: T,

    ///iterative refinement steps when polishing
    #[builder(default = "3")]
    pub polish_refine_iter: u32,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,
}

impl<T> Default for Settings<T>
where
    T: FloatT,
{
    fn default() -> Settings<T> {
        SettingsBuilder::<T>::default().build().unwrap()
    }
}

macro_rules! check_immutable_setting {
    ($self:expr, $prev:expr, $field:ident) => {
        if $self.$field != $prev.$field {
            return Err(SettingsError::ImmutableSetting(stringify!($field)));
        }
    };
}

impl<T> Settings<T>
where
    T: FloatT,
{
    /// Checks that all values are within their legal ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_positive("rho", self.rho)?;
        validate_positive("sigma", self.sigma)?;
        validate_alpha(self.alpha)?;
        validate_nonnegative("eps_abs", self.eps_abs)?;
        validate_nonnegative("eps_rel", self.eps_rel)?;
        if self.eps_abs == T::zero() && self.eps_rel == T::zero() {
            return Err(SettingsError::BadFieldValue("eps_abs"));
        }
        validate_positive("eps_prim_inf", self.eps_prim_inf)?;
        validate_positive("eps_dual_inf", self.eps_dual_inf)?;
        validate_max_iter(self.max_iter)?;
        validate_time_limit(self.time_limit)?;
        validate_rho_tolerance(self.adaptive_rho_tolerance)?;
        validate_positive("delta", self.delta)?;
        Ok(())
    }

    /// check that a settings object is valid as an updated collection
    /// of settings for a session that has already been set up.   This
    /// rejects changes to parameters that are only applied during setup.
    /// Calls `validate()` internally to check that values are also legal.
    pub fn validate_as_update(&self, prev: &Self) -> Result<(), SettingsError> {
        self.validate()?;

        check_immutable_setting!(self, prev, sigma);
        check_immutable_setting!(self, prev, scaling);
        check_immutable_setting!(self, prev, adaptive_rho);
        check_immutable_setting!(self, prev, adaptive_rho_interval);

        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> SettingsBuilder<T>
where
    T: FloatT,
{
    /// check the values of any fields that have been set
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(rho) = self.rho {
            validate_positive("rho", rho)?;
        }
        if let Some(sigma) = self.sigma {
            validate_positive("sigma", sigma)?;
        }
        if let Some(alpha) = self.alpha {
            validate_alpha(alpha)?;
        }
        if let Some(eps_abs) = self.eps_abs {
            validate_nonnegative("eps_abs", eps_abs)?;
        }
        if let Some(eps_rel) = self.eps_rel {
            validate_nonnegative("eps_rel", eps_rel)?;
        }
        if let (Some(a), Some(r)) = (self.eps_abs, self.eps_rel) {
            if a == T::zero() && r == T::zero() {
                return Err(SettingsError::BadFieldValue("eps_abs"));
            }
        }
        if let Some(eps) = self.eps_prim_inf {
            validate_positive("eps_prim_inf", eps)?;
        }
        if let Some(eps) = self.eps_dual_inf {
            validate_positive("eps_dual_inf", eps)?;
        }
        if let Some(max_iter) = self.max_iter {
            validate_max_iter(max_iter)?;
        }
        if let Some(time_limit) = self.time_limit {
            validate_time_limit(time_limit)?;
        }
        if let Some(tol) = self.adaptive_rho_tolerance {
            validate_rho_tolerance(tol)?;
        }
        if let Some(delta) = self.delta {
            validate_positive("delta", delta)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

// NaN fails every comparison, so `!(v > 0)` rather than `v <= 0`
fn validate_positive<T: FloatT>(field: &'static str, v: T) -> Result<(), SettingsError> {
    if !(v > T::zero()) {
        return Err(SettingsError::BadFieldValue(field));
    }
    Ok(())
}

fn validate_nonnegative<T: FloatT>(field: &'static str, v: T) -> Result<(), SettingsError> {
    if !(v >= T::zero()) {
        return Err(SettingsError::BadFieldValue(field));
    }
    Ok(())
}

fn validate_alpha<T: FloatT>(alpha: T) -> Result<(), SettingsError> {
    if !(alpha > T::zero() && alpha < (2.).as_T()) {
        return Err(SettingsError::BadFieldValue("alpha"));
    }
    Ok(())
}

fn validate_max_iter(max_iter: u32) -> Result<(), SettingsError> {
    if max_iter == 0 {
        return Err(SettingsError::BadFieldValue("max_iter"));
    }
    Ok(())
}

fn validate_time_limit(time_limit: f64) -> Result<(), SettingsError> {
    if !(time_limit > 0.) {
        return Err(SettingsError::BadFieldValue("time_limit"));
    }
    Ok(())
}

fn validate_rho_tolerance<T: FloatT>(tol: T) -> Result<(), SettingsError> {
    if !(tol >= T::one()) {
        return Err(SettingsError::BadFieldValue("adaptive_rho_tolerance"));
    }
    Ok(())
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = SettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_iter, 4000);
    assert_eq!(settings.rho, 0.1);
    assert!(settings.time_limit.is_infinite());

    // fail on bad values in the builder
    assert!(SettingsBuilder::<f64>::default().rho(0.).build().is_err());
    assert!(SettingsBuilder::<f64>::default().alpha(2.).build().is_err());
    assert!(SettingsBuilder::<f64>::default().max_iter(0).build().is_err());
    assert!(SettingsBuilder::<f64>::default()
        .eps_abs(0.)
        .eps_rel(0.)
        .build()
        .is_err());
    assert!(SettingsBuilder::<f64>::default()
        .adaptive_rho_tolerance(0.5)
        .build()
        .is_err());

    // directly construct bad Settings and manually check
    let settings = Settings::<f64> {
        sigma: -1.,
        ..Settings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("sigma"))
    );

    let settings = Settings::<f64> {
        eps_prim_inf: f64::NAN,
        ..Settings::default()
    };
    assert!(settings.validate().is_err());

    let settings = Settings::<f64> {
        eps_abs: 0.,
        ..Settings::default()
    };
    assert!(settings.validate().is_ok());

    // try to overlay prohibited update values
    let oldsettings = Settings::<f64>::default();
    let newsettings = Settings::<f64> {
        scaling: 0,
        ..Settings::default()
    };
    assert_eq!(
        newsettings.validate_as_update(&oldsettings),
        Err(SettingsError::ImmutableSetting("scaling"))
    );

    // try to overlay allowed update values
    let newsettings = Settings::<f64> {
        max_iter: 11,
        rho: 2.,
        polishing: true,
        ..Settings::default()
    };
    assert!(newsettings.validate_as_update(&oldsettings).is_ok());
}
