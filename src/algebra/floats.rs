#![allow(non_snake_case)]
use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Main trait for floating point values used by the sparse algebra and
/// by the QP engine.
///
/// Implemented automatically for any type satisfying the bounds below, so
/// in practice for `f32` and `f64`.  The modelling layer itself always
/// works in `f64`.
pub trait FloatT:
    'static + Send + Float + NumAssign + Default + FromPrimitive + Display + LowerExp + Debug + Sized
{
}

impl<T> FloatT for T where
    T: 'static
        + Send
        + Float
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// Lets constants be written as `(1e-3).as_T()` instead of
/// `T::from_f64(1e-3).unwrap()`.  Also used for the defaults of the
/// [engine settings](crate::engine::Settings).
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                // every FloatT is constructible from the primitive
                // types listed below, so this cannot fail
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
