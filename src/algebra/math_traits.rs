use super::FloatT;

// Numerical kernels used by the engine.  They are written once for
// any FloatT and implemented for slices and CscMatrix.

/// In-place and reducing operations on vectors of [`FloatT`](crate::algebra::FloatT).
/// The in-place operations return `self` so they can be chained.
pub trait VectorMath {
    type T: FloatT;

    /// `self = src`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// `self[i] = op(self[i])`
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// `self[i] = c`
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// `self[i] = c * self[i]`
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// `self[i] = 1 / self[i]`
    fn recip(&mut self) -> &mut Self;

    /// `self[i] = -self[i]`
    fn negate(&mut self) -> &mut Self;

    /// `self[i] = self[i] * y[i]`
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    /// `self[i] = clamp(self[i], l[i], u[i])`
    fn clip_to(&mut self, l: &Self, u: &Self) -> &mut Self;

    fn dot(&self, y: &Self) -> Self::T;

    /// `max |self[i]|`, or NaN if any entry is NaN
    fn norm_inf(&self) -> Self::T;

    /// `max |self[i] * v[i]|`
    fn norm_inf_scaled(&self, v: &Self) -> Self::T;

    /// Arithmetic mean, zero for an empty vector.
    fn mean(&self) -> Self::T;

    /// true if no entry is infinite or NaN
    fn is_finite(&self) -> bool;

    /// `self = a*x + b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;

    /// `self = a*x + b*y`
    fn waxpby(&mut self, a: Self::T, x: &Self, b: Self::T, y: &Self) -> &mut Self;
}

/// `y = a*M*x + b*y` for a matrix or a transposed view of one
pub trait MatrixVectorMultiply {
    type T: FloatT;

    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// `y = a*M*x + b*y` for a symmetric matrix stored by its upper triangle
pub trait SymMatrixVectorMultiply {
    type T: FloatT;

    fn symv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Norms and diagonal scalings used by the engine's equilibration.
///
/// The `*_no_reset` norms accumulate into `norms`, so that an entry only
/// changes if the new norm is larger.  This allows the column norms of a
/// stacked matrix such as `[P; A]` to be computed one block at a time.
pub trait MatrixMath {
    type T: FloatT;

    /// columnwise infinity norms
    fn col_norms_no_reset(&self, norms: &mut [Self::T]);

    /// columnwise infinity norms of the symmetric matrix whose upper
    /// triangle is stored
    fn col_norms_sym_no_reset(&self, norms: &mut [Self::T]);

    /// rowwise infinity norms
    fn row_norms_no_reset(&self, norms: &mut [Self::T]);

    /// multiply every stored entry by `c`
    fn scale(&mut self, c: Self::T);

    /// `M = diag(l) * M * diag(r)`
    fn lrscale(&mut self, l: &[Self::T], r: &[Self::T]);
}
