#![allow(non_snake_case)]
use crate::algebra::*;

/// ADMM iterates and work vectors, all in scaled coordinates.
pub(crate) struct Variables<T> {
    pub x: Vec<T>,
    pub z: Vec<T>,
    pub y: Vec<T>,
    pub x_prev: Vec<T>,
    pub z_prev: Vec<T>,
    pub xtilde: Vec<T>,
    pub ztilde: Vec<T>,
    pub delta_x: Vec<T>,
    pub delta_y: Vec<T>,

    // products for residual computation
    pub Ax: Vec<T>,
    pub Px: Vec<T>,
    pub Aty: Vec<T>,

    // scratch space
    pub work_n: Vec<T>,
    pub work_m: Vec<T>,
}

impl<T> Variables<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            z: vec![T::zero(); m],
            y: vec![T::zero(); m],
            x_prev: vec![T::zero(); n],
            z_prev: vec![T::zero(); m],
            xtilde: vec![T::zero(); n],
            ztilde: vec![T::zero(); m],
            delta_x: vec![T::zero(); n],
            delta_y: vec![T::zero(); m],
            Ax: vec![T::zero(); m],
            Px: vec![T::zero(); n],
            Aty: vec![T::zero(); n],
            work_n: vec![T::zero(); n],
            work_m: vec![T::zero(); m],
        }
    }

    /// reset the iterates to the origin
    pub fn cold_start(&mut self) {
        self.x.set(T::zero());
        self.z.set(T::zero());
        self.y.set(T::zero());
    }
}
