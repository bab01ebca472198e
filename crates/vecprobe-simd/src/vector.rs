//! The fixed-width lane vector and its memory operations

use std::ops::Index;

use crate::lane::Lane;

/// A vector of `N` lanes of type `T`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Simd<T: Lane, const N: usize>(pub(crate) [T; N]);

/// Boolean vector produced by comparisons and consumed by selects.
pub type Mask<const N: usize> = Simd<bool, N>;

/// Compile-time checks relating an input lane count `N` to an output lane
/// count `M`. Referencing a constant fails monomorphization when violated.
pub(crate) struct Widths<const N: usize, const M: usize>;

impl<const N: usize, const M: usize> Widths<N, M> {
    pub(crate) const DOUBLE: () = assert!(M == 2 * N, "result must have twice the lanes");
    pub(crate) const HALF: () = assert!(2 * M == N, "result must have half the lanes");
}

impl<T: Lane, const N: usize> Default for Simd<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Lane, const N: usize> Index<usize> for Simd<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T: Lane, const N: usize> Simd<T, N> {
    pub const LANES: usize = N;

    pub fn splat(value: T) -> Self {
        Self([value; N])
    }

    pub const fn from_array(lanes: [T; N]) -> Self {
        Self(lanes)
    }

    /// Load the first `N` elements of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `N`.
    pub fn from_slice(src: &[T]) -> Self {
        let mut lanes = [T::default(); N];
        lanes.copy_from_slice(&src[..N]);
        Self(lanes)
    }

    pub fn to_array(self) -> [T; N] {
        self.0
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Store all lanes into the front of `dst`.
    pub fn store(self, dst: &mut [T]) {
        dst[..N].copy_from_slice(&self.0);
    }

    /// Load `n` elements and zero the remaining lanes.
    pub fn load_partial(n: usize, src: &[T]) -> Self {
        let n = n.min(N).min(src.len());
        let mut lanes = [T::default(); N];
        lanes[..n].copy_from_slice(&src[..n]);
        Self(lanes)
    }

    /// Store the first `n` lanes, leaving the rest of `dst` untouched.
    pub fn store_partial(self, n: usize, dst: &mut [T]) {
        let n = n.min(N).min(dst.len());
        dst[..n].copy_from_slice(&self.0[..n]);
    }

    /// Keep the first `n` lanes and zero the others.
    #[must_use]
    pub fn cutoff(mut self, n: usize) -> Self {
        for lane in self.0.iter_mut().skip(n) {
            *lane = T::default();
        }
        self
    }

    /// Replace one lane. The index wraps modulo `N`.
    #[must_use]
    pub fn insert(mut self, index: usize, value: T) -> Self {
        self.0[index % N] = value;
        self
    }

    /// Read one lane. The index wraps modulo `N`.
    pub fn extract(self, index: usize) -> T {
        self.0[index % N]
    }

    /// Join two vectors: `self` becomes the low half of the result.
    pub fn concat<const M: usize>(self, high: Self) -> Simd<T, M> {
        let () = Widths::<N, M>::DOUBLE;
        let mut lanes = [T::default(); M];
        lanes[..N].copy_from_slice(&self.0);
        lanes[N..].copy_from_slice(&high.0);
        Simd(lanes)
    }

    pub fn low<const M: usize>(self) -> Simd<T, M> {
        let () = Widths::<N, M>::HALF;
        let mut lanes = [T::default(); M];
        lanes.copy_from_slice(&self.0[..M]);
        Simd(lanes)
    }

    pub fn high<const M: usize>(self) -> Simd<T, M> {
        let () = Widths::<N, M>::HALF;
        let mut lanes = [T::default(); M];
        lanes.copy_from_slice(&self.0[M..]);
        Simd(lanes)
    }

    #[inline]
    pub(crate) fn map<U: Lane>(self, f: impl Fn(T) -> U) -> Simd<U, N> {
        let mut out = [U::default(); N];
        for (dst, &src) in out.iter_mut().zip(&self.0) {
            *dst = f(src);
        }
        Simd(out)
    }

    #[inline]
    pub(crate) fn zip<U: Lane>(self, rhs: Self, f: impl Fn(T, T) -> U) -> Simd<U, N> {
        let mut out = [U::default(); N];
        for ((dst, &a), &b) in out.iter_mut().zip(&self.0).zip(&rhs.0) {
            *dst = f(a, b);
        }
        Simd(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_load_and_store() {
        let src = [1i32, 2, 3, 4, 5, 6, 7, 8];
        let v = Simd::<i32, 4>::load_partial(3, &src);
        assert_eq!(v.to_array(), [1, 2, 3, 0]);

        let mut dst = [99i32; 8];
        Simd::<i32, 4>::from_slice(&src).store_partial(2, &mut dst);
        assert_eq!(dst, [1, 2, 99, 99, 99, 99, 99, 99]);
    }

    #[test]
    fn test_cutoff_insert_extract() {
        let v = Simd::from_array([1u8, 2, 3, 4]);
        assert_eq!(v.cutoff(1).to_array(), [1, 0, 0, 0]);
        assert_eq!(v.insert(6, 9).to_array(), [1, 2, 9, 4]);
        assert_eq!(v.extract(3), 4);
    }

    #[test]
    fn test_concat_and_halves() {
        let a = Simd::from_array([1i16, 2]);
        let b = Simd::from_array([3i16, 4]);
        let joined: Simd<i16, 4> = a.concat(b);
        assert_eq!(joined.to_array(), [1, 2, 3, 4]);
        let low: Simd<i16, 2> = joined.low();
        let high: Simd<i16, 2> = joined.high();
        assert_eq!(low, a);
        assert_eq!(high, b);
    }
}
