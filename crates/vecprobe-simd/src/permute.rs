//! Permutation, lookup, gather and scatter

use crate::lane::Lane;
use crate::vector::Simd;

/// Index value meaning "any lane may go here".
pub const DONT_CARE: i32 = -256;

/// Source slot for an index into `len` elements, or `None` for a zero fill.
#[inline]
fn slot(index: i32, len: usize) -> Option<usize> {
    usize::try_from(index).ok().map(|i| i % len)
}

impl<T: Lane, const N: usize> Simd<T, N> {
    /// Rearrange lanes. Negative indexes, including [`DONT_CARE`], give zero.
    #[must_use]
    pub fn permute(self, indexes: [i32; N]) -> Self {
        let mut lanes = [T::default(); N];
        for (dst, &index) in lanes.iter_mut().zip(&indexes) {
            if let Some(i) = slot(index, N) {
                *dst = self.0[i];
            }
        }
        Self(lanes)
    }

    /// Pick lanes from `self` (indexes `0..N`) and `other` (`N..2N`).
    #[must_use]
    pub fn blend(self, other: Self, indexes: [i32; N]) -> Self {
        let mut lanes = [T::default(); N];
        for (dst, &index) in lanes.iter_mut().zip(&indexes) {
            if let Some(i) = slot(index, 2 * N) {
                *dst = if i < N { self.0[i] } else { other.0[i - N] };
            }
        }
        Self(lanes)
    }

    /// Table lookup across the concatenation of `vectors`.
    ///
    /// Indexes outside the table give zero.
    pub fn lookup(index: Simd<i32, N>, vectors: &[Self]) -> Self {
        let len = vectors.len() * N;
        index.map(|i| match usize::try_from(i) {
            Ok(i) if i < len => vectors[i / N].0[i % N],
            _ => T::default(),
        })
    }

    /// Table lookup in memory. Indexes outside `table` give zero.
    pub fn lookup_table(index: Simd<i32, N>, table: &[T]) -> Self {
        index.map(|i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| table.get(i).copied())
                .unwrap_or_default()
        })
    }

    /// Load from fixed positions in `table`. Negative indexes give zero.
    pub fn gather(indexes: [i32; N], table: &[T]) -> Self {
        let mut lanes = [T::default(); N];
        for (dst, &index) in lanes.iter_mut().zip(&indexes) {
            if let Some(value) = usize::try_from(index).ok().and_then(|i| table.get(i)) {
                *dst = *value;
            }
        }
        Self(lanes)
    }

    /// Store lanes to fixed positions in `dst`. Negative and out-of-range
    /// indexes drop the lane; a later lane wins on a repeated index.
    pub fn scatter(self, indexes: [i32; N], dst: &mut [T]) {
        for (&value, &index) in self.0.iter().zip(&indexes) {
            if let Some(cell) = usize::try_from(index).ok().and_then(|i| dst.get_mut(i)) {
                *cell = value;
            }
        }
    }

    /// Store lanes to positions given by `index`, dropping any position
    /// at or above `limit`.
    pub fn scatter_limit(self, index: Simd<i32, N>, limit: u32, dst: &mut [T]) {
        for (&value, &i) in self.0.iter().zip(&index.0) {
            match u32::try_from(i) {
                Ok(i) if i < limit => {
                    if let Some(cell) = dst.get_mut(i as usize) {
                        *cell = value;
                    }
                }
                _ => {}
            }
        }
    }

    /// Move lanes towards higher indexes, filling the bottom with zero.
    #[must_use]
    pub fn shift_up(self, count: usize) -> Self {
        let mut lanes = [T::default(); N];
        if count < N {
            lanes[count..].copy_from_slice(&self.0[..N - count]);
        }
        Self(lanes)
    }

    /// Move lanes towards lower indexes, filling the top with zero.
    #[must_use]
    pub fn shift_down(self, count: usize) -> Self {
        let mut lanes = [T::default(); N];
        if count < N {
            lanes[..N - count].copy_from_slice(&self.0[count..]);
        }
        Self(lanes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permute_zero_fill() {
        let v = Simd::from_array([10i32, 11, 12, 13]);
        assert_eq!(v.permute([3, -1, DONT_CARE, 0]).to_array(), [13, 0, 0, 10]);
    }

    #[test]
    fn test_blend_spans_both_inputs() {
        let a = Simd::from_array([1u8, 2, 3, 4]);
        let b = Simd::from_array([5u8, 6, 7, 8]);
        assert_eq!(a.blend(b, [7, 0, -1, 4]).to_array(), [8, 1, 0, 5]);
    }

    #[test]
    fn test_lookup_over_vectors() {
        let data = [Simd::from_array([1i16, 2]), Simd::from_array([3i16, 4])];
        let index = Simd::from_array([3, 4]);
        assert_eq!(Simd::lookup(index, &data).to_array(), [4, 0]);
    }

    #[test]
    fn test_gather_and_scatter() {
        let table: Vec<u32> = (100..120).collect();
        let v = Simd::<u32, 4>::gather([0, 19, -2, 5], &table);
        assert_eq!(v.to_array(), [100, 119, 0, 105]);

        let mut dst = [0u32; 8];
        Simd::from_array([1u32, 2, 3, 4]).scatter([7, -1, 7, 0], &mut dst);
        assert_eq!(dst, [4, 0, 0, 0, 0, 0, 0, 3]);

        let mut dst = [0u32; 8];
        let index = Simd::from_array([1, 6, 2, 3]);
        Simd::from_array([1u32, 2, 3, 4]).scatter_limit(index, 3, &mut dst);
        assert_eq!(dst, [0, 1, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_shifts() {
        let v = Simd::from_array([1i64, 2, 3, 4]);
        assert_eq!(v.shift_up(1).to_array(), [0, 1, 2, 3]);
        assert_eq!(v.shift_down(3).to_array(), [4, 0, 0, 0]);
        assert_eq!(v.shift_up(9).to_array(), [0; 4]);
    }
}
