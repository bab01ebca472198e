//! Index-driven references: permute, blend, lookup, gather and scatter
//!
//! Index rules are the same for every operation: [`DONT_CARE`] leaves the
//! position unconstrained, other negative indexes select zero, and an index
//! at or beyond the source length is reported as out of range rather than
//! compared against whatever the library chose to return.

use crate::config::DONT_CARE;
use crate::element::Element;
use crate::scalar::Expected;

/// Expected value of one position selected by `index` from `source`.
pub fn pick<T: Element>(index: i32, source: &[T]) -> Expected {
    if index == DONT_CARE {
        return Expected::DontCare;
    }
    match usize::try_from(index) {
        Err(_) => Expected::of(T::default()),
        Ok(i) => source.get(i).map_or(Expected::OutOfRange, |&x| Expected::of(x)),
    }
}

/// Positions selected from `source` by `indexes`.
pub fn select<T: Element>(indexes: &[i32], source: &[T]) -> Vec<Expected> {
    indexes.iter().map(|&index| pick(index, source)).collect()
}

/// Concatenation of `a` and `b`, the source of a blend or two-vector lookup
pub fn joined<T: Element>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().chain(b).copied().collect()
}

/// Destination after storing `values` at `indexes`. Negative indexes and
/// indexes at or beyond `limit` drop the value; a later lane overwrites
/// an earlier one.
pub fn scatter<T: Element>(values: &[T], indexes: &[i32], limit: usize, len: usize) -> Vec<T> {
    let mut dst = vec![T::default(); len];
    for (&value, &index) in values.iter().zip(indexes) {
        if let Ok(i) = usize::try_from(index) {
            if i < limit && i < len {
                dst[i] = value;
            }
        }
    }
    dst
}

/// Lanes moved up by `count` with zero fill at the bottom.
pub fn shift_up<T: Element>(lanes: &[T], count: usize) -> Vec<Expected> {
    (0..lanes.len())
        .map(|n| {
            if n >= count {
                Expected::of(lanes[n - count])
            } else {
                Expected::of(T::default())
            }
        })
        .collect()
}

/// Lanes moved down by `count` with zero fill at the top.
pub fn shift_down<T: Element>(lanes: &[T], count: usize) -> Vec<Expected> {
    (0..lanes.len())
        .map(|n| {
            lanes
                .get(n + count)
                .map_or(Expected::of(T::default()), |&x| Expected::of(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_rules() {
        let source = [10i32, 20, 30, 40];
        assert_eq!(pick(2, &source), Expected::of(30i32));
        assert_eq!(pick(-1, &source), Expected::of(0i32));
        assert_eq!(pick(DONT_CARE, &source), Expected::DontCare);
        assert_eq!(pick(4, &source), Expected::OutOfRange);
    }

    #[test]
    fn test_blend_source_spans_both_vectors() {
        let source = joined(&[1u8, 2], &[3, 4]);
        assert_eq!(select(&[3, 0], &source), vec![Expected::of(4u8), Expected::of(1u8)]);
    }

    #[test]
    fn test_scatter_later_lane_wins() {
        let dst = scatter(&[1i16, 2, 3, 4], &[2, -1, 2, 9], 8, 4);
        assert_eq!(dst, vec![0, 0, 3, 0]);
        let dst = scatter(&[1i16, 2], &[0, 1], 1, 2);
        assert_eq!(dst, vec![1, 0]);
    }

    #[test]
    fn test_shifts_fill_with_zero() {
        let lanes = [1i32, 2, 3, 4];
        assert_eq!(shift_up(&lanes, 1)[0], Expected::of(0i32));
        assert_eq!(shift_up(&lanes, 1)[3], Expected::of(3i32));
        assert_eq!(shift_down(&lanes, 3)[0], Expected::of(4i32));
        assert_eq!(shift_down(&lanes, 5)[0], Expected::of(0i32));
    }
}
