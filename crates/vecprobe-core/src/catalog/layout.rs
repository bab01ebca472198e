//! Layout family: joining and splitting vectors, single-lane access and
//! partial loads and stores. Defined for every lane type.

use vecprobe_simd::Simd;

use super::CaseOptions;
use crate::case::{whole, Case, Inputs, Plan, Shape};
use crate::element::Element;
use crate::error::Result;
use crate::oracle::permute;
use crate::scalar::Expected;

/// Value stored in the destination lanes a partial store must not touch
const STORE_FILL: i64 = 99;

/// Random position in `0..modulo` taken from the bitfield
#[allow(clippy::cast_possible_truncation)]
fn position(bitfield: u64, modulo: usize) -> usize {
    (bitfield % modulo as u64) as usize
}

/// First `count` lanes of `a`, then `fill`.
fn prefix<T: Element>(a: &[T], count: usize, fill: T) -> Vec<Expected> {
    a.iter()
        .enumerate()
        .map(|(n, &v)| Expected::of(if n < count { v } else { fill }))
        .collect()
}

pub fn layout<T: Element, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let case = match id {
        600 => whole::<T, T, DOUBLE>(
            600,
            "concatenate",
            N,
            Plan::Cross,
            |x| x.a_vector::<N>().concat::<DOUBLE>(x.b_vector::<N>()),
            |x| {
                permute::joined(&x.a[..N], &x.b[..N])
                    .into_iter()
                    .map(Expected::of)
                    .collect()
            },
        ),
        602 => whole::<T, T, HALF>(
            602,
            "get_low",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().low::<HALF>(),
            |x| x.a[..HALF].iter().map(|&a| Expected::of(a)).collect(),
        ),
        603 => whole::<T, T, HALF>(
            603,
            "get_high",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().high::<HALF>(),
            |x| x.a[HALF..N].iter().map(|&a| Expected::of(a)).collect(),
        ),
        612 => whole::<T, T, N>(
            612,
            "insert",
            N,
            Plan::Cross,
            |x| x.a_vector::<N>().insert(position(x.bitfield, N), x.b[0]),
            |x| {
                let at = position(x.bitfield, N);
                (0..N)
                    .map(|n| Expected::of(if n == at { x.b[0] } else { x.a[n] }))
                    .collect()
            },
        )
        .with_bitfield(),
        613 => Case::new(
            613,
            "extract",
            N,
            Plan::Single,
            Shape::Scalar,
            |x: &Inputs<'_, T>| {
                vec![x.a_vector::<N>().extract(position(x.bitfield, N)).to_scalar()]
            },
            |x: &Inputs<'_, T>| vec![Expected::of(x.a[position(x.bitfield, N)])],
        )
        .with_bitfield(),
        614 => whole::<T, T, N>(
            614,
            "cutoff",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().cutoff(position(x.bitfield, N + 1)),
            |x| prefix(&x.a[..N], position(x.bitfield, N + 1), T::default()),
        )
        .with_bitfield(),
        615 => whole::<T, T, N>(
            615,
            "load_partial",
            N,
            Plan::Single,
            |x| Simd::<T, N>::load_partial(position(x.bitfield, N + 1), x.a),
            |x| prefix(&x.a[..N], position(x.bitfield, N + 1), T::default()),
        )
        .with_bitfield(),
        616 => Case::new(
            616,
            "store_partial",
            N,
            Plan::Single,
            Shape::Whole,
            |x: &Inputs<'_, T>| {
                let mut dst = vec![T::from_i64(STORE_FILL); N];
                x.a_vector::<N>().store_partial(position(x.bitfield, N + 1), &mut dst);
                dst.iter().map(|v| v.to_scalar()).collect()
            },
            |x: &Inputs<'_, T>| {
                prefix(&x.a[..N], position(x.bitfield, N + 1), T::from_i64(STORE_FILL))
            },
        )
        .with_bitfield(),
        650 => whole::<T, T, N>(
            650,
            "from_slice",
            N,
            Plan::Single,
            |x| Simd::<T, N>::from_slice(x.a),
            |x| x.a[..N].iter().map(|&a| Expected::of(a)).collect(),
        ),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::scalars;
    use crate::scalar::Scalar;

    fn inputs<'a>(a: &'a [u16], b: &'a [u16], bitfield: u64) -> Inputs<'a, u16> {
        Inputs {
            a,
            b,
            flags: &[],
            bitfield,
            indexes: &[],
            table: &[],
        }
    }

    fn build(id: u32) -> Case<u16> {
        layout::<u16, 8, 4, 16>(id, &CaseOptions::default()).unwrap().unwrap()
    }

    #[test]
    fn test_split_and_join() {
        let a = [1u16, 2, 3, 4, 5, 6, 7, 8];
        let b = [9u16, 10, 11, 12, 13, 14, 15, 16];
        let x = inputs(&a, &b, 0);
        for id in [600, 602, 603, 650] {
            let case = build(id);
            let expected: Vec<Scalar> = case
                .reference(&x)
                .into_iter()
                .map(|e| match e {
                    Expected::Value(v) => v,
                    other => panic!("case {id}: {other}"),
                })
                .collect();
            assert_eq!(case.invoke(&x), expected, "case {id}");
        }
        assert_eq!(build(603).invoke(&x), scalars(Simd::from_array([5u16, 6, 7, 8])));
    }

    #[test]
    fn test_partial_store_keeps_fill() {
        let a = [1u16, 2, 3, 4, 5, 6, 7, 8];
        // 3 lanes stored
        let x = inputs(&a, &a, 12);
        let case = build(616);
        assert!(case.uses_bitfield);
        let out = case.invoke(&x);
        assert_eq!(out[2], Scalar::Unsigned(3));
        assert_eq!(out[3], Scalar::Unsigned(99));
        assert_eq!(case.reference(&x)[3], Expected::of(99u16));
    }

    #[test]
    fn test_insert_and_extract_wrap_on_bitfield() {
        let a = [1u16, 2, 3, 4, 5, 6, 7, 8];
        let b = [40u16; 8];
        let x = inputs(&a, &b, 13);
        assert_eq!(build(612).invoke(&x)[5], Scalar::Unsigned(40));
        assert_eq!(build(613).invoke(&x), vec![Scalar::Unsigned(6)]);
        assert_eq!(build(614).invoke(&x)[3], Scalar::Unsigned(4));
        assert_eq!(build(614).invoke(&x)[4], Scalar::Unsigned(0));
    }
}
