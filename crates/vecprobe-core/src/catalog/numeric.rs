//! Arithmetic, integer, bitwise and boolean families

use vecprobe_simd::{Bits, Lane, Mask, Simd};

use super::{lanes_i32, CaseOptions};
use crate::case::{binary, flagged, horizontal, unary, whole, Case, Inputs, Plan, Shape};
use crate::element::{BoolElement, Element, IntElement, NumElement};
use crate::error::{Error, Result};
use crate::oracle::arith::{self, Comparison};
use crate::oracle::integer;
use crate::scalar::Expected;

/// Cases shared by every numeric lane type.
pub fn arith<T: NumElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let case = match id {
        1 => binary::<T, T, N>(1, "add", |a, b| a + b, arith::add),
        2 => binary::<T, T, N>(2, "sub", |a, b| a - b, arith::sub),
        3 => binary::<T, T, N>(3, "mul", |a, b| a * b, arith::mul),
        8 => unary::<T, T, N>(8, "neg", |a| -a, arith::neg),
        9 => binary::<T, T, N>(9, "max", Simd::max, arith::max),
        10 => binary::<T, T, N>(10, "min", Simd::min, arith::min),
        13 => unary::<T, T, N>(13, "abs", Simd::abs, arith::abs),
        14 => flagged::<T, N>(14, "if_add", Simd::if_add, |f, a, b| {
            if f {
                arith::add(a, b)
            } else {
                Expected::of(a)
            }
        }),
        15 => flagged::<T, N>(15, "if_sub", Simd::if_sub, |f, a, b| {
            if f {
                arith::sub(a, b)
            } else {
                Expected::of(a)
            }
        }),
        16 => flagged::<T, N>(16, "if_mul", Simd::if_mul, |f, a, b| {
            if f {
                arith::mul(a, b)
            } else {
                Expected::of(a)
            }
        }),
        18 => flagged::<T, N>(
            18,
            "select",
            |a, m, b| Simd::select(m, a, b),
            |f, a, b| Expected::of(if f { a } else { b }),
        ),
        300 => compare::<T, N>(300, "less", Simd::simd_lt, Comparison::Lt),
        301 => compare::<T, N>(301, "less_equal", Simd::simd_le, Comparison::Le),
        302 => compare::<T, N>(302, "equal", Simd::simd_eq, Comparison::Eq),
        303 => compare::<T, N>(303, "not_equal", Simd::simd_ne, Comparison::Ne),
        304 => compare::<T, N>(304, "greater_equal", Simd::simd_ge, Comparison::Ge),
        305 => compare::<T, N>(305, "greater", Simd::simd_gt, Comparison::Gt),
        400 => horizontal::<T, T, N>(400, "horizontal_add", Simd::horizontal_add, arith::horizontal_add),
        404 => horizontal::<T, T, N>(404, "horizontal_min", Simd::horizontal_min, arith::horizontal_min),
        405 => horizontal::<T, T, N>(405, "horizontal_max", Simd::horizontal_max, arith::horizontal_max),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

fn compare<T: NumElement, const N: usize>(
    id: u32,
    name: &'static str,
    op: fn(Simd<T, N>, Simd<T, N>) -> Mask<N>,
    comparison: Comparison,
) -> Case<T> {
    binary::<T, bool, N>(id, name, op, move |a, b| arith::compare(a, b, comparison))
}

/// Divisor that never traps: zero is replaced by one on both sides.
fn nonzero<T: IntElement>(divisor: T) -> T {
    if divisor == T::ZERO {
        T::ONE
    } else {
        divisor
    }
}

/// Shift count taken from the first lane of B, modulo the lane width
#[allow(clippy::cast_possible_truncation)]
fn shift_count<T: IntElement>(b: &[T]) -> u32 {
    (b[0].to_raw() % u64::from(T::BITS)) as u32
}

/// Operation with a per-vector scalar parameter derived from B
fn with_scalar<T: IntElement, const N: usize, S: Copy + 'static>(
    id: u32,
    name: &'static str,
    param: fn(&[T]) -> S,
    op: impl Fn(Simd<T, N>, S) -> Simd<T, N> + 'static,
    reference: impl Fn(T, S) -> Expected + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        Plan::Cross,
        Shape::Lanewise,
        move |x: &Inputs<'_, T>| crate::case::scalars(op(x.a_vector(), param(x.b))),
        move |x: &Inputs<'_, T>| {
            let p = param(x.b);
            x.a[..N].iter().map(|&a| reference(a, p)).collect()
        },
    )
}

/// Integer-only cases.
pub fn integer<T: IntElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let case = match id {
        5 => with_scalar::<T, N, T>(
            5,
            "divide_scalar",
            |b| nonzero(b[0]),
            Simd::div_scalar,
            integer::divide,
        ),
        6 => {
            let value = options.indexes.first_or(27);
            let divisor = T::from_i64(i64::from(value));
            if divisor == T::ZERO {
                return Err(Error::InvalidIndexes(format!(
                    "divisor {value} is zero in the lane type"
                )));
            }
            unary::<T, T, N>(6, "divide_constant", move |a| a.div_scalar(divisor), move |a| {
                integer::divide(a, divisor)
            })
            .with_note(format!("divisor {value}"))
        }
        100 => with_scalar::<T, N, u32>(100, "shift_left", shift_count, Simd::shl, integer::shift_left),
        101 => with_scalar::<T, N, u32>(101, "shift_right", shift_count, Simd::shr, integer::shift_right),
        102 => with_scalar::<T, N, u32>(102, "rotate_left", shift_count, Simd::rotate_left, integer::rotate_left),
        103 => binary::<T, T, N>(103, "add_saturated", Simd::add_saturated, integer::add_saturated),
        104 => binary::<T, T, N>(104, "sub_saturated", Simd::sub_saturated, integer::sub_saturated),
        105 => unary::<T, T, N>(105, "abs_saturated", Simd::abs_saturated, integer::abs_saturated),
        401 => horizontal::<T, i64, N>(401, "horizontal_add_x", Simd::horizontal_add_x, integer::horizontal_add_x),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Bitwise cases for integer and boolean lanes. References work on raw bits.
pub fn bitwise<T: Element + Bits, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let case = match id {
        106 => binary::<T, T, N>(106, "and", |a, b| a & b, |a, b| {
            Expected::of(T::from_raw(a.to_raw() & b.to_raw()))
        }),
        107 => binary::<T, T, N>(107, "or", |a, b| a | b, |a, b| {
            Expected::of(T::from_raw(a.to_raw() | b.to_raw()))
        }),
        108 => binary::<T, T, N>(108, "xor", |a, b| a ^ b, |a, b| {
            Expected::of(T::from_raw(a.to_raw() ^ b.to_raw()))
        }),
        109 => unary::<T, T, N>(109, "not", |a| !a, |a| Expected::of(T::from_raw(!a.to_raw()))),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

fn mask_of<T: BoolElement, const N: usize>(lanes: &[T]) -> Mask<N> {
    Mask::from_array(std::array::from_fn(|n| lanes[n].to_bool()))
}

/// Boolean vector cases.
pub fn boolean<T: BoolElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let case = match id {
        110 => binary::<T, T, N>(110, "andnot", Simd::andnot, |a, b| {
            Expected::bool(a.to_bool() && !b.to_bool())
        }),
        402 => horizontal::<T, bool, N>(
            402,
            "horizontal_and",
            |a| mask_of::<T, N>(a.as_array()).horizontal_and(),
            |x| Expected::bool(x.iter().all(|b| b.to_bool())),
        ),
        403 => horizontal::<T, bool, N>(
            403,
            "horizontal_or",
            |a| mask_of::<T, N>(a.as_array()).horizontal_or(),
            |x| Expected::bool(x.iter().any(|b| b.to_bool())),
        ),
        410 => horizontal::<T, i32, N>(
            410,
            "horizontal_find_first",
            |a| mask_of::<T, N>(a.as_array()).horizontal_find_first(),
            |x| Expected::of(x.iter().position(|b| b.to_bool()).map_or(-1, lanes_i32)),
        ),
        411 => horizontal::<T, u32, N>(
            411,
            "horizontal_count",
            |a| mask_of::<T, N>(a.as_array()).horizontal_count(),
            |x| Expected::of(x.iter().filter(|b| b.to_bool()).count() as u64),
        ),
        412 => horizontal::<T, u64, N>(
            412,
            "to_bits",
            |a| mask_of::<T, N>(a.as_array()).to_bits(),
            |x| {
                let bits = x
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (n, b)| acc | (u64::from(b.to_bool()) << n));
                Expected::of(bits)
            },
        ),
        413 => whole::<T, bool, N>(
            413,
            "load_bits",
            N,
            Plan::Single,
            |x| Mask::<N>::load_bits(x.bitfield),
            |x| (0..N).map(|n| Expected::bool((x.bitfield >> n) & 1 == 1)).collect(),
        )
        .with_bitfield(),
        _ => return Ok(None),
    };
    Ok(Some(case))
}
