//! Floating point families: arithmetic and bit fields, transcendental
//! math, and sign changes under a fixed lane pattern

use vecprobe_simd::{Float, Mask, Simd, Unary};

use super::{fixed_indexes, lanes_i32, trials, CaseOptions};
use crate::case::{binary, flagged, scalars, unary, Case, Inputs, Plan, Shape, MAX_MATH_ERRORS};
use crate::compare::Policy;
use crate::config::IndexList;
use crate::corpus::CorpusProfile;
use crate::element::{Element, FloatElement};
use crate::error::{Error, Result};
use crate::oracle::{arith, convert, float, math};
use crate::scalar::Expected;

/// Cases for every float lane type.
pub fn float<T: FloatElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Bits: Element,
{
    let exact_zero = Policy::EXACT.signed_zero();
    let case = match id {
        4 => binary::<T, T, N>(4, "divide", |a, b| a / b, float::divide),
        17 => flagged::<T, N>(17, "if_div", Simd::if_div, |f, a, b| {
            if f {
                float::divide(a, b)
            } else {
                Expected::of(a)
            }
        }),
        11 => binary::<T, T, N>(11, "maximum", Simd::maximum, float::maximum).with_policy(exact_zero),
        12 => binary::<T, T, N>(12, "minimum", Simd::minimum, float::minimum).with_policy(exact_zero),
        200 => binary::<T, T, N>(200, "sign_combine", Simd::sign_combine, float::sign_combine)
            .with_policy(exact_zero),
        201 => unary::<T, T, N>(201, "square", Simd::square, |a| arith::mul(a, a)),
        210 => unary::<T, bool, N>(210, "is_finite", Simd::is_finite, float::is_finite),
        211 => unary::<T, bool, N>(211, "is_inf", Simd::is_inf, float::is_inf),
        212 => unary::<T, bool, N>(212, "is_nan", Simd::is_nan, float::is_nan),
        213 => unary::<T, bool, N>(213, "is_subnormal", Simd::is_subnormal, float::is_subnormal),
        214 => unary::<T, bool, N>(
            214,
            "is_zero_or_subnormal",
            Simd::is_zero_or_subnormal,
            float::is_zero_or_subnormal,
        ),
        220 => unary::<T, T, N>(220, "infinite", |_| Simd::infinite(), |_| Expected::of(T::INFINITY)),
        222 => unary::<T, T::Bits, N>(
            222,
            "nan_code",
            |a| Simd::<T, N>::nan_with_code(a.reinterpret_int()).nan_code(),
            |a| float::nan_code_round_trip::<T>(a.to_bits_int()),
        ),
        306 => unary::<T, bool, N>(306, "sign_bit", Simd::sign_bit, float::sign_bit),
        502 => unary::<T, T::Bits, N>(
            502,
            "reinterpret_int",
            Simd::reinterpret_int,
            convert::reinterpret::<T, T::Bits>,
        ),
        505 => unary::<T, T::Bits, N>(505, "roundi", Simd::roundi, |a| {
            float::to_int(a, float::round_half_even)
        }),
        506 => unary::<T, T::Bits, N>(506, "truncatei", Simd::truncatei, |a| float::to_int(a, f64::trunc)),
        507 => unary::<T, T, N>(507, "round", Simd::round, float::round).with_policy(Policy::ulps(0.0)),
        508 => unary::<T, T, N>(508, "truncate", Simd::truncate, float::truncate)
            .with_policy(Policy::ulps(0.0)),
        509 => unary::<T, T, N>(509, "floor", Simd::floor, float::floor).with_policy(Policy::ulps(0.0)),
        510 => unary::<T, T, N>(510, "ceil", Simd::ceil, float::ceil).with_policy(Policy::ulps(0.0)),
        519 => unary::<T, T, N>(519, "sqrt", Simd::sqrt, float::sqrt).with_policy(Policy::ulps(1.0)),
        520 => unary::<T, T, N>(520, "approx_recipr", Simd::approx_recipr, |a| {
            float::divide(T::ONE, a)
        })
        .with_policy(Policy::ulps(8192.0)),
        521 => unary::<T, T, N>(521, "approx_rsqrt", Simd::approx_rsqrt, |a| {
            Expected::wide(1.0 / a.to_f64().sqrt())
        })
        .with_policy(Policy::ulps(8192.0)),
        530 => binary::<T, T, N>(530, "mul_add", |a, b| a.mul_add(b, a), |a, b| {
            float::mul_add(a, b, a.to_f64())
        })
        .with_policy(Policy::ulps(8.0)),
        531 => binary::<T, T, N>(531, "mul_sub", |a, b| a.mul_sub(b, a), |a, b| {
            float::mul_add(a, b, -a.to_f64())
        })
        .with_policy(Policy::ulps(8.0)),
        532 => binary::<T, T, N>(532, "nmul_add", |a, b| a.nmul_add(b, a), |a, b| {
            Expected::wide((-a.to_f64()).mul_add(b.to_f64(), a.to_f64()))
        })
        .with_policy(Policy::ulps(8.0)),
        533 => binary::<T, T, N>(533, "mul_sub_x", |a, b| a.mul_sub_x(b, a), |a, b| {
            float::mul_add(a, b, -a.to_f64())
        })
        .with_policy(Policy::ulps(60.0)),
        540 => unary::<T, T::Bits, N>(540, "exponent", Simd::exponent, float::exponent),
        541 => unary::<T, T, N>(541, "fraction", Simd::fraction, float::fraction),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Largest corpus magnitude: the first value for single precision, the
/// second for double.
fn clip<T: Float>(max: (f64, f64)) -> f64 {
    if T::BITS == 32 {
        max.0
    } else {
        max.1
    }
}

fn math_unary<T: FloatElement, const N: usize>(
    id: u32,
    name: &'static str,
    op: fn(Simd<T, N>) -> Simd<T, N>,
    function: Unary,
    policy: Policy,
    max: (f64, f64),
) -> Case<T> {
    unary::<T, T, N>(id, name, op, move |a| math::unary(function, a))
        .with_policy(policy)
        .with_profile(CorpusProfile::wide(clip::<T>(max), false))
        .with_max_errors(MAX_MATH_ERRORS)
}

/// Integer exponent taken from a float lane
#[allow(clippy::cast_possible_truncation)]
fn int_exponent<T: Float>(b: T) -> i32 {
    b.to_f64().trunc().clamp(-64.0, 64.0) as i32
}

/// Transcendental functions and powers, single and double precision.
pub fn math<T: FloatElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Bits: Element,
{
    let ulps = Policy::ulps;
    let case = match id {
        550 => math_unary::<T, N>(550, "exp", Simd::exp, Unary::Exp, ulps(2.0).ignore_underflow(), (87.0, 708.0)),
        551 => math_unary::<T, N>(551, "exp2", Simd::exp2, Unary::Exp2, ulps(3.0).ignore_underflow(), (27.0, 1020.0)),
        552 => math_unary::<T, N>(552, "exp10", Simd::exp10, Unary::Exp10, ulps(10.0).ignore_underflow(), (36.0, 307.0)),
        553 => math_unary::<T, N>(553, "expm1", Simd::expm1, Unary::ExpM1, ulps(3.0), (87.0, 708.0)),
        554 => math_unary::<T, N>(554, "log", Simd::log, Unary::Ln, ulps(3.0), (1e37, 1e307)),
        555 => math_unary::<T, N>(555, "log1p", Simd::log1p, Unary::Ln1p, ulps(2.0), (1e37, 1e307)),
        556 => math_unary::<T, N>(556, "log2", Simd::log2, Unary::Log2, ulps(2.0), (1e37, 1e307)),
        557 => math_unary::<T, N>(557, "log10", Simd::log10, Unary::Log10, ulps(3.0), (1e37, 1e307)),
        558 => math_unary::<T, N>(558, "cbrt", Simd::cbrt, Unary::Cbrt, ulps(5.0).absolute(), (1e29, 1e200)),
        560 => math_unary::<T, N>(560, "sin", Simd::sin, Unary::Sin, ulps(3.0).absolute(), (1e4, 1e4)),
        561 => math_unary::<T, N>(561, "cos", Simd::cos, Unary::Cos, ulps(3.0).absolute(), (1e4, 1e4)),
        562 => math_unary::<T, N>(562, "tan", Simd::tan, Unary::Tan, ulps(3.0).absolute(), (1e4, 1e4)),
        564 => math_unary::<T, N>(564, "asin", Simd::asin, Unary::Asin, ulps(3.0), (1.0, 1.0)),
        565 => math_unary::<T, N>(565, "acos", Simd::acos, Unary::Acos, ulps(3.0), (1.0, 1.0)),
        566 => math_unary::<T, N>(566, "atan", Simd::atan, Unary::Atan, ulps(3.0), (1.0, 1.0)),
        580 => math_unary::<T, N>(580, "sinh", Simd::sinh, Unary::Sinh, ulps(2.0).ignore_overflow(), (88.0, 709.0)),
        581 => math_unary::<T, N>(581, "cosh", Simd::cosh, Unary::Cosh, ulps(2.0).ignore_overflow(), (88.0, 709.0)),
        582 => math_unary::<T, N>(582, "tanh", Simd::tanh, Unary::Tanh, ulps(2.0), (88.0, 709.0)),
        583 => math_unary::<T, N>(583, "asinh", Simd::asinh, Unary::Asinh, ulps(3.0), (1e30, 1e300)),
        584 => math_unary::<T, N>(584, "acosh", Simd::acosh, Unary::Acosh, ulps(3.0), (1e30, 1e300)),
        585 => math_unary::<T, N>(585, "atanh", Simd::atanh, Unary::Atanh, ulps(3.0), (1.0, 1.0)),
        542 => {
            let exponent = options.indexes.first_or(7);
            unary::<T, T, N>(542, "pow_const", move |a| a.powi(exponent), move |a| math::powi(a, exponent))
                .with_policy(ulps(3.0).ignore_overflow().ignore_underflow())
                .with_max_errors(MAX_MATH_ERRORS)
                .with_note(format!("exponent {exponent}"))
        }
        545 => {
            let list = options.indexes.as_slice();
            let numerator = options.indexes.first_or(2);
            let denominator = list.get(1).copied().unwrap_or(3);
            if denominator == 0 {
                return Err(Error::InvalidIndexes(format!(
                    "exponent {numerator}/{denominator} has a zero denominator"
                )));
            }
            unary::<T, T, N>(
                545,
                "pow_ratio",
                move |a| a.pow_ratio(numerator, denominator),
                move |a| math::pow_ratio(a, numerator, denominator),
            )
            .with_policy(ulps(300.0).ignore_overflow().ignore_underflow())
            .with_max_errors(MAX_MATH_ERRORS)
            .with_note(format!("exponent {numerator}/{denominator}"))
        }
        590 => binary::<T, T, N>(590, "pow", Simd::pow, math::pow)
            .with_policy(ulps(2.0).per_b(0.6).ignore_overflow().ignore_underflow())
            .with_profile(CorpusProfile::wide(clip::<T>((88.0, 709.0)), true))
            .with_max_errors(MAX_MATH_ERRORS),
        591 => Case::new(
            591,
            "pow_scalar",
            N,
            Plan::Cross,
            Shape::Lanewise,
            |x: &Inputs<'_, T>| scalars(x.a_vector::<N>().pow_scalar(x.b[0])),
            |x: &Inputs<'_, T>| x.a[..N].iter().map(|&a| math::pow(a, x.b[0])).collect(),
        )
        .with_policy(ulps(60.0).ignore_overflow().ignore_underflow())
        .with_profile(CorpusProfile::wide(clip::<T>((88.0, 709.0)), true))
        .with_max_errors(MAX_MATH_ERRORS),
        592 => Case::new(
            592,
            "powi",
            N,
            Plan::Cross,
            Shape::Lanewise,
            |x: &Inputs<'_, T>| scalars(x.a_vector::<N>().powi(int_exponent(x.b[0]))),
            |x: &Inputs<'_, T>| {
                let exponent = int_exponent(x.b[0]);
                x.a[..N].iter().map(|&a| math::powi(a, exponent)).collect()
            },
        )
        .with_policy(ulps(3.0).ignore_overflow().ignore_underflow())
        .with_max_errors(MAX_MATH_ERRORS),
        593 => binary::<T, T, N>(593, "atan2", Simd::atan2, math::atan2)
            .with_policy(ulps(3.0))
            .with_max_errors(MAX_MATH_ERRORS),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Sign flips selected by a fixed lane pattern; nonzero entries flip.
pub fn change_sign<T: FloatElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Bits: Element,
{
    if id != 708 {
        return Ok(None);
    }
    let pattern = fixed_indexes::<N>(id, options, |k| lanes_i32(k % 2))?;
    let mask = Mask::<N>::from_array(pattern.map(|p| p != 0));
    let case = Case::new(
        708,
        "change_sign",
        N,
        trials(1),
        Shape::Lanewise,
        move |x: &Inputs<'_, T>| scalars(x.a_vector::<N>().change_sign(mask)),
        move |x: &Inputs<'_, T>| {
            x.a[..N]
                .iter()
                .zip(&pattern)
                .map(|(&a, &p)| if p == 0 { Expected::of(a) } else { float::flip_sign(a) })
                .collect()
        },
    )
    .with_note(format!("indexes {}", IndexList(pattern.to_vec())));
    Ok(Some(case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, LaneContext};

    fn check<T: FloatElement>(case: &Case<T>, a: &[T], b: &[T]) {
        let flags = vec![true; a.len()];
        let x = Inputs {
            a,
            b,
            flags: &flags,
            bitfield: 0,
            indexes: &[],
            table: &[],
        };
        for (actual, expected) in case.invoke(&x).into_iter().zip(&case.reference(&x)) {
            let verdict = compare(actual, expected, &case.policy, &LaneContext::default());
            assert!(verdict.is_equal(), "case {}: {actual} vs {expected}", case.id);
        }
    }

    #[test]
    fn test_bit_field_cases_agree_on_specials() {
        let a = [0.0f32, -0.0, 1.5, -3.0e-39, f32::INFINITY, f32::NAN, f32::MAX, -1.0];
        for id in [210, 211, 212, 213, 214, 222, 306, 502, 505, 506, 540, 541] {
            let case = float::<f32, 8, 4, 16>(id, &CaseOptions::default()).unwrap().unwrap();
            check(&case, &a, &a);
        }
    }

    #[test]
    fn test_maximum_minimum_keep_zero_sign() {
        let a = [0.0f64, -0.0];
        let b = [-0.0f64, 0.0];
        for id in [11, 12, 200] {
            let case = float::<f64, 2, 1, 4>(id, &CaseOptions::default()).unwrap().unwrap();
            assert!(case.policy.signed_zero);
            check(&case, &a, &b);
        }
    }

    #[test]
    fn test_math_cases_carry_their_profile() {
        let case = math::<f32, 4, 2, 8>(550, &CaseOptions::default()).unwrap().unwrap();
        assert_eq!(case.max_errors, MAX_MATH_ERRORS);
        assert_eq!(case.profile, CorpusProfile::wide(87.0, false));
        let case = math::<f64, 2, 1, 4>(590, &CaseOptions::default()).unwrap().unwrap();
        assert_eq!(case.plan, Plan::Cross);
        assert_eq!(case.profile, CorpusProfile::wide(709.0, true));
        check(&case, &[2.0, 10.0], &[0.5, -3.0]);
    }

    #[test]
    fn test_pow_ratio_rejects_zero_denominator() {
        let options = CaseOptions {
            indexes: IndexList(vec![1, 0]),
            ..CaseOptions::default()
        };
        assert!(matches!(math::<f32, 4, 2, 8>(545, &options), Err(Error::InvalidIndexes(_))));
        let case = math::<f32, 4, 2, 8>(545, &CaseOptions::default()).unwrap().unwrap();
        check(&case, &[-8.0, 8.0, 27.0, 0.0], &[]);
    }

    #[test]
    fn test_change_sign_pattern() {
        let case = change_sign::<f32, 4, 2, 8>(708, &CaseOptions::default()).unwrap().unwrap();
        assert_eq!(case.note.as_deref(), Some("indexes 0,1,0,1"));
        let a = [1.0f32, 2.0, -0.0, 4.0];
        check(&case, &a, &a);
        let x = Inputs {
            a: &a,
            b: &a,
            flags: &[],
            bitfield: 0,
            indexes: &[],
            table: &[],
        };
        assert_eq!(case.reference(&x)[1], Expected::of(-2.0f32));
    }
}
