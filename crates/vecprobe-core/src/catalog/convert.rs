//! Conversion families: widening, narrowing, integer to float, half
//! precision and double to `i32`

use half::f16;
use vecprobe_simd::{Lane, Narrow, Simd, ToFloat, Widen};

use super::CaseOptions;
use crate::case::{scalars, unary, whole, Case, Inputs, Plan, Shape};
use crate::config::ElementType;
use crate::corpus::CorpusProfile;
use crate::element::{Element, FloatElement, IntElement};
use crate::error::Result;
use crate::oracle::{convert, float};
use crate::scalar::Expected;

/// Lane-doubling conversions.
pub fn widen<T: Element + Widen, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Wide: Element,
{
    let case = match id {
        606 => unary::<T, T::Wide, N>(606, "extend", Simd::extend, convert::value),
        607 => whole::<T, T::Wide, HALF>(
            607,
            "extend_low",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().extend_low::<HALF>(),
            |x| x.a[..HALF].iter().map(|&a| convert::value(a)).collect(),
        ),
        608 => whole::<T, T::Wide, HALF>(
            608,
            "extend_high",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().extend_high::<HALF>(),
            |x| x.a[HALF..N].iter().map(|&a| convert::value(a)).collect(),
        ),
        500 => whole::<T, T::Wide, HALF>(
            500,
            "bitcast_wide",
            N,
            Plan::Single,
            |x| x.a_vector::<N>().bitcast_wide::<HALF>(),
            |x| {
                x.a[..N]
                    .chunks_exact(2)
                    .map(|pair| convert::bitcast_pair::<T, T::Wide>(pair[0], pair[1]))
                    .collect()
            },
        ),
        514 if T::TYPE == ElementType::F32 => {
            unary::<T, T::Wide, N>(514, "to_double", Simd::extend, convert::value)
        }
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Integer narrowing: truncating and saturating.
pub fn narrow<T: IntElement + Narrow, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Narrow: IntElement,
{
    let case = match id {
        609 => unary::<T, T::Narrow, N>(609, "compress", Simd::compress, convert::truncate::<T, T::Narrow>),
        610 => whole::<T, T::Narrow, DOUBLE>(
            610,
            "compress_pair",
            N,
            Plan::Cross,
            |x| x.a_vector::<N>().compress_pair::<DOUBLE>(x.b_vector::<N>()),
            |x| {
                x.a[..N]
                    .iter()
                    .chain(&x.b[..N])
                    .map(|&v| convert::truncate::<T, T::Narrow>(v))
                    .collect()
            },
        ),
        611 => whole::<T, T::Narrow, DOUBLE>(
            611,
            "compress_saturated",
            N,
            Plan::Cross,
            |x| x.a_vector::<N>().compress_saturated::<DOUBLE>(x.b_vector::<N>()),
            |x| {
                x.a[..N]
                    .iter()
                    .chain(&x.b[..N])
                    .map(|&v| convert::saturate::<T, T::Narrow>(v))
                    .collect()
            },
        ),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Float narrowing: round to nearest even into the narrower float.
pub fn float_narrow<T: FloatElement + Narrow, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Narrow: Element,
{
    let profile = if T::BITS == 32 {
        CorpusProfile::half_probes()
    } else {
        CorpusProfile::default()
    };
    let case = match id {
        609 => unary::<T, T::Narrow, N>(609, "compress", Simd::compress, convert::value),
        610 => whole::<T, T::Narrow, DOUBLE>(
            610,
            "compress_pair",
            N,
            Plan::Cross,
            |x| x.a_vector::<N>().compress_pair::<DOUBLE>(x.b_vector::<N>()),
            |x| x.a[..N].iter().chain(&x.b[..N]).map(|&v| convert::value(v)).collect(),
        ),
        513 if T::TYPE == ElementType::F64 => {
            unary::<T, T::Narrow, N>(513, "to_float", Simd::compress, convert::value)
        }
        623 if T::TYPE == ElementType::F32 => {
            #[allow(clippy::cast_possible_truncation)]
            let single = |a: T| a.to_f64() as f32;
            unary::<T, T::Narrow, N>(623, "to_half", Simd::compress, move |a| {
                convert::single_to_half(single(a))
            })
        }
        _ => return Ok(None),
    };
    Ok(Some(case.with_profile(profile)))
}

/// Integer lanes to floats of the same width, by value and by bits.
pub fn int_float<T: IntElement + ToFloat, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    T::Float: Element,
{
    let reinterpret_id = match T::BITS {
        16 => 501,
        32 => 503,
        _ => 504,
    };
    let half_id = match T::TYPE {
        ElementType::I16 => Some(620),
        ElementType::U16 => Some(621),
        _ => None,
    };
    let case = match id {
        511 => unary::<T, T::Float, N>(511, "to_float", Simd::to_float, convert::int_to_float),
        512 if T::BITS == 32 => unary::<T, f64, N>(512, "to_double", Simd::to_double, convert::int_to_float),
        id if id == reinterpret_id => unary::<T, T::Float, N>(
            id,
            "reinterpret_float",
            Simd::reinterpret_float,
            convert::reinterpret::<T, T::Float>,
        ),
        id if Some(id) == half_id => {
            unary::<T, T::Float, N>(id, "to_half", Simd::to_float, convert::int_to_float)
        }
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Half precision lanes as raw bits
#[allow(clippy::cast_possible_truncation)]
fn half_of<T: Lane>(x: T) -> f16 {
    f16::from_bits(x.to_raw() as u16)
}

/// Half precision to single and back, checked against the software
/// conversions.
pub fn half<T: FloatElement + Widen, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>>
where
    <T as Widen>::Wide: Element + Narrow<Narrow = T>,
{
    let case = match id {
        622 => unary::<T, <T as Widen>::Wide, N>(622, "to_single", Simd::extend, |a| {
            convert::half_to_single(half_of(a))
        }),
        624 => unary::<T, T, N>(
            624,
            "half_round_trip",
            |a| a.extend().compress(),
            |a| convert::single_to_half(convert::f16_bits_to_f32(half_of(a).to_bits())),
        ),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// Double lanes of one operand as an `f64` vector
fn doubles<T: FloatElement, const N: usize>(lanes: &[T]) -> Simd<f64, N> {
    Simd::from_array(std::array::from_fn(|n| lanes[n].to_f64()))
}

fn int32_lanes<T: FloatElement>(lanes: &[T], rounding: fn(f64) -> f64) -> Vec<Expected> {
    lanes.iter().map(|a| float::to_int32(a.to_f64(), rounding)).collect()
}

/// Double precision to `i32`, one and two operands.
pub fn double_int<T: FloatElement, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let round: fn(f64) -> f64 = float::round_half_even;
    let trunc: fn(f64) -> f64 = f64::trunc;
    let case = match id {
        515 => Case::new(
            515,
            "round_to_int32",
            N,
            Plan::Single,
            Shape::Lanewise,
            |x: &Inputs<'_, T>| scalars(doubles::<T, N>(x.a).round_to_int32()),
            move |x: &Inputs<'_, T>| int32_lanes(&x.a[..N], round),
        ),
        516 => Case::new(
            516,
            "truncate_to_int32",
            N,
            Plan::Single,
            Shape::Lanewise,
            |x: &Inputs<'_, T>| scalars(doubles::<T, N>(x.a).truncate_to_int32()),
            move |x: &Inputs<'_, T>| int32_lanes(&x.a[..N], trunc),
        ),
        517 => whole::<T, i32, DOUBLE>(
            517,
            "round_to_int32_pair",
            N,
            Plan::Cross,
            |x| doubles::<T, N>(x.a).round_to_int32_pair::<DOUBLE>(doubles::<T, N>(x.b)),
            move |x| {
                let mut lanes = int32_lanes(&x.a[..N], round);
                lanes.extend(int32_lanes(&x.b[..N], round));
                lanes
            },
        ),
        518 => whole::<T, i32, DOUBLE>(
            518,
            "truncate_to_int32_pair",
            N,
            Plan::Cross,
            |x| doubles::<T, N>(x.a).truncate_to_int32_pair::<DOUBLE>(doubles::<T, N>(x.b)),
            move |x| {
                let mut lanes = int32_lanes(&x.a[..N], trunc);
                lanes.extend(int32_lanes(&x.b[..N], trunc));
                lanes
            },
        ),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, LaneContext};

    fn agree<T: Element>(case: &Case<T>, a: &[T], b: &[T]) {
        let x = Inputs {
            a,
            b,
            flags: &[],
            bitfield: 0,
            indexes: &[],
            table: &[],
        };
        let actual = case.invoke(&x);
        let expected = case.reference(&x);
        assert_eq!(actual.len(), expected.len(), "case {}", case.id);
        for (actual, expected) in actual.into_iter().zip(&expected) {
            let verdict = compare(actual, expected, &case.policy, &LaneContext::default());
            assert!(verdict.is_equal(), "case {}: {actual} vs {expected}", case.id);
        }
    }

    #[test]
    fn test_widening_halves() {
        let a = [-1i8, 2, -3, 4, i8::MIN, i8::MAX, 0, 7, 1, 2, 3, 4, 5, 6, 7, 8];
        for id in [606, 607, 608, 500] {
            let case = widen::<i8, 16, 8, 32>(id, &CaseOptions::default()).unwrap().unwrap();
            agree(&case, &a, &a);
        }
        assert!(widen::<i8, 16, 8, 32>(514, &CaseOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_narrowing_truncates_and_saturates() {
        let a = [70_000i32, -70_000, 65_535, -1];
        let b = [32_768, -32_769, 1, 0];
        for id in [609, 610, 611] {
            let case = narrow::<i32, 4, 2, 8>(id, &CaseOptions::default()).unwrap().unwrap();
            agree(&case, &a, &b);
        }
    }

    #[test]
    fn test_single_to_half_probes() {
        let a = [-65_512.31f32, 167_890.12, 5.17e-5, 5.943_03e-8, 1.234e-22, f32::NAN, -0.0, 1.0];
        for id in [609, 623] {
            let case = float_narrow::<f32, 8, 4, 16>(id, &CaseOptions::default()).unwrap().unwrap();
            assert!(case.profile.half_probes);
            agree(&case, &a, &a);
        }
    }

    #[test]
    fn test_int_to_float_ids_follow_width() {
        let options = CaseOptions::default();
        assert!(int_float::<i16, 8, 4, 16>(501, &options).unwrap().is_some());
        assert!(int_float::<i16, 8, 4, 16>(620, &options).unwrap().is_some());
        assert!(int_float::<i16, 8, 4, 16>(621, &options).unwrap().is_none());
        assert!(int_float::<u32, 4, 2, 8>(503, &options).unwrap().is_some());
        assert!(int_float::<u32, 4, 2, 8>(512, &options).unwrap().is_some());
        assert!(int_float::<i64, 2, 1, 4>(512, &options).unwrap().is_none());
        let case = int_float::<i64, 2, 1, 4>(511, &options).unwrap().unwrap();
        agree(&case, &[i64::MAX, -3], &[]);
    }

    #[test]
    fn test_half_round_trip() {
        let a: Vec<f16> = [0x0000u16, 0x8000, 0x0001, 0x03FF, 0x7BFF, 0x7C00, 0x7E00, 0x3C00]
            .into_iter()
            .map(f16::from_bits)
            .collect();
        for id in [622, 624] {
            let case = half::<f16, 8, 4, 16>(id, &CaseOptions::default()).unwrap().unwrap();
            agree(&case, &a, &a);
        }
    }

    #[test]
    fn test_double_to_int32_range() {
        let a = [2.5f64, -2.5, 3.0e9, f64::NAN];
        let b = [-2_147_483_648.0f64, 0.49, -0.5, 1.5];
        for id in [515, 516, 517, 518] {
            let case = double_int::<f64, 4, 2, 8>(id, &CaseOptions::default()).unwrap().unwrap();
            agree(&case, &a, &b);
        }
    }
}
