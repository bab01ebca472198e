//! Floating point references: rounding, classification and bit fields

use vecprobe_simd::{Float, Int, Lane};

use crate::element::FloatElement;
use crate::scalar::{Expected, Scalar};

/// Sign, biased exponent and mantissa fields of a float lane.
pub fn fields<F: Float>(x: F) -> (bool, u64, u64) {
    let raw = x.to_raw();
    let mantissa = raw & ((1u64 << F::MANTISSA_BITS) - 1);
    let exponent = (raw >> F::MANTISSA_BITS) & ((1u64 << F::EXPONENT_BITS) - 1);
    let sign = (raw >> (F::BITS - 1)) & 1 == 1;
    (sign, exponent, mantissa)
}

fn exponent_max<F: Float>() -> u64 {
    (1u64 << F::EXPONENT_BITS) - 1
}

fn bias<F: Float>() -> i64 {
    (1i64 << (F::EXPONENT_BITS - 1)) - 1
}

/// Result in the signed integer lane of the same width
#[allow(clippy::cast_possible_truncation)]
fn signed(value: i128) -> Expected {
    Expected::Value(Scalar::Signed(value as i64))
}

/// Round to nearest with ties to even: take the floor and look at the
/// exact difference, which is representable for every finite input.
pub fn round_half_even(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    let diff = x - floor;
    let rounded = if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if (floor * 0.5).floor() == floor * 0.5 {
        floor
    } else {
        floor + 1.0
    };
    // Keep the sign of inputs that round to zero.
    if rounded == 0.0 {
        rounded.copysign(x)
    } else {
        rounded
    }
}

pub fn round<F: FloatElement>(a: F) -> Expected {
    Expected::wide(round_half_even(a.to_f64()))
}

pub fn truncate<F: FloatElement>(a: F) -> Expected {
    Expected::wide(a.to_f64().trunc())
}

pub fn floor<F: FloatElement>(a: F) -> Expected {
    Expected::wide(a.to_f64().floor())
}

pub fn ceil<F: FloatElement>(a: F) -> Expected {
    Expected::wide(a.to_f64().ceil())
}

pub fn divide<F: FloatElement>(a: F, b: F) -> Expected {
    Expected::wide(a.to_f64() / b.to_f64())
}

pub fn sqrt<F: FloatElement>(a: F) -> Expected {
    Expected::wide(a.to_f64().sqrt())
}

/// Larger operand; NaN propagates and `+0` beats `-0`.
pub fn maximum<F: FloatElement>(a: F, b: F) -> Expected {
    Expected::of(if a.is_nan_lane() {
        a
    } else if b.is_nan_lane() {
        b
    } else if a == b {
        if fields(a).0 {
            b
        } else {
            a
        }
    } else if a > b {
        a
    } else {
        b
    })
}

/// Smaller operand; NaN propagates and `-0` beats `+0`.
pub fn minimum<F: FloatElement>(a: F, b: F) -> Expected {
    Expected::of(if a.is_nan_lane() {
        a
    } else if b.is_nan_lane() {
        b
    } else if a == b {
        if fields(a).0 {
            a
        } else {
            b
        }
    } else if a < b {
        a
    } else {
        b
    })
}

/// `a` with its sign flipped when `b` is negative, including `-0` and NaN.
pub fn sign_combine<F: FloatElement>(a: F, b: F) -> Expected {
    if fields(b).0 {
        flip_sign(a)
    } else {
        Expected::of(a)
    }
}

pub fn flip_sign<F: FloatElement>(a: F) -> Expected {
    Expected::of(F::from_raw(a.to_raw() ^ (1u64 << (F::BITS - 1))))
}

pub fn sign_bit<F: FloatElement>(a: F) -> Expected {
    Expected::bool(fields(a).0)
}

pub fn is_finite<F: FloatElement>(a: F) -> Expected {
    Expected::bool(fields(a).1 != exponent_max::<F>())
}

pub fn is_inf<F: FloatElement>(a: F) -> Expected {
    let (_, exponent, mantissa) = fields(a);
    Expected::bool(exponent == exponent_max::<F>() && mantissa == 0)
}

pub fn is_nan<F: FloatElement>(a: F) -> Expected {
    let (_, exponent, mantissa) = fields(a);
    Expected::bool(exponent == exponent_max::<F>() && mantissa != 0)
}

pub fn is_subnormal<F: FloatElement>(a: F) -> Expected {
    let (_, exponent, mantissa) = fields(a);
    Expected::bool(exponent == 0 && mantissa != 0)
}

pub fn is_zero_or_subnormal<F: FloatElement>(a: F) -> Expected {
    Expected::bool(fields(a).1 == 0)
}

/// Unbiased exponent. Normal values give `floor(log2(|a|))`; others give
/// the raw field minus the bias.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn exponent<F: FloatElement>(a: F) -> Expected {
    let (_, field, _) = fields(a);
    let value = if field != 0 && field != exponent_max::<F>() {
        let magnitude = a.to_f64().abs();
        let guess = magnitude.log2().floor() as i32;
        // log2 may round up to the next integer just below a power of two.
        if 2f64.powi(guess) > magnitude {
            i64::from(guess) - 1
        } else {
            i64::from(guess)
        }
    } else {
        field as i64 - bias::<F>()
    };
    signed(i128::from(value))
}

/// Significand scaled into `[1, 2)`. Non-normal lanes keep their mantissa
/// bits under an exponent of zero.
#[allow(clippy::cast_possible_truncation)]
pub fn fraction<F: FloatElement>(a: F) -> Expected {
    let (_, field, mantissa) = fields(a);
    if field != 0 && field != exponent_max::<F>() {
        let magnitude = a.to_f64().abs();
        let scale = (field as i64 - bias::<F>()) as i32;
        Expected::wide(magnitude / 2f64.powi(scale))
    } else {
        let one = (bias::<F>() as u64) << F::MANTISSA_BITS;
        Expected::of(F::from_raw(one | mantissa))
    }
}

/// Round or truncate to the signed integer of the lane width. Results the
/// integer cannot hold, and NaN, give the integer minimum.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn to_int<F: FloatElement>(a: F, rounding: fn(f64) -> f64) -> Expected {
    let value = rounding(a.to_f64());
    let lower = F::Bits::MIN.to_i128() as f64;
    let upper = F::Bits::MAX.to_i128() as f64 + 1.0;
    if value >= lower && value < upper {
        signed(value as i128)
    } else {
        signed(F::Bits::MIN.to_i128())
    }
}

/// Double to `i32` under the same out-of-range rule as [`to_int`].
#[allow(clippy::cast_possible_truncation)]
pub fn to_int32(x: f64, rounding: fn(f64) -> f64) -> Expected {
    let value = rounding(x);
    if value >= f64::from(i32::MIN) && value < -f64::from(i32::MIN) {
        Expected::of(value as i32)
    } else {
        Expected::of(i32::MIN)
    }
}

/// Payload of a quiet NaN built from `code`, read back.
pub fn nan_code_round_trip<F: FloatElement>(code: F::Bits) -> Expected {
    let payload = (1u64 << (F::MANTISSA_BITS - 1)) - 1;
    signed(i128::from(code.to_raw() & payload))
}

pub fn mul_add<F: FloatElement>(a: F, b: F, c: f64) -> Expected {
    Expected::wide(a.to_f64().mul_add(b.to_f64(), c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(3.5), 4.0);
        assert_eq!(round_half_even(-2.5), -2.0);
        assert_eq!(round_half_even(-3.5), -4.0);
        assert_eq!(round_half_even(0.49999999999999994), 0.0);
        assert!(round_half_even(-0.25).is_sign_negative());
        assert_eq!(round_half_even(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_maximum_minimum_propagate_nan() {
        assert!(matches!(maximum(f32::NAN, 5.0), Expected::Value(Scalar::Single(x)) if x.is_nan()));
        assert!(matches!(minimum(5.0f32, f32::NAN), Expected::Value(Scalar::Single(x)) if x.is_nan()));
        assert_eq!(maximum(-0.0f32, 0.0), Expected::of(0.0f32));
        assert_eq!(minimum(0.0f64, -0.0), Expected::of(-0.0f64));
    }

    #[test]
    fn test_classification_fields() {
        assert_eq!(is_nan(f16::from_bits(0x7C01)), Expected::bool(true));
        assert_eq!(is_nan(f16::from_bits(0x7C00)), Expected::bool(false));
        assert_eq!(is_inf(f32::NEG_INFINITY), Expected::bool(true));
        assert_eq!(is_subnormal(f64::from_bits(1)), Expected::bool(true));
        assert_eq!(is_zero_or_subnormal(-0.0f32), Expected::bool(true));
        assert_eq!(is_finite(f32::NAN), Expected::bool(false));
        assert_eq!(sign_bit(-0.0f64), Expected::bool(true));
    }

    #[test]
    fn test_exponent_and_fraction() {
        assert_eq!(exponent(0.75f32), Expected::of(-1i32));
        assert_eq!(exponent(f32::from_bits(0x3F7F_FFFF)), Expected::of(-1i32));
        assert_eq!(exponent(1024.0f64), Expected::of(10i64));
        assert_eq!(exponent(0.0f32), Expected::of(-127i32));
        assert_eq!(fraction(-6.0f32), Expected::wide(1.5));
    }

    #[test]
    fn test_to_int_range() {
        assert_eq!(to_int(2.5f32, round_half_even), Expected::of(2i32));
        assert_eq!(to_int(-2.7f64, f64::trunc), Expected::of(-2i64));
        assert_eq!(to_int(3.0e9f32, round_half_even), Expected::of(i32::MIN));
        assert_eq!(to_int(f32::NAN, f64::trunc), Expected::of(i32::MIN));
        assert_eq!(to_int32(-2_147_483_648.4, round_half_even), Expected::of(i32::MIN));
        assert_eq!(to_int32(2_147_483_647.6, round_half_even), Expected::of(i32::MIN));
        assert_eq!(to_int32(2_147_483_647.4, f64::trunc), Expected::of(i32::MAX));
    }

    #[test]
    fn test_nan_code() {
        assert_eq!(nan_code_round_trip::<f32>(0x7FFF_FFFF), Expected::of(0x3F_FFFFi32));
        assert_eq!(nan_code_round_trip::<f16>(5), Expected::of(5i16));
    }
}
