//! Conversion references
//!
//! Bit casts go through an explicit little-endian byte buffer so the
//! reference never relies on the numeric conversion it is checking.
//! Half precision conversions are done in software on raw bit patterns.

use half::f16;
use vecprobe_simd::Lane;

use crate::element::{Element, IntElement};
use crate::scalar::Expected;

/// Little-endian bytes of a lane
pub fn to_le_bytes<T: Lane>(x: T) -> Vec<u8> {
    let width = (T::BITS / 8) as usize;
    x.to_raw().to_le_bytes()[..width].to_vec()
}

/// Lane rebuilt from little-endian bytes; extra bytes are ignored.
pub fn from_le_bytes<T: Lane>(bytes: &[u8]) -> T {
    let width = (T::BITS / 8) as usize;
    let raw = bytes
        .iter()
        .take(width)
        .enumerate()
        .fold(0u64, |acc, (k, &byte)| acc | (u64::from(byte) << (8 * k)));
    T::from_raw(raw)
}

/// Reinterpret a lane as another lane of the same width.
pub fn reinterpret<T: Lane, U: Element>(x: T) -> Expected {
    Expected::of(from_le_bytes::<U>(&to_le_bytes(x)))
}

/// Reinterpret two adjacent lanes as one lane twice as wide.
pub fn bitcast_pair<T: Lane, U: Element>(low: T, high: T) -> Expected {
    let mut bytes = to_le_bytes(low);
    bytes.extend(to_le_bytes(high));
    Expected::of(from_le_bytes::<U>(&bytes))
}

/// Integer narrowing keeps the low bytes.
pub fn truncate<T: IntElement, U: Element>(x: T) -> Expected {
    Expected::of(from_le_bytes::<U>(&to_le_bytes(x)))
}

/// Integer narrowing clamped to the narrow range.
pub fn saturate<T: IntElement, U: IntElement>(x: T) -> Expected {
    let clamped = x.to_i128().clamp(U::MIN.to_i128(), U::MAX.to_i128());
    Expected::of(U::from_i128(clamped))
}

/// Numeric value of a lane, exact for every integer and float lane.
pub fn value<T: Element>(x: T) -> Expected {
    Expected::Value(x.to_scalar())
}

/// Integer to floating point with a single rounding.
#[allow(clippy::cast_precision_loss)]
pub fn int_to_float<T: IntElement>(x: T) -> Expected {
    Expected::wide(x.to_i128() as f64)
}

/// Single to half precision, round to nearest even. NaN stays quiet NaN
/// with the top payload bits kept.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn f32_to_f16_bits(x: f32) -> u16 {
    let bits = x.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x7F_FFFF;

    if exponent == 0xFF {
        let payload = if mantissa == 0 {
            0
        } else {
            0x200 | (mantissa >> 13) as u16
        };
        return sign | 0x7C00 | payload;
    }
    let biased = exponent - 127 + 15;
    if biased >= 0x1F {
        return sign | 0x7C00;
    }
    if biased <= 0 {
        if biased < -10 {
            return sign;
        }
        // Subnormal result: shift the implicit bit into the mantissa.
        let significand = mantissa | 0x80_0000;
        let shift = (14 - biased) as u32;
        let half = 1u32 << (shift - 1);
        let rest = significand & ((1u32 << shift) - 1);
        let mut result = significand >> shift;
        if rest > half || (rest == half && result & 1 == 1) {
            result += 1;
        }
        return sign | result as u16;
    }
    let mut result = ((biased as u32) << 10) | (mantissa >> 13);
    let rest = mantissa & 0x1FFF;
    // A carry out of the mantissa bumps the exponent, up to infinity.
    if rest > 0x1000 || (rest == 0x1000 && result & 1 == 1) {
        result += 1;
    }
    sign | result as u16
}

/// Half to single precision; exact for every pattern.
#[allow(clippy::cast_precision_loss)]
pub fn f16_bits_to_f32(h: u16) -> f32 {
    let negative = h & 0x8000 != 0;
    let exponent = u32::from((h >> 10) & 0x1F);
    let mantissa = u32::from(h & 0x3FF);
    let magnitude = match (exponent, mantissa) {
        (0, m) => m as f32 * 2f32.powi(-24),
        (0x1F, 0) => f32::INFINITY,
        (0x1F, m) => f32::from_bits(0x7FC0_0000 | (m << 13)),
        (e, m) => f32::from_bits(((e + 112) << 23) | (m << 13)),
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

pub fn single_to_half(x: f32) -> Expected {
    Expected::of(f16::from_bits(f32_to_f16_bits(x)))
}

pub fn half_to_single(h: f16) -> Expected {
    Expected::of(f16_bits_to_f32(h.to_bits()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn test_byte_buffer_casts() {
        assert_eq!(reinterpret::<f32, i32>(1.0), Expected::of(0x3F80_0000i32));
        assert_eq!(reinterpret::<i16, f16>(0x3C00), Expected::of(f16::ONE));
        assert_eq!(bitcast_pair::<u16, u32>(0x5678, 0x1234), Expected::of(0x1234_5678u32));
        assert_eq!(truncate::<i32, i16>(0x0001_8000), Expected::of(i16::MIN));
        assert_eq!(saturate::<i32, i16>(0x0001_8000), Expected::of(i16::MAX));
        assert_eq!(saturate::<u16, u8>(300), Expected::of(255u8));
    }

    #[test]
    fn test_int_to_float_rounds_once() {
        assert_eq!(int_to_float(-3i32), Expected::wide(-3.0));
        assert_eq!(int_to_float(u64::MAX), Expected::Value(Scalar::Double(u64::MAX as f64)));
    }

    #[test]
    fn test_half_conversion_matches_library() {
        let samples = [
            0.0f32, -0.0, 1.0, 1.5, 65504.0, 65520.0, 1.0e6, 6.1e-5, 5.96e-8, 2.98e-8, 1.0e-9,
            -2.5e-6, f32::INFINITY, f32::NEG_INFINITY, 0.1, 3.25,
        ];
        for x in samples {
            assert_eq!(f32_to_f16_bits(x), f16::from_f32(x).to_bits(), "{x:e}");
        }
        assert!(f16::from_bits(f32_to_f16_bits(f32::NAN)).is_nan());
    }

    #[test]
    fn test_half_widening_is_exact() {
        for bits in (0..=u16::MAX).step_by(7) {
            let h = f16::from_bits(bits);
            if h.is_nan() {
                assert!(f16_bits_to_f32(bits).is_nan());
            } else {
                assert_eq!(f16_bits_to_f32(bits), h.to_f32(), "{bits:#06x}");
            }
        }
    }
}
