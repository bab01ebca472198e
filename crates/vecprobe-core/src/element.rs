//! Element types the harness can drive

use half::f16;
use std::fmt::Debug;
use std::ops::{Add, Neg, Sub};
use vecprobe_simd::{Bits, Float, Int, Lane, Num};

use crate::config::ElementType;
use crate::corpus::{self, CorpusProfile};
use crate::prng::Mwc;
use crate::random::Random;
use crate::scalar::{Expected, ToScalar};

/// A lane type with a corpus, a random synthesizer and a printable form.
pub trait Element: Lane + Random + ToScalar {
    const TYPE: ElementType;

    /// Conversion from a small integer constant.
    fn from_i64(value: i64) -> Self;

    /// Build the test data list for one operand.
    fn corpus(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<Self>;
}

/// Numeric elements with an exact wide type for reference arithmetic.
pub trait NumElement: Element + Num {
    type Wide: Copy
        + Debug
        + PartialOrd
        + Add<Output = Self::Wide>
        + Sub<Output = Self::Wide>
        + Neg<Output = Self::Wide>;

    fn to_wide(self) -> Self::Wide;

    /// Product of two wide values. Integer products wrap, since a 64-bit
    /// square can overflow `i128`; only the low lane bits are kept anyway.
    fn wide_mul(a: Self::Wide, b: Self::Wide) -> Self::Wide;

    /// Wrap (integers) or round (floats) a wide value into the lane type.
    fn from_wide(wide: Self::Wide) -> Self;

    /// Expected lane for a wide result. Integers wrap to the lane width,
    /// floats are rounded later by the comparator.
    fn expect(wide: Self::Wide) -> Expected;
}

/// Integer elements: references compute in `i128`.
pub trait IntElement: NumElement<Wide = i128> + Int {}

impl<T: NumElement<Wide = i128> + Int> IntElement for T {}

/// Floating point elements: references compute in `f64`.
pub trait FloatElement: NumElement<Wide = f64> + Float {}

impl<T: NumElement<Wide = f64> + Float> FloatElement for T {}

/// Boolean lanes.
pub trait BoolElement: Element + Bits {
    fn to_bool(self) -> bool;
    fn from_bool(value: bool) -> Self;
}

impl BoolElement for bool {
    fn to_bool(self) -> bool {
        self
    }

    fn from_bool(value: bool) -> Self {
        value
    }
}

macro_rules! int_element {
    ($($t:ty => $tag:ident),* $(,)?) => {$(
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;

            #[inline]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_i64(value: i64) -> Self {
                value as $t
            }

            fn corpus(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<Self> {
                corpus::integers(profile, rng)
            }
        }

        impl NumElement for $t {
            type Wide = i128;

            #[inline]
            fn to_wide(self) -> i128 {
                i128::from(self)
            }

            #[inline]
            fn wide_mul(a: i128, b: i128) -> i128 {
                a.wrapping_mul(b)
            }

            #[inline]
            fn from_wide(wide: i128) -> Self {
                <$t>::from_i128(wide)
            }

            #[inline]
            fn expect(wide: i128) -> Expected {
                Expected::of(<$t>::from_i128(wide))
            }
        }
    )*};
}

int_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

macro_rules! float_element {
    ($($t:ty => $tag:ident, $corpus:path, $from:expr);* $(;)?) => {$(
        impl Element for $t {
            const TYPE: ElementType = ElementType::$tag;

            #[inline]
            fn from_i64(value: i64) -> Self {
                let from: fn(i64) -> $t = $from;
                from(value)
            }

            fn corpus(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<Self> {
                $corpus(profile, rng)
            }
        }

        impl NumElement for $t {
            type Wide = f64;

            #[inline]
            fn to_wide(self) -> f64 {
                Float::to_f64(self)
            }

            #[inline]
            fn wide_mul(a: f64, b: f64) -> f64 {
                a * b
            }

            #[inline]
            fn from_wide(wide: f64) -> Self {
                <$t as Float>::from_f64(wide)
            }

            #[inline]
            fn expect(wide: f64) -> Expected {
                Expected::wide(wide)
            }
        }
    )*};
}

#[allow(clippy::cast_precision_loss)]
fn f64_from_i64(value: i64) -> f64 {
    value as f64
}

float_element! {
    f16 => F16, corpus::halves, |v| f16::from_f64(f64_from_i64(v));
    f32 => F32, corpus::floats, |v| f64_from_i64(v) as f32;
    f64 => F64, corpus::floats, f64_from_i64;
}

impl Element for bool {
    const TYPE: ElementType = ElementType::Bool;

    fn from_i64(value: i64) -> Self {
        value != 0
    }

    fn corpus(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<Self> {
        corpus::booleans(profile, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn test_int_expect_wraps() {
        assert_eq!(i8::expect(128), Expected::Value(Scalar::Signed(-128)));
        assert_eq!(u16::expect(-1), Expected::Value(Scalar::Unsigned(0xFFFF)));
    }

    #[test]
    fn test_float_expect_keeps_precision() {
        assert_eq!(f32::expect(0.1), Expected::Value(Scalar::Double(0.1)));
        assert_eq!(f16::from_i64(3).to_f32(), 3.0);
    }
}
