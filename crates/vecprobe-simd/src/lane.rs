//! Lane element traits
//!
//! A vector is an array of lanes. The traits in this module describe what a
//! lane type can do, so that every vector operation is written once and then
//! instantiated for each concrete element type.

use std::fmt::Debug;
use std::num::FpCategory;

use half::f16;

/// Mask with the low `bits` bits set.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Any value that can occupy a vector lane.
pub trait Lane: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Storage width in bits.
    const BITS: u32;

    /// Bit pattern of the lane, zero-extended to 64 bits.
    fn to_raw(self) -> u64;

    /// Rebuild a lane from the low `BITS` bits of `raw`.
    fn from_raw(raw: u64) -> Self;
}

/// Lanes with arithmetic.
///
/// Integer arithmetic wraps on overflow.
pub trait Num: Lane + PartialOrd {
    const ZERO: Self;
    const ONE: Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_neg(self) -> Self;
    fn lane_abs(self) -> Self;

    /// `self < rhs ? self : rhs`. An unordered pair yields `rhs`.
    #[inline]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    /// `self > rhs ? self : rhs`. An unordered pair yields `rhs`.
    #[inline]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }
}

/// Lanes with bitwise logic: integers and booleans.
pub trait Bits: Lane {
    fn lane_and(self, rhs: Self) -> Self;
    fn lane_or(self, rhs: Self) -> Self;
    fn lane_xor(self, rhs: Self) -> Self;
    fn lane_not(self) -> Self;
}

/// Integer lanes.
pub trait Int: Num + Bits + Eq + Ord {
    const SIGNED: bool;
    const MIN: Self;
    const MAX: Self;

    fn to_i128(self) -> i128;
    /// Truncating conversion: keeps the low `BITS` bits.
    fn from_i128(value: i128) -> Self;

    fn lane_add_saturated(self, rhs: Self) -> Self;
    fn lane_sub_saturated(self, rhs: Self) -> Self;
    fn lane_shl(self, count: u32) -> Self;
    /// Arithmetic shift for signed lanes, logical for unsigned.
    fn lane_shr(self, count: u32) -> Self;
    fn lane_rotl(self, count: u32) -> Self;
    /// Truncating division. `MIN / -1` wraps to `MIN`.
    fn lane_div(self, rhs: Self) -> Self;

    /// Absolute value clamped to `MAX`.
    #[inline]
    fn lane_abs_saturated(self) -> Self {
        let magnitude = self.lane_abs();
        if magnitude < Self::ZERO {
            Self::MAX
        } else {
            magnitude
        }
    }
}

/// Unary floating point functions evaluated lane by lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unary {
    Sqrt,
    Round,
    Trunc,
    Floor,
    Ceil,
    Exp,
    ExpM1,
    Exp2,
    Exp10,
    Ln,
    Ln1p,
    Log2,
    Log10,
    Cbrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
}

/// Floating point lanes.
pub trait Float: Num {
    /// Signed integer of the same width.
    type Bits: Int;

    const INFINITY: Self;
    const NAN: Self;
    const MAX_VALUE: Self;
    const MIN_POSITIVE: Self;
    const EXPONENT_BITS: u32;
    const MANTISSA_BITS: u32;

    fn to_bits_int(self) -> Self::Bits;
    fn from_bits_int(bits: Self::Bits) -> Self;
    fn to_f64(self) -> f64;
    /// Round-to-nearest-even conversion.
    fn from_f64(value: f64) -> Self;

    fn lane_div(self, rhs: Self) -> Self;
    fn lane_mul_add(self, mul: Self, add: Self) -> Self;
    fn classify_lane(self) -> FpCategory;

    fn eval(self, op: Unary) -> Self;
    fn lane_pow(self, exponent: Self) -> Self;
    fn lane_powi(self, exponent: i32) -> Self;
    fn lane_atan2(self, x: Self) -> Self;

    /// Reciprocal accurate to roughly 12 bits.
    fn approx_recipr(self) -> Self;
    /// Reciprocal square root accurate to roughly 12 bits.
    fn approx_rsqrt(self) -> Self;

    #[inline]
    fn is_nan_lane(self) -> bool {
        self.classify_lane() == FpCategory::Nan
    }

    #[inline]
    fn sign_negative(self) -> bool {
        (self.to_raw() >> (Self::BITS - 1)) & 1 == 1
    }
}

/// Lanes that extend losslessly into a lane twice as wide.
pub trait Widen: Lane {
    type Wide: Lane;
    fn widen(self) -> Self::Wide;
}

/// Lanes that convert down into a lane half as wide.
pub trait Narrow: Lane {
    type Narrow: Lane;
    /// Integers keep the low bits; floats round to nearest even.
    fn narrow(self) -> Self::Narrow;
    /// Integers clamp to the narrow range; floats behave as `narrow`.
    fn narrow_saturated(self) -> Self::Narrow;
}

/// Integer lanes with a floating point type of the same width.
pub trait ToFloat: Int {
    type Float: Float;
    fn to_float(self) -> Self::Float;
    fn to_double(self) -> f64;
    fn reinterpret_float(self) -> Self::Float;
}

macro_rules! int_lane {
    ($($t:ty => $signed:expr),* $(,)?) => {$(
        impl Lane for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn to_raw(self) -> u64 {
                (self as u64) & low_mask(Self::BITS)
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                raw as $t
            }
        }

        impl Num for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn lane_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline]
            fn lane_abs(self) -> Self {
                if self < Self::ZERO {
                    self.wrapping_neg()
                } else {
                    self
                }
            }
        }

        impl Bits for $t {
            #[inline]
            fn lane_and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline]
            fn lane_or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline]
            fn lane_xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline]
            fn lane_not(self) -> Self {
                !self
            }
        }

        impl Int for $t {
            const SIGNED: bool = $signed;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn to_i128(self) -> i128 {
                self as i128
            }

            #[inline]
            fn from_i128(value: i128) -> Self {
                value as $t
            }

            #[inline]
            fn lane_add_saturated(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            #[inline]
            fn lane_sub_saturated(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }

            #[inline]
            fn lane_shl(self, count: u32) -> Self {
                self.wrapping_shl(count)
            }

            #[inline]
            fn lane_shr(self, count: u32) -> Self {
                self.wrapping_shr(count)
            }

            #[inline]
            fn lane_rotl(self, count: u32) -> Self {
                self.rotate_left(count)
            }

            #[inline]
            fn lane_div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }
        }
    )*};
}

int_lane! {
    i8 => true,
    u8 => false,
    i16 => true,
    u16 => false,
    i32 => true,
    u32 => false,
    i64 => true,
    u64 => false,
}

impl Lane for bool {
    const BITS: u32 = 8;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        raw & 1 == 1
    }
}

impl Bits for bool {
    #[inline]
    fn lane_and(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline]
    fn lane_or(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline]
    fn lane_xor(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    fn lane_not(self) -> Self {
        !self
    }
}

fn eval_f64(x: f64, op: Unary) -> f64 {
    match op {
        Unary::Sqrt => x.sqrt(),
        Unary::Round => x.round_ties_even(),
        Unary::Trunc => x.trunc(),
        Unary::Floor => x.floor(),
        Unary::Ceil => x.ceil(),
        Unary::Exp => x.exp(),
        Unary::ExpM1 => x.exp_m1(),
        Unary::Exp2 => x.exp2(),
        Unary::Exp10 => 10f64.powf(x),
        Unary::Ln => x.ln(),
        Unary::Ln1p => x.ln_1p(),
        Unary::Log2 => x.log2(),
        Unary::Log10 => x.log10(),
        Unary::Cbrt => x.cbrt(),
        Unary::Sin => x.sin(),
        Unary::Cos => x.cos(),
        Unary::Tan => x.tan(),
        Unary::Asin => x.asin(),
        Unary::Acos => x.acos(),
        Unary::Atan => x.atan(),
        Unary::Sinh => x.sinh(),
        Unary::Cosh => x.cosh(),
        Unary::Tanh => x.tanh(),
        Unary::Asinh => x.asinh(),
        Unary::Acosh => x.acosh(),
        Unary::Atanh => x.atanh(),
    }
}

macro_rules! float_lane {
    ($t:ty, $bits:ty, $raw:ty, exponent = $exp:expr, approx_mask = $approx:expr) => {
        impl Lane for $t {
            const BITS: u32 = <$raw>::BITS;

            #[inline]
            fn to_raw(self) -> u64 {
                u64::from(self.to_bits())
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                <$t>::from_bits(raw as $raw)
            }
        }

        impl Num for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline]
            fn lane_abs(self) -> Self {
                <$t>::abs(self)
            }
        }

        impl Float for $t {
            type Bits = $bits;

            const INFINITY: Self = <$t>::INFINITY;
            const NAN: Self = <$t>::NAN;
            const MAX_VALUE: Self = <$t>::MAX;
            const MIN_POSITIVE: Self = <$t>::MIN_POSITIVE;
            const EXPONENT_BITS: u32 = $exp;
            const MANTISSA_BITS: u32 = <$t>::MANTISSA_DIGITS - 1;

            #[inline]
            fn to_bits_int(self) -> $bits {
                self.to_bits() as $bits
            }

            #[inline]
            fn from_bits_int(bits: $bits) -> Self {
                <$t>::from_bits(bits as $raw)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn lane_mul_add(self, mul: Self, add: Self) -> Self {
                <$t>::mul_add(self, mul, add)
            }

            #[inline]
            fn classify_lane(self) -> FpCategory {
                <$t>::classify(self)
            }

            /// Evaluated in double precision and rounded once to the lane type.
            #[inline]
            fn eval(self, op: Unary) -> Self {
                <$t as Float>::from_f64(eval_f64(f64::from(self), op))
            }

            #[inline]
            fn lane_pow(self, exponent: Self) -> Self {
                <$t as Float>::from_f64(f64::from(self).powf(f64::from(exponent)))
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn lane_powi(self, exponent: i32) -> Self {
                f64::from(self).powi(exponent) as $t
            }

            #[inline]
            fn lane_atan2(self, x: Self) -> Self {
                <$t as Float>::from_f64(f64::from(self).atan2(f64::from(x)))
            }

            #[inline]
            fn approx_recipr(self) -> Self {
                <$t>::from_bits((1.0 / self).to_bits() & !$approx)
            }

            #[inline]
            fn approx_rsqrt(self) -> Self {
                <$t>::from_bits((1.0 / <$t>::sqrt(self)).to_bits() & !$approx)
            }
        }
    };
}

float_lane!(f32, i32, u32, exponent = 8, approx_mask = 0x0FFF);
float_lane!(f64, i64, u64, exponent = 11, approx_mask = 0);

impl Lane for f16 {
    const BITS: u32 = 16;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        f16::from_bits(raw as u16)
    }
}

// Half precision arithmetic goes through f32, which is exact enough that
// the final rounding step is the only one that matters.
impl Num for f16 {
    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;

    #[inline]
    fn lane_add(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() + rhs.to_f32())
    }

    #[inline]
    fn lane_sub(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() - rhs.to_f32())
    }

    #[inline]
    fn lane_mul(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() * rhs.to_f32())
    }

    #[inline]
    fn lane_neg(self) -> Self {
        f16::from_bits(self.to_bits() ^ 0x8000)
    }

    #[inline]
    fn lane_abs(self) -> Self {
        f16::from_bits(self.to_bits() & 0x7FFF)
    }
}

impl Float for f16 {
    type Bits = i16;

    const INFINITY: Self = f16::INFINITY;
    const NAN: Self = f16::NAN;
    const MAX_VALUE: Self = f16::MAX;
    const MIN_POSITIVE: Self = f16::MIN_POSITIVE;
    const EXPONENT_BITS: u32 = 5;
    const MANTISSA_BITS: u32 = 10;

    #[inline]
    fn to_bits_int(self) -> i16 {
        self.to_bits() as i16
    }

    #[inline]
    fn from_bits_int(bits: i16) -> Self {
        f16::from_bits(bits as u16)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        f16::from_f64(value)
    }

    #[inline]
    fn lane_div(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() / rhs.to_f32())
    }

    #[inline]
    fn lane_mul_add(self, mul: Self, add: Self) -> Self {
        f16::from_f32(self.to_f32().mul_add(mul.to_f32(), add.to_f32()))
    }

    #[inline]
    fn classify_lane(self) -> FpCategory {
        self.classify()
    }

    #[inline]
    fn eval(self, op: Unary) -> Self {
        f16::from_f32(self.to_f32().eval(op))
    }

    #[inline]
    fn lane_pow(self, exponent: Self) -> Self {
        f16::from_f32(self.to_f32().powf(exponent.to_f32()))
    }

    #[inline]
    fn lane_powi(self, exponent: i32) -> Self {
        f16::from_f32(self.to_f32().powi(exponent))
    }

    #[inline]
    fn lane_atan2(self, x: Self) -> Self {
        f16::from_f32(self.to_f32().atan2(x.to_f32()))
    }

    #[inline]
    fn approx_recipr(self) -> Self {
        f16::from_f32(1.0 / self.to_f32())
    }

    #[inline]
    fn approx_rsqrt(self) -> Self {
        f16::from_f32(1.0 / self.to_f32().sqrt())
    }
}

macro_rules! widen_int {
    ($($narrow:ty => $wide:ty),* $(,)?) => {$(
        impl Widen for $narrow {
            type Wide = $wide;

            #[inline]
            fn widen(self) -> $wide {
                <$wide>::from(self)
            }
        }

        impl Narrow for $wide {
            type Narrow = $narrow;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn narrow(self) -> $narrow {
                self as $narrow
            }

            #[inline]
            fn narrow_saturated(self) -> $narrow {
                self.clamp(<$wide>::from(<$narrow>::MIN), <$wide>::from(<$narrow>::MAX)) as $narrow
            }
        }
    )*};
}

widen_int! {
    i8 => i16,
    u8 => u16,
    i16 => i32,
    u16 => u32,
    i32 => i64,
    u32 => u64,
}

impl Widen for f16 {
    type Wide = f32;

    #[inline]
    fn widen(self) -> f32 {
        self.to_f32()
    }
}

impl Widen for f32 {
    type Wide = f64;

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }
}

impl Narrow for f32 {
    type Narrow = f16;

    #[inline]
    fn narrow(self) -> f16 {
        f16::from_f32(self)
    }

    #[inline]
    fn narrow_saturated(self) -> f16 {
        f16::from_f32(self)
    }
}

impl Narrow for f64 {
    type Narrow = f32;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn narrow(self) -> f32 {
        self as f32
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn narrow_saturated(self) -> f32 {
        self as f32
    }
}

macro_rules! int_to_float {
    ($($int:ty => $float:ty, $bits:ty, via $convert:expr);* $(;)?) => {$(
        impl ToFloat for $int {
            type Float = $float;

            #[inline]
            fn to_float(self) -> $float {
                let convert: fn($int) -> $float = $convert;
                convert(self)
            }

            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn to_double(self) -> f64 {
                self as f64
            }

            #[inline]
            fn reinterpret_float(self) -> $float {
                <$float>::from_bits(self as $bits)
            }
        }
    )*};
}

#[allow(clippy::cast_precision_loss)]
fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

#[allow(clippy::cast_precision_loss)]
fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

int_to_float! {
    i16 => f16, u16, via |v| f16::from_f32(f32::from(v));
    u16 => f16, u16, via |v| f16::from_f32(f32::from(v));
    i32 => f32, u32, via |v| v as f32;
    u32 => f32, u32, via |v| v as f32;
    i64 => f64, u64, via i64_to_f64;
    u64 => f64, u64, via u64_to_f64;
}
