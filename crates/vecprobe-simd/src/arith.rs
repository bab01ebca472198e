//! Arithmetic, comparison and horizontal reductions

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::lane::{Bits, Float, Int, Num, Unary};
use crate::vector::{Mask, Simd};

macro_rules! lane_op {
    ($trait:ident, $method:ident, $bound:ident, $lane:ident) => {
        impl<T: $bound, const N: usize> $trait for Simd<T, N> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                self.zip(rhs, T::$lane)
            }
        }
    };
}

lane_op!(Add, add, Num, lane_add);
lane_op!(Sub, sub, Num, lane_sub);
lane_op!(Mul, mul, Num, lane_mul);
lane_op!(BitAnd, bitand, Bits, lane_and);
lane_op!(BitOr, bitor, Bits, lane_or);
lane_op!(BitXor, bitxor, Bits, lane_xor);

impl<T: Float, const N: usize> Div for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, Float::lane_div)
    }
}

impl<T: Num, const N: usize> Neg for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(T::lane_neg)
    }
}

impl<T: Bits, const N: usize> Not for Simd<T, N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.map(T::lane_not)
    }
}

impl<T: Bits, const N: usize> Simd<T, N> {
    /// `self & !rhs`
    #[must_use]
    pub fn andnot(self, rhs: Self) -> Self {
        self & !rhs
    }
}

impl<T: Num, const N: usize> Simd<T, N> {
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_min)
    }

    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_max)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        self.map(T::lane_abs)
    }

    /// Lanewise `mask ? a : b`.
    pub fn select(mask: Mask<N>, a: Self, b: Self) -> Self {
        let mut out = b;
        for (n, &take) in mask.0.iter().enumerate() {
            if take {
                out.0[n] = a.0[n];
            }
        }
        out
    }

    #[must_use]
    pub fn if_add(self, mask: Mask<N>, rhs: Self) -> Self {
        Self::select(mask, self + rhs, self)
    }

    #[must_use]
    pub fn if_sub(self, mask: Mask<N>, rhs: Self) -> Self {
        Self::select(mask, self - rhs, self)
    }

    #[must_use]
    pub fn if_mul(self, mask: Mask<N>, rhs: Self) -> Self {
        Self::select(mask, self * rhs, self)
    }

    pub fn simd_lt(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a < b)
    }

    pub fn simd_le(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a <= b)
    }

    pub fn simd_eq(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a == b)
    }

    pub fn simd_ne(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a != b)
    }

    pub fn simd_ge(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a >= b)
    }

    pub fn simd_gt(self, rhs: Self) -> Mask<N> {
        self.zip(rhs, |a, b| a > b)
    }

    /// Sum of all lanes, accumulated in lane order.
    pub fn horizontal_add(self) -> T {
        self.0[1..].iter().fold(self.0[0], |acc, &x| acc.lane_add(x))
    }

    /// Smallest lane. A NaN lane propagates.
    pub fn horizontal_min(self) -> T {
        self.0[1..].iter().fold(self.0[0], |acc, &x| {
            if unordered(acc) {
                acc
            } else if unordered(x) || x < acc {
                x
            } else {
                acc
            }
        })
    }

    /// Largest lane. A NaN lane propagates.
    pub fn horizontal_max(self) -> T {
        self.0[1..].iter().fold(self.0[0], |acc, &x| {
            if unordered(acc) {
                acc
            } else if unordered(x) || x > acc {
                x
            } else {
                acc
            }
        })
    }
}

/// True only for NaN.
#[inline]
#[allow(clippy::eq_op)]
fn unordered<T: PartialEq>(x: T) -> bool {
    x != x
}

impl<T: Int, const N: usize> Simd<T, N> {
    #[must_use]
    pub fn add_saturated(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_add_saturated)
    }

    #[must_use]
    pub fn sub_saturated(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_sub_saturated)
    }

    #[must_use]
    pub fn abs_saturated(self) -> Self {
        self.map(T::lane_abs_saturated)
    }

    #[must_use]
    pub fn shl(self, count: u32) -> Self {
        self.map(|x| x.lane_shl(count))
    }

    #[must_use]
    pub fn shr(self, count: u32) -> Self {
        self.map(|x| x.lane_shr(count))
    }

    #[must_use]
    pub fn rotate_left(self, count: u32) -> Self {
        self.map(|x| x.lane_rotl(count))
    }

    /// Divide every lane by the same divisor.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    #[must_use]
    pub fn div_scalar(self, divisor: T) -> Self {
        self.map(|x| x.lane_div(divisor))
    }

    /// Sum of all lanes without overflow, for lanes narrower than 64 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_add_x(self) -> i64 {
        self.0.iter().map(|x| x.to_i128()).sum::<i128>() as i64
    }
}

impl<T: Float, const N: usize> Simd<T, N> {
    fn sign_mask() -> u64 {
        1u64 << (T::BITS - 1)
    }

    /// Larger lane; NaN propagates and `+0` beats `-0`.
    #[must_use]
    pub fn maximum(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| {
            if a.is_nan_lane() || a > b {
                a
            } else if b.is_nan_lane() || b > a || a.sign_negative() {
                b
            } else {
                a
            }
        })
    }

    /// Smaller lane; NaN propagates and `-0` beats `+0`.
    #[must_use]
    pub fn minimum(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| {
            if a.is_nan_lane() || a < b {
                a
            } else if b.is_nan_lane() || b < a || !a.sign_negative() {
                b
            } else {
                a
            }
        })
    }

    /// `self` with its sign flipped wherever `rhs` has the sign bit set.
    #[must_use]
    pub fn sign_combine(self, rhs: Self) -> Self {
        let sign = Self::sign_mask();
        self.zip(rhs, |a, b| T::from_raw(a.to_raw() ^ (b.to_raw() & sign)))
    }

    /// Flip the sign of the lanes selected by `mask`.
    #[must_use]
    pub fn change_sign(self, mask: Mask<N>) -> Self {
        let sign = Self::sign_mask();
        let mut out = self;
        for (lane, &flip) in out.0.iter_mut().zip(&mask.0) {
            if flip {
                *lane = T::from_raw(lane.to_raw() ^ sign);
            }
        }
        out
    }

    #[must_use]
    pub fn if_div(self, mask: Mask<N>, rhs: Self) -> Self {
        Self::select(mask, self / rhs, self)
    }

    pub fn sign_bit(self) -> Mask<N> {
        self.map(Float::sign_negative)
    }

    #[must_use]
    pub fn square(self) -> Self {
        self * self
    }

    #[must_use]
    pub fn infinite() -> Self {
        Self::splat(T::INFINITY)
    }

    #[must_use]
    pub fn mul_add(self, mul: Self, add: Self) -> Self {
        let mut out = self;
        for n in 0..N {
            out.0[n] = self.0[n].lane_mul_add(mul.0[n], add.0[n]);
        }
        out
    }

    /// `self * mul - sub` with a single rounding.
    #[must_use]
    pub fn mul_sub(self, mul: Self, sub: Self) -> Self {
        self.mul_add(mul, -sub)
    }

    /// `-(self * mul) + add` with a single rounding.
    #[must_use]
    pub fn nmul_add(self, mul: Self, add: Self) -> Self {
        (-self).mul_add(mul, add)
    }

    /// `self * mul - sub` computed with extra precision.
    #[must_use]
    pub fn mul_sub_x(self, mul: Self, sub: Self) -> Self {
        self.mul_sub(mul, sub)
    }

    #[must_use]
    pub fn apply(self, op: Unary) -> Self {
        self.map(|x| x.eval(op))
    }

    #[must_use]
    pub fn sqrt(self) -> Self {
        self.apply(Unary::Sqrt)
    }

    /// Round to nearest, ties to even.
    #[must_use]
    pub fn round(self) -> Self {
        self.apply(Unary::Round)
    }

    #[must_use]
    pub fn truncate(self) -> Self {
        self.apply(Unary::Trunc)
    }

    #[must_use]
    pub fn floor(self) -> Self {
        self.apply(Unary::Floor)
    }

    #[must_use]
    pub fn ceil(self) -> Self {
        self.apply(Unary::Ceil)
    }

    #[must_use]
    pub fn approx_recipr(self) -> Self {
        self.map(Float::approx_recipr)
    }

    #[must_use]
    pub fn approx_rsqrt(self) -> Self {
        self.map(Float::approx_rsqrt)
    }

    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        self.zip(exponent, Float::lane_pow)
    }

    #[must_use]
    pub fn pow_scalar(self, exponent: T) -> Self {
        self.map(|x| x.lane_pow(exponent))
    }

    #[must_use]
    pub fn powi(self, exponent: i32) -> Self {
        self.map(|x| x.lane_powi(exponent))
    }

    /// `self` raised to `numerator / denominator`. Negative bases are
    /// allowed when the denominator is odd.
    #[must_use]
    pub fn pow_ratio(self, numerator: i32, denominator: i32) -> Self {
        let ratio = T::from_f64(f64::from(numerator) / f64::from(denominator));
        let odd_root = denominator % 2 != 0;
        let odd_power = numerator % 2 != 0;
        self.map(|x| {
            if x < T::ZERO && odd_root {
                let magnitude = x.lane_abs().lane_pow(ratio);
                if odd_power {
                    magnitude.lane_neg()
                } else {
                    magnitude
                }
            } else {
                x.lane_pow(ratio)
            }
        })
    }

    #[must_use]
    pub fn atan2(self, x: Self) -> Self {
        self.zip(x, Float::lane_atan2)
    }
}

macro_rules! math_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        impl<T: Float, const N: usize> Simd<T, N> {
            $(
                #[must_use]
                pub fn $name(self) -> Self {
                    self.apply(Unary::$op)
                }
            )*
        }
    };
}

math_fns! {
    exp => Exp,
    expm1 => ExpM1,
    exp2 => Exp2,
    exp10 => Exp10,
    log => Ln,
    log1p => Ln1p,
    log2 => Log2,
    log10 => Log10,
    cbrt => Cbrt,
    sin => Sin,
    cos => Cos,
    tan => Tan,
    asin => Asin,
    acos => Acos,
    atan => Atan,
    sinh => Sinh,
    cosh => Cosh,
    tanh => Tanh,
    asinh => Asinh,
    acosh => Acosh,
    atanh => Atanh,
}
