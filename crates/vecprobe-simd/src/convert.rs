//! Conversions between lane types and vector widths

use crate::lane::{low_mask, Float, Int, Lane, Narrow, Num, ToFloat, Unary, Widen};
use crate::vector::{Simd, Widths};

/// Round-to-int result for values the target cannot hold.
fn int_or_min<I: Int>(value: f64) -> I {
    #[allow(clippy::cast_precision_loss)]
    let lower = I::MIN.to_i128() as f64;
    #[allow(clippy::cast_precision_loss)]
    let upper = I::MAX.to_i128() as f64 + 1.0;
    if value >= lower && value < upper {
        #[allow(clippy::cast_possible_truncation)]
        I::from_i128(value as i128)
    } else {
        I::MIN
    }
}

impl<T: Widen, const N: usize> Simd<T, N> {
    /// Every lane widened; the vector doubles in size.
    pub fn extend(self) -> Simd<T::Wide, N> {
        self.map(Widen::widen)
    }

    pub fn extend_low<const M: usize>(self) -> Simd<T::Wide, M> {
        let () = Widths::<N, M>::HALF;
        let mut out = [T::Wide::default(); M];
        for (dst, &src) in out.iter_mut().zip(&self.0[..M]) {
            *dst = src.widen();
        }
        Simd(out)
    }

    pub fn extend_high<const M: usize>(self) -> Simd<T::Wide, M> {
        let () = Widths::<N, M>::HALF;
        let mut out = [T::Wide::default(); M];
        for (dst, &src) in out.iter_mut().zip(&self.0[M..]) {
            *dst = src.widen();
        }
        Simd(out)
    }

    /// Reinterpret the vector's bits as lanes twice as wide.
    pub fn bitcast_wide<const M: usize>(self) -> Simd<T::Wide, M> {
        let () = Widths::<N, M>::HALF;
        let mut out = [T::Wide::default(); M];
        for (k, dst) in out.iter_mut().enumerate() {
            let low = self.0[2 * k].to_raw();
            let high = self.0[2 * k + 1].to_raw();
            *dst = T::Wide::from_raw(low | (high << T::BITS));
        }
        Simd(out)
    }
}

impl<T: Narrow, const N: usize> Simd<T, N> {
    /// Every lane narrowed; the vector halves in size.
    pub fn compress(self) -> Simd<T::Narrow, N> {
        self.map(Narrow::narrow)
    }

    /// Narrow two vectors into one with twice the lanes.
    pub fn compress_pair<const M: usize>(self, high: Self) -> Simd<T::Narrow, M> {
        let () = Widths::<N, M>::DOUBLE;
        let mut out = [T::Narrow::default(); M];
        for (n, dst) in out.iter_mut().enumerate() {
            let src = if n < N { self.0[n] } else { high.0[n - N] };
            *dst = src.narrow();
        }
        Simd(out)
    }

    pub fn compress_saturated<const M: usize>(self, high: Self) -> Simd<T::Narrow, M> {
        let () = Widths::<N, M>::DOUBLE;
        let mut out = [T::Narrow::default(); M];
        for (n, dst) in out.iter_mut().enumerate() {
            let src = if n < N { self.0[n] } else { high.0[n - N] };
            *dst = src.narrow_saturated();
        }
        Simd(out)
    }
}

impl<T: ToFloat, const N: usize> Simd<T, N> {
    pub fn to_float(self) -> Simd<T::Float, N> {
        self.map(ToFloat::to_float)
    }

    pub fn to_double(self) -> Simd<f64, N> {
        self.map(ToFloat::to_double)
    }

    pub fn reinterpret_float(self) -> Simd<T::Float, N> {
        self.map(ToFloat::reinterpret_float)
    }
}

impl<T: Float, const N: usize> Simd<T, N> {
    pub fn reinterpret_int(self) -> Simd<T::Bits, N> {
        self.map(Float::to_bits_int)
    }

    /// Round to the nearest integer of the same width, ties to even.
    /// Out-of-range and NaN lanes give the integer minimum.
    pub fn roundi(self) -> Simd<T::Bits, N> {
        self.map(|x| int_or_min(x.eval(Unary::Round).to_f64()))
    }

    pub fn truncatei(self) -> Simd<T::Bits, N> {
        self.map(|x| int_or_min(x.eval(Unary::Trunc).to_f64()))
    }

    /// Unbiased exponent field.
    pub fn exponent(self) -> Simd<T::Bits, N> {
        let field = (1u64 << T::EXPONENT_BITS) - 1;
        let bias = i128::from(field >> 1);
        self.map(|x| {
            let biased = (x.to_raw() >> T::MANTISSA_BITS) & field;
            T::Bits::from_i128(i128::from(biased) - bias)
        })
    }

    /// Mantissa with the exponent forced to zero, in `[1, 2)`.
    pub fn fraction(self) -> Self {
        let mantissa = (1u64 << T::MANTISSA_BITS) - 1;
        let one = ((1u64 << (T::EXPONENT_BITS - 1)) - 1) << T::MANTISSA_BITS;
        self.map(|x| T::from_raw((x.to_raw() & mantissa) | one))
    }

    /// NaN payload without the quiet bit; zero for non-NaN lanes.
    pub fn nan_code(self) -> Simd<T::Bits, N> {
        let payload = (1u64 << (T::MANTISSA_BITS - 1)) - 1;
        self.map(|x| {
            if x.is_nan_lane() {
                T::Bits::from_i128(i128::from(x.to_raw() & payload))
            } else {
                T::Bits::ZERO
            }
        })
    }

    /// Quiet NaN lanes carrying the payload bits of `code`.
    pub fn nan_with_code(code: Simd<T::Bits, N>) -> Self {
        let payload = (1u64 << (T::MANTISSA_BITS - 1)) - 1;
        let quiet = low_mask(T::EXPONENT_BITS + 1) << (T::MANTISSA_BITS - 1);
        code.map(|c| T::from_raw(quiet | (c.to_raw() & payload)))
    }

    pub fn is_finite(self) -> Simd<bool, N> {
        self.map(|x| !matches!(x.classify_lane(), std::num::FpCategory::Nan | std::num::FpCategory::Infinite))
    }

    pub fn is_inf(self) -> Simd<bool, N> {
        self.map(|x| x.classify_lane() == std::num::FpCategory::Infinite)
    }

    pub fn is_nan(self) -> Simd<bool, N> {
        self.map(Float::is_nan_lane)
    }

    pub fn is_subnormal(self) -> Simd<bool, N> {
        self.map(|x| x.classify_lane() == std::num::FpCategory::Subnormal)
    }

    pub fn is_zero_or_subnormal(self) -> Simd<bool, N> {
        self.map(|x| {
            matches!(x.classify_lane(), std::num::FpCategory::Zero | std::num::FpCategory::Subnormal)
        })
    }
}

impl<const N: usize> Simd<f64, N> {
    pub fn round_to_int32(self) -> Simd<i32, N> {
        self.map(|x| int_or_min(x.round_ties_even()))
    }

    pub fn truncate_to_int32(self) -> Simd<i32, N> {
        self.map(|x| int_or_min(x.trunc()))
    }

    /// Round two vectors into one `i32` vector with twice the lanes.
    pub fn round_to_int32_pair<const M: usize>(self, high: Self) -> Simd<i32, M> {
        self.round_to_int32().concat(high.round_to_int32())
    }

    pub fn truncate_to_int32_pair<const M: usize>(self, high: Self) -> Simd<i32, M> {
        self.truncate_to_int32().concat(high.truncate_to_int32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_extend_halves() {
        let v = Simd::from_array([-1i8, 2, -3, 4]);
        let low: Simd<i16, 2> = v.extend_low();
        let high: Simd<i16, 2> = v.extend_high();
        assert_eq!(low.to_array(), [-1, 2]);
        assert_eq!(high.to_array(), [-3, 4]);
        assert_eq!(v.extend().to_array(), [-1i16, 2, -3, 4]);
    }

    #[test]
    fn test_bitcast_wide_is_little_endian() {
        let v = Simd::from_array([0x34u8, 0x12, 0xFF, 0x00]);
        let wide: Simd<u16, 2> = v.bitcast_wide();
        assert_eq!(wide.to_array(), [0x1234, 0x00FF]);
    }

    #[test]
    fn test_compress_variants() {
        let a = Simd::from_array([300i16, -300]);
        let b = Simd::from_array([5i16, 0x1234]);
        let plain: Simd<i8, 4> = a.compress_pair(b);
        assert_eq!(plain.to_array(), [44, -44, 5, 0x34]);
        let sat: Simd<i8, 4> = a.compress_saturated(b);
        assert_eq!(sat.to_array(), [127, -128, 5, 127]);
    }

    #[test]
    fn test_roundi_ties_and_overflow() {
        let v = Simd::from_array([2.5f32, 3.5, -2.5, 3e9]);
        assert_eq!(v.roundi().to_array(), [2, 4, -2, i32::MIN]);
        let nan = Simd::from_array([f32::NAN, 1.9]);
        assert_eq!(nan.truncatei().to_array(), [i32::MIN, 1]);
    }

    #[test]
    fn test_exponent_and_fraction() {
        let v = Simd::from_array([8.0f32, 0.75, 1.0, -3.0]);
        assert_eq!(v.exponent().to_array(), [3, -1, 0, 1]);
        assert_eq!(v.fraction().to_array(), [1.0, 1.5, 1.0, 1.5]);
    }

    #[test]
    fn test_nan_code_round_trip() {
        let code = Simd::from_array([0i32, 1, 0x1234, -1]);
        let nan = Simd::<f32, 4>::nan_with_code(code);
        assert!(nan.is_nan().horizontal_and());
        assert_eq!(nan.nan_code().to_array(), [0, 1, 0x1234, 0x3F_FFFF]);
    }

    #[test]
    fn test_half_classification() {
        let v = Simd::from_array([
            f16::from_bits(0x7C01),
            f16::from_bits(0x0001),
            f16::INFINITY,
            f16::from_bits(0x8000),
        ]);
        assert_eq!(v.is_nan().to_array(), [true, false, false, false]);
        assert_eq!(v.is_subnormal().to_array(), [false, true, false, false]);
        assert_eq!(v.is_finite().to_array(), [false, true, false, true]);
        assert_eq!(v.is_zero_or_subnormal().to_array(), [false, true, false, true]);
    }

    #[test]
    fn test_double_to_int32_pair() {
        let a = Simd::from_array([0.5f64, 1.5]);
        let b = Simd::from_array([-0.5f64, 1e12]);
        let r: Simd<i32, 4> = a.round_to_int32_pair(b);
        assert_eq!(r.to_array(), [0, 2, 0, i32::MIN]);
    }
}
