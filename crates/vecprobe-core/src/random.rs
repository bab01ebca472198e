//! Typed random values drawn from the generator

use half::f16;

use crate::prng::Mwc;

/// Values that can be synthesized from raw generator output.
pub trait Random: Sized {
    fn random(rng: &mut Mwc) -> Self;
}

macro_rules! random_narrow_int {
    ($($t:ty),*) => {$(
        impl Random for $t {
            /// Low bits of one 32-bit draw.
            #[inline]
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn random(rng: &mut Mwc) -> Self {
                rng.next() as $t
            }
        }
    )*};
}

random_narrow_int!(i8, u8, i16, u16, i32, u32);

impl Random for u64 {
    #[inline]
    fn random(rng: &mut Mwc) -> Self {
        rng.next_u64()
    }
}

impl Random for i64 {
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    fn random(rng: &mut Mwc) -> Self {
        rng.next_u64() as i64
    }
}

impl Random for bool {
    #[inline]
    fn random(rng: &mut Mwc) -> Self {
        rng.next() & 1 != 0
    }
}

impl Random for f32 {
    /// Uniform in `[0, 1)`.
    ///
    /// Bits 9-31 form a mantissa in `[1, 2)`. Bit 8 picks whether 1.0 or
    /// the float just below it is subtracted, so the low end is not biased
    /// towards exact multiples of 2^-23.
    fn random(rng: &mut Mwc) -> Self {
        let r = rng.next();
        let u1 = 0x3F80_0000 - ((r >> 8) & 1);
        let u2 = (r >> 9) | 0x3F80_0000;
        f32::from_bits(u2) - f32::from_bits(u1)
    }
}

impl Random for f64 {
    /// Uniform in `[0, 1)` from the top 52 bits of a 64-bit draw.
    fn random(rng: &mut Mwc) -> Self {
        let r = rng.next_u64();
        f64::from_bits((r >> 12) | 0x3FF0_0000_0000_0000) - 1.0
    }
}

impl Random for f16 {
    /// Spread over roughly `[-28000, 42000)`, so both overflow-free large
    /// values and small fractions appear.
    fn random(rng: &mut Mwc) -> Self {
        f16::from_f32((f32::random(rng) - 0.4) * 70000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_unit_interval() {
        let mut rng = Mwc::new(5);
        for _ in 0..10_000 {
            let x = f32::random(&mut rng);
            assert!((0.0..1.0).contains(&x), "{x}");
            let y = f64::random(&mut rng);
            assert!((0.0..1.0).contains(&y), "{y}");
        }
    }

    #[test]
    fn test_narrow_ints_truncate_one_draw() {
        let mut a = Mwc::new(11);
        let mut b = Mwc::new(11);
        let raw = b.next();
        assert_eq!(u8::random(&mut a), raw as u8);
        let raw = b.next();
        assert_eq!(i16::random(&mut a), raw as i16);
    }

    #[test]
    fn test_wide_ints_take_two_draws() {
        let mut a = Mwc::new(11);
        let mut b = Mwc::new(11);
        let expected = b.next_u64();
        assert_eq!(u64::random(&mut a), expected);
        assert_eq!(a, b);
    }

    #[test]
    fn test_half_stays_finite() {
        let mut rng = Mwc::new(21);
        for _ in 0..10_000 {
            let h = f16::random(&mut rng);
            assert!(h.is_finite());
            assert!(h.to_f32() >= -28_000.0 && h.to_f32() < 42_016.0);
        }
    }

    #[test]
    fn test_bit_exact_float_construction() {
        let mut a = Mwc::new(1);
        let mut b = Mwc::new(1);
        let r = b.next();
        let expected = f32::from_bits((r >> 9) | 0x3F80_0000) - f32::from_bits(0x3F80_0000 - ((r >> 8) & 1));
        assert_eq!(f32::random(&mut a).to_bits(), expected.to_bits());
    }
}
