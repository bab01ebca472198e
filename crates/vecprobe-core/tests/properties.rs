//! Property tests for the references the harness relies on most

use half::f16;
use proptest::prelude::*;
use vecprobe_core::oracle::{convert, float, integer};
use vecprobe_core::Expected;
use vecprobe_simd::Simd;

proptest! {
    #[test]
    fn prop_saturated_add_stays_in_bounds(a in any::<i8>(), b in any::<i8>()) {
        let exact = i16::from(a) + i16::from(b);
        let clamped = i8::try_from(exact.clamp(-128, 127)).unwrap();
        prop_assert_eq!(integer::add_saturated(a, b), Expected::of(clamped));
        let lanes = Simd::from_array([a, b]).add_saturated(Simd::from_array([b, a])).to_array();
        prop_assert_eq!(lanes, [clamped, clamped]);
    }

    #[test]
    fn prop_saturated_sub_unsigned_floors_at_zero(a in any::<u16>(), b in any::<u16>()) {
        prop_assert_eq!(integer::sub_saturated(a, b), Expected::of(a.saturating_sub(b)));
    }

    #[test]
    fn prop_half_way_rounds_to_even(k in -1_000_000i64..1_000_000) {
        #[allow(clippy::cast_precision_loss)]
        let x = k as f64 + 0.5;
        let rounded = float::round_half_even(x);
        prop_assert_eq!(rounded % 2.0, 0.0);
        prop_assert_eq!((rounded - x).abs(), 0.5);
    }

    #[test]
    fn prop_round_is_within_half(x in -1.0e12f64..1.0e12) {
        let rounded = float::round_half_even(x);
        prop_assert_eq!(rounded.fract(), 0.0);
        prop_assert!((rounded - x).abs() <= 0.5);
    }

    #[test]
    fn prop_half_narrowing_matches_half_crate(bits in any::<u32>()) {
        let x = f32::from_bits(bits);
        prop_assume!(!x.is_nan());
        prop_assert_eq!(convert::f32_to_f16_bits(x), f16::from_f32(x).to_bits());
    }

    #[test]
    fn prop_half_round_trip_within_one_ulp(x in 6.2e-5f32..65504.0, negative in any::<bool>()) {
        let x = if negative { -x } else { x };
        let back = convert::f16_bits_to_f32(convert::f32_to_f16_bits(x));
        // One half-precision ULP at x is at most |x| * 2^-10.
        prop_assert!((back - x).abs() <= x.abs() * 2f32.powi(-10));
    }

    #[test]
    fn prop_half_widening_round_trips_exactly(bits in any::<u16>()) {
        let h = f16::from_bits(bits);
        prop_assume!(!h.is_nan());
        prop_assert_eq!(convert::f32_to_f16_bits(convert::f16_bits_to_f32(bits)), bits);
    }
}
