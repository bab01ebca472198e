//! Property tests for lane operations with wrap-around semantics

use proptest::prelude::*;
use vecprobe_simd::{Simd, DONT_CARE};

proptest! {
    #[test]
    fn prop_shift_count_wraps_to_lane_width(x in any::<i32>(), count in 0u32..256) {
        let v = Simd::<i32, 4>::splat(x);
        prop_assert_eq!(v.shl(count).to_array(), [x.wrapping_shl(count); 4]);
        prop_assert_eq!(v.shl(count).to_array(), v.shl(count % 32).to_array());
        // Signed lanes shift in copies of the sign bit.
        prop_assert_eq!(v.shr(count).to_array(), [x >> (count % 32); 4]);
    }

    #[test]
    fn prop_unsigned_shift_is_logical(x in any::<u16>(), count in 0u32..64) {
        let v = Simd::<u16, 8>::splat(x);
        prop_assert_eq!(v.shr(count).to_array(), [x >> (count % 16); 8]);
        prop_assert_eq!(v.rotate_left(count).to_array(), [x.rotate_left(count); 8]);
    }

    #[test]
    fn prop_permute_index_wraps_modulo_length(
        lanes in any::<[i32; 4]>(),
        indexes in prop::array::uniform4(0i32..i32::MAX),
    ) {
        let out = Simd::from_array(lanes).permute(indexes).to_array();
        for (n, &index) in indexes.iter().enumerate() {
            prop_assert_eq!(out[n], lanes[usize::try_from(index).unwrap() % 4]);
        }
    }

    #[test]
    fn prop_negative_permute_index_zeroes(lanes in any::<[i32; 4]>(), index in i32::MIN..0) {
        let out = Simd::from_array(lanes).permute([index, DONT_CARE, 0, 1]).to_array();
        prop_assert_eq!(out, [0, 0, lanes[0], lanes[1]]);
    }

    #[test]
    fn prop_blend_index_wraps_over_both_sources(
        a in any::<[i16; 8]>(),
        b in any::<[i16; 8]>(),
        index in 0i32..4096,
    ) {
        let out = Simd::from_array(a).blend(Simd::from_array(b), [index; 8]).to_array();
        let slot = usize::try_from(index).unwrap() % 16;
        let want = if slot < 8 { a[slot] } else { b[slot - 8] };
        prop_assert_eq!(out, [want; 8]);
    }

    #[test]
    fn prop_round_ties_to_even(k in -4_000_000i32..4_000_000) {
        #[allow(clippy::cast_precision_loss)]
        let tie = k as f32 + 0.5;
        let rounded = Simd::<f32, 4>::splat(tie).round().to_array()[0];
        prop_assert_eq!(rounded, tie.round_ties_even());
        prop_assert_eq!(rounded % 2.0, 0.0);
    }

    #[test]
    fn prop_round_matches_std_for_doubles(x in -1.0e15f64..1.0e15) {
        let rounded = Simd::<f64, 2>::splat(x).round().to_array();
        prop_assert_eq!(rounded, [x.round_ties_even(); 2]);
    }
}
