//! Scalar Reference Consistency Tests
//!
//! The oracles are the ground truth for every case, so they are checked
//! here against hand-computed values, against the `half` crate, and
//! against the contracts of the vector library they judge.

use half::f16;
use vecprobe_core::compare::{compare, LaneContext};
use vecprobe_core::corpus;
use vecprobe_core::oracle::{arith, convert, float, integer, permute};
use vecprobe_core::{Expected, Policy, Scalar, Verdict, DONT_CARE};
use vecprobe_simd::Simd;

// =============================================================================
// Integer references
// =============================================================================

#[test]
fn test_saturation_clamps_instead_of_wrapping() {
    assert_eq!(integer::add_saturated(127i8, 127), Expected::of(127i8));
    assert_eq!(integer::add_saturated(255u8, 1), Expected::of(255u8));
    assert_eq!(integer::sub_saturated(i32::MIN, 1), Expected::of(i32::MIN));
    assert_eq!(integer::sub_saturated(0u16, 1), Expected::of(0u16));
    assert_eq!(integer::abs_saturated(i64::MIN), Expected::of(i64::MAX));
}

#[test]
fn test_integer_results_are_never_tolerated() {
    let loose = Policy::ulps(1000.0);
    let verdict = compare(
        Scalar::Signed(5),
        &Expected::of(6i32),
        &loose,
        &LaneContext::default(),
    );
    assert!(verdict.is_error());
}

#[test]
fn test_library_saturation_matches_reference() {
    let a = Simd::from_array([127i8, -128, 100, -100]);
    let b = Simd::from_array([127i8, -128, 100, -100]);
    let sums = a.add_saturated(b).to_array();
    for (n, &sum) in sums.iter().enumerate() {
        assert_eq!(
            Expected::of(sum),
            integer::add_saturated(a.to_array()[n], b.to_array()[n]),
            "lane {n}"
        );
    }
}

// =============================================================================
// Floating point references
// =============================================================================

#[test]
fn test_round_ties_to_even() {
    assert_eq!(float::round(2.5f32), Expected::wide(2.0));
    assert_eq!(float::round(3.5f64), Expected::wide(4.0));
    assert_eq!(float::round(-2.5f64), Expected::wide(-2.0));
    let library = Simd::from_array([2.5f32, 3.5, -2.5, 0.5]).round().to_array();
    assert_eq!(library, [2.0, 4.0, -2.0, 0.0]);
}

#[test]
fn test_nan_aware_minimum_and_plain_min_differ() {
    let nan = Simd::<f32, 4>::splat(f32::NAN);
    let five = Simd::<f32, 4>::splat(5.0);
    assert!(nan.minimum(five).to_array()[0].is_nan());
    assert_eq!(nan.min(five).to_array()[0], 5.0);
    assert!(matches!(
        float::minimum(f32::NAN, 5.0),
        Expected::Value(Scalar::Single(x)) if x.is_nan()
    ));
    assert_eq!(arith::min(f32::NAN, 5.0), Expected::of(5.0f32));
}

#[test]
fn test_half_nan_patterns_are_counted_exactly() {
    let nans = corpus::exhaustive::<f16>()
        .into_iter()
        .filter(|&h| float::is_nan(h) == Expected::bool(true))
        .count();
    assert_eq!(nans, 2046);
}

#[test]
fn test_half_narrowing_saturates_out_of_range() {
    assert_eq!(convert::f32_to_f16_bits(1.0e6), 0x7C00);
    assert_eq!(convert::f32_to_f16_bits(-1.0e6), 0xFC00);
    assert_eq!(convert::f32_to_f16_bits(1.0e-9), 0x0000);
    assert_eq!(convert::f32_to_f16_bits(-1.0e-9), 0x8000);
}

// =============================================================================
// Index references
// =============================================================================

#[test]
fn test_index_rules() {
    let source = [10i32, 11, 12, 13];
    let picked = permute::select(&[-1, DONT_CARE, 2, 4], &source);
    assert_eq!(
        picked,
        vec![
            Expected::of(0i32),
            Expected::DontCare,
            Expected::of(12i32),
            Expected::OutOfRange
        ]
    );
    let exact = Policy::EXACT;
    let ctx = LaneContext::default();
    assert_eq!(compare(Scalar::Signed(99), &picked[1], &exact, &ctx), Verdict::Skipped);
    assert_eq!(
        compare(Scalar::Signed(11), &picked[3], &exact, &ctx),
        Verdict::IndexOutOfRange
    );
}
