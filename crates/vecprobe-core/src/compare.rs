//! Tolerant comparison of actual against expected lanes
//!
//! Integers and booleans compare exactly. Floats go through a fixed
//! sequence of rules: bit equality, NaN equivalence, signed zero, the
//! ignore classes the case declares, and finally the ULP budget.

use half::f16;
use serde::Serialize;
use std::fmt;
use std::num::FpCategory;
use vecprobe_simd::Float;

use crate::scalar::{Expected, Scalar};

/// Comparison policy declared by a test case
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Policy {
    /// Error budget in ULP; `None` requires bit equality up to NaN and zero sign
    pub ulps: Option<f64>,
    /// Extra budget per unit of `|b|`, for functions whose error grows
    /// with the second operand
    pub ulps_per_b: f64,
    /// A zero of the wrong sign is an error
    pub signed_zero: bool,
    /// Any NaN on either side is ignored
    pub ignore_nan: bool,
    /// Zero or subnormal on both sides is ignored
    pub ignore_subnormal: bool,
    /// Huge results of the same sign are ignored
    pub ignore_overflow: bool,
    /// Expected values near the smallest normal are ignored
    pub ignore_underflow: bool,
    /// ULP step measured at no less than this magnitude; inputs near the
    /// smallest normal are ignored
    pub absolute_floor: Option<f64>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::EXACT
    }
}

impl Policy {
    pub const EXACT: Policy = Policy {
        ulps: None,
        ulps_per_b: 0.0,
        signed_zero: false,
        ignore_nan: false,
        ignore_subnormal: false,
        ignore_overflow: false,
        ignore_underflow: false,
        absolute_floor: None,
    };

    /// Budget of `ulps` units in the last place
    pub fn ulps(ulps: f64) -> Self {
        Self {
            ulps: Some(ulps),
            ..Self::EXACT
        }
    }

    pub fn per_b(mut self, ulps_per_b: f64) -> Self {
        self.ulps_per_b = ulps_per_b;
        self
    }

    pub fn signed_zero(mut self) -> Self {
        self.signed_zero = true;
        self
    }

    pub fn ignore_nan(mut self) -> Self {
        self.ignore_nan = true;
        self
    }

    pub fn ignore_subnormal(mut self) -> Self {
        self.ignore_subnormal = true;
        self
    }

    pub fn ignore_overflow(mut self) -> Self {
        self.ignore_overflow = true;
        self
    }

    pub fn ignore_underflow(mut self) -> Self {
        self.ignore_underflow = true;
        self
    }

    /// Measure steps at no less than 0.01. Used for periodic functions
    /// whose relative error is meaningless near zero crossings.
    pub fn absolute(mut self) -> Self {
        self.absolute_floor = Some(0.01);
        self
    }

    /// Short flag summary for listings
    pub fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.signed_zero {
            flags.push("signed-zero");
        }
        if self.ignore_nan {
            flags.push("ignore-nan");
        }
        if self.ignore_subnormal {
            flags.push("ignore-subnormal");
        }
        if self.ignore_overflow {
            flags.push("ignore-overflow");
        }
        if self.ignore_underflow {
            flags.push("ignore-underflow");
        }
        if self.absolute_floor.is_some() {
            flags.push("absolute");
        }
        flags.join(",")
    }

    /// Budget text for listings
    pub fn budget(&self) -> String {
        match self.ulps {
            None => "exact".to_string(),
            Some(ulps) if self.ulps_per_b > 0.0 => format!("{ulps}+{}|b|", self.ulps_per_b),
            Some(ulps) => format!("{ulps}"),
        }
    }
}

/// Inputs that produced the lane, used by input-dependent rules
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaneContext {
    pub a: Option<f64>,
    pub b: Option<f64>,
}

/// Outcome of comparing one output position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Equal, or within budget. `deviation` is in ULP when a budget applies.
    Match { deviation: f64 },
    /// Don't-care position
    Skipped,
    /// Divergence excused by the policy
    Ignored { reason: &'static str },
    /// Values differ; `deviation` is in ULP when a budget applies
    Mismatch { deviation: Option<f64> },
    /// Numerically equal zeros of different sign under a strict policy
    SignOfZero,
    /// The oracle saw an index outside the source range
    IndexOutOfRange,
}

impl Verdict {
    /// Whether this verdict counts towards the error total
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Mismatch { .. } | Self::SignOfZero | Self::IndexOutOfRange
        )
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Self::Match { .. } | Self::Skipped)
    }

    /// Report suffix for the lane row
    pub fn suffix(&self, budgeted: bool) -> String {
        match self {
            Self::Ignored { .. } => "  ignored".to_string(),
            Self::SignOfZero => "  sign of zero".to_string(),
            Self::IndexOutOfRange => "  index out of range".to_string(),
            Self::Mismatch {
                deviation: Some(d),
            } if budgeted => format!("  ({d:.0} ULP)"),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_equal() { "==" } else { "!=" })
    }
}

/// Size of one unit in the last place at `x`, in the precision of `F`.
///
/// Non-finite values give 1 and zero or subnormal values give the
/// smallest normal, so the quotient stays finite.
pub fn delta_unit<F: Float>(x: F) -> f64 {
    let x = x.lane_abs();
    match x.classify_lane() {
        FpCategory::Nan | FpCategory::Infinite => 1.0,
        FpCategory::Zero | FpCategory::Subnormal => F::MIN_POSITIVE.to_f64(),
        FpCategory::Normal => F::from_raw(x.to_raw() + 1).to_f64() - x.to_f64(),
    }
}

/// Compare one lane.
pub fn compare(actual: Scalar, expected: &Expected, policy: &Policy, ctx: &LaneContext) -> Verdict {
    let expected = match expected {
        Expected::DontCare => return Verdict::Skipped,
        Expected::OutOfRange => return Verdict::IndexOutOfRange,
        Expected::Value(v) => *v,
    };
    match actual {
        Scalar::Half(x) => compare_float::<f16>(x, expected, policy, ctx),
        Scalar::Single(x) => compare_float::<f32>(x, expected, policy, ctx),
        Scalar::Double(x) => compare_float::<f64>(x, expected, policy, ctx),
        Scalar::Bool(x) => exact(expected == Scalar::Bool(x)),
        Scalar::Signed(_) | Scalar::Unsigned(_) => exact(actual.as_int() == expected.as_int()),
    }
}

fn exact(equal: bool) -> Verdict {
    if equal {
        Verdict::Match { deviation: 0.0 }
    } else {
        Verdict::Mismatch { deviation: None }
    }
}

fn compare_float<F: Float>(actual: F, expected: Scalar, policy: &Policy, ctx: &LaneContext) -> Verdict {
    if !expected.is_float() {
        return Verdict::Mismatch { deviation: None };
    }
    let wide = expected.as_f64();
    let rounded = F::from_f64(wide);
    let same = Verdict::Match { deviation: 0.0 };

    if actual.to_raw() == rounded.to_raw() {
        return same;
    }
    if actual.is_nan_lane() && rounded.is_nan_lane() {
        return same;
    }
    let x = actual.to_f64();
    if x == rounded.to_f64() {
        // Only zeros of opposite sign get here.
        return if policy.signed_zero {
            Verdict::SignOfZero
        } else {
            same
        };
    }
    if let Some(reason) = ignore_reason(actual, rounded, wide, policy, ctx) {
        return Verdict::Ignored { reason };
    }
    let Some(ulps) = policy.ulps else {
        return Verdict::Mismatch { deviation: None };
    };

    let step_at = match policy.absolute_floor {
        Some(floor) if x.abs() < floor => F::from_f64(floor),
        _ => actual,
    };
    let deviation = (x - wide).abs() / delta_unit(step_at);
    let limit = ulps + policy.ulps_per_b * ctx.b.map_or(0.0, f64::abs);
    if deviation <= limit {
        Verdict::Match { deviation }
    } else {
        Verdict::Mismatch {
            deviation: Some(deviation),
        }
    }
}

fn ignore_reason<F: Float>(
    actual: F,
    rounded: F,
    wide: f64,
    policy: &Policy,
    ctx: &LaneContext,
) -> Option<&'static str> {
    let tiny = F::MIN_POSITIVE.to_f64() * 4.0;
    let huge = F::MAX_VALUE.to_f64() * 0.25;
    let is_small = |v: F| {
        matches!(
            v.classify_lane(),
            FpCategory::Zero | FpCategory::Subnormal
        )
    };

    if policy.ignore_nan && (actual.is_nan_lane() || wide.is_nan()) {
        return Some("nan");
    }
    if policy.ignore_subnormal && is_small(actual) && is_small(rounded) {
        return Some("subnormal");
    }
    if policy.ignore_underflow && wide.abs() < tiny && actual.to_f64().abs() < tiny {
        return Some("underflow");
    }
    if policy.ignore_overflow {
        let x = actual.to_f64();
        if x.abs() > huge && wide.abs() > huge && x.is_sign_negative() == wide.is_sign_negative() {
            return Some("overflow");
        }
    }
    if policy.absolute_floor.is_some() && ctx.a.is_some_and(|a| a.abs() < tiny) {
        return Some("tiny input");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(actual: Scalar, expected: Scalar, policy: &Policy) -> Verdict {
        compare(actual, &Expected::Value(expected), policy, &LaneContext::default())
    }

    #[test]
    fn test_integers_are_exact_whatever_the_policy() {
        let loose = Policy::ulps(1000.0).ignore_nan();
        assert!(check(Scalar::Signed(5), Scalar::Signed(6), &loose).is_error());
        assert!(!check(Scalar::Unsigned(255), Scalar::Signed(255), &loose).is_error());
        assert!(check(Scalar::Bool(true), Scalar::Bool(false), &loose).is_error());
    }

    #[test]
    fn test_nan_payloads_are_equivalent() {
        let a = Scalar::Single(f32::from_bits(0x7FC0_0001));
        let e = Scalar::Single(f32::from_bits(0xFFC0_1234));
        assert_eq!(check(a, e, &Policy::EXACT), Verdict::Match { deviation: 0.0 });
    }

    #[test]
    fn test_signed_zero_policy() {
        let a = Scalar::Double(-0.0);
        let e = Scalar::Double(0.0);
        assert!(!check(a, e, &Policy::EXACT).is_error());
        assert_eq!(check(a, e, &Policy::EXACT.signed_zero()), Verdict::SignOfZero);
    }

    #[test]
    fn test_wide_expected_rounds_to_actual_precision() {
        let third = 1.0f64 / 3.0;
        let a = Scalar::Single(third as f32);
        assert!(check(a, Scalar::Double(third), &Policy::EXACT).is_equal());
        let off = Scalar::Single(f32::from_bits((third as f32).to_bits() + 2));
        assert!(check(off, Scalar::Double(third), &Policy::EXACT).is_error());
        match check(off, Scalar::Double(third), &Policy::ulps(3.0)) {
            Verdict::Match { deviation } => assert!(deviation > 1.5 && deviation < 2.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_budget_grows_with_b() {
        let a = Scalar::Single(f32::from_bits(1.0f32.to_bits() + 10));
        let e = Scalar::Double(1.0);
        let policy = Policy::ulps(2.0).per_b(0.6);
        let ctx = LaneContext { a: Some(1.0), b: Some(20.0) };
        assert!(!compare(a, &e.into(), &policy, &ctx).is_error());
        let ctx = LaneContext { a: Some(1.0), b: Some(5.0) };
        assert!(compare(a, &e.into(), &policy, &ctx).is_error());
    }

    #[test]
    fn test_ignore_classes() {
        let subnormal = Scalar::Single(f32::from_bits(1));
        let zero = Scalar::Single(0.0);
        let policy = Policy::EXACT.ignore_subnormal();
        assert_eq!(check(zero, subnormal, &policy), Verdict::Ignored { reason: "subnormal" });
        assert!(check(zero, subnormal, &Policy::EXACT).is_error());

        let nan = Scalar::Double(f64::NAN);
        assert!(matches!(
            check(nan, Scalar::Double(1.0), &Policy::EXACT.ignore_nan()),
            Verdict::Ignored { .. }
        ));
        let inf = Scalar::Single(f32::INFINITY);
        assert!(matches!(
            check(inf, Scalar::Double(3.0e38), &Policy::ulps(2.0).ignore_overflow()),
            Verdict::Ignored { reason: "overflow" }
        ));
    }

    #[test]
    fn test_underflow_excuses_only_tiny_pairs() {
        let policy = Policy::ulps(2.0).ignore_underflow();
        let expected = Scalar::Double(1.0e-40);
        assert_eq!(
            check(Scalar::Single(0.0), expected, &policy),
            Verdict::Ignored { reason: "underflow" }
        );
        assert!(check(Scalar::Single(1.0), expected, &policy).is_error());
        assert!(check(Scalar::Single(f32::NAN), expected, &policy).is_error());
        assert!(check(Scalar::Single(f32::INFINITY), expected, &policy).is_error());
    }

    #[test]
    fn test_absolute_floor_near_zero() {
        // A residue of 1e-9 where the true value is zero is many ULP at
        // 1e-9, but about one step measured at 0.01.
        let actual = Scalar::Single(1.0e-9);
        let expected = Scalar::Double(0.0);
        assert!(check(actual, expected, &Policy::ulps(3.0)).is_error());
        assert!(!check(actual, expected, &Policy::ulps(3.0).absolute()).is_error());

        let ctx = LaneContext { a: Some(1.0e-40), b: None };
        let verdict = compare(actual, &expected.into(), &Policy::ulps(3.0).absolute(), &ctx);
        assert_eq!(verdict, Verdict::Ignored { reason: "tiny input" });
    }

    #[test]
    fn test_index_verdicts() {
        let ctx = LaneContext::default();
        let a = Scalar::Signed(1);
        assert_eq!(compare(a, &Expected::DontCare, &Policy::EXACT, &ctx), Verdict::Skipped);
        assert_eq!(
            compare(a, &Expected::OutOfRange, &Policy::EXACT, &ctx),
            Verdict::IndexOutOfRange
        );
    }

    #[test]
    fn test_delta_unit() {
        assert_eq!(delta_unit(1.0f32), f64::from(f32::EPSILON));
        assert_eq!(delta_unit(0.0f64), f64::MIN_POSITIVE);
        assert_eq!(delta_unit(f16::INFINITY), 1.0);
        assert_eq!(delta_unit(f16::from_f32(-1.0)), f16::EPSILON.to_f64());
    }
}
