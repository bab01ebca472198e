//! Arithmetic and comparison references shared by all numeric lanes

use crate::element::NumElement;
use crate::scalar::Expected;

pub fn add<T: NumElement>(a: T, b: T) -> Expected {
    T::expect(a.to_wide() + b.to_wide())
}

pub fn sub<T: NumElement>(a: T, b: T) -> Expected {
    T::expect(a.to_wide() - b.to_wide())
}

pub fn mul<T: NumElement>(a: T, b: T) -> Expected {
    T::expect(T::wide_mul(a.to_wide(), b.to_wide()))
}

pub fn neg<T: NumElement>(a: T) -> Expected {
    T::expect(-a.to_wide())
}

/// Magnitude. For signed integers `MIN` wraps back to itself.
pub fn abs<T: NumElement>(a: T) -> Expected {
    let wide = a.to_wide();
    let zero = T::ZERO.to_wide();
    if wide < zero {
        T::expect(-wide)
    } else if wide == zero {
        // Clears the sign of a negative zero.
        T::expect(zero)
    } else {
        Expected::of(a)
    }
}

/// `a < b ? a : b`; when either side is NaN the result is `b`.
pub fn min<T: NumElement>(a: T, b: T) -> Expected {
    Expected::of(if a < b { a } else { b })
}

/// `a > b ? a : b`; when either side is NaN the result is `b`.
pub fn max<T: NumElement>(a: T, b: T) -> Expected {
    Expected::of(if a > b { a } else { b })
}

/// Lane comparison. Unordered operands compare false except for `!=`.
pub fn compare<T: NumElement>(a: T, b: T, op: Comparison) -> Expected {
    let result = match op {
        Comparison::Lt => a < b,
        Comparison::Le => a <= b,
        Comparison::Eq => a == b,
        Comparison::Ne => a != b,
        Comparison::Ge => a >= b,
        Comparison::Gt => a > b,
    };
    Expected::bool(result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

/// Sum of all lanes accumulated in lane order, each partial sum rounded
/// (or wrapped) to the lane type.
pub fn horizontal_add<T: NumElement>(lanes: &[T]) -> Expected {
    let sum = lanes[1..]
        .iter()
        .fold(lanes[0], |acc, x| T::from_wide(acc.to_wide() + x.to_wide()));
    Expected::of(sum)
}

/// Smallest lane, NaN propagating.
#[allow(clippy::eq_op)]
pub fn horizontal_min<T: NumElement>(lanes: &[T]) -> Expected {
    if let Some(&nan) = lanes.iter().find(|&&x| x != x) {
        return Expected::of(nan);
    }
    let mut best = lanes[0];
    for &x in &lanes[1..] {
        if x < best {
            best = x;
        }
    }
    Expected::of(best)
}

/// Largest lane, NaN propagating.
#[allow(clippy::eq_op)]
pub fn horizontal_max<T: NumElement>(lanes: &[T]) -> Expected {
    if let Some(&nan) = lanes.iter().find(|&&x| x != x) {
        return Expected::of(nan);
    }
    let mut best = lanes[0];
    for &x in &lanes[1..] {
        if x > best {
            best = x;
        }
    }
    Expected::of(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(add(i8::MAX, 1), Expected::of(i8::MIN));
        assert_eq!(sub(0u16, 1), Expected::of(u16::MAX));
        assert_eq!(mul(0x1_0000i32, 0x1_0000), Expected::of(0i32));
        assert_eq!(neg(i64::MIN), Expected::of(i64::MIN));
        assert_eq!(abs(i32::MIN), Expected::of(i32::MIN));
    }

    #[test]
    fn test_float_arithmetic_keeps_precision() {
        assert_eq!(add(0.1f32, 0.2), Expected::wide(f64::from(0.1f32) + f64::from(0.2f32)));
        assert_eq!(abs(-0.0f64), Expected::wide(0.0));
    }

    #[test]
    fn test_plain_min_max_nan_contract() {
        assert_eq!(min(f32::NAN, 5.0), Expected::of(5.0f32));
        assert!(matches!(min(5.0f32, f32::NAN), Expected::Value(Scalar::Single(x)) if x.is_nan()));
        assert_eq!(max(f64::NAN, 1.0), Expected::of(1.0f64));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(compare(1i32, 2, Comparison::Lt), Expected::bool(true));
        assert_eq!(compare(f32::NAN, f32::NAN, Comparison::Ne), Expected::bool(true));
        assert_eq!(compare(f32::NAN, 1.0, Comparison::Ge), Expected::bool(false));
    }

    #[test]
    fn test_horizontal_reductions() {
        assert_eq!(horizontal_add(&[i8::MAX, 1, 0, 0]), Expected::of(i8::MIN));
        assert_eq!(horizontal_add(&[1.0e8f32, 1.0, -1.0e8, 1.0]), Expected::of(1.0f32));
        assert_eq!(horizontal_min(&[3u32, 1, 2, 9]), Expected::of(1u32));
        assert!(matches!(
            horizontal_max(&[1.0f32, f32::NAN, 3.0, 2.0]),
            Expected::Value(Scalar::Single(x)) if x.is_nan()
        ));
    }
}
