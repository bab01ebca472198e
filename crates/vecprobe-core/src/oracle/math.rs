//! Transcendental references, evaluated in double precision

use vecprobe_simd::Unary;

use crate::element::FloatElement;
use crate::scalar::Expected;

/// `op(x)` in double precision.
pub fn eval(op: Unary, x: f64) -> f64 {
    match op {
        Unary::Sqrt => x.sqrt(),
        Unary::Round => super::float::round_half_even(x),
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

pub fn unary<F: FloatElement>(op: Unary, a: F) -> Expected {
    Expected::wide(eval(op, a.to_f64()))
}

pub fn pow<F: FloatElement>(a: F, b: F) -> Expected {
    Expected::wide(a.to_f64().powf(b.to_f64()))
}

pub fn powi<F: FloatElement>(a: F, exponent: i32) -> Expected {
    Expected::wide(a.to_f64().powi(exponent))
}

/// `a` raised to `numerator / denominator`; an odd root of a negative base
/// is real and carries the sign of an odd power.
pub fn pow_ratio<F: FloatElement>(a: F, numerator: i32, denominator: i32) -> Expected {
    let x = a.to_f64();
    let ratio = f64::from(numerator) / f64::from(denominator);
    if x < 0.0 && denominator % 2 != 0 {
        let magnitude = (-x).powf(ratio);
        Expected::wide(if numerator % 2 != 0 { -magnitude } else { magnitude })
    } else {
        Expected::wide(x.powf(ratio))
    }
}

pub fn atan2<F: FloatElement>(y: F, x: F) -> Expected {
    Expected::wide(y.to_f64().atan2(x.to_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_matches_std() {
        assert_eq!(eval(Unary::Exp10, 2.0), 100.0);
        assert_eq!(eval(Unary::Round, 2.5), 2.0);
        assert!(eval(Unary::Acosh, 0.5).is_nan());
    }

    #[test]
    fn test_pow_ratio_odd_root() {
        let close = |e: Expected, want: f64| {
            matches!(e, Expected::Value(crate::scalar::Scalar::Double(x)) if (x - want).abs() < 1e-12)
        };
        assert!(close(pow_ratio(-8.0f64, 1, 3), -2.0));
        assert!(close(pow_ratio(-8.0f64, 2, 3), 4.0));
        assert!(matches!(
            pow_ratio(-8.0f32, 1, 2),
            Expected::Value(crate::scalar::Scalar::Double(x)) if x.is_nan()
        ));
    }
}
