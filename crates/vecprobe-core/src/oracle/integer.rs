//! Integer-only references: saturation, shifts and division

use crate::element::IntElement;
use crate::scalar::{Expected, Scalar};

fn clamp<T: IntElement>(wide: i128) -> Expected {
    Expected::of(T::from_i128(wide.clamp(T::MIN.to_i128(), T::MAX.to_i128())))
}

pub fn add_saturated<T: IntElement>(a: T, b: T) -> Expected {
    clamp::<T>(a.to_i128() + b.to_i128())
}

pub fn sub_saturated<T: IntElement>(a: T, b: T) -> Expected {
    clamp::<T>(a.to_i128() - b.to_i128())
}

pub fn abs_saturated<T: IntElement>(a: T) -> Expected {
    clamp::<T>(a.to_i128().abs())
}

/// Shift counts wrap modulo the lane width.
pub fn shift_left<T: IntElement>(a: T, count: u32) -> Expected {
    let count = count % T::BITS;
    T::expect(a.to_i128() << count)
}

/// Arithmetic for signed lanes, logical for unsigned ones.
pub fn shift_right<T: IntElement>(a: T, count: u32) -> Expected {
    let count = count % T::BITS;
    T::expect(a.to_i128() >> count)
}

pub fn rotate_left<T: IntElement>(a: T, count: u32) -> Expected {
    let count = count % T::BITS;
    let raw = a.to_raw();
    let rotated = if count == 0 {
        raw
    } else {
        (raw << count) | (raw >> (T::BITS - count))
    };
    Expected::of(T::from_raw(rotated))
}

/// Truncating division. `MIN / -1` wraps to `MIN`.
pub fn divide<T: IntElement>(a: T, divisor: T) -> Expected {
    T::expect(a.to_i128() / divisor.to_i128())
}

/// Sum of all lanes as a signed 64-bit value.
#[allow(clippy::cast_possible_truncation)]
pub fn horizontal_add_x<T: IntElement>(lanes: &[T]) -> Expected {
    let sum: i128 = lanes.iter().map(|x| x.to_i128()).sum();
    Expected::Value(Scalar::Signed(sum as i64))
}
