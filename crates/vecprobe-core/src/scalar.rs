//! Type-erased lane values
//!
//! The driver compares results of many lane types through one code path.
//! Actual results are carried as [`Scalar`], oracle results as [`Expected`].

use half::f16;
use serde::Serialize;
use std::fmt;

/// One lane value of any element type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Scalar {
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Half(#[serde(serialize_with = "serialize_half")] f16),
    Single(f32),
    Double(f64),
}

fn serialize_half<S: serde::Serializer>(value: &f16, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f32(value.to_f32())
}

impl Scalar {
    pub fn is_float(self) -> bool {
        matches!(self, Self::Half(_) | Self::Single(_) | Self::Double(_))
    }

    /// Integer value, for integer variants
    pub fn as_int(self) -> Option<i128> {
        match self {
            Self::Signed(v) => Some(i128::from(v)),
            Self::Unsigned(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`; booleans read as 0 or 1
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(b)),
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
            Self::Half(v) => v.to_f64(),
            Self::Single(v) => f64::from(v),
            Self::Double(v) => v,
        }
    }
}

impl fmt::Display for Scalar {
    /// Integers print as signed hexadecimal, booleans as 0 or 1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bool(b) => write!(f, "{}", u8::from(b)),
            Self::Signed(v) if v < 0 => write!(f, "-{:X}", v.unsigned_abs()),
            Self::Signed(v) => write!(f, "{v:X}"),
            Self::Unsigned(v) => write!(f, "{v:X}"),
            Self::Half(v) => write!(f, "{}", v.to_f32()),
            Self::Single(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
        }
    }
}

/// Lane types that convert into a [`Scalar`].
pub trait ToScalar: Copy {
    fn to_scalar(self) -> Scalar;
}

macro_rules! to_scalar {
    ($($t:ty => $variant:ident($wide:ty)),* $(,)?) => {$(
        impl ToScalar for $t {
            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::$variant(<$wide>::from(self))
            }
        }
    )*};
}

to_scalar! {
    bool => Bool(bool),
    i8 => Signed(i64),
    i16 => Signed(i64),
    i32 => Signed(i64),
    i64 => Signed(i64),
    u8 => Unsigned(u64),
    u16 => Unsigned(u64),
    u32 => Unsigned(u64),
    u64 => Unsigned(u64),
    f16 => Half(f16),
    f32 => Single(f32),
    f64 => Double(f64),
}

/// What the oracle says one output position should hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expected {
    /// A definite value. Float values may be more precise than the result
    /// type; the comparator rounds them to the actual result's precision.
    Value(Scalar),
    /// Position selected by a don't-care index: never compared.
    DontCare,
    /// Position selected by an index outside the source range.
    OutOfRange,
}

impl Expected {
    pub fn of<T: ToScalar>(value: T) -> Self {
        Self::Value(value.to_scalar())
    }

    /// A float result known to higher precision than the result type
    pub fn wide(value: f64) -> Self {
        Self::Value(Scalar::Double(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::Value(Scalar::Bool(value))
    }
}

impl From<Scalar> for Expected {
    fn from(value: Scalar) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => fmt::Display::fmt(v, f),
            Self::DontCare => f.write_str("*"),
            Self::OutOfRange => f.write_str("?"),
        }
    }
}
