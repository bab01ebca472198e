//! Case registry
//!
//! A case id resolves to a [`Case`] at startup. The catalog is split into
//! families, and every element type enables the families its lanes
//! support. Resolution is generic over the lane type and the lane count,
//! so the vector operations under test are monomorphized per vector type
//! while the registry only chooses which instantiation runs.

#![allow(clippy::unnecessary_wraps)]

mod convert;
mod float;
mod layout;
mod numeric;
mod permute;

use half::f16;
use serde::Serialize;
use tracing::debug;

use crate::case::{Case, Plan, Shape};
use crate::config::{ElementType, IndexList, RunConfig, VectorType};
use crate::element::Element;
use crate::error::{Error, Result};

/// Run options that shape how a case is built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseOptions {
    /// Index or template parameter list
    pub indexes: IndexList,
    /// Enumerate every bit pattern of narrow lanes
    pub exhaustive: bool,
}

impl From<&RunConfig> for CaseOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            indexes: config.indexes.clone(),
            exhaustive: config.exhaustive,
        }
    }
}

/// Every case id the catalog knows, in listing order
pub const CASE_IDS: &[u32] = &[
    1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, //
    100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, //
    200, 201, 210, 211, 212, 213, 214, 220, 222, //
    300, 301, 302, 303, 304, 305, 306, //
    400, 401, 402, 403, 404, 405, 410, 411, 412, 413, //
    500, 501, 502, 503, 504, 505, 506, 507, 508, 509, 510, 511, 512, 513, 514, 515, 516,
    517, 518, 519, 520, 521, 530, 531, 532, 533, 540, 541, 542, 545, //
    550, 551, 552, 553, 554, 555, 556, 557, 558, 560, 561, 562, 564, 565, 566, //
    580, 581, 582, 583, 584, 585, 590, 591, 592, 593, //
    600, 602, 603, 606, 607, 608, 609, 610, 611, 612, 613, 614, 615, 616, 620, 621, 622,
    623, 624, 650, //
    700, 701, 702, 703, 704, 705, 706, 707, 708, 709, 710, 711, //
    900,
];

/// Half precision cases that enumerate the whole lane domain by default
const HALF_EXHAUSTIVE: &[u32] = &[210, 211, 212, 213, 214, 507, 508, 509, 510, 519, 622, 624];

pub fn is_known(id: u32) -> bool {
    CASE_IDS.contains(&id)
}

/// Lane types with a case catalog.
pub trait Catalog: Element {
    /// Build case `id` for vectors of `N` lanes. `HALF` and `DOUBLE` are the
    /// lane counts of half and double width results. `None` means the case
    /// is not defined for this lane type.
    fn build<const N: usize, const HALF: usize, const DOUBLE: usize>(
        id: u32,
        options: &CaseOptions,
    ) -> Result<Option<Case<Self>>>;
}

/// Implement [`Catalog`] by trying each family in turn.
macro_rules! catalog {
    ($($t:ty => [$($module:ident::$family:ident),* $(,)?]);* $(;)?) => {$(
        impl Catalog for $t {
            fn build<const N: usize, const HALF: usize, const DOUBLE: usize>(
                id: u32,
                options: &CaseOptions,
            ) -> Result<Option<Case<Self>>> {
                $(
                    if let Some(case) = $module::$family::<Self, N, HALF, DOUBLE>(id, options)? {
                        return Ok(Some(case));
                    }
                )*
                Ok(None)
            }
        }
    )*};
}

catalog! {
    i8 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
           convert::widen, permute::permute, permute::probe];
    u8 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
           convert::widen, permute::permute, permute::probe];
    i16 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::widen, convert::narrow, convert::int_float, permute::permute,
            permute::probe];
    u16 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::widen, convert::narrow, convert::int_float, permute::permute,
            permute::probe];
    i32 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::widen, convert::narrow, convert::int_float, permute::permute,
            permute::probe];
    u32 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::widen, convert::narrow, convert::int_float, permute::permute,
            permute::probe];
    i64 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::narrow, convert::int_float, permute::permute, permute::probe];
    u64 => [numeric::arith, numeric::integer, numeric::bitwise, layout::layout,
            convert::narrow, convert::int_float, permute::permute, permute::probe];
    f16 => [numeric::arith, float::float, layout::layout, convert::widen, convert::half,
            permute::permute, float::change_sign, permute::probe];
    f32 => [numeric::arith, float::float, float::math, layout::layout, convert::widen,
            convert::float_narrow, permute::permute, float::change_sign, permute::probe];
    f64 => [numeric::arith, float::float, float::math, layout::layout,
            convert::float_narrow, convert::double_int, permute::permute,
            float::change_sign, permute::probe];
    bool => [numeric::bitwise, numeric::boolean, layout::layout, permute::permute,
             permute::probe];
}

/// Call `$func::<T, N, HALF, DOUBLE>$args` for the lane type and count of a
/// vector type.
macro_rules! dispatch {
    (@types $vector:expr, $func:ident $args:tt;
        $($tag:ident $t:ty [$($n:literal $half:literal $double:literal),*]),*) => {{
        let vector: $crate::config::VectorType = $vector;
        match (vector.element, vector.lanes) {
            $($(
                ($crate::config::ElementType::$tag, $n) => $func::<$t, $n, $half, $double> $args,
            )*)*
            _ => Err($crate::error::Error::InvalidVectorType(vector.to_string())),
        }
    }};
    ($vector:expr, $func:ident $args:tt) => {
        $crate::catalog::dispatch!(@types $vector, $func $args;
            I8 i8 [16 8 32, 32 16 64, 64 32 128],
            U8 u8 [16 8 32, 32 16 64, 64 32 128],
            I16 i16 [8 4 16, 16 8 32, 32 16 64],
            U16 u16 [8 4 16, 16 8 32, 32 16 64],
            F16 half::f16 [8 4 16, 16 8 32, 32 16 64],
            I32 i32 [4 2 8, 8 4 16, 16 8 32],
            U32 u32 [4 2 8, 8 4 16, 16 8 32],
            F32 f32 [4 2 8, 8 4 16, 16 8 32],
            I64 i64 [2 1 4, 4 2 8, 8 4 16],
            U64 u64 [2 1 4, 4 2 8, 8 4 16],
            F64 f64 [2 1 4, 4 2 8, 8 4 16],
            Bool bool [2 1 4, 4 2 8, 8 4 16, 16 8 32, 32 16 64, 64 32 128])
    };
}

pub(crate) use dispatch;

/// Resolve case `id` for one vector type, applying the exhaustive switch.
pub fn resolve<T: Catalog, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
    vector: VectorType,
) -> Result<Case<T>> {
    let Some(case) = T::build::<N, HALF, DOUBLE>(id, options)? else {
        return Err(if is_known(id) {
            Error::Unsupported { case: id, vector }
        } else {
            Error::UnknownCase(id)
        });
    };
    let narrow = T::BITS <= 16 && T::TYPE != ElementType::Bool;
    let half_default = T::TYPE == ElementType::F16 && HALF_EXHAUSTIVE.contains(&id);
    if narrow && (options.exhaustive || half_default) {
        debug!(case = id, %vector, "enumerating the whole lane domain");
        return Ok(case.exhaustive());
    }
    Ok(case)
}

/// Listing entry for one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseInfo {
    pub id: u32,
    pub name: &'static str,
    pub plan: String,
    pub shape: Shape,
    pub budget: String,
    pub flags: String,
    pub max_errors: usize,
}

impl<T> From<&Case<T>> for CaseInfo {
    fn from(case: &Case<T>) -> Self {
        Self {
            id: case.id,
            name: case.name,
            plan: case.plan.to_string(),
            shape: case.shape,
            budget: case.policy.budget(),
            flags: case.policy.flags(),
            max_errors: case.max_errors,
        }
    }
}

/// Describe case `id` for a vector type; `None` when it is not defined there.
pub fn describe(vector: VectorType, id: u32, options: &CaseOptions) -> Result<Option<CaseInfo>> {
    dispatch!(vector, describe_typed(id, options, vector))
}

fn describe_typed<T: Catalog, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
    vector: VectorType,
) -> Result<Option<CaseInfo>> {
    match resolve::<T, N, HALF, DOUBLE>(id, options, vector) {
        Ok(case) => Ok(Some(CaseInfo::from(&case))),
        Err(Error::Unsupported { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Every case defined for a vector type, with default options
pub fn list(vector: VectorType) -> Result<Vec<CaseInfo>> {
    let options = CaseOptions::default();
    let mut cases = Vec::new();
    for &id in CASE_IDS {
        if let Some(info) = describe(vector, id, &options)? {
            cases.push(info);
        }
    }
    Ok(cases)
}

/// Index list of a fixed-index case: the configured list, which must hold
/// exactly `N` entries, or `default` applied to each lane.
pub(crate) fn fixed_indexes<const N: usize>(
    id: u32,
    options: &CaseOptions,
    default: impl Fn(usize) -> i32,
) -> Result<[i32; N]> {
    let list = options.indexes.as_slice();
    if list.is_empty() {
        return Ok(std::array::from_fn(default));
    }
    <[i32; N]>::try_from(list).map_err(|_| Error::IndexCount {
        case: id,
        expected: N,
        found: list.len(),
    })
}

/// Lane count as an index value
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn lanes_i32(n: usize) -> i32 {
    n as i32
}

/// Trial plan with random indexes drawn modulo `modulo`
pub(crate) fn trials(modulo: usize) -> Plan {
    Plan::Trials {
        count: crate::case::TRIALS,
        modulo: u32::try_from(modulo).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(s: &str) -> VectorType {
        s.parse().unwrap()
    }

    #[test]
    fn test_unknown_and_unsupported_cases() {
        let options = CaseOptions::default();
        assert!(matches!(
            resolve::<i32, 4, 2, 8>(9999, &options, vector("i32x4")),
            Err(Error::UnknownCase(9999))
        ));
        assert!(matches!(
            resolve::<i32, 4, 2, 8>(212, &options, vector("i32x4")),
            Err(Error::Unsupported { case: 212, .. })
        ));
    }

    #[test]
    fn test_every_listed_id_builds_somewhere() {
        let mut seen = std::collections::BTreeSet::new();
        for vector in VectorType::all() {
            for info in list(vector).unwrap() {
                seen.insert(info.id);
            }
        }
        let missing: Vec<u32> = CASE_IDS.iter().copied().filter(|id| !seen.contains(id)).collect();
        assert!(missing.is_empty(), "never built: {missing:?}");
    }

    #[test]
    fn test_half_classification_is_exhaustive_by_default() {
        let case = resolve::<f16, 8, 4, 16>(212, &CaseOptions::default(), vector("f16x8")).unwrap();
        assert_eq!(case.plan, Plan::Diagonal);
        let case = resolve::<f16, 8, 4, 16>(1, &CaseOptions::default(), vector("f16x8")).unwrap();
        assert_eq!(case.plan, Plan::Cross);
        let options = CaseOptions {
            exhaustive: true,
            ..CaseOptions::default()
        };
        let case = resolve::<i16, 8, 4, 16>(104, &options, vector("i16x8")).unwrap();
        assert_eq!(case.plan, Plan::Diagonal);
        let case = resolve::<i32, 4, 2, 8>(104, &options, vector("i32x4")).unwrap();
        assert_eq!(case.plan, Plan::Cross);
    }

    #[test]
    fn test_fixed_index_count_is_checked() {
        let options = CaseOptions {
            indexes: IndexList(vec![1, 2, 3]),
            ..CaseOptions::default()
        };
        assert!(matches!(
            fixed_indexes::<4>(700, &options, |k| lanes_i32(k)),
            Err(Error::IndexCount { expected: 4, found: 3, .. })
        ));
        assert_eq!(fixed_indexes::<2>(700, &CaseOptions::default(), |k| lanes_i32(k) * 2).unwrap(), [0, 2]);
    }
}
