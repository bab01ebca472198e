//! Run configuration
//!
//! A run is one (case, vector type, seed) combination. Vector types parse
//! from either the compact `i32x4` form or the classic `Vec4i` names, and
//! index lists parse from comma-separated integers with `dc` standing for
//! the don't-care sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Index value meaning "this output position is unconstrained".
pub const DONT_CARE: i32 = vecprobe_simd::DONT_CARE;

/// Lane element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F16,
    F32,
    F64,
    Bool,
}

impl ElementType {
    pub const ALL: [ElementType; 12] = [
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F16,
        Self::F32,
        Self::F64,
        Self::Bool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
        }
    }

    /// Storage width in bits
    pub fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 | Self::Bool => 8,
            Self::I16 | Self::U16 | Self::F16 => 16,
            Self::I32 | Self::U32 | Self::F32 => 32,
            Self::I64 | Self::U64 | Self::F64 => 64,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64)
    }

    /// Lane counts that form a supported vector of this element type.
    pub fn lane_counts(self) -> &'static [usize] {
        match self {
            Self::Bool => &[2, 4, 8, 16, 32, 64],
            Self::I8 | Self::U8 => &[16, 32, 64],
            Self::I16 | Self::U16 | Self::F16 => &[8, 16, 32],
            Self::I32 | Self::U32 | Self::F32 => &[4, 8, 16],
            Self::I64 | Self::U64 | Self::F64 => &[2, 4, 8],
        }
    }

    /// Suffix used by the classic `Vec<N><suffix>` names
    fn classic_suffix(self) -> &'static str {
        match self {
            Self::I8 => "c",
            Self::U8 => "uc",
            Self::I16 => "s",
            Self::U16 => "us",
            Self::I32 => "i",
            Self::U32 => "ui",
            Self::I64 => "q",
            Self::U64 => "uq",
            Self::F16 => "h",
            Self::F32 => "f",
            Self::F64 => "d",
            Self::Bool => "b",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::InvalidVectorType(s.to_string()))
    }
}

/// Element type plus lane count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VectorType {
    pub element: ElementType,
    pub lanes: usize,
}

impl VectorType {
    pub fn new(element: ElementType, lanes: usize) -> Result<Self> {
        if element.lane_counts().contains(&lanes) {
            Ok(Self { element, lanes })
        } else {
            Err(Error::InvalidVectorType(format!("{element}x{lanes}")))
        }
    }

    /// Every supported vector type, ordered by element then width
    pub fn all() -> impl Iterator<Item = VectorType> {
        ElementType::ALL.into_iter().flat_map(|element| {
            element
                .lane_counts()
                .iter()
                .map(move |&lanes| VectorType { element, lanes })
        })
    }

    /// Total width in bits
    pub fn bits(self) -> usize {
        self.lanes * self.element.bits() as usize
    }

    /// Classic name such as `Vec4i` or `Vec16cb`
    pub fn classic_name(self) -> String {
        format!("Vec{}{}", self.lanes, self.element.classic_suffix())
    }

    fn parse_classic(s: &str) -> Option<(ElementType, usize)> {
        let rest = s.strip_prefix("Vec")?;
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let lanes: usize = rest[..digits].parse().ok()?;
        let suffix = &rest[digits..];
        // Boolean vectors carry the suffix of the element type they mask,
        // e.g. `Vec4ib` or `Vec8fb`.
        if suffix.len() > 1 {
            if let Some(masked) = suffix.strip_suffix('b') {
                return ElementType::ALL
                    .into_iter()
                    .any(|t| t != ElementType::Bool && t.classic_suffix() == masked)
                    .then_some((ElementType::Bool, lanes));
            }
        }
        ElementType::ALL
            .into_iter()
            .find(|t| t.classic_suffix() == suffix)
            .map(|t| (t, lanes))
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.element, self.lanes)
    }
}

impl FromStr for VectorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidVectorType(s.to_string());
        let (element, lanes) = if s.starts_with("Vec") {
            Self::parse_classic(s).ok_or_else(invalid)?
        } else {
            let (element, lanes) = s.rsplit_once('x').ok_or_else(invalid)?;
            let element = element.parse().map_err(|_| invalid())?;
            (element, lanes.parse().map_err(|_| invalid())?)
        };
        Self::new(element, lanes)
    }
}

impl TryFrom<String> for VectorType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<VectorType> for String {
    fn from(v: VectorType) -> Self {
        v.to_string()
    }
}

impl Default for VectorType {
    fn default() -> Self {
        Self {
            element: ElementType::I32,
            lanes: 4,
        }
    }
}

/// Comma-separated index or template parameter list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexList(pub Vec<i32>);

impl IndexList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// First entry, or `default` when the list is empty
    pub fn first_or(&self, default: i32) -> i32 {
        self.0.first().copied().unwrap_or(default)
    }
}

impl FromStr for IndexList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| match t {
                "dc" | "DC" | "V_DC" | "*" => Ok(DONT_CARE),
                _ => t
                    .parse::<i32>()
                    .map_err(|_| Error::InvalidIndexes(format!("'{t}' in '{s}'"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(IndexList)
    }
}

impl fmt::Display for IndexList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, &index) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(",")?;
            }
            if index == DONT_CARE {
                f.write_str("dc")?;
            } else {
                write!(f, "{index}")?;
            }
        }
        Ok(())
    }
}

/// One test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Test case identifier
    pub case: u32,

    /// Vector type under test
    pub vector: VectorType,

    /// PRNG seed
    pub seed: i64,

    /// Index or template parameter list for cases that take one
    pub indexes: IndexList,

    /// Error cap; the case default applies when unset
    pub max_errors: Option<usize>,

    /// Enumerate every bit pattern of lanes up to 16 bits wide
    pub exhaustive: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            case: 1,
            vector: VectorType::default(),
            seed: 1,
            indexes: IndexList::default(),
            max_errors: None,
            exhaustive: false,
        }
    }
}

/// A list of runs loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepPlan {
    #[serde(default)]
    pub runs: Vec<RunConfig>,
}

impl SweepPlan {
    /// Load a plan from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse a plan from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_names() {
        let v: VectorType = "i32x4".parse().unwrap();
        assert_eq!(v.element, ElementType::I32);
        assert_eq!(v.lanes, 4);
        assert_eq!(v.to_string(), "i32x4");
        assert!("f16x8".parse::<VectorType>().is_ok());
        assert!("i32x3".parse::<VectorType>().is_err());
        assert!("q7x4".parse::<VectorType>().is_err());
    }

    #[test]
    fn test_parse_classic_names() {
        let cases = [
            ("Vec4i", ElementType::I32, 4),
            ("Vec16uc", ElementType::U8, 16),
            ("Vec8h", ElementType::F16, 8),
            ("Vec64c", ElementType::I8, 64),
            ("Vec2d", ElementType::F64, 2),
            ("Vec8fb", ElementType::Bool, 8),
            ("Vec4qb", ElementType::Bool, 4),
        ];
        for (name, element, lanes) in cases {
            let v: VectorType = name.parse().unwrap();
            assert_eq!((v.element, v.lanes), (element, lanes), "{name}");
        }
        assert_eq!(VectorType::new(ElementType::U16, 8).unwrap().classic_name(), "Vec8us");
        assert!("Vec4xb".parse::<VectorType>().is_err());
    }

    #[test]
    fn test_index_list_dont_care() {
        let list: IndexList = "3, -1, dc, V_DC,0".parse().unwrap();
        assert_eq!(list.0, vec![3, -1, DONT_CARE, DONT_CARE, 0]);
        assert_eq!(list.to_string(), "3,-1,dc,dc,0");
        assert!("1,x".parse::<IndexList>().is_err());
        assert!("".parse::<IndexList>().unwrap().is_empty());
    }

    #[test]
    fn test_sweep_plan_defaults() {
        let plan = SweepPlan::from_json(
            r#"{"runs": [{"case": 104, "vector": "Vec4i"}, {"vector": "f16x8", "seed": 7, "indexes": [1, -256]}]}"#,
        )
        .unwrap();
        assert_eq!(plan.runs.len(), 2);
        assert_eq!(plan.runs[0].case, 104);
        assert_eq!(plan.runs[0].seed, 1);
        assert_eq!(plan.runs[1].vector.to_string(), "f16x8");
        assert_eq!(plan.runs[1].indexes.0, vec![1, DONT_CARE]);
        assert!(SweepPlan::from_json(r#"{"runs": [{"vector": "i9x4"}]}"#).is_err());
    }
}
