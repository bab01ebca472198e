//! vecprobe SIMD - portable fixed-width lane vectors
//!
//! This crate provides the vector library exercised by the vecprobe
//! harness:
//! - `Simd<T, N>` over integer, floating point, half precision and boolean lanes
//! - Lanewise arithmetic, comparisons, saturation and horizontal reductions
//! - Width-changing conversions with compile-time lane count checks
//! - Permute, blend, lookup, gather and scatter
//! - Elementary math functions
//!
//! # Example
//!
//! ```rust
//! use vecprobe_simd::Simd;
//!
//! let a = Simd::from_array([127i8, -128, 5, 0]);
//! let b = Simd::splat(1i8);
//! assert_eq!(a.add_saturated(b).to_array(), [127, -127, 6, 1]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

pub mod arith;
pub mod convert;
pub mod detect;
pub mod lane;
pub mod mask;
pub mod permute;
pub mod vector;

pub use detect::{CpuFeatures, InstructionSet};
pub use lane::{Bits, Float, Int, Lane, Narrow, Num, ToFloat, Unary, Widen};
pub use permute::DONT_CARE;
pub use vector::{Mask, Simd};

/// Runtime instruction-set level of the current CPU
pub fn instruction_set() -> InstructionSet {
    CpuFeatures::detect().instruction_set()
}

/// Instruction-set level this build was compiled for
pub fn compiled_instruction_set() -> InstructionSet {
    CpuFeatures::compiled().instruction_set()
}
