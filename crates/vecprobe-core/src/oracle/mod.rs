//! Scalar reference implementations
//!
//! Every function here computes the expected value of one output position
//! with plain scalar arithmetic, in a wider type where one exists: `i128`
//! for integers and `f64` for floats. None of them call the vector library.

pub mod arith;
pub mod convert;
pub mod float;
pub mod integer;
pub mod math;
pub mod permute;
