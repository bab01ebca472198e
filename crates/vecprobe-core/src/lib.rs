//! vecprobe core - correctness harness for the vecprobe SIMD library
//!
//! Every test case drives one vector operation over a seeded corpus of
//! lane values and checks each output lane against a scalar reference:
//! - A multiply-with-carry PRNG, so a seed reproduces a run exactly
//! - Corpora seeded with boundary values and IEEE-754 special patterns
//! - Scalar oracles evaluated in wider precision
//! - A comparator with ULP budgets and per-case exemptions
//! - A driver that stops at an error cap and reports divergences
//!
//! # Example
//!
//! ```rust,no_run
//! use vecprobe_core::{run_config, RunConfig};
//!
//! let config = RunConfig {
//!     case: 104,
//!     vector: "Vec4i".parse()?,
//!     ..RunConfig::default()
//! };
//! let summary = run_config(&config, &mut std::io::stdout())?;
//! std::process::exit(summary.exit_code());
//! # Ok::<(), vecprobe_core::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

pub mod case;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod driver;
pub mod element;
pub mod error;
pub mod oracle;
pub mod prng;
pub mod random;
pub mod report;
pub mod scalar;

pub use catalog::{describe, list, CaseInfo, CaseOptions, CASE_IDS};
pub use compare::{Policy, Verdict};
pub use config::{ElementType, IndexList, RunConfig, SweepPlan, VectorType, DONT_CARE};
pub use driver::{run_config, RunSummary};
pub use error::{Error, Result};
pub use prng::Mwc;
pub use scalar::{Expected, Scalar};
