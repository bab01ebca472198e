//! Run driver
//!
//! One run builds its corpora, walks the operand vectors in a fixed order,
//! and feeds every invocation through the comparator. Nothing is shared
//! between runs, so a sweep may execute them on any number of threads.

use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

use crate::case::{Case, Inputs, Plan, Shape, TABLE_LEN};
use crate::catalog::{self, dispatch, Catalog, CaseOptions};
use crate::compare::{compare, LaneContext, Verdict};
use crate::config::{RunConfig, VectorType};
use crate::element::Element;
use crate::error::Result;
use crate::prng::Mwc;
use crate::report::{Reporter, Row};

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub case: u32,
    pub name: String,
    pub vector: VectorType,
    pub seed: i64,
    /// Diverging output positions
    pub errors: usize,
    /// Divergences excused by the case policy
    pub ignored: usize,
    /// Largest deviation seen, in ULP, when the case has a budget
    pub max_ulps: Option<f64>,
    /// The error cap was exceeded and the run stopped early
    pub aborted: bool,
    /// Invocations performed
    pub vectors: usize,
    pub note: Option<String>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    /// Process exit code: the error count, saturated to what a process can
    /// report.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.errors.min(255)).unwrap_or(255)
    }
}

/// Resolve the configured case for its vector type and run it.
pub fn run_config<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunSummary> {
    let options = CaseOptions::from(config);
    dispatch!(config.vector, run_typed(config, &options, out))
}

fn run_typed<T: Catalog, const N: usize, const HALF: usize, const DOUBLE: usize>(
    config: &RunConfig,
    options: &CaseOptions,
    out: &mut impl Write,
) -> Result<RunSummary> {
    let case = catalog::resolve::<T, N, HALF, DOUBLE>(config.case, options, config.vector)?;
    run_case(&case, config, out)
}

/// Run an already resolved case.
pub fn run_case<T: Element, W: Write>(
    case: &Case<T>,
    config: &RunConfig,
    out: &mut W,
) -> Result<RunSummary> {
    info!(
        case = case.id,
        name = case.name,
        vector = %config.vector,
        seed = config.seed,
        plan = %case.plan,
        "starting run"
    );
    let mut rng = Mwc::new(config.seed);
    let mut run = Run {
        case,
        reporter: Reporter::new(out),
        cap: config.max_errors.unwrap_or(case.max_errors),
        errors: 0,
        ignored: 0,
        max_ulps: None,
        vectors: 0,
    };
    let n = case.lanes;

    let aborted = match case.plan {
        Plan::Trials { count, modulo } => {
            let mut aborted = false;
            for trial in 0..count {
                let (indexes, table) = trial_tables::<T>(&mut rng, modulo);
                let bitfield = run.bitfield(&mut rng);
                let flags = flags(bitfield, n);
                let inputs = Inputs {
                    a: &table[..n],
                    b: &table[n..2 * n],
                    flags: &flags,
                    bitfield,
                    indexes: &indexes,
                    table: &table,
                };
                if !run.check((trial, 0), &inputs)? {
                    aborted = true;
                    break;
                }
            }
            aborted
        }
        plan => {
            let a = T::corpus(&case.profile, &mut rng);
            let b = match plan {
                Plan::Cross if !case.profile.exhaustive => T::corpus(&case.profile, &mut rng),
                Plan::Single => Vec::new(),
                _ => a.clone(),
            };
            run.walk(plan, &a, &b, &mut rng)?
        }
    };

    let summary = RunSummary {
        case: case.id,
        name: case.name.to_string(),
        vector: config.vector,
        seed: config.seed,
        errors: run.errors,
        ignored: run.ignored,
        max_ulps: case.policy.ulps.map(|_| run.max_ulps.unwrap_or(0.0)),
        aborted,
        vectors: run.vectors,
        note: case.note.clone(),
    };
    if aborted {
        warn!(case = case.id, errors = summary.errors, cap = run.cap, "error cap exceeded");
    }
    run.reporter.summary(&summary, case.policy.ulps.is_some())?;
    info!(
        case = case.id,
        errors = summary.errors,
        ignored = summary.ignored,
        vectors = summary.vectors,
        "finished run"
    );
    Ok(summary)
}

/// Running state of one case
struct Run<'c, 'w, T, W: Write> {
    case: &'c Case<T>,
    reporter: Reporter<'w, W>,
    cap: usize,
    errors: usize,
    ignored: usize,
    max_ulps: Option<f64>,
    vectors: usize,
}

impl<T: Element, W: Write> Run<'_, '_, T, W> {
    /// Walk the corpus slices in row-major order. Returns whether the run
    /// was aborted.
    fn walk(&mut self, plan: Plan, a: &[T], b: &[T], rng: &mut Mwc) -> Result<bool> {
        let n = self.case.lanes;
        let b_len = b.len();
        let pairs: Box<dyn Iterator<Item = (usize, usize)>> = match plan {
            Plan::Cross => Box::new(
                (0..a.len())
                    .step_by(n)
                    .flat_map(move |i| (0..b_len).step_by(n).map(move |j| (i, j))),
            ),
            _ => Box::new((0..a.len()).step_by(n).map(|i| (i, i))),
        };
        for (i, j) in pairs {
            let bitfield = self.bitfield(rng);
            let flags = flags(bitfield, n);
            let inputs = Inputs {
                a: &a[i..i + n],
                b: if b.is_empty() { &[] } else { &b[j..j + n] },
                flags: &flags,
                bitfield,
                indexes: &[],
                table: &[],
            };
            if !self.check((i, j), &inputs)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn bitfield(&self, rng: &mut Mwc) -> u64 {
        if self.case.uses_bitfield {
            rng.next_u64()
        } else {
            0
        }
    }

    /// Invoke, compare and report one vector. Returns `false` once the
    /// error cap is exceeded.
    fn check(&mut self, at: (usize, usize), inputs: &Inputs<'_, T>) -> Result<bool> {
        self.vectors += 1;
        let actual = self.case.invoke(inputs);
        let expected = self.case.reference(inputs);
        debug_assert_eq!(actual.len(), expected.len(), "case {}", self.case.id);

        let lanewise = self.case.shape == Shape::Lanewise && T::TYPE.is_float();
        let mut errors = 0;
        let rows: Vec<Row> = actual
            .iter()
            .zip(&expected)
            .enumerate()
            .map(|(n, (&actual, expected))| {
                let ctx = if lanewise {
                    LaneContext {
                        a: inputs.a.get(n).map(|x| x.to_scalar().as_f64()),
                        b: inputs.b.get(n).map(|x| x.to_scalar().as_f64()),
                    }
                } else {
                    LaneContext::default()
                };
                let verdict = compare(actual, expected, &self.case.policy, &ctx);
                match verdict {
                    Verdict::Match { deviation } | Verdict::Mismatch { deviation: Some(deviation) }
                        if deviation.is_finite() =>
                    {
                        self.max_ulps = Some(self.max_ulps.map_or(deviation, |m| m.max(deviation)));
                    }
                    Verdict::Ignored { .. } => self.ignored += 1,
                    _ => {}
                }
                if verdict.is_error() {
                    errors += 1;
                }
                Row {
                    actual,
                    expected: *expected,
                    verdict,
                }
            })
            .collect();

        if errors == 0 {
            return Ok(true);
        }
        self.errors += errors;
        self.reporter.divergence(self.case, at, inputs, &rows)?;
        Ok(self.errors <= self.cap)
    }
}

/// Index and data tables for one trial, drawn interleaved.
#[allow(clippy::cast_possible_wrap)]
fn trial_tables<T: Element>(rng: &mut Mwc, modulo: u32) -> (Vec<i32>, Vec<T>) {
    let modulo = modulo.max(1);
    let mut indexes = Vec::with_capacity(TABLE_LEN);
    let mut table = Vec::with_capacity(TABLE_LEN);
    for _ in 0..TABLE_LEN {
        indexes.push((rng.next() % modulo) as i32);
        table.push(T::random(rng));
    }
    (indexes, table)
}

fn flags(bitfield: u64, n: usize) -> Vec<bool> {
    (0..n).map(|k| (bitfield >> (k % 64)) & 1 == 1).collect()
}
