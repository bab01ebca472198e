//! Console diagnostics
//!
//! Everything the reporter prints is a pure function of the run's inputs,
//! so two runs with the same seed produce the same bytes.

use std::io::{self, Write};

use crate::case::{Case, Inputs, Shape};
use crate::compare::Verdict;
use crate::config::DONT_CARE;
use crate::driver::RunSummary;
use crate::element::Element;
use crate::scalar::{Expected, Scalar};

/// One compared output position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub actual: Scalar,
    pub expected: Expected,
    pub verdict: Verdict,
}

impl Row {
    fn marker(&self) -> &'static str {
        if self.verdict.is_equal() {
            "   "
        } else {
            "-> "
        }
    }
}

/// Writes divergence blocks and the run footer to any sink.
pub struct Reporter<'w, W: Write> {
    out: &'w mut W,
    header_written: bool,
}

impl<'w, W: Write> Reporter<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Report one vector with at least one diverging position.
    pub fn divergence<T: Element>(
        &mut self,
        case: &Case<T>,
        at: (usize, usize),
        inputs: &Inputs<'_, T>,
        rows: &[Row],
    ) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "test case {} ({}):", case.id, case.name)?;
            self.header_written = true;
        }
        writeln!(self.out, "Error at {}, {}:", at.0, at.1)?;
        let budgeted = case.policy.ulps.is_some();

        match case.shape {
            Shape::Indexed => {
                let labels = case.labels(inputs).unwrap_or_default();
                writeln!(self.out, "index, input, output, expected:")?;
                for (n, row) in rows.iter().enumerate() {
                    let index = match labels.get(n) {
                        Some(&DONT_CARE) => "dc".to_string(),
                        Some(index) => index.to_string(),
                        None => n.to_string(),
                    };
                    writeln!(
                        self.out,
                        "{}{index}, {}, {}, {}{}",
                        row.marker(),
                        lane(inputs.a, n),
                        row.actual,
                        row.expected,
                        row.verdict.suffix(budgeted)
                    )?;
                }
            }
            Shape::Scalar => {
                let operands: Vec<String> =
                    (0..case.lanes).map(|n| lane(inputs.a, n)).collect();
                for (n, row) in rows.iter().enumerate() {
                    self.lane_row(&format!("[{}]", operands.join(" ")), n, row, budgeted)?;
                }
            }
            Shape::Lanewise | Shape::Whole => {
                for (n, row) in rows.iter().enumerate() {
                    if case.shape == Shape::Lanewise && row.verdict.is_equal() {
                        continue;
                    }
                    let operands = if case.binary {
                        format!("{}, {}", lane(inputs.a, n), lane(inputs.b, n))
                    } else {
                        lane(inputs.a, n)
                    };
                    self.lane_row(&operands, n, row, budgeted)?;
                }
            }
        }
        Ok(())
    }

    fn lane_row(&mut self, operands: &str, n: usize, row: &Row, budgeted: bool) -> io::Result<()> {
        writeln!(
            self.out,
            "{operands}: {}{n:2}: {} {} {}{}",
            row.marker(),
            row.actual,
            row.verdict,
            row.expected,
            row.verdict.suffix(budgeted)
        )
    }

    /// Closing lines of a run.
    pub fn summary(&mut self, summary: &RunSummary, budgeted: bool) -> io::Result<()> {
        if let Some(note) = &summary.note {
            writeln!(self.out, "{note}")?;
        }
        if budgeted {
            writeln!(self.out, "Accuracy = {:.2} ULP", summary.max_ulps.unwrap_or(0.0))?;
        }
        if summary.aborted {
            writeln!(self.out, "too many errors, stopped after {}", summary.errors)?;
        } else if summary.errors == 0 {
            writeln!(self.out, "success")?;
        }
        self.out.flush()
    }
}

/// Input lane `n` as text, `-` when the operand has no such lane.
fn lane<T: Element>(lanes: &[T], n: usize) -> String {
    lanes
        .get(n)
        .map_or_else(|| "-".to_string(), |x| x.to_scalar().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{binary, unary};
    use crate::oracle::arith;

    #[test]
    fn test_lanewise_block_shows_only_divergent_lanes() {
        let case = binary::<i32, i32, 4>(1, "add", |a, b| a + b, arith::add);
        let a = [1, 2, 3, 4];
        let b = [-1, 0, 0, 0];
        let inputs = Inputs {
            a: &a,
            b: &b,
            flags: &[],
            bitfield: 0,
            indexes: &[],
            table: &[],
        };
        let rows = [
            Row {
                actual: Scalar::Signed(0),
                expected: Expected::of(0i32),
                verdict: Verdict::Match { deviation: 0.0 },
            },
            Row {
                actual: Scalar::Signed(-3),
                expected: Expected::of(2i32),
                verdict: Verdict::Mismatch { deviation: None },
            },
        ];
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out);
        reporter.divergence(&case, (4, 8), &inputs, &rows).unwrap();
        reporter.divergence(&case, (4, 12), &inputs, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "test case 1 (add):\nError at 4, 8:\n2, 0: ->  1: -3 != 2\nError at 4, 12:\n2, 0: ->  1: -3 != 2\n"
        );
    }

    #[test]
    fn test_unary_diagonal_rows_show_one_operand() {
        let case = unary::<i32, i32, 4>(8, "neg", |a| -a, arith::neg).exhaustive();
        let a = [7, -2, 0, 5];
        // The diagonal walk hands a unary case its own corpus as `b`.
        let inputs = Inputs {
            a: &a,
            b: &a,
            flags: &[],
            bitfield: 0,
            indexes: &[],
            table: &[],
        };
        let rows = [Row {
            actual: Scalar::Signed(7),
            expected: Expected::of(-7i32),
            verdict: Verdict::Mismatch { deviation: None },
        }];
        let mut out = Vec::new();
        Reporter::new(&mut out).divergence(&case, (3, 3), &inputs, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "test case 8 (neg):\nError at 3, 3:\n7: ->  0: 7 != -7\n");
    }
}
