use std::io::{self, Write};
use std::time::Duration;

use sf_kernels::DType;

use crate::runner::Strategy;
use crate::timing::format_millis;

/// What happened when one strategy ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The strategy ran; `mismatch` is the first cell that differs from the
    /// scalar result, if any.
    Completed {
        elapsed: Duration,
        mismatch: Option<(usize, usize)>,
    },
    /// The strategy cannot run on this machine.
    Skipped { reason: String },
}

/// One line of a type's report.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub outcome: Outcome,
}

/// Everything measured for one element type.
#[derive(Debug, Clone)]
pub struct TypeReport {
    pub dtype: DType,
    pub dims: (usize, usize),
    pub results: Vec<StrategyResult>,
    /// Pre-rendered `A`, `B` and result matrices when dumps are enabled.
    pub dump: Option<String>,
}

impl TypeReport {
    /// Returns true if every strategy that ran agreed with the scalar result.
    pub fn all_match(&self) -> bool {
        self.results.iter().all(|r| {
            !matches!(
                r.outcome,
                Outcome::Completed {
                    mismatch: Some(_),
                    ..
                }
            )
        })
    }

    /// Elapsed time for `strategy`, if it ran.
    pub fn elapsed(&self, strategy: Strategy) -> Option<Duration> {
        self.results.iter().find_map(|r| match r.outcome {
            Outcome::Completed { elapsed, .. } if r.strategy == strategy => Some(elapsed),
            _ => None,
        })
    }

    /// Write the report in the console layout:
    ///
    /// ```text
    /// TEST FOR i8
    /// START TESTING
    /// Simple implementation: 1.234ms
    /// Intrinsic implementation: 0.321ms
    /// Asm implementation: 0.300ms
    ///
    /// ```
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "TEST FOR {}", self.dtype)?;
        writeln!(out, "START TESTING")?;
        for result in &self.results {
            write!(out, "{} implementation: ", result.strategy.label())?;
            match &result.outcome {
                Outcome::Completed { elapsed, mismatch } => {
                    write!(out, "{}", format_millis(*elapsed))?;
                    if let Some((row, col)) = mismatch {
                        write!(out, " (MISMATCH at row {}, col {})", row, col)?;
                    }
                    writeln!(out)?;
                }
                Outcome::Skipped { reason } => writeln!(out, "skipped ({})", reason)?,
            }
        }
        if let Some(dump) = &self.dump {
            write!(out, "{}", dump)?;
        }
        writeln!(out)
    }
}
