use std::io::Write;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sf_kernels::{
    AsmBackend, CpuInfo, DType, Element, FusionBackend, IntrinsicBackend, KernelError, Matrix,
    ScalarBackend,
};

use crate::config::BenchConfig;
use crate::error::Result;
use crate::fill::{fill_with_random, RandomElement};
use crate::report::{Outcome, StrategyResult, TypeReport};
use crate::timing::measure;

/// One way of computing the fused result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Scalar loops; the reference result.
    Simple,
    /// SSE intrinsics.
    Intrinsic,
    /// Inline assembly.
    Asm,
    /// SSE intrinsics with rows spread over rayon's pool.
    #[cfg(feature = "parallel")]
    ParallelIntrinsic,
}

impl Strategy {
    /// Strategies in run order. `Simple` comes first so later results can be
    /// checked against it.
    pub fn all() -> &'static [Strategy] {
        #[cfg(not(feature = "parallel"))]
        const ALL: &[Strategy] = &[Strategy::Simple, Strategy::Intrinsic, Strategy::Asm];
        #[cfg(feature = "parallel")]
        const ALL: &[Strategy] = &[
            Strategy::Simple,
            Strategy::Intrinsic,
            Strategy::Asm,
            Strategy::ParallelIntrinsic,
        ];
        ALL
    }

    /// Label used in the report.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Simple => "Simple",
            Strategy::Intrinsic => "Intrinsic",
            Strategy::Asm => "Asm",
            #[cfg(feature = "parallel")]
            Strategy::ParallelIntrinsic => "Parallel intrinsic",
        }
    }

    /// Backend implementing this strategy for `T`.
    pub fn backend<T: Element>(&self) -> Box<dyn FusionBackend<T>> {
        match self {
            Strategy::Simple => Box::new(ScalarBackend::new()),
            Strategy::Intrinsic => Box::new(IntrinsicBackend::new()),
            Strategy::Asm => Box::new(AsmBackend::new()),
            #[cfg(feature = "parallel")]
            Strategy::ParallelIntrinsic => Box::new(sf_kernels::ParallelIntrinsicBackend::new()),
        }
    }
}

/// Benchmark every strategy for element type `T`.
///
/// Allocates `a` and `b`, fills them from `rng`, then times each strategy
/// into its own output matrix and compares it with the scalar output.
/// Strategies the CPU cannot run are reported as skipped.
pub fn run_test<T: RandomElement, R: Rng + ?Sized>(
    config: &BenchConfig,
    rng: &mut R,
) -> Result<TypeReport> {
    let (rows, cols) = (config.rows, config.cols);
    info!("benchmarking {} on {}x{} matrices", T::DTYPE, rows, cols);

    let mut a = Matrix::<T>::zeros(rows, cols);
    let mut b = Matrix::<T>::zeros(rows, cols);
    fill_with_random(&mut a, rng);
    fill_with_random(&mut b, rng);

    let mut reference: Option<Matrix<T>> = None;
    let mut results = Vec::with_capacity(Strategy::all().len());

    for &strategy in Strategy::all() {
        let backend = strategy.backend::<T>();
        let mut c = Matrix::zeros(rows, cols);
        let (status, elapsed) = measure(|| backend.fuse(&a, &b, &mut c));

        let outcome = match status {
            Ok(()) => {
                let mismatch = match &reference {
                    Some(expected) => expected.first_mismatch(&c)?,
                    None => None,
                };
                if let Some((i, j)) = mismatch {
                    error!(
                        "{} {} result differs from scalar at ({}, {})",
                        T::DTYPE,
                        backend.name(),
                        i,
                        j
                    );
                }
                if reference.is_none() {
                    reference = Some(c);
                }
                Outcome::Completed { elapsed, mismatch }
            }
            Err(e @ (KernelError::UnsupportedCpu { .. } | KernelError::UnsupportedArch { .. })) => {
                warn!("skipping {} for {}: {}", backend.name(), T::DTYPE, e);
                Outcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e.into()),
        };
        results.push(StrategyResult { strategy, outcome });
    }

    let dump = if config.dump {
        let mut text = format!("A:\n{}B:\n{}", a, b);
        if let Some(c) = &reference {
            text.push_str(&format!("C:\n{}", c));
        }
        Some(text)
    } else {
        None
    };

    Ok(TypeReport {
        dtype: T::DTYPE,
        dims: (rows, cols),
        results,
        dump,
    })
}

/// Benchmark all six element types in [`DType::ALL`] order, writing each
/// report to `out` as soon as it is ready.
pub fn run_all<W: Write>(config: &BenchConfig, out: &mut W) -> Result<Vec<TypeReport>> {
    let cpu = CpuInfo::detect();
    info!("CPU features: {}", cpu);
    info!("random seed: {}", config.seed);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut reports = Vec::with_capacity(DType::ALL.len());

    for dtype in DType::ALL {
        let report = match dtype {
            DType::I8 => run_test::<i8, _>(config, &mut rng)?,
            DType::I16 => run_test::<i16, _>(config, &mut rng)?,
            DType::I32 => run_test::<i32, _>(config, &mut rng)?,
            DType::I64 => run_test::<i64, _>(config, &mut rng)?,
            DType::F32 => run_test::<f32, _>(config, &mut rng)?,
            DType::F64 => run_test::<f64, _>(config, &mut rng)?,
        };
        report.render(out)?;
        reports.push(report);
    }

    Ok(reports)
}
