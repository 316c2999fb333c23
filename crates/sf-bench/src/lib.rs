//! `sf-bench` - Timing harness for the `sf-kernels` fusion strategies.
//!
//! Reads matrix dimensions, fills two random matrices per element type, times
//! every strategy on them and cross-checks each result against the scalar
//! baseline.

pub mod config;
pub mod error;
pub mod fill;
pub mod report;
pub mod runner;
pub mod timing;

pub use config::BenchConfig;
pub use error::{BenchError, ConfigError, Result};
pub use fill::{fill_with_random, RandomElement};
pub use report::{Outcome, StrategyResult, TypeReport};
pub use runner::{run_all, run_test, Strategy};
pub use timing::measure;
