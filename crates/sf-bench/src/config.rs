use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use crate::error::ConfigError;

/// Column counts are rounded down to a multiple of this many elements.
///
/// 16 is the lane count of the narrowest type (i8), so every row splits into
/// whole vectors for all six types.
pub const COLUMN_MULTIPLE: usize = 16;

/// Set to `1`, `true`, `yes` or `on` to print the input and result matrices.
pub const DUMP_ENV: &str = "SF_BENCH_DUMP";

/// Fixed RNG seed; the clock is used when unset.
pub const SEED_ENV: &str = "SF_BENCH_SEED";

/// Benchmark parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Number of matrix rows.
    pub rows: usize,
    /// Number of matrix columns, already rounded to [`COLUMN_MULTIPLE`].
    pub cols: usize,
    /// Print `A`, `B` and the result after each type's timings.
    pub dump: bool,
    /// Seed for the random fill.
    pub seed: u64,
}

impl BenchConfig {
    /// Config for a `rows x cols` run with dumps off and a clock-derived seed.
    ///
    /// `cols` is rounded down to a multiple of [`COLUMN_MULTIPLE`].
    pub fn new(rows: usize, cols: usize) -> Self {
        BenchConfig {
            rows,
            cols: round_columns(cols),
            dump: false,
            seed: clock_seed(),
        }
    }

    /// Parse `"<rows> <cols>"` from benchmark input.
    pub fn from_input(input: &str) -> Result<Self, ConfigError> {
        let (rows, cols) = parse_dims(input)?;
        Ok(Self::new(rows, cols))
    }

    /// Read all of `reader` and parse it with [`BenchConfig::from_input`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_input(&input)
    }

    /// Apply [`DUMP_ENV`] and [`SEED_ENV`] using `lookup` to read variables.
    ///
    /// # Errors
    /// Returns `InvalidEnv` for values that are set but malformed.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(DUMP_ENV) {
            self.dump = parse_flag(DUMP_ENV, &value)?;
        }
        if let Some(value) = lookup(SEED_ENV) {
            self.seed = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: SEED_ENV,
                    value: value.clone(),
                })?;
        }
        debug!("bench config: {:?}", self);
        Ok(self)
    }

    /// Number of elements in each matrix, saturating at `usize::MAX`.
    pub fn numel(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

/// Parse the first two whitespace-separated integers: rows, then columns.
pub fn parse_dims(input: &str) -> Result<(usize, usize), ConfigError> {
    let mut tokens = input.split_whitespace();
    let rows = parse_count(tokens.next(), "row count")?;
    let cols = parse_count(tokens.next(), "column count")?;
    Ok((rows, cols))
}

fn parse_count(token: Option<&str>, what: &'static str) -> Result<usize, ConfigError> {
    let token = token.ok_or(ConfigError::MissingValue(what))?;
    token.parse().map_err(|_| ConfigError::InvalidNumber {
        what,
        value: token.to_string(),
    })
}

/// Round `cols` down to a multiple of [`COLUMN_MULTIPLE`].
pub fn round_columns(cols: usize) -> usize {
    let rounded = cols - cols % COLUMN_MULTIPLE;
    if rounded != cols {
        warn!(
            "column count {} rounded down to {} (multiple of {})",
            cols, rounded, COLUMN_MULTIPLE
        );
    }
    if rounded == 0 && cols != 0 {
        warn!("no columns left after rounding; matrices will be empty");
    }
    rounded
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
