use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("ragged rows: row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("{backend} backend needs {feature}, which this CPU does not report")]
    UnsupportedCpu {
        backend: &'static str,
        feature: &'static str,
    },
    #[error("{backend} backend is only available on x86_64")]
    UnsupportedArch { backend: &'static str },
}

pub type Result<T> = std::result::Result<T, KernelError>;
