use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing value: expected {0}")]
    MissingValue(&'static str),
    #[error("invalid {what}: {value:?} is not a non-negative integer")]
    InvalidNumber { what: &'static str, value: String },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("kernel error: {0}")]
    Kernel(#[from] sf_kernels::KernelError),
}

pub type Result<T> = std::result::Result<T, BenchError>;
