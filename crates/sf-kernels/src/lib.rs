//! `sf-kernels` - Element-wise fusion kernels with interchangeable backends.
//!
//! This crate provides:
//! - A `Matrix` type whose rows are 16-byte aligned buffers
//! - An `Element` trait covering the six supported scalar types
//! - A `FusionBackend` trait with scalar, SSE intrinsic and inline-asm
//!   implementations (plus a rayon-parallel one behind the `parallel` feature)
//! - Runtime CPU feature detection for the vector kernels
//!
//! Integers compute `min(a, b) + max(a, b)`, floats compute `sqrt(a) + sqrt(b)`.

pub mod asm;
pub mod backend;
pub mod detect;
pub mod dtype;
pub mod element;
pub mod error;
pub mod intrinsic;
pub mod matrix;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod scalar;

// Re-export primary types at the crate root for convenience.
pub use asm::AsmBackend;
pub use backend::FusionBackend;
pub use detect::{CpuInfo, SimdFeature};
pub use dtype::DType;
pub use element::Element;
pub use error::{KernelError, Result};
pub use intrinsic::IntrinsicBackend;
pub use matrix::{Matrix, ROW_ALIGN};
#[cfg(feature = "parallel")]
pub use parallel::ParallelIntrinsicBackend;
pub use scalar::ScalarBackend;
