use std::fmt::Debug;

use crate::element::Element;
use crate::error::{KernelError, Result};
use crate::matrix::Matrix;

/// Trait for interchangeable fusion backends (scalar, SSE intrinsics, asm, ...).
///
/// Every backend computes the same result: `c[i][j] = T::fuse(a[i][j], b[i][j])`.
/// Backends differ only in how they get there.
pub trait FusionBackend<T: Element>: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "scalar", "intrinsic").
    fn name(&self) -> &str;

    /// Element-wise fusion of `a` and `b` into `c`.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the three matrices differ in shape.
    /// - `UnsupportedCpu` / `UnsupportedArch` if this backend cannot run
    ///   here. `c` is left untouched in that case.
    fn fuse(&self, a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()>;
}

/// Checks that `a`, `b` and `c` all share the same dimensions.
pub fn check_dims<T: Element>(a: &Matrix<T>, b: &Matrix<T>, c: &Matrix<T>) -> Result<()> {
    for other in [b.dims(), c.dims()] {
        if other != a.dims() {
            return Err(KernelError::DimensionMismatch {
                expected: a.dims(),
                got: other,
            });
        }
    }
    Ok(())
}

/// Checks that the vector kernels for `T` can run on this machine.
pub(crate) fn ensure_simd<T: Element>(backend: &'static str) -> Result<()> {
    if !cfg!(target_arch = "x86_64") {
        return Err(KernelError::UnsupportedArch { backend });
    }
    if !T::SIMD_FEATURE.is_detected() {
        return Err(KernelError::UnsupportedCpu {
            backend,
            feature: T::SIMD_FEATURE.name(),
        });
    }
    Ok(())
}
