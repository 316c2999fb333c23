use rayon::prelude::*;

use crate::backend::{check_dims, ensure_simd, FusionBackend};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;

/// Row-parallel variant of the intrinsic backend.
///
/// Rows are distributed over rayon's global pool; each row runs the same
/// SSE kernel as [`IntrinsicBackend`](crate::IntrinsicBackend). Output rows
/// are disjoint, so no synchronisation is needed beyond the join.
#[derive(Debug, Clone)]
pub struct ParallelIntrinsicBackend;

impl ParallelIntrinsicBackend {
    pub fn new() -> Self {
        ParallelIntrinsicBackend
    }
}

impl Default for ParallelIntrinsicBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> FusionBackend<T> for ParallelIntrinsicBackend {
    fn name(&self) -> &str {
        "parallel-intrinsic"
    }

    fn fuse(&self, a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
        check_dims(a, b, c)?;
        ensure_simd::<T>("parallel-intrinsic")?;

        let inputs: Vec<(&[T], &[T])> = a.rows().zip(b.rows()).collect();
        let outputs: Vec<&mut [T]> = c.rows_mut().collect();

        #[cfg(target_arch = "x86_64")]
        inputs
            .into_par_iter()
            .zip(outputs.into_par_iter())
            .for_each(|((ra, rb), rc)| {
                // SAFETY: the feature was detected above; rows of equally
                // shaped matrices have equal length and 16-byte alignment.
                unsafe { T::intrinsic_row(ra, rb, rc) };
            });
        #[cfg(not(target_arch = "x86_64"))]
        let _ = (inputs, outputs);

        Ok(())
    }
}

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;
    use crate::scalar::ScalarBackend;

    #[test]
    fn test_matches_scalar_i32() {
        if !i32::SIMD_FEATURE.is_detected() {
            return;
        }
        let a = Matrix::from_fn(64, 37, |i, j| (i as i32 - 32) * (j as i32 + 1));
        let b = Matrix::from_fn(64, 37, |i, j| (j as i32 * 13) - i as i32 * 5);
        let mut expected = Matrix::zeros(64, 37);
        let mut got = Matrix::zeros(64, 37);
        ScalarBackend.fuse(&a, &b, &mut expected).unwrap();
        ParallelIntrinsicBackend.fuse(&a, &b, &mut got).unwrap();
        assert_eq!(expected, got);
    }

    #[test]
    fn test_matches_scalar_f64() {
        let a = Matrix::from_fn(33, 16, |i, j| (i * 16 + j) as f64);
        let b = Matrix::from_fn(33, 16, |i, j| (i + j) as f64 * 0.5);
        let mut expected = Matrix::zeros(33, 16);
        let mut got = Matrix::zeros(33, 16);
        ScalarBackend.fuse(&a, &b, &mut expected).unwrap();
        ParallelIntrinsicBackend.fuse(&a, &b, &mut got).unwrap();
        assert_eq!(expected, got);
    }
}
