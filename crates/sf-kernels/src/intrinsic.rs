//! SSE intrinsic backend.
//!
//! One 128-bit vector per step, aligned loads and stores:
//!
//! | Type | Lanes | Kernel |
//! |------|-------|--------|
//! | i8 | 16 | `_mm_min_epi8` + `_mm_max_epi8` → `_mm_add_epi8` |
//! | i16 | 8 | `_mm_min_epi16` + `_mm_max_epi16` → `_mm_add_epi16` |
//! | i32 | 4 | `_mm_min_epi32` + `_mm_max_epi32` → `_mm_add_epi32` |
//! | i64 | 2 | `_mm_cmpgt_epi64` + `_mm_blendv_epi8` select → `_mm_add_epi64` |
//! | f32 | 4 | `_mm_sqrt_ps` ×2 → `_mm_add_ps` |
//! | f64 | 2 | `_mm_sqrt_pd` ×2 → `_mm_add_pd` |
//!
//! Columns past the last full vector are finished with the scalar operation.

use crate::backend::{check_dims, ensure_simd, FusionBackend};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;

/// Backend built on `core::arch::x86_64` SSE intrinsics.
#[derive(Debug, Clone)]
pub struct IntrinsicBackend;

impl IntrinsicBackend {
    pub fn new() -> Self {
        IntrinsicBackend
    }
}

impl Default for IntrinsicBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> FusionBackend<T> for IntrinsicBackend {
    fn name(&self) -> &str {
        "intrinsic"
    }

    fn fuse(&self, a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
        check_dims(a, b, c)?;
        ensure_simd::<T>("intrinsic")?;

        #[cfg(target_arch = "x86_64")]
        for ((ra, rb), rc) in a.rows().zip(b.rows()).zip(c.rows_mut()) {
            // SAFETY: the feature was detected above; rows of equally shaped
            // matrices have equal length and start on 16-byte boundaries.
            unsafe { T::intrinsic_row(ra, rb, rc) };
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86 {
    use core::arch::x86_64::*;

    use crate::element::Element;

    /// Signed 64-bit max via compare + blend (SSE has no `pmaxsq`).
    #[target_feature(enable = "sse4.1,sse4.2")]
    #[inline]
    unsafe fn max_epi64(a: __m128i, b: __m128i) -> __m128i {
        let a_gt_b = _mm_cmpgt_epi64(a, b);
        _mm_blendv_epi8(b, a, a_gt_b)
    }

    /// Signed 64-bit min via compare + blend.
    #[target_feature(enable = "sse4.1,sse4.2")]
    #[inline]
    unsafe fn min_epi64(a: __m128i, b: __m128i) -> __m128i {
        let a_gt_b = _mm_cmpgt_epi64(a, b);
        _mm_blendv_epi8(a, b, a_gt_b)
    }

    macro_rules! int_kernel {
        ($name:ident, $t:ty, $feature:literal, $min:ident, $max:ident, $add:ident) => {
            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn $name(a: &[$t], b: &[$t], c: &mut [$t]) {
                const LANES: usize = <$t as Element>::LANES;
                let n = c.len();
                debug_assert!(a.len() == n && b.len() == n);
                let body = n - n % LANES;

                let (pa, pb, pc) = (a.as_ptr(), b.as_ptr(), c.as_mut_ptr());
                let mut j = 0;
                while j < body {
                    let va = _mm_load_si128(pa.add(j).cast::<__m128i>());
                    let vb = _mm_load_si128(pb.add(j).cast::<__m128i>());
                    let fused = $add($min(va, vb), $max(va, vb));
                    _mm_store_si128(pc.add(j).cast::<__m128i>(), fused);
                    j += LANES;
                }

                for ((z, &x), &y) in c[body..].iter_mut().zip(&a[body..]).zip(&b[body..]) {
                    *z = <$t as Element>::fuse(x, y);
                }
            }
        };
    }

    macro_rules! float_kernel {
        ($name:ident, $t:ty, $load:ident, $sqrt:ident, $add:ident, $store:ident) => {
            #[target_feature(enable = "sse2")]
            pub(crate) unsafe fn $name(a: &[$t], b: &[$t], c: &mut [$t]) {
                const LANES: usize = <$t as Element>::LANES;
                let n = c.len();
                debug_assert!(a.len() == n && b.len() == n);
                let body = n - n % LANES;

                let (pa, pb, pc) = (a.as_ptr(), b.as_ptr(), c.as_mut_ptr());
                let mut j = 0;
                while j < body {
                    let va = $load(pa.add(j));
                    let vb = $load(pb.add(j));
                    $store(pc.add(j), $add($sqrt(va), $sqrt(vb)));
                    j += LANES;
                }

                for ((z, &x), &y) in c[body..].iter_mut().zip(&a[body..]).zip(&b[body..]) {
                    *z = <$t as Element>::fuse(x, y);
                }
            }
        };
    }

    int_kernel!(fuse_i8, i8, "sse4.1", _mm_min_epi8, _mm_max_epi8, _mm_add_epi8);
    int_kernel!(fuse_i16, i16, "sse2", _mm_min_epi16, _mm_max_epi16, _mm_add_epi16);
    int_kernel!(fuse_i32, i32, "sse4.1", _mm_min_epi32, _mm_max_epi32, _mm_add_epi32);
    int_kernel!(fuse_i64, i64, "sse4.1,sse4.2", min_epi64, max_epi64, _mm_add_epi64);
    float_kernel!(fuse_f32, f32, _mm_load_ps, _mm_sqrt_ps, _mm_add_ps, _mm_store_ps);
    float_kernel!(fuse_f64, f64, _mm_load_pd, _mm_sqrt_pd, _mm_add_pd, _mm_store_pd);
}

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;
    use crate::detect::SimdFeature;
    use crate::scalar::ScalarBackend;
    use approx::assert_relative_eq;

    fn check_against_scalar<T: Element>(a: &Matrix<T>, b: &Matrix<T>) {
        if !T::SIMD_FEATURE.is_detected() {
            return;
        }
        let (rows, cols) = a.dims();
        let mut expected = Matrix::zeros(rows, cols);
        let mut got = Matrix::zeros(rows, cols);
        ScalarBackend.fuse(a, b, &mut expected).unwrap();
        IntrinsicBackend.fuse(a, b, &mut got).unwrap();
        assert_eq!(expected.first_mismatch(&got).unwrap(), None);
    }

    #[test]
    fn test_i8_extremes() {
        let a = Matrix::from_fn(2, 32, |i, j| if (i + j) % 2 == 0 { i8::MIN } else { i8::MAX });
        let b = Matrix::from_fn(2, 32, |_, j| j as i8 - 16);
        check_against_scalar(&a, &b);
    }

    #[test]
    fn test_i16_with_tail() {
        let a = Matrix::from_fn(3, 13, |i, j| (i as i16 * 100) - j as i16 * 7);
        let b = Matrix::from_fn(3, 13, |i, j| (j as i16 * 11) - i as i16);
        check_against_scalar(&a, &b);
    }

    #[test]
    fn test_i32_values() {
        if !SimdFeature::Sse41.is_detected() {
            return;
        }
        let a = Matrix::<i32>::from_rows(&[&[1, -5, 9, 100, 3]]).unwrap();
        let b = Matrix::<i32>::from_rows(&[&[2, -6, 9, -100, 4]]).unwrap();
        let mut c = Matrix::zeros(1, 5);
        IntrinsicBackend.fuse(&a, &b, &mut c).unwrap();
        assert_eq!(c.row(0), &[3, -11, 18, 0, 7]);
    }

    #[test]
    fn test_i64_signed_compare() {
        let a = Matrix::from_fn(4, 6, |i, j| if j % 3 == 0 { i64::MIN + i as i64 } else { -(j as i64) });
        let b = Matrix::from_fn(4, 6, |i, j| if j % 2 == 0 { i64::MAX - j as i64 } else { i as i64 });
        check_against_scalar(&a, &b);
    }

    #[test]
    fn test_f32_values() {
        let a = Matrix::<f32>::from_rows(&[&[1.0, 4.0, 9.0, 16.0, 25.0]]).unwrap();
        let b = Matrix::<f32>::from_rows(&[&[0.0, 1.0, 4.0, 9.0, 16.0]]).unwrap();
        let mut c = Matrix::zeros(1, 5);
        IntrinsicBackend.fuse(&a, &b, &mut c).unwrap();
        for (got, want) in c.row(0).iter().zip([1.0, 3.0, 5.0, 7.0, 9.0]) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    fn test_f64_matches_scalar() {
        let a = Matrix::from_fn(5, 7, |i, j| (i * 7 + j) as f64 * 0.37);
        let b = Matrix::from_fn(5, 7, |i, j| (j * 5 + i) as f64 * 1.91);
        check_against_scalar(&a, &b);
    }

    #[test]
    fn test_float_tails_for_every_width() {
        for cols in 1..=9 {
            let a = Matrix::from_fn(2, cols, |i, j| (i * cols + j) as f32 * 1.75);
            let b = Matrix::from_fn(2, cols, |i, j| (j * 5 + i) as f32 * 0.25);
            check_against_scalar(&a, &b);
            let a = Matrix::from_fn(2, cols, |i, j| (i + j * 3) as f64 * 4.5);
            check_against_scalar(&a, &a);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Matrix::<f32>::zeros(2, 4);
        let mut c = Matrix::<f32>::zeros(2, 8);
        assert!(IntrinsicBackend.fuse(&a, &a, &mut c).is_err());
    }
}
