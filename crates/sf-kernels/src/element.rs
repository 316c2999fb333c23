use std::fmt;

use crate::detect::SimdFeature;
use crate::dtype::DType;

mod sealed {
    pub trait Sealed {}
}

/// A scalar type the fusion kernels are implemented for.
///
/// Sealed: implemented for `i8`, `i16`, `i32`, `i64`, `f32` and `f64` only.
/// Every implementor is a plain number for which any bit pattern (including
/// all zeros) is a valid value, which `Matrix` relies on for its aligned
/// row buffers.
pub trait Element:
    sealed::Sealed + Copy + PartialEq + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Runtime tag for this type.
    const DTYPE: DType;

    /// Lowest SSE level the vector kernels for this type need.
    const SIMD_FEATURE: SimdFeature;

    /// Elements per 128-bit vector.
    const LANES: usize = 16 / std::mem::size_of::<Self>();

    /// The fused operation on one pair of elements.
    ///
    /// Integers: `min(a, b) + max(a, b)` with wrapping addition.
    /// Floats: `sqrt(a) + sqrt(b)`.
    fn fuse(a: Self, b: Self) -> Self;

    /// Writes one cell of a matrix dump.
    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// SSE intrinsic kernel for one row.
    ///
    /// # Safety
    /// The CPU must support `Self::SIMD_FEATURE`, the three slices must have
    /// equal length and each must start on a 16-byte boundary.
    #[cfg(target_arch = "x86_64")]
    unsafe fn intrinsic_row(a: &[Self], b: &[Self], c: &mut [Self]);

    /// Inline assembly kernel for one row.
    ///
    /// # Safety
    /// Same contract as [`Element::intrinsic_row`].
    #[cfg(target_arch = "x86_64")]
    unsafe fn asm_row(a: &[Self], b: &[Self], c: &mut [Self]);
}

macro_rules! impl_int_element {
    ($t:ty, $dtype:ident, $feature:ident, $kernel:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            const SIMD_FEATURE: SimdFeature = SimdFeature::$feature;

            #[inline(always)]
            fn fuse(a: Self, b: Self) -> Self {
                a.min(b).wrapping_add(a.max(b))
            }

            fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:>5}", self)
            }

            #[cfg(target_arch = "x86_64")]
            #[inline]
            unsafe fn intrinsic_row(a: &[Self], b: &[Self], c: &mut [Self]) {
                // SAFETY: forwarded from the caller.
                unsafe { crate::intrinsic::x86::$kernel(a, b, c) }
            }

            #[cfg(target_arch = "x86_64")]
            #[inline]
            unsafe fn asm_row(a: &[Self], b: &[Self], c: &mut [Self]) {
                // SAFETY: forwarded from the caller.
                unsafe { crate::asm::x86::$kernel(a, b, c) }
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $dtype:ident, $kernel:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            const SIMD_FEATURE: SimdFeature = SimdFeature::Sse2;

            #[inline(always)]
            fn fuse(a: Self, b: Self) -> Self {
                a.sqrt() + b.sqrt()
            }

            fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:>6.3}", self)
            }

            #[cfg(target_arch = "x86_64")]
            #[inline]
            unsafe fn intrinsic_row(a: &[Self], b: &[Self], c: &mut [Self]) {
                // SAFETY: forwarded from the caller.
                unsafe { crate::intrinsic::x86::$kernel(a, b, c) }
            }

            #[cfg(target_arch = "x86_64")]
            #[inline]
            unsafe fn asm_row(a: &[Self], b: &[Self], c: &mut [Self]) {
                // SAFETY: forwarded from the caller.
                unsafe { crate::asm::x86::$kernel(a, b, c) }
            }
        }
    };
}

impl_int_element!(i8, I8, Sse41, fuse_i8);
impl_int_element!(i16, I16, Sse2, fuse_i16);
impl_int_element!(i32, I32, Sse41, fuse_i32);
impl_int_element!(i64, I64, Sse42, fuse_i64);
impl_float_element!(f32, F32, fuse_f32);
impl_float_element!(f64, F64, fuse_f64);
