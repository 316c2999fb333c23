//! Hand-written vector assembly backend.
//!
//! Each row kernel is one counted loop over 16-byte blocks: two aligned loads,
//! the fused operation, one aligned store, then all three pointers advance by
//! 16 bytes. Instruction selection mirrors the intrinsic backend:
//!
//! ```text
//! i8/i16/i32: movdqa, pmins{b,w,d}, pmaxs{b,w,d}, padd{b,w,d}, movdqa
//! i64:        movdqa, pcmpgtq + pand/pandn/por select, paddq, movdqa
//! f32:        movaps, sqrtps x2, addps, movaps
//! f64:        movapd, sqrtpd x2, addpd, movapd
//! ```

use crate::backend::{check_dims, ensure_simd, FusionBackend};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;

/// Backend built on `core::arch::asm!` loops.
#[derive(Debug, Clone)]
pub struct AsmBackend;

impl AsmBackend {
    pub fn new() -> Self {
        AsmBackend
    }
}

impl Default for AsmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> FusionBackend<T> for AsmBackend {
    fn name(&self) -> &str {
        "asm"
    }

    fn fuse(&self, a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
        check_dims(a, b, c)?;
        ensure_simd::<T>("asm")?;

        #[cfg(target_arch = "x86_64")]
        for ((ra, rb), rc) in a.rows().zip(b.rows()).zip(c.rows_mut()) {
            // SAFETY: the feature was detected above; rows of equally shaped
            // matrices have equal length and start on 16-byte boundaries.
            unsafe { T::asm_row(ra, rb, rc) };
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86 {
    use core::arch::asm;

    use crate::element::Element;
    use crate::matrix::ROW_ALIGN;

    macro_rules! debug_assert_aligned {
        ($($p:expr),+) => {
            $(debug_assert_eq!($p as usize % ROW_ALIGN, 0, "row is not 16-byte aligned");)+
        };
    }

    macro_rules! int_kernel {
        ($name:ident, $t:ty, $min:literal, $max:literal, $add:literal) => {
            pub(crate) unsafe fn $name(a: &[$t], b: &[$t], c: &mut [$t]) {
                const LANES: usize = <$t as Element>::LANES;
                let n = c.len();
                debug_assert!(a.len() == n && b.len() == n);
                debug_assert_aligned!(a.as_ptr(), b.as_ptr(), c.as_ptr());
                let blocks = n / LANES;

                if blocks > 0 {
                    // SAFETY: `blocks` full 16-byte blocks are in bounds for all
                    // three aligned rows; the caller guarantees the SSE level.
                    unsafe {
                        asm!(
                            "2:",
                            "movdqa {va}, xmmword ptr [{pa}]",
                            "movdqa {vb}, xmmword ptr [{pb}]",
                            "movdqa {lo}, {va}",
                            concat!($min, " {lo}, {vb}"),
                            concat!($max, " {va}, {vb}"),
                            concat!($add, " {lo}, {va}"),
                            "movdqa xmmword ptr [{pc}], {lo}",
                            "add {pa}, 16",
                            "add {pb}, 16",
                            "add {pc}, 16",
                            "dec {count}",
                            "jnz 2b",
                            pa = inout(reg) a.as_ptr() => _,
                            pb = inout(reg) b.as_ptr() => _,
                            pc = inout(reg) c.as_mut_ptr() => _,
                            count = inout(reg) blocks => _,
                            va = out(xmm_reg) _,
                            vb = out(xmm_reg) _,
                            lo = out(xmm_reg) _,
                            options(nostack),
                        );
                    }
                }

                let body = blocks * LANES;
                for ((z, &x), &y) in c[body..].iter_mut().zip(&a[body..]).zip(&b[body..]) {
                    *z = <$t as Element>::fuse(x, y);
                }
            }
        };
    }

    macro_rules! float_kernel {
        ($name:ident, $t:ty, $mov:literal, $sqrt:literal, $add:literal) => {
            pub(crate) unsafe fn $name(a: &[$t], b: &[$t], c: &mut [$t]) {
                const LANES: usize = <$t as Element>::LANES;
                let n = c.len();
                debug_assert!(a.len() == n && b.len() == n);
                debug_assert_aligned!(a.as_ptr(), b.as_ptr(), c.as_ptr());
                let blocks = n / LANES;

                if blocks > 0 {
                    // SAFETY: see `int_kernel`.
                    unsafe {
                        asm!(
                            "2:",
                            concat!($mov, " {va}, xmmword ptr [{pa}]"),
                            concat!($mov, " {vb}, xmmword ptr [{pb}]"),
                            concat!($sqrt, " {va}, {va}"),
                            concat!($sqrt, " {vb}, {vb}"),
                            concat!($add, " {va}, {vb}"),
                            concat!($mov, " xmmword ptr [{pc}], {va}"),
                            "add {pa}, 16",
                            "add {pb}, 16",
                            "add {pc}, 16",
                            "dec {count}",
                            "jnz 2b",
                            pa = inout(reg) a.as_ptr() => _,
                            pb = inout(reg) b.as_ptr() => _,
                            pc = inout(reg) c.as_mut_ptr() => _,
                            count = inout(reg) blocks => _,
                            va = out(xmm_reg) _,
                            vb = out(xmm_reg) _,
                            options(nostack),
                        );
                    }
                }

                let body = blocks * LANES;
                for ((z, &x), &y) in c[body..].iter_mut().zip(&a[body..]).zip(&b[body..]) {
                    *z = <$t as Element>::fuse(x, y);
                }
            }
        };
    }

    int_kernel!(fuse_i8, i8, "pminsb", "pmaxsb", "paddb");
    int_kernel!(fuse_i16, i16, "pminsw", "pmaxsw", "paddw");
    int_kernel!(fuse_i32, i32, "pminsd", "pmaxsd", "paddd");
    float_kernel!(fuse_f32, f32, "movaps", "sqrtps", "addps");
    float_kernel!(fuse_f64, f64, "movapd", "sqrtpd", "addpd");

    /// i64 has no packed min/max below AVX-512; select through a `pcmpgtq` mask.
    pub(crate) unsafe fn fuse_i64(a: &[i64], b: &[i64], c: &mut [i64]) {
        const LANES: usize = <i64 as Element>::LANES;
        let n = c.len();
        debug_assert!(a.len() == n && b.len() == n);
        debug_assert_aligned!(a.as_ptr(), b.as_ptr(), c.as_ptr());
        let blocks = n / LANES;

        if blocks > 0 {
            // SAFETY: see `int_kernel`.
            unsafe {
                asm!(
                    "2:",
                    "movdqa {va}, xmmword ptr [{pa}]",
                    "movdqa {vb}, xmmword ptr [{pb}]",
                    // mask = a > b
                    "movdqa {mask}, {va}",
                    "pcmpgtq {mask}, {vb}",
                    // hi = (a & mask) | (b & !mask)
                    "movdqa {tmp}, {mask}",
                    "pandn {tmp}, {vb}",
                    "movdqa {hi}, {va}",
                    "pand {hi}, {mask}",
                    "por {hi}, {tmp}",
                    // mask = (b & mask) | (a & !mask)
                    "movdqa {tmp}, {mask}",
                    "pandn {tmp}, {va}",
                    "pand {mask}, {vb}",
                    "por {mask}, {tmp}",
                    "paddq {hi}, {mask}",
                    "movdqa xmmword ptr [{pc}], {hi}",
                    "add {pa}, 16",
                    "add {pb}, 16",
                    "add {pc}, 16",
                    "dec {count}",
                    "jnz 2b",
                    pa = inout(reg) a.as_ptr() => _,
                    pb = inout(reg) b.as_ptr() => _,
                    pc = inout(reg) c.as_mut_ptr() => _,
                    count = inout(reg) blocks => _,
                    va = out(xmm_reg) _,
                    vb = out(xmm_reg) _,
                    mask = out(xmm_reg) _,
                    hi = out(xmm_reg) _,
                    tmp = out(xmm_reg) _,
                    options(nostack),
                );
            }
        }

        let body = blocks * LANES;
        for ((z, &x), &y) in c[body..].iter_mut().zip(&a[body..]).zip(&b[body..]) {
            *z = i64::fuse(x, y);
        }
    }
}
