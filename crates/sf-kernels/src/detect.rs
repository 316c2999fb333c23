//! Runtime CPU feature detection for the vector kernels.
//!
//! Each element type needs a different minimum SSE level:
//!
//! | Type | Instructions | Feature |
//! |------|--------------|---------|
//! | i16 | `pminsw`, `pmaxsw`, `paddw` | SSE2 |
//! | f32, f64 | `sqrtps`, `sqrtpd`, `addps`, `addpd` | SSE2 |
//! | i8, i32 | `pminsb`, `pminsd`, ... | SSE4.1 |
//! | i64 | `pcmpgtq` (no 64-bit min/max below AVX-512), `pblendvb` | SSE4.2 |
//!
//! The levels are cumulative: a feature only counts as detected when every
//! level below it is present too, so `Sse42` also guarantees SSE4.1 and SSE2.

use std::fmt;

/// An x86 instruction set extension a kernel depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdFeature {
    Sse2,
    Sse41,
    Sse42,
}

impl SimdFeature {
    /// Name as accepted by `is_x86_feature_detected!` and `target_feature`.
    pub fn name(&self) -> &'static str {
        match self {
            SimdFeature::Sse2 => "sse2",
            SimdFeature::Sse41 => "sse4.1",
            SimdFeature::Sse42 => "sse4.2",
        }
    }

    /// Returns true if the running CPU supports this level and all levels
    /// below it.
    ///
    /// Always false on non-x86_64 targets.
    pub fn is_detected(&self) -> bool {
        #[cfg(target_arch = "x86_64")]
        {
            match self {
                SimdFeature::Sse2 => std::is_x86_feature_detected!("sse2"),
                SimdFeature::Sse41 => {
                    SimdFeature::Sse2.is_detected() && std::is_x86_feature_detected!("sse4.1")
                }
                SimdFeature::Sse42 => {
                    SimdFeature::Sse41.is_detected() && std::is_x86_feature_detected!("sse4.2")
                }
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            false
        }
    }
}

impl fmt::Display for SimdFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of the SSE levels available on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuInfo {
    pub sse2: bool,
    pub sse41: bool,
    pub sse42: bool,
}

impl CpuInfo {
    pub fn detect() -> Self {
        let info = CpuInfo {
            sse2: SimdFeature::Sse2.is_detected(),
            sse41: SimdFeature::Sse41.is_detected(),
            sse42: SimdFeature::Sse42.is_detected(),
        };
        log::debug!("detected CPU features: {info}");
        info
    }

    /// Returns true if `feature` is in this snapshot.
    pub fn supports(&self, feature: SimdFeature) -> bool {
        match feature {
            SimdFeature::Sse2 => self.sse2,
            SimdFeature::Sse41 => self.sse41,
            SimdFeature::Sse42 => self.sse42,
        }
    }
}

impl fmt::Display for CpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sse2={} sse4.1={} sse4.2={}",
            self.sse2, self.sse41, self.sse42
        )
    }
}
