use std::fmt;

/// Element types the fusion kernels are specialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

/// Width of one SSE register in bytes.
pub const VECTOR_BYTES: usize = 16;

impl DType {
    /// All supported types, in the order the benchmark runs them.
    pub const ALL: [DType; 6] = [
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::F32,
        DType::F64,
    ];

    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 => 1,
            DType::I16 => 2,
            DType::I32 | DType::F32 => 4,
            DType::I64 | DType::F64 => 8,
        }
    }

    /// Number of elements that fit in one 128-bit vector.
    ///
    /// - I8: 16 lanes
    /// - I16: 8 lanes
    /// - I32 / F32: 4 lanes
    /// - I64 / F64: 2 lanes
    pub fn lanes(&self) -> usize {
        VECTOR_BYTES / self.size_in_bytes()
    }

    /// Returns true for the floating point types (sqrt+add fusion).
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::I8 => write!(f, "i8"),
            DType::I16 => write!(f, "i16"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}
