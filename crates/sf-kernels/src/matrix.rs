use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::slice;

use crate::element::Element;
use crate::error::{KernelError, Result};

/// Alignment of every row buffer, in bytes (one SSE register).
pub const ROW_ALIGN: usize = 16;

/// Allocation unit for row buffers. Its alignment is what places every row
/// start on a 16-byte boundary.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
struct Block([u8; ROW_ALIGN]);

const ZERO_BLOCK: Block = Block([0; ROW_ALIGN]);

/// One owned, 16-byte aligned row of `len` elements.
#[derive(Clone)]
struct AlignedRow<T> {
    blocks: Vec<Block>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> AlignedRow<T> {
    fn zeroed(len: usize) -> Self {
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .unwrap_or_else(|| panic!("row of {len} {} elements overflows usize bytes", T::DTYPE));
        AlignedRow {
            blocks: vec![ZERO_BLOCK; bytes.div_ceil(ROW_ALIGN)],
            len,
            _marker: PhantomData,
        }
    }

    fn as_slice(&self) -> &[T] {
        // SAFETY: the buffer holds at least `len * size_of::<T>()` initialised
        // bytes, `Block` alignment (16) satisfies any `Element` alignment, and
        // every bit pattern is a valid `Element`.
        unsafe { slice::from_raw_parts(self.blocks.as_ptr().cast::<T>(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; the exclusive borrow of `self` covers the buffer.
        unsafe { slice::from_raw_parts_mut(self.blocks.as_mut_ptr().cast::<T>(), self.len) }
    }
}

/// A dense row-major matrix stored as a sequence of 16-byte aligned rows.
///
/// Every row holds exactly `ncols()` elements. Rows are zero-filled on
/// allocation and released together when the matrix is dropped.
#[derive(Clone)]
pub struct Matrix<T: Element> {
    rows: Vec<AlignedRow<T>>,
    cols: usize,
}

impl<T: Element> Matrix<T> {
    /// Allocate a zero-filled `rows x cols` matrix.
    ///
    /// # Panics
    /// Panics if a row of `cols` elements does not fit in `usize` bytes.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows: (0..rows).map(|_| AlignedRow::zeroed(cols)).collect(),
            cols,
        }
    }

    /// Build a matrix from a function of `(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut m = Self::zeros(rows, cols);
        for (i, row) in m.rows.iter_mut().enumerate() {
            for (j, v) in row.as_mut_slice().iter_mut().enumerate() {
                *v = f(i, j);
            }
        }
        m
    }

    /// Build a matrix by copying row slices.
    ///
    /// # Errors
    /// Returns `RaggedRows` if the rows do not all have the same length.
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(KernelError::RaggedRows {
                row,
                expected: cols,
                got: r.len(),
            });
        }
        Ok(Self::from_fn(rows.len(), cols, |i, j| rows[i][j]))
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.cols)
    }

    /// Returns true if the matrix has no elements.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols == 0
    }

    /// Returns row `i`.
    ///
    /// # Panics
    /// Panics if `i >= nrows()`.
    pub fn row(&self, i: usize) -> &[T] {
        self.rows[i].as_slice()
    }

    /// Returns row `i` mutably.
    ///
    /// # Panics
    /// Panics if `i >= nrows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        self.rows[i].as_mut_slice()
    }

    /// Returns the element at `(i, j)`, or `None` if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        self.rows.get(i).and_then(|r| r.as_slice().get(j).copied())
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.rows.iter().map(AlignedRow::as_slice)
    }

    /// Iterate over rows as mutable slices.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T]> + '_ {
        self.rows.iter_mut().map(AlignedRow::as_mut_slice)
    }

    /// Overwrite every element, row by row, with successive values of `f`.
    pub fn fill_with(&mut self, mut f: impl FnMut() -> T) {
        for row in self.rows_mut() {
            row.iter_mut().for_each(|v| *v = f());
        }
    }

    /// Position of the first element that differs from `other`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the matrices have different shapes.
    pub fn first_mismatch(&self, other: &Matrix<T>) -> Result<Option<(usize, usize)>> {
        if self.dims() != other.dims() {
            return Err(KernelError::DimensionMismatch {
                expected: self.dims(),
                got: other.dims(),
            });
        }
        for (i, (x, y)) in self.rows().zip(other.rows()).enumerate() {
            if let Some(j) = x.iter().zip(y).position(|(p, q)| p != q) {
                return Ok(Some((i, j)));
            }
        }
        Ok(None)
    }
}

impl<T: Element> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.rows().zip(other.rows()).all(|(x, y)| x == y)
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("dtype", &T::DTYPE)
            .field("rows", &self.nrows())
            .field("cols", &self.cols)
            .finish()
    }
}

/// Dump format: one line per row, then a blank line.
impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for v in row {
                v.fmt_cell(f)?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}
