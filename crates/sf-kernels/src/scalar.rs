use crate::backend::{check_dims, FusionBackend};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;

/// Element-at-a-time reference backend.
///
/// Plain nested loops with no vector code. Always available, and the
/// baseline every other backend is checked against.
#[derive(Debug, Clone)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        ScalarBackend
    }
}

impl Default for ScalarBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> FusionBackend<T> for ScalarBackend {
    fn name(&self) -> &str {
        "scalar"
    }

    fn fuse(&self, a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
        check_dims(a, b, c)?;
        for ((ra, rb), rc) in a.rows().zip(b.rows()).zip(c.rows_mut()) {
            for ((&x, &y), z) in ra.iter().zip(rb).zip(rc.iter_mut()) {
                *z = T::fuse(x, y);
            }
        }
        Ok(())
    }
}
