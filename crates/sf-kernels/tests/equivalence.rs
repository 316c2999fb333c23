//! Every backend must produce the scalar result, bit for bit, for all six
//! element types on random inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sf_kernels::{
    AsmBackend, Element, FusionBackend, IntrinsicBackend, KernelError, Matrix, ScalarBackend,
};

fn backends<T: Element>() -> Vec<Box<dyn FusionBackend<T>>> {
    #[allow(unused_mut)]
    let mut list: Vec<Box<dyn FusionBackend<T>>> =
        vec![Box::new(IntrinsicBackend), Box::new(AsmBackend)];
    #[cfg(feature = "parallel")]
    list.push(Box::new(sf_kernels::ParallelIntrinsicBackend));
    list
}

fn assert_equivalent<T: Element>(a: &Matrix<T>, b: &Matrix<T>) {
    let (rows, cols) = a.dims();
    let mut expected = Matrix::zeros(rows, cols);
    ScalarBackend.fuse(a, b, &mut expected).unwrap();

    for backend in backends::<T>() {
        let mut got = Matrix::zeros(rows, cols);
        match backend.fuse(a, b, &mut got) {
            Ok(()) => assert_eq!(
                expected.first_mismatch(&got).unwrap(),
                None,
                "{} backend disagrees for {} ({rows}x{cols})",
                backend.name(),
                T::DTYPE
            ),
            Err(KernelError::UnsupportedCpu { .. } | KernelError::UnsupportedArch { .. }) => {}
            Err(e) => panic!("{} backend failed: {e}", backend.name()),
        }
    }
}

fn random_matrix<T: Element>(
    rng: &mut StdRng,
    rows: usize,
    cols: usize,
    mut gen: impl FnMut(&mut StdRng) -> T,
) -> Matrix<T> {
    Matrix::from_fn(rows, cols, |_, _| gen(rng))
}

const SHAPES: [(usize, usize); 5] = [(1, 16), (7, 64), (3, 5), (16, 33), (0, 16)];

#[test]
fn integers_match_scalar() {
    let mut rng = StdRng::seed_from_u64(7);
    for (rows, cols) in SHAPES {
        let a = random_matrix(&mut rng, rows, cols, |r| r.gen::<i8>());
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen::<i8>());
        assert_equivalent(&a, &b);

        let a = random_matrix(&mut rng, rows, cols, |r| r.gen::<i16>());
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen::<i16>());
        assert_equivalent(&a, &b);

        let a = random_matrix(&mut rng, rows, cols, |r| r.gen::<i32>());
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen::<i32>());
        assert_equivalent(&a, &b);

        let a = random_matrix(&mut rng, rows, cols, |r| r.gen::<i64>());
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen::<i64>());
        assert_equivalent(&a, &b);
    }
}

#[test]
fn floats_match_scalar() {
    let mut rng = StdRng::seed_from_u64(11);
    for (rows, cols) in SHAPES {
        let a = random_matrix(&mut rng, rows, cols, |r| r.gen_range(0.0f32..1.0e6));
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen_range(0.0f32..1.0e6));
        assert_equivalent(&a, &b);

        let a = random_matrix(&mut rng, rows, cols, |r| r.gen_range(0.0f64..1.0e12));
        let b = random_matrix(&mut rng, rows, cols, |r| r.gen_range(0.0f64..1.0e12));
        assert_equivalent(&a, &b);
    }
}

#[test]
fn integer_extremes_match_scalar() {
    let a = Matrix::<i8>::from_fn(2, 16, |i, j| if (i + j) % 2 == 0 { i8::MIN } else { i8::MAX });
    let b = Matrix::<i8>::from_fn(2, 16, |i, j| if j % 3 == i { i8::MAX } else { -1 });
    assert_equivalent(&a, &b);

    let a = Matrix::<i64>::from_fn(3, 4, |i, j| [i64::MIN, i64::MAX, 0, -1][(i + j) % 4]);
    let b = Matrix::<i64>::from_fn(3, 4, |i, j| [i64::MAX, -1, i64::MIN, 1][(i * 2 + j) % 4]);
    assert_equivalent(&a, &b);
}

#[test]
fn mismatched_shapes_are_rejected() {
    let a = Matrix::<i32>::zeros(4, 16);
    let b = Matrix::<i32>::zeros(4, 32);
    let mut c = Matrix::<i32>::zeros(4, 16);
    assert!(ScalarBackend.fuse(&a, &b, &mut c).is_err());
    for backend in backends::<i32>() {
        let err = backend.fuse(&a, &b, &mut c).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));
    }
}
