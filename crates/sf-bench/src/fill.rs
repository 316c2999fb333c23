use rand::Rng;
use sf_kernels::{Element, Matrix};

/// Upper bound (exclusive) for random floating point values.
///
/// Values stay non-negative so `sqrt` is always real and the strategies can be
/// compared exactly.
pub const FLOAT_FILL_MAX: f64 = 100.0;

/// Element types that can be drawn from an RNG for the benchmark inputs.
pub trait RandomElement: Element {
    /// Integers: uniform over the full range of the type.
    /// Floats: uniform in `[0, FLOAT_FILL_MAX)`.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_random_int {
    ($($t:ty),+) => {
        $(impl RandomElement for $t {
            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.gen()
            }
        })+
    };
}

impl_random_int!(i8, i16, i32, i64);

impl RandomElement for f32 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen_range(0.0..FLOAT_FILL_MAX as f32)
    }
}

impl RandomElement for f64 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen_range(0.0..FLOAT_FILL_MAX)
    }
}

/// Overwrite every element of `matrix` with a fresh random value.
pub fn fill_with_random<T: RandomElement, R: Rng + ?Sized>(matrix: &mut Matrix<T>, rng: &mut R) {
    matrix.fill_with(|| T::sample(&mut *rng));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_floats_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut m = Matrix::<f32>::zeros(8, 32);
        fill_with_random(&mut m, &mut rng);
        assert!(m.rows().flatten().all(|&v| (0.0..100.0).contains(&v)));

        let mut m = Matrix::<f64>::zeros(8, 32);
        fill_with_random(&mut m, &mut rng);
        assert!(m.rows().flatten().all(|&v| (0.0..FLOAT_FILL_MAX).contains(&v)));
    }

    #[test]
    fn test_seeded_fill_is_reproducible() {
        let mut a = Matrix::<i64>::zeros(4, 16);
        let mut b = Matrix::<i64>::zeros(4, 16);
        fill_with_random(&mut a, &mut StdRng::seed_from_u64(9));
        fill_with_random(&mut b, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ints_cover_negative_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut m = Matrix::<i8>::zeros(4, 64);
        fill_with_random(&mut m, &mut rng);
        assert!(m.rows().flatten().any(|&v| v < 0));
        assert!(m.rows().flatten().any(|&v| v > 0));
    }
}
