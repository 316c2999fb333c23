use std::time::{Duration, Instant};

/// Runs `f` once and returns its result with the wall-clock time it took.
#[inline]
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let before = Instant::now();
    let result = f();
    (result, before.elapsed())
}

/// Milliseconds with microsecond resolution, e.g. `12.345ms`.
pub fn format_millis(d: Duration) -> String {
    format!("{:.3}ms", d.as_secs_f64() * 1e3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_result() {
        let (v, elapsed) = measure(|| 6 * 7);
        assert_eq!(v, 42);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_measure_sleep() {
        let (_, elapsed) = measure(|| std::thread::sleep(Duration::from_millis(5)));
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Duration::from_micros(12_345)), "12.345ms");
        assert_eq!(format_millis(Duration::ZERO), "0.000ms");
    }
}
