/// Assert that `result` is within `relative_error` of `expected`
/// (absolute when `expected` is zero).
pub(crate) fn test_rel(result: f64, expected: f64, relative_error: f64) {
    assert!(
        result.is_finite() && expected.is_finite(),
        "observed: {:?}, expected: {:?}",
        result,
        expected
    );
    if expected == 0.0 {
        assert!(
            result.abs() <= relative_error,
            "observed: {:?}, expected: {:?}",
            result,
            expected
        );
    } else {
        assert!(
            ((result - expected) / expected).abs() <= relative_error,
            "observed: {:?}, expected: {:?}",
            result,
            expected
        );
    }
}

/// The cubic used across the root-finding tests; it has one real root
/// inside (-2, -1).
pub(crate) fn cubic(x: f64) -> f64 {
    x * x * x + 2.0 * x * x + 3.0 * x + 5.0
}

pub(crate) fn cubic_prime(x: f64) -> f64 {
    3.0 * x * x + 4.0 * x + 3.0
}
