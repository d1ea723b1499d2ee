//! Per-backend float tolerances for comparing kernel results.

use crate::core::types::Backend;

pub const DEFAULT_REL_EPS: f64 = 1e-6;

/// Absolute floor, so comparisons against zero are not exact-match only.
pub const DEFAULT_ABS_EPS: f64 = 1e-12;

/// Relative epsilon a backend can be held to. OpenGL and Metal compute in
/// lower precision on common drivers.
pub fn rel_eps(backend: Backend) -> f64 {
    match backend {
        Backend::Opengl => 1e-3,
        Backend::Metal => 1e-4,
        _ => DEFAULT_REL_EPS,
    }
}

/// `actual ≈ expected` within `max(DEFAULT_ABS_EPS, max(rel, rel_eps(backend)) * |expected|)`.
/// NaN never compares equal; infinities compare by identity.
pub fn approx_eq(actual: f64, expected: f64, rel: Option<f64>, backend: Backend) -> bool {
    if actual.is_nan() || expected.is_nan() {
        return false;
    }
    if actual == expected {
        return true;
    }
    if actual.is_infinite() || expected.is_infinite() {
        return false;
    }
    let rel_tol = rel.unwrap_or(DEFAULT_REL_EPS).max(rel_eps(backend));
    let tolerance = (rel_tol * expected.abs()).max(DEFAULT_ABS_EPS);
    (actual - expected).abs() <= tolerance
}

/// Element-wise [`approx_eq`]; lengths must match.
pub fn allclose(actual: &[f64], expected: &[f64], rel: Option<f64>, backend: Backend) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| approx_eq(*a, *e, rel, backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_precision_backends_get_wider_eps() {
        assert_eq!(rel_eps(Backend::Opengl), 1e-3);
        assert_eq!(rel_eps(Backend::Metal), 1e-4);
        assert_eq!(rel_eps(Backend::Cuda), 1e-6);
    }

    #[test]
    fn approx_eq_uses_backend_floor() {
        assert!(approx_eq(1.0005, 1.0, None, Backend::Opengl));
        assert!(!approx_eq(1.0005, 1.0, None, Backend::X64));
        assert!(approx_eq(1.0005, 1.0, Some(1e-2), Backend::X64));
    }

    #[test]
    fn caller_rel_cannot_tighten_below_backend_eps() {
        assert!(approx_eq(1.0005, 1.0, Some(1e-9), Backend::Opengl));
    }

    #[test]
    fn nan_and_infinity() {
        assert!(!approx_eq(f64::NAN, f64::NAN, None, Backend::X64));
        assert!(approx_eq(f64::INFINITY, f64::INFINITY, None, Backend::X64));
        assert!(!approx_eq(f64::INFINITY, 1e308, None, Backend::X64));
    }

    #[test]
    fn values_near_zero_use_absolute_floor() {
        assert!(approx_eq(1e-13, 0.0, None, Backend::X64));
        assert!(approx_eq(-5e-13, 0.0, None, Backend::Cuda));
        assert!(!approx_eq(1e-11, 0.0, None, Backend::X64));
        assert!(allclose(&[0.0, 1e-13], &[1e-13, 0.0], None, Backend::X64));
    }

    #[test]
    fn allclose_checks_lengths() {
        assert!(allclose(&[1.0, 2.0], &[1.0, 2.0], None, Backend::Metal));
        assert!(!allclose(&[1.0], &[1.0, 2.0], None, Backend::Metal));
    }
}
