//! Numeric helpers shared by the animation primitives

/// Clamp `value` into `[min, max]`. Unlike `f64::clamp` this never panics
/// when `min > max`; `min` wins.
#[inline]
pub fn clamp(min: f64, value: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Linear interpolation between `x` and `y` by `t`
#[inline]
pub fn lerp(x: f64, y: f64, t: f64) -> f64 {
    (1.0 - t) * x + t * y
}

/// Frame-rate independent exponential approach from `x` toward `y`.
///
/// `lambda` is the rate constant per second and `dt` the frame delta in
/// seconds: `lerp(x, y, 1 - e^(-lambda * dt))`.
#[inline]
pub fn damp(x: f64, y: f64, lambda: f64, dt: f64) -> f64 {
    lerp(x, y, 1.0 - (-lambda * dt).exp())
}

/// Euclidean modulo: the result has the sign of `m`.
///
/// Returns `n` unchanged when `m == 0` so a zero-length range never
/// produces NaN.
#[inline]
pub fn modulo(n: f64, m: f64) -> f64 {
    if m == 0.0 {
        return n;
    }
    ((n % m) + m) % m
}

/// Sign as -1, 0 or 1
#[inline]
pub fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.0, -5.0, 10.0), 0.0);
        assert_eq!(clamp(0.0, 15.0, 10.0), 10.0);
        assert_eq!(clamp(0.0, 5.0, 10.0), 5.0);
        // Inverted bounds do not panic
        assert_eq!(clamp(0.0, 5.0, -10.0), 0.0);
    }

    #[test]
    fn test_damp_frame_rate_independent() {
        // One 1/30s step lands where two 1/60s steps land
        let single = damp(0.0, 100.0, 6.0, 1.0 / 30.0);
        let half = damp(0.0, 100.0, 6.0, 1.0 / 60.0);
        let double = damp(half, 100.0, 6.0, 1.0 / 60.0);
        assert!((single - double).abs() < 1e-9);
    }

    #[test]
    fn test_modulo() {
        assert_eq!(modulo(1050.0, 1000.0), 50.0);
        assert_eq!(modulo(-50.0, 1000.0), 950.0);
        assert_eq!(modulo(300.0, 0.0), 300.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.0), 1);
        assert_eq!(sign(-0.5), -1);
        assert_eq!(sign(0.0), 0);
    }
}
