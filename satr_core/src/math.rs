//! Mathematical operations using libm for consistent results across std and no_std builds.
//!
//! All of the fixed-point modulators in `satr_dsp` are defined in terms of
//! `double` (`f64`) at initialization time (building LUTs, quantizing filter
//! taps) and occasionally in the hot path (phasor renormalization via
//! `atan2`). Routing that through `libm` rather than `std::f64` intrinsics
//! keeps the numbers identical between std and no_std builds of this crate.

#![allow(clippy::excessive_precision)]

/// Trait for real number types supporting mathematical operations via libm.
pub trait Real: Copy {
    const PI: Self;
    const TAU: Self;
    const SQRT_2: Self;
    const FRAC_1_SQRT_2: Self;

    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn round(self) -> Self;
}

impl Real for f32 {
    const PI: Self = 3.14159265358979323846264338327950288_f32;
    const TAU: Self = 6.28318530717958647692528676655900577_f32;
    const SQRT_2: Self = 1.41421356237309504880168872420969808_f32;
    const FRAC_1_SQRT_2: Self = 0.707106781186547524400844362104849039_f32;

    #[inline]
    fn sin(self) -> Self {
        libm::sinf(self)
    }
    #[inline]
    fn cos(self) -> Self {
        libm::cosf(self)
    }
    #[inline]
    fn atan2(self, other: Self) -> Self {
        libm::atan2f(self, other)
    }
    #[inline]
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
    #[inline]
    fn abs(self) -> Self {
        libm::fabsf(self)
    }
    #[inline]
    fn round(self) -> Self {
        libm::roundf(self)
    }
}

impl Real for f64 {
    const PI: Self = 3.14159265358979323846264338327950288_f64;
    const TAU: Self = 6.28318530717958647692528676655900577_f64;
    const SQRT_2: Self = 1.41421356237309504880168872420969808_f64;
    const FRAC_1_SQRT_2: Self = 0.707106781186547524400844362104849039_f64;

    #[inline]
    fn sin(self) -> Self {
        libm::sin(self)
    }
    #[inline]
    fn cos(self) -> Self {
        libm::cos(self)
    }
    #[inline]
    fn atan2(self, other: Self) -> Self {
        libm::atan2(self, other)
    }
    #[inline]
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
    #[inline]
    fn abs(self) -> Self {
        libm::fabs(self)
    }
    #[inline]
    fn round(self) -> Self {
        libm::round(self)
    }
}

/// Sine via `libm`, generic over [`Real`]. Call sites should reach for this
/// (or the sibling functions below) instead of the inherent `f64`/`f32`
/// method of the same name: the inherent method always wins method-call
/// resolution regardless of whether `Real` is in scope, silently routing
/// back through `std`'s platform intrinsics.
#[inline]
pub fn sin<T: Real>(x: T) -> T {
    x.sin()
}

#[inline]
pub fn cos<T: Real>(x: T) -> T {
    x.cos()
}

#[inline]
pub fn atan2<T: Real>(y: T, x: T) -> T {
    y.atan2(x)
}

#[inline]
pub fn sqrt<T: Real>(x: T) -> T {
    x.sqrt()
}

#[inline]
pub fn abs<T: Real>(x: T) -> T {
    x.abs()
}

#[inline]
pub fn round<T: Real>(x: T) -> T {
    x.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_cos_quadrant() {
        assert!((f64::TAU / 4.0).sin() - 1.0 < 1e-9);
        assert!((0.0_f64).cos() - 1.0 < 1e-9);
    }

    #[test]
    fn atan2_matches_known_angle() {
        let angle = 1.0_f64.atan2(1.0);
        assert!((angle - f64::PI / 4.0).abs() < 1e-9);
    }
}
