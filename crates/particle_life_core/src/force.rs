//! Radial force kernel shared by every species pair.

/// Piecewise force as a function of normalized distance.
///
/// `r` is `distance / r_max`. Below `beta` every pair repels, growing to
/// `-1` as `r → 0`. Between `beta` and `1` a tent-shaped term scaled by the
/// pair coefficient `a` peaks at the zone midpoint. At `r ≥ 1` the force is
/// zero. Both branches are `0` at `r = beta`, so the kernel is continuous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    beta: f64,
}

impl Default for ForceLaw {
    fn default() -> Self {
        Self { beta: 0.3 }
    }
}

impl ForceLaw {
    /// `beta` must lie in `(0, 1)`; the config layer validates it.
    pub fn new(beta: f64) -> Self {
        debug_assert!(beta > 0.0 && beta < 1.0, "beta must be in (0, 1)");
        Self { beta }
    }

    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    #[inline]
    pub fn force(&self, r: f64, a: f64) -> f64 {
        let beta = self.beta;
        if r < beta {
            r / beta - 1.0
        } else if r < 1.0 {
            a * (1.0 - (2.0 * r - 1.0 - beta).abs() / (1.0 - beta))
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_outside_cutoff() {
        let law = ForceLaw::default();
        for a in [-1.0, -0.2, 0.0, 0.7, 1.0] {
            assert_eq!(law.force(1.0, a), 0.0);
            assert_eq!(law.force(3.5, a), 0.0);
        }
    }

    #[test]
    fn test_continuous_at_beta() {
        let law = ForceLaw::default();
        for a in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let below = law.force(law.beta() - 1e-9, a);
            let at = law.force(law.beta(), a);
            assert!(below.abs() < 1e-7);
            assert!(at.abs() < 1e-12);
        }
    }

    #[test]
    fn test_short_range_repels_regardless_of_coefficient() {
        let law = ForceLaw::default();
        for a in [-1.0, 0.0, 1.0] {
            assert_eq!(law.force(0.0, a), -1.0);
            assert!(law.force(0.15, a) < 0.0);
        }
    }

    #[test]
    fn test_peak_at_zone_midpoint() {
        let law = ForceLaw::new(0.3);
        let mid = (1.0 + 0.3) / 2.0;
        assert!((law.force(mid, 0.8) - 0.8).abs() < 1e-12);
        assert!((law.force(mid, -0.4) + 0.4).abs() < 1e-12);
        assert!(law.force(mid - 0.1, 0.8) < 0.8);
    }
}
