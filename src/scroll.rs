/// Lag of the scrub smoother in seconds. The page scrubs scroll with a
/// half-second catch-up so the camera and panels trail the wheel slightly.
pub const SCRUB_LAG_SECS: f64 = 0.5;

/// Normalize a pixel scroll offset to journey progress in [0, 1].
///
/// `offset` is the distance scrolled from the top of the journey
/// container, `viewport` the visible height, `content` the container's
/// full height. Clamping happens here — the store stores raw values, the
/// scroll source is the one place that bounds them.
pub fn normalize(offset: f64, viewport: f64, content: f64) -> f64 {
    let extent = content - viewport;
    if extent <= 0.0 || !extent.is_finite() {
        return 0.0;
    }
    (offset / extent).clamp(0.0, 1.0)
}

/// Exponential catch-up toward a target progress value.
///
/// Reproduces the smoothed progress feed for headless hosts (tests, the
/// simulator): each tick moves the emitted value toward the raw target
/// with a fixed time constant, so a jump decays to ~37% after one lag
/// interval.
#[derive(Debug, Clone)]
pub struct Scrub {
    lag_secs: f64,
    target: f64,
    value: f64,
}

impl Scrub {
    pub fn new(lag_secs: f64) -> Self {
        Self {
            lag_secs,
            target: 0.0,
            value: 0.0,
        }
    }

    /// Set the raw (unsmoothed) progress target.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Advance wall-clock time and return the smoothed value.
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        if self.lag_secs <= 0.0 {
            self.value = self.target;
        } else {
            let alpha = 1.0 - (-dt_secs / self.lag_secs).exp();
            self.value += (self.target - self.value) * alpha;
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for Scrub {
    fn default() -> Self {
        Self::new(SCRUB_LAG_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_extent_to_unit_range() {
        // 4000px content in a 1000px viewport: 3000px of travel.
        assert_eq!(normalize(0.0, 1000.0, 4000.0), 0.0);
        assert_eq!(normalize(1500.0, 1000.0, 4000.0), 0.5);
        assert_eq!(normalize(3000.0, 1000.0, 4000.0), 1.0);
    }

    #[test]
    fn normalize_clamps_overshoot() {
        // Rubber-band overscroll on touch devices.
        assert_eq!(normalize(-80.0, 1000.0, 4000.0), 0.0);
        assert_eq!(normalize(3200.0, 1000.0, 4000.0), 1.0);
    }

    #[test]
    fn normalize_handles_content_shorter_than_viewport() {
        assert_eq!(normalize(0.0, 1000.0, 600.0), 0.0);
        assert_eq!(normalize(100.0, 1000.0, 1000.0), 0.0);
    }

    #[test]
    fn scrub_converges_on_target() {
        let mut scrub = Scrub::new(0.5);
        scrub.set_target(1.0);

        let after_one_lag = scrub.advance(0.5);
        assert!((after_one_lag - 0.632).abs() < 0.01);

        for _ in 0..20 {
            scrub.advance(0.5);
        }
        assert!((scrub.value() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn scrub_with_zero_lag_is_passthrough() {
        let mut scrub = Scrub::new(0.0);
        scrub.set_target(0.42);
        assert_eq!(scrub.advance(0.016), 0.42);
    }

    #[test]
    fn scrub_never_overshoots() {
        let mut scrub = Scrub::default();
        scrub.set_target(0.8);
        let mut last = 0.0;
        for _ in 0..200 {
            let v = scrub.advance(0.016);
            assert!(v >= last && v <= 0.8);
            last = v;
        }
    }
}
