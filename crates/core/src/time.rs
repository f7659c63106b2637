use std::time::Duration;

/// Elapsed simulated time for one frame, in seconds.
///
/// Always finite and within `[0, max]` for the bound it was built with, so a
/// long pause on the driver side (backgrounded tab, debugger stop) cannot turn
/// into a single huge physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct FrameDelta(f32);

impl FrameDelta {
    /// Default upper bound for a single frame.
    pub const DEFAULT_MAX_SECS: f32 = 0.05;

    pub const ZERO: Self = Self(0.0);

    /// Clamp `secs` into `[0, max_secs]`. Non-finite input maps to zero.
    pub fn clamped(secs: f32, max_secs: f32) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self(secs.min(max_secs.max(0.0)))
    }

    /// Clamp against [`Self::DEFAULT_MAX_SECS`].
    pub fn from_secs(secs: f32) -> Self {
        Self::clamped(secs, Self::DEFAULT_MAX_SECS)
    }

    /// Convert a wall-clock duration, clamped to `max_secs`.
    pub fn from_duration(elapsed: Duration, max_secs: f32) -> Self {
        Self::clamped(elapsed.as_secs_f32(), max_secs)
    }

    /// Fixed step for a driver running at `fps` frames per second.
    pub fn per_frame(fps: u32, max_secs: f32) -> Self {
        if fps == 0 {
            return Self::ZERO;
        }
        Self::clamped(1.0 / fps as f32, max_secs)
    }

    /// Re-apply a (possibly tighter) bound.
    pub fn limit(self, max_secs: f32) -> Self {
        Self::clamped(self.0, max_secs)
    }

    pub const fn secs(self) -> f32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_large_pauses() {
        let d = FrameDelta::from_secs(3.0);
        assert_eq!(d.secs(), FrameDelta::DEFAULT_MAX_SECS);
    }

    #[test]
    fn negative_and_nan_are_zero() {
        assert!(FrameDelta::from_secs(-0.2).is_zero());
        assert!(FrameDelta::from_secs(f32::NAN).is_zero());
        assert!(FrameDelta::from_secs(f32::INFINITY).is_zero());
    }

    #[test]
    fn small_steps_pass_through() {
        let d = FrameDelta::from_secs(0.016);
        assert_eq!(d.secs(), 0.016);
    }

    #[test]
    fn per_frame_at_sixty_hz() {
        let d = FrameDelta::per_frame(60, 0.05);
        assert!((d.secs() - 1.0 / 60.0).abs() < 1e-6);

        // 10 fps would be 0.1s per frame, bounded to 0.05
        let d = FrameDelta::per_frame(10, 0.05);
        assert_eq!(d.secs(), 0.05);

        assert!(FrameDelta::per_frame(0, 0.05).is_zero());
    }

    #[test]
    fn from_duration_and_limit() {
        let d = FrameDelta::from_duration(Duration::from_millis(20), 0.05);
        assert!((d.secs() - 0.02).abs() < 1e-6);

        let d = FrameDelta::from_duration(Duration::from_secs(2), 0.05).limit(0.01);
        assert_eq!(d.secs(), 0.01);
    }
}
