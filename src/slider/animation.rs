// ABOUTME: Tick-driven tweening for page offsets
// Animations are stepped by the UI loop, never by their own threads

use std::time::Duration;

use super::page::PageId;

/// Linear tween of one page's horizontal offset
#[derive(Debug, Clone)]
pub struct PositionAnimation {
    target: PageId,
    start: f64,
    end: f64,
    duration: Duration,
    elapsed: Duration,
}

impl PositionAnimation {
    pub const fn new(target: PageId, start: f64, end: f64, duration: Duration) -> Self {
        Self {
            target,
            start,
            end,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub const fn target(&self) -> PageId {
        self.target
    }

    pub const fn start(&self) -> f64 {
        self.start
    }

    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Fraction of the timeline covered, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Current interpolated value
    pub fn value(&self) -> f64 {
        if self.is_finished() {
            return self.end;
        }
        self.start + (self.end - self.start) * self.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn step(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Rescale both ends, used when the container width changes mid-flight
    pub fn scale(&mut self, ratio: f64) {
        self.start *= ratio;
        self.end *= ratio;
    }
}

/// Animations that share one timeline
#[derive(Debug, Clone, Default)]
pub struct ParallelGroup {
    animations: Vec<PositionAnimation>,
}

impl ParallelGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, animation: PositionAnimation) {
        self.animations.push(animation);
    }

    pub fn step(&mut self, dt: Duration) {
        for animation in &mut self.animations {
            animation.step(dt);
        }
    }

    /// An empty group counts as finished
    pub fn is_finished(&self) -> bool {
        self.animations.iter().all(PositionAnimation::is_finished)
    }

    pub fn animations(&self) -> &[PositionAnimation] {
        &self.animations
    }

    pub fn scale(&mut self, ratio: f64) {
        for animation in &mut self.animations {
            animation.scale(ratio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_progress() {
        let mut anim = PositionAnimation::new(PageId(0), 0.0, -100.0, Duration::from_millis(1000));
        assert_eq!(anim.value(), 0.0);

        anim.step(Duration::from_millis(250));
        assert!((anim.value() + 25.0).abs() < 1e-9);

        anim.step(Duration::from_millis(250));
        assert!((anim.value() + 50.0).abs() < 1e-9);
        assert!(!anim.is_finished());

        anim.step(Duration::from_secs(5));
        assert!(anim.is_finished());
        assert_eq!(anim.value(), -100.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let anim = PositionAnimation::new(PageId(1), 80.0, 0.0, Duration::ZERO);
        assert!(anim.is_finished());
        assert_eq!(anim.value(), 0.0);
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn test_group_finishes_with_slowest_member() {
        let mut group = ParallelGroup::new();
        group.add(PositionAnimation::new(PageId(0), 0.0, 10.0, Duration::from_millis(100)));
        group.add(PositionAnimation::new(PageId(1), 0.0, 10.0, Duration::from_millis(300)));

        group.step(Duration::from_millis(150));
        assert!(group.animations()[0].is_finished());
        assert!(!group.is_finished());

        group.step(Duration::from_millis(150));
        assert!(group.is_finished());
    }

    #[test]
    fn test_scale_midflight() {
        let mut anim = PositionAnimation::new(PageId(0), 100.0, 0.0, Duration::from_millis(100));
        anim.step(Duration::from_millis(50));
        anim.scale(2.0);
        assert_eq!(anim.start(), 200.0);
        assert!((anim.value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_group_is_finished() {
        assert!(ParallelGroup::new().is_finished());
    }
}
