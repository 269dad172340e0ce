//! Wheel layout and the cosmetic landing angle.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelGeometry {
    segments: usize,
}

impl WheelGeometry {
    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Degrees covered by one segment.
    pub fn segment_angle(&self) -> f64 {
        360.0 / self.segments as f64
    }

    /// Chord width of one segment on a wheel of the given radius.
    pub fn segment_width(&self, radius: f64) -> f64 {
        2.0 * radius * (self.segment_angle().to_radians() / 2.0).sin()
    }

    /// Total rotation after `full_turns` extra turns plus `segment` segment steps.
    pub fn target_rotation(&self, current: f64, full_turns: u32, segment: usize) -> f64 {
        current + 360.0 * full_turns as f64 + (segment % self.segments) as f64 * self.segment_angle()
    }

    pub fn random_segment(&self) -> usize {
        rand::rng().random_range(0..self.segments)
    }

    /// Segment under the pointer after the wheel stops at `rotation` degrees.
    pub fn landing_segment(&self, rotation: f64) -> usize {
        let normalized = rotation.rem_euclid(360.0);
        let steps = (normalized / self.segment_angle()).floor() as usize;
        (self.segments - steps % self.segments) % self.segments
    }
}
