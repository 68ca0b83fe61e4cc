//! Per-tick environment handed to spawn rules and transition tables.

use glam::{Vec3, Vec4};

/// Signals derived from the tick index (plus the driver's carried state).
///
/// `signal` holds up to four scalar channels whose meaning is scene-defined
/// (breath cycle, pressure, progress, ...). `anchors` are moving points that
/// [`crate::Target::Anchor`] refers to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    pub tick: u64,
    pub signal: Vec4,
    pub anchors: Vec<Vec3>,
}

impl Environment {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    pub fn with_signal(mut self, signal: Vec4) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<Vec3>) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn anchor(&self, index: usize) -> Option<Vec3> {
        self.anchors.get(index).copied()
    }

    /// Signal channel by index; out-of-range channels read as `None`.
    pub fn channel(&self, channel: usize) -> Option<f32> {
        self.signal.to_array().get(channel).copied()
    }

    /// Tick scaled into animation time.
    pub fn time(&self, rate: f32) -> f32 {
        self.tick as f32 * rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_channels_and_anchors_are_none() {
        let env = Environment::new(3)
            .with_signal(Vec4::new(0.1, 0.2, 0.3, 0.4))
            .with_anchors(vec![Vec3::X]);
        assert_eq!(env.channel(2), Some(0.3));
        assert_eq!(env.channel(4), None);
        assert_eq!(env.anchor(0), Some(Vec3::X));
        assert_eq!(env.anchor(1), None);
        assert_eq!(env.time(0.5), 1.5);
    }
}
