//! Periodic environment signals computed from the tick index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wave {
    Sine,
    Cosine,
}

/// `offset + amplitude * wave(tick * rate + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub wave: Wave,
    pub rate: f32,
    pub amplitude: f32,
    pub offset: f32,
    pub phase: f32,
}

impl Oscillator {
    pub const fn sine(rate: f32) -> Self {
        Self {
            wave: Wave::Sine,
            rate,
            amplitude: 1.0,
            offset: 0.0,
            phase: 0.0,
        }
    }

    pub const fn cosine(rate: f32) -> Self {
        Self {
            wave: Wave::Cosine,
            rate,
            amplitude: 1.0,
            offset: 0.0,
            phase: 0.0,
        }
    }

    pub const fn scaled(self, amplitude: f32, offset: f32) -> Self {
        Self {
            amplitude,
            offset,
            ..self
        }
    }

    pub const fn shifted(self, phase: f32) -> Self {
        Self { phase, ..self }
    }

    pub fn sample(&self, tick: u64) -> f32 {
        let x = tick as f32 * self.rate + self.phase;
        let wave = match self.wave {
            Wave::Sine => x.sin(),
            Wave::Cosine => x.cos(),
        };
        self.offset + self.amplitude * wave
    }
}

/// Linear ramp from 0 at tick 0 to 1 at `span`, clamped.
pub fn ramp(tick: u64, span: f32) -> f32 {
    if span <= 0.0 {
        return 1.0;
    }
    (tick as f32 / span).clamp(0.0, 1.0)
}

/// Maps `[-1, 1]` onto `[0, 1]`.
pub fn unit(value: f32) -> f32 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// On for the first `on` ticks of every `period`.
pub fn blink(tick: u64, period: u64, on: u64) -> bool {
    period != 0 && tick % period < on
}
