//! Motion and energy archetypes that scene transition tables are built from.
//!
//! | Archetype | Function |
//! |-----------|----------|
//! | Seek | [`seek`]: close a fixed fraction of the remaining distance |
//! | Swirl | [`Swirl::apply`]: shrink radius around an axis while rotating |
//! | Decay-then-transition | [`decay`]: drain energy, report exhaustion |
//!
//! Every division in here goes through an epsilon floor so that no input
//! (a particle sitting exactly on the swirl axis, a zero-length offset) can
//! produce a NaN.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::particle::{Motion, Particle};

/// Smallest magnitude any divisor is allowed to take.
pub const EPSILON: f32 = 1e-4;

/// Rounding slack per unit of decay step, in ulps of the step.
const DRIFT_ULPS: f32 = 16.0;

/// Floors the magnitude of `divisor` at [`EPSILON`], keeping its sign.
pub fn guard(divisor: f32) -> f32 {
    if divisor.abs() < EPSILON {
        EPSILON.copysign(divisor)
    } else {
        divisor
    }
}

/// First-order interpolation toward `target`.
pub fn seek(position: Vec3, target: Vec3, rate: f32) -> Vec3 {
    position + (target - position) * rate.clamp(0.0, 1.0)
}

/// Inward spiral around a vertical axis through `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swirl {
    pub center: Vec3,
    /// Radius multiplier per tick, in `(0, 1]`.
    pub decay: f32,
    /// Angle increment per tick, in radians.
    pub step: f32,
}

impl Swirl {
    pub fn new(center: Vec3, decay: f32, step: f32) -> Self {
        Self {
            center,
            decay,
            step,
        }
    }

    /// Height above the disk plane shrinks with the same decay as the radius.
    pub fn apply(&self, position: Vec3) -> Vec3 {
        let offset = position - self.center;
        let radius = offset.truncate().length();
        let angle = if radius < EPSILON {
            0.0
        } else {
            offset.y.atan2(offset.x)
        };
        let radius = radius * self.decay;
        let angle = angle + self.step;
        self.center + Vec3::new(radius * angle.cos(), radius * angle.sin(), offset.z * self.decay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decay {
    Remaining(f32),
    Exhausted,
}

/// Leftover energy small enough to be f32 rounding from repeated
/// subtraction of `step` rather than real charge.
pub fn drift_tolerance(step: f32) -> f32 {
    step.abs() * DRIFT_ULPS * f32::EPSILON
}

/// Drains `step` from `energy`.
///
/// Starting from `e0`, exhaustion is reported on tick `ceil(e0 / step)`.
pub fn decay(energy: f32, step: f32) -> Decay {
    let left = energy - step;
    if left <= drift_tolerance(step) {
        Decay::Exhausted
    } else {
        Decay::Remaining(left)
    }
}

/// What a transition should do when several conditions fire at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Arrived,
    Exhausted,
}

/// Energy exhaustion is irreversible and wins over arrival.
pub fn resolve(exhausted: bool, arrived: bool) -> Outcome {
    if exhausted {
        Outcome::Exhausted
    } else if arrived {
        Outcome::Arrived
    } else {
        Outcome::Continue
    }
}

/// Where a particle's [`Motion`] puts it after one tick.
///
/// An anchor that the environment does not carry holds the particle in place.
pub fn integrate<S>(particle: &Particle<S>, env: &Environment) -> Vec3 {
    match particle.motion {
        Motion::Free { velocity } => particle.position + velocity,
        Motion::Seek { target, rate } => {
            let goal = target.resolve(env).unwrap_or(particle.position);
            seek(particle.position, goal, rate)
        }
    }
}

/// Distance from the particle to its seek target, if it has one.
pub fn remaining<S>(particle: &Particle<S>, env: &Environment) -> Option<f32> {
    match particle.motion {
        Motion::Seek { target, .. } => target
            .resolve(env)
            .map(|goal| particle.position.distance(goal)),
        Motion::Free { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Stage;

    #[test]
    fn seek_converges_geometrically() {
        let target = Vec3::new(1.0, -2.0, 0.5);
        let start = Vec3::new(4.0, 2.0, -3.0);
        let d0 = start.distance(target);
        let mut p = start;
        for n in 1..=25 {
            p = seek(p, target, 0.2);
            let expected = d0 * 0.8f32.powi(n);
            assert!((p.distance(target) - expected).abs() < 1e-4, "tick {n}");
        }
    }

    #[test]
    fn swirl_on_axis_stays_finite() {
        let swirl = Swirl::new(Vec3::ZERO, 0.9, 0.3);
        let p = swirl.apply(Vec3::new(0.0, 0.0, 2.0));
        assert!(p.is_finite());
        assert!((p.z - 1.8).abs() < 1e-6);
    }

    #[test]
    fn swirl_shrinks_and_rotates() {
        let swirl = Swirl::new(Vec3::ZERO, 0.5, std::f32::consts::FRAC_PI_2);
        let p = swirl.apply(Vec3::new(2.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn guard_keeps_sign() {
        assert_eq!(guard(0.0), EPSILON);
        assert_eq!(guard(-1e-9), -EPSILON);
        assert_eq!(guard(2.0), 2.0);
    }

    #[test]
    fn decay_exhausts_at_ceiling() {
        for (e0, d) in [(1.0f32, 0.25f32), (1.0, 0.3), (0.5, 0.1), (0.7, 0.7)] {
            let expected = (e0 / d).ceil() as u32;
            let mut energy = e0;
            let mut tick = 0;
            loop {
                tick += 1;
                match decay(energy, d) {
                    Decay::Remaining(left) => energy = left,
                    Decay::Exhausted => break,
                }
            }
            assert_eq!(tick, expected, "e0={e0} d={d}");
        }
    }

    #[test]
    fn small_leftover_still_costs_a_tick() {
        let (e0, d) = (0.300005f32, 0.1f32);
        let mut energy = e0;
        for _ in 0..3 {
            match decay(energy, d) {
                Decay::Remaining(left) => energy = left,
                Decay::Exhausted => panic!("exhausted early with {energy} left"),
            }
        }
        assert!(energy > 0.0);
        assert_eq!(decay(energy, d), Decay::Exhausted);
    }

    #[test]
    fn tolerance_scales_with_step() {
        assert!(drift_tolerance(0.1) < 1e-6);
        assert_eq!(drift_tolerance(0.0), 0.0);
        assert!(drift_tolerance(1.0) > drift_tolerance(0.25));
    }

    #[test]
    fn exhaustion_beats_arrival() {
        assert_eq!(resolve(true, true), Outcome::Exhausted);
        assert_eq!(resolve(false, true), Outcome::Arrived);
        assert_eq!(resolve(false, false), Outcome::Continue);
    }

    #[test]
    fn missing_anchor_holds_position() {
        let p = Particle::<Stage>::new(Vec3::ONE, Motion::follow(7, 0.5));
        let env = Environment::new(1);
        assert_eq!(integrate(&p, &env), Vec3::ONE);
        assert_eq!(remaining(&p, &env), None);
    }
}
