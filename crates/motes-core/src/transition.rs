//! State transition tables: `(particle, environment) -> particle'`.

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::particle::{Lifecycle, Particle, Stage};
use crate::rules::{self, Decay, Outcome, Swirl};

/// Per-visualization transition function.
///
/// Implementations must read nothing but the particle's own prior state and
/// the environment; the pool applies the table as a pure map.
pub trait TransitionTable<S: Lifecycle> {
    fn transition(&mut self, particle: &Particle<S>, env: &Environment) -> Particle<S>;
}

impl<S, F> TransitionTable<S> for F
where
    S: Lifecycle,
    F: FnMut(&Particle<S>, &Environment) -> Particle<S>,
{
    fn transition(&mut self, particle: &Particle<S>, env: &Environment) -> Particle<S> {
        self(particle, env)
    }
}

/// Ready-made table over [`Stage`] combining all three archetypes.
///
/// - `Spawned` moves and becomes `InTransit` on its first tick.
/// - `InTransit` moves; within `arrive_radius` of its target it becomes `Active`.
/// - Every non-terminal stage drains energy from the first tick on, so a
///   charge of `e0` runs out on tick `ceil(e0 / decay_step)`.
/// - Exhausted energy moves the particle one stage on and refills it, except
///   `Decaying`, which goes to `Consumed`.
/// - With `swirl` set, the swirl is applied after the motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardTable {
    pub arrive_radius: f32,
    pub decay_step: f32,
    pub swirl: Option<Swirl>,
}

impl Default for StandardTable {
    fn default() -> Self {
        Self {
            arrive_radius: 0.01,
            decay_step: 0.0,
            swirl: None,
        }
    }
}

impl StandardTable {
    pub fn with_decay(mut self, step: f32) -> Self {
        self.decay_step = step;
        self
    }

    pub fn with_swirl(mut self, swirl: Swirl) -> Self {
        self.swirl = Some(swirl);
        self
    }

    pub fn step(&self, particle: &Particle<Stage>, env: &Environment) -> Particle<Stage> {
        let mut next = *particle;
        if particle.state == Stage::Consumed {
            return next;
        }

        next.position = rules::integrate(particle, env);
        if let Some(swirl) = &self.swirl {
            next.position = swirl.apply(next.position);
        }

        if particle.state == Stage::Spawned {
            next.state = Stage::InTransit;
        }

        let mut exhausted = false;
        if let (Some(energy), true) = (particle.energy, self.decay_step > 0.0) {
            match rules::decay(energy, self.decay_step) {
                Decay::Remaining(left) => next.energy = Some(left),
                Decay::Exhausted => exhausted = true,
            }
        }
        let arrived = particle.state == Stage::InTransit
            && rules::remaining(&next, env).is_some_and(|d| d <= self.arrive_radius);

        match rules::resolve(exhausted, arrived) {
            Outcome::Exhausted => {
                next.state = if particle.state == Stage::Decaying {
                    Stage::Consumed
                } else {
                    Stage::Decaying
                };
                next.energy = if next.state == Stage::Consumed {
                    Some(0.0)
                } else {
                    Some(1.0)
                };
            }
            Outcome::Arrived => next.state = Stage::Active,
            Outcome::Continue => {}
        }
        next
    }
}

impl TransitionTable<Stage> for StandardTable {
    fn transition(&mut self, particle: &Particle<Stage>, env: &Environment) -> Particle<Stage> {
        self.step(particle, env)
    }
}
