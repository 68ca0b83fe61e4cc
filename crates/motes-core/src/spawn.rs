//! Spawn rules (what a new particle looks like) and spawn policies (how
//! many to try this tick).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::particle::{Lifecycle, Particle};

/// Builds one new particle from the environment.
pub trait SpawnRule<S: Lifecycle> {
    fn emit(&mut self, env: &Environment) -> Particle<S>;
}

impl<S, F> SpawnRule<S> for F
where
    S: Lifecycle,
    F: FnMut(&Environment) -> Particle<S>,
{
    fn emit(&mut self, env: &Environment) -> Particle<S> {
        self(env)
    }
}

/// Condition on one environment signal channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    Always,
    Below { channel: usize, threshold: f32 },
    Above { channel: usize, threshold: f32 },
    Nonzero { channel: usize },
}

impl Gate {
    pub fn is_open(&self, env: &Environment) -> bool {
        match *self {
            Gate::Always => true,
            Gate::Below { channel, threshold } => env.channel(channel).is_some_and(|v| v < threshold),
            Gate::Above { channel, threshold } => env.channel(channel).is_some_and(|v| v > threshold),
            Gate::Nonzero { channel } => env.channel(channel).is_some_and(|v| v != 0.0),
        }
    }
}

/// How many spawn attempts a tick gets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    Never,
    /// `count` independent trials, each succeeding with `probability`.
    Chance {
        probability: f32,
        count: u32,
        gate: Gate,
    },
    /// `count` particles every `period` ticks.
    Every { period: u64, count: u32 },
    /// `count` particles on exactly one tick.
    Burst { tick: u64, count: u32 },
}

impl SpawnPolicy {
    pub fn chance(probability: f32) -> Self {
        SpawnPolicy::Chance {
            probability,
            count: 1,
            gate: Gate::Always,
        }
    }

    pub fn attempts<R: Rng + ?Sized>(&self, env: &Environment, rng: &mut R) -> u32 {
        match *self {
            SpawnPolicy::Never => 0,
            SpawnPolicy::Chance {
                probability,
                count,
                gate,
            } => {
                if !gate.is_open(env) {
                    return 0;
                }
                let p = f64::from(probability).clamp(0.0, 1.0);
                (0..count).filter(|_| rng.gen_bool(p)).count() as u32
            }
            SpawnPolicy::Every { period, count } => {
                if period != 0 && env.tick % period == 0 {
                    count
                } else {
                    0
                }
            }
            SpawnPolicy::Burst { tick, count } => {
                if env.tick == tick {
                    count
                } else {
                    0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn gate_reads_channel() {
        let env = Environment::new(1).with_signal(Vec4::new(-0.2, 0.0, 0.0, 0.0));
        assert!(Gate::Below { channel: 0, threshold: 0.0 }.is_open(&env));
        assert!(!Gate::Above { channel: 0, threshold: 0.0 }.is_open(&env));
        assert!(!Gate::Nonzero { channel: 1 }.is_open(&env));
        assert!(!Gate::Below { channel: 9, threshold: 1.0 }.is_open(&env));
    }

    #[test]
    fn certain_and_impossible_chances() {
        let mut rng = StdRng::seed_from_u64(7);
        let env = Environment::new(1);
        let always = SpawnPolicy::Chance {
            probability: 1.0,
            count: 3,
            gate: Gate::Always,
        };
        assert_eq!(always.attempts(&env, &mut rng), 3);
        assert_eq!(SpawnPolicy::chance(0.0).attempts(&env, &mut rng), 0);
        assert_eq!(SpawnPolicy::Never.attempts(&env, &mut rng), 0);
    }

    #[test]
    fn periodic_and_burst() {
        let mut rng = StdRng::seed_from_u64(7);
        let every = SpawnPolicy::Every { period: 3, count: 2 };
        let burst = SpawnPolicy::Burst { tick: 1, count: 20 };
        let total: u32 = (1..=9)
            .map(|t| every.attempts(&Environment::new(t), &mut rng))
            .sum();
        assert_eq!(total, 6);
        assert_eq!(burst.attempts(&Environment::new(1), &mut rng), 20);
        assert_eq!(burst.attempts(&Environment::new(2), &mut rng), 0);
    }
}
