//! Particle records and the lifecycle contract every scene's state enum follows.

use std::fmt::Debug;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;

/// Closed, ordered set of lifecycle states for one visualization.
///
/// States only move forward (`ordinal` never decreases) except through
/// [`Particle::respawn`], which returns a particle to [`Lifecycle::INITIAL`].
pub trait Lifecycle: Copy + Eq + Debug {
    /// State every spawned or respawned particle starts in.
    const INITIAL: Self;

    /// Position of this state in the lifecycle order.
    fn ordinal(self) -> u8;

    /// Terminal states have no outgoing edge. The pool culls them.
    fn is_terminal(self) -> bool;
}

/// General-purpose lifecycle used by scenes that need no bespoke states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Spawned,
    InTransit,
    Active,
    Decaying,
    Consumed,
}

impl Stage {
    /// Following stage; `Consumed` is a fixed point.
    pub fn next(self) -> Self {
        match self {
            Stage::Spawned => Stage::InTransit,
            Stage::InTransit => Stage::Active,
            Stage::Active => Stage::Decaying,
            Stage::Decaying | Stage::Consumed => Stage::Consumed,
        }
    }
}

impl Lifecycle for Stage {
    const INITIAL: Self = Stage::Spawned;

    fn ordinal(self) -> u8 {
        self as u8
    }

    fn is_terminal(self) -> bool {
        self == Stage::Consumed
    }
}

/// Where a seeking particle is heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// A point that never moves.
    Fixed(Vec3),
    /// Index into [`Environment::anchors`], re-read every tick.
    Anchor(usize),
}

impl Target {
    pub fn resolve(self, env: &Environment) -> Option<Vec3> {
        match self {
            Target::Fixed(point) => Some(point),
            Target::Anchor(index) => env.anchor(index),
        }
    }
}

/// Either free motion or seek motion, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Free { velocity: Vec3 },
    Seek { target: Target, rate: f32 },
}

impl Motion {
    pub const REST: Motion = Motion::Free {
        velocity: Vec3::ZERO,
    };

    pub fn seek(target: Vec3, rate: f32) -> Self {
        Motion::Seek {
            target: Target::Fixed(target),
            rate,
        }
    }

    pub fn follow(anchor: usize, rate: f32) -> Self {
        Motion::Seek {
            target: Target::Anchor(anchor),
            rate,
        }
    }
}

/// One animated element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle<S> {
    pub position: Vec3,
    pub state: S,
    pub motion: Motion,
    /// Optional brightness/fuel in `[0, 1]`.
    pub energy: Option<f32>,
    /// Ticks since spawn or last respawn. Maintained by the pool.
    pub age: u32,
    /// Scene-defined payload tag, used for styling.
    pub kind: u8,
    /// Number of respawns.
    pub generation: u32,
}

impl<S: Lifecycle> Particle<S> {
    pub fn new(position: Vec3, motion: Motion) -> Self {
        Self {
            position,
            state: S::INITIAL,
            motion,
            energy: None,
            age: 0,
            kind: 0,
            generation: 0,
        }
    }

    pub fn with_state(mut self, state: S) -> Self {
        self.state = state;
        self
    }

    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = Some(energy.clamp(0.0, 1.0));
        self
    }

    pub fn with_kind(mut self, kind: u8) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.energy.map_or(true, f32::is_finite)
    }

    /// Return a consumed or out-of-bounds particle to the initial state.
    pub fn respawn(self, position: Vec3, motion: Motion) -> Self {
        Self {
            position,
            state: S::INITIAL,
            motion,
            energy: self.energy.map(|_| 1.0),
            age: 0,
            kind: self.kind,
            generation: self.generation.wrapping_add(1),
        }
    }

    /// Whether `self` is a legal successor of `prev` in the lifecycle.
    pub fn follows(&self, prev: &Particle<S>) -> bool {
        if self.generation == prev.generation {
            self.state.ordinal() >= prev.state.ordinal()
        } else {
            self.generation == prev.generation.wrapping_add(1) && self.state == S::INITIAL
        }
    }
}
