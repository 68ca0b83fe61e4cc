//! Particle pool: the authoritative list of live particles for one driver.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::environment::Environment;
use crate::particle::{Lifecycle, Particle};
use crate::spawn::SpawnRule;
use crate::transition::TransitionTable;

/// Point that swallows any particle within `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sink {
    pub center: Vec3,
    pub radius: f32,
}

/// Spatial validity predicate applied during cull.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    pub max_radius: Option<f32>,
    pub sinks: Vec<Sink>,
}

impl Bounds {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn sphere(center: Vec3, max_radius: f32) -> Self {
        Self {
            center,
            max_radius: Some(max_radius),
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, center: Vec3, radius: f32) -> Self {
        self.sinks.push(Sink { center, radius });
        self
    }

    pub fn contains(&self, position: Vec3) -> bool {
        if !position.is_finite() {
            return false;
        }
        if let Some(max) = self.max_radius {
            if position.distance(self.center) > max {
                return false;
            }
        }
        self.sinks
            .iter()
            .all(|sink| position.distance(sink.center) > sink.radius)
    }
}

/// Running totals, for end-of-run logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolTotals {
    pub spawned: u64,
    pub culled: u64,
    /// Dropped for breaking lifecycle order.
    pub rejected: u64,
    /// Dropped for a NaN or infinite field.
    pub malformed: u64,
}

/// Bounded, ordered collection of live particles.
///
/// `advance` is copy-on-advance: the pre-tick particles are kept as
/// [`ParticlePool::previous`] and the table writes into a fresh vector, so no
/// transition can observe another particle's update from the same tick.
#[derive(Debug, Clone)]
pub struct ParticlePool<S> {
    capacity: usize,
    bounds: Bounds,
    live: Vec<Particle<S>>,
    previous: Vec<Particle<S>>,
    /// Parallel to `live`: last transition broke the lifecycle order.
    broken: Vec<bool>,
    totals: PoolTotals,
}

impl<S: Lifecycle> ParticlePool<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            bounds: Bounds::unbounded(),
            live: Vec::with_capacity(capacity),
            previous: Vec::new(),
            broken: Vec::with_capacity(capacity),
            totals: PoolTotals::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.live.len() >= self.capacity
    }

    pub fn totals(&self) -> PoolTotals {
        self.totals
    }

    /// Adds one particle built by `rule`. A full pool makes this a no-op.
    pub fn spawn<R>(&mut self, rule: &mut R, env: &Environment) -> Option<Particle<S>>
    where
        R: SpawnRule<S> + ?Sized,
    {
        if self.is_full() {
            return None;
        }
        let particle = rule.emit(env);
        self.live.push(particle);
        self.broken.push(false);
        self.totals.spawned += 1;
        Some(particle)
    }

    /// Inserts an already-built particle, subject to the same capacity rule.
    pub fn insert(&mut self, particle: Particle<S>) -> bool {
        let mut rule = move |_: &Environment| particle;
        self.spawn(&mut rule, &Environment::default()).is_some()
    }

    /// Applies `table` to every live particle exactly once.
    ///
    /// Age is bumped here unless the transition respawned the particle.
    pub fn advance<T>(&mut self, table: &mut T, env: &Environment)
    where
        T: TransitionTable<S> + ?Sized,
    {
        let next: Vec<Particle<S>> = self
            .live
            .iter()
            .map(|prev| {
                let mut next = table.transition(prev, env);
                if next.generation == prev.generation {
                    next.age = prev.age.saturating_add(1);
                }
                next
            })
            .collect();
        self.broken = self
            .live
            .iter()
            .zip(&next)
            .map(|(prev, next)| !next.follows(prev))
            .collect();
        self.previous = std::mem::replace(&mut self.live, next);
    }

    /// Drops terminal, out-of-bounds, non-finite and lifecycle-breaking
    /// particles. Returns how many were removed.
    pub fn cull(&mut self) -> usize {
        let before = self.live.len();
        let bounds = &self.bounds;
        let mut broken = std::mem::take(&mut self.broken).into_iter();
        let mut rejected = 0u64;
        let mut malformed = 0u64;
        self.live.retain(|p| {
            if broken.next().unwrap_or(false) {
                trace!(state = ?p.state, "dropping particle that moved backwards");
                rejected += 1;
                return false;
            }
            if !p.is_finite() {
                trace!("dropping non-finite particle");
                malformed += 1;
                return false;
            }
            !p.state.is_terminal() && bounds.contains(p.position)
        });
        self.broken = vec![false; self.live.len()];
        let removed = before - self.live.len();
        self.totals.culled += removed as u64;
        self.totals.rejected += rejected;
        self.totals.malformed += malformed;
        removed
    }

    /// Particles after the latest advance and cull, in spawn order.
    pub fn snapshot(&self) -> &[Particle<S>] {
        &self.live
    }

    /// Particles as they were before the latest advance.
    pub fn previous(&self) -> &[Particle<S>] {
        &self.previous
    }
}
