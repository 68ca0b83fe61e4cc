//! The contract one visualization implements.

use std::fmt::Debug;

use rand::RngCore;

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{Camera, Shape, Sprite};
use crate::particle::{Lifecycle, Particle};
use crate::pool::Bounds;
use crate::spawn::SpawnPolicy;

/// One visualization: its lifecycle, environment, spawn rule, transition
/// table and styling.
///
/// Everything except [`Scene::environment`] must be a pure function of its
/// arguments. `environment` may update `Carry`, the per-run state that cannot
/// be recomputed from the tick index alone.
pub trait Scene {
    type State: Lifecycle;
    type Carry: Default + Debug;

    fn name(&self) -> &'static str;

    fn preset(&self) -> ScenePreset;

    fn bounds(&self) -> Bounds {
        Bounds::unbounded()
    }

    fn spawn_policy(&self) -> SpawnPolicy;

    fn environment(&self, tick: u64, carry: &mut Self::Carry) -> Environment;

    /// Spawn rule.
    fn emit(&self, env: &Environment, rng: &mut dyn RngCore) -> Particle<Self::State>;

    /// Transition table.
    fn transition(
        &self,
        particle: &Particle<Self::State>,
        env: &Environment,
        rng: &mut dyn RngCore,
    ) -> Particle<Self::State>;

    fn style(&self, particle: &Particle<Self::State>) -> Sprite;

    fn geometry(&self, _env: &Environment, _carry: &Self::Carry) -> Vec<Shape> {
        Vec::new()
    }

    fn camera(&self, _tick: u64) -> Camera {
        Camera::default()
    }

    fn caption(&self, _env: &Environment, _carry: &Self::Carry) -> Option<String> {
        None
    }
}
