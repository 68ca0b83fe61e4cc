//! Frame driver: the one stateful, tick-sequenced component.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::RenderableFrame;
use crate::particle::Particle;
use crate::pool::ParticlePool;
use crate::scene::Scene;
use crate::spawn::SpawnPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped,
}

/// Owns one scene's pool, carried state and randomness source.
///
/// Ticks are 1-based: the first call to [`FrameDriver::tick`] sees tick 1.
/// After the tick equal to the preset's `frame_count` the driver stops and
/// every later call returns `None`.
pub struct FrameDriver<Sc: Scene, R = StdRng> {
    scene: Sc,
    preset: ScenePreset,
    policy: SpawnPolicy,
    pool: ParticlePool<Sc::State>,
    carry: Sc::Carry,
    rng: R,
    tick: u64,
    state: DriverState,
    last_env: Environment,
}

impl<Sc: Scene> FrameDriver<Sc, StdRng> {
    pub fn new(scene: Sc) -> Self {
        let preset = scene.preset();
        Self::with_preset(scene, preset, StdRng::from_entropy())
    }

    pub fn seeded(scene: Sc, seed: u64) -> Self {
        let preset = scene.preset();
        Self::with_preset(scene, preset, StdRng::seed_from_u64(seed))
    }
}

impl<Sc: Scene, R: RngCore> FrameDriver<Sc, R> {
    pub fn with_preset(scene: Sc, preset: ScenePreset, rng: R) -> Self {
        let pool = ParticlePool::new(preset.max_particles).with_bounds(scene.bounds());
        let policy = scene.spawn_policy();
        info!(
            scene = scene.name(),
            frames = preset.frame_count,
            max_particles = preset.max_particles,
            "driver ready"
        );
        Self {
            scene,
            preset,
            policy,
            pool,
            carry: Sc::Carry::default(),
            rng,
            tick: 0,
            state: DriverState::Running,
            last_env: Environment::default(),
        }
    }

    pub fn scene(&self) -> &Sc {
        &self.scene
    }

    pub fn preset(&self) -> &ScenePreset {
        &self.preset
    }

    pub fn pool(&self) -> &ParticlePool<Sc::State> {
        &self.pool
    }

    pub fn carry(&self) -> &Sc::Carry {
        &self.carry
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Environment computed by the latest tick.
    pub fn environment(&self) -> &Environment {
        &self.last_env
    }

    /// Runs one spawn, advance, cull cycle and renders the result.
    pub fn tick(&mut self) -> Option<RenderableFrame> {
        if self.state == DriverState::Stopped {
            return None;
        }
        self.tick += 1;
        let env = self.scene.environment(self.tick, &mut self.carry);

        let attempts = self.policy.attempts(&env, &mut self.rng);
        let scene = &self.scene;
        let rng = &mut self.rng;
        let mut spawned = 0u32;
        for _ in 0..attempts {
            let mut rule = |env: &Environment| scene.emit(env, &mut *rng);
            if self.pool.spawn(&mut rule, &env).is_none() {
                break;
            }
            spawned += 1;
        }

        let mut table =
            |p: &Particle<Sc::State>, env: &Environment| scene.transition(p, env, &mut *rng);
        self.pool.advance(&mut table, &env);
        let culled = self.pool.cull();

        let frame = RenderableFrame {
            tick: self.tick,
            sprites: self.pool.snapshot().iter().map(|p| scene.style(p)).collect(),
            shapes: scene.geometry(&env, &self.carry),
            camera: scene.camera(self.tick),
            caption: scene.caption(&env, &self.carry),
        };
        debug!(
            tick = self.tick,
            live = self.pool.len(),
            spawned,
            culled,
            "tick"
        );

        self.last_env = env;
        if self.tick >= self.preset.frame_count {
            self.state = DriverState::Stopped;
            let totals = self.pool.totals();
            info!(
                scene = self.scene.name(),
                ticks = self.tick,
                spawned = totals.spawned,
                culled = totals.culled,
                rejected = totals.rejected,
                malformed = totals.malformed,
                "driver stopped"
            );
        }
        Some(frame)
    }
}
