//! Pool and driver behaviour through the public API.

use glam::Vec3;
use motes_core::rules::{self, Decay};
use motes_core::{
    palette, Environment, FrameDriver, Gate, Motion, Particle, ParticlePool, Scene, ScenePreset,
    SpawnPolicy, Sprite, Stage, StandardTable,
};
use proptest::prelude::*;
use rand::RngCore;

/// Always spawns at the origin and seeks a fixed point.
struct Fountain;

impl Scene for Fountain {
    type State = Stage;
    type Carry = ();

    fn name(&self) -> &'static str {
        "fountain"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "fountain".into(),
            frame_count: 50,
            max_particles: 5,
            interval_ms: 0,
        }
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::Chance {
            probability: 1.0,
            count: 1,
            gate: Gate::Always,
        }
    }

    fn environment(&self, tick: u64, _carry: &mut ()) -> Environment {
        Environment::new(tick)
    }

    fn emit(&self, _env: &Environment, _rng: &mut dyn RngCore) -> Particle<Stage> {
        Particle::new(Vec3::ZERO, Motion::seek(Vec3::new(0.0, 0.0, 6.0), 0.1))
    }

    fn transition(
        &self,
        particle: &Particle<Stage>,
        env: &Environment,
        _rng: &mut dyn RngCore,
    ) -> Particle<Stage> {
        StandardTable::default().step(particle, env)
    }

    fn style(&self, particle: &Particle<Stage>) -> Sprite {
        Sprite {
            position: particle.position,
            color: palette::WHITE,
            size: 1.0,
        }
    }
}

#[test]
fn certain_spawns_fill_to_capacity_and_stop() {
    let mut driver = FrameDriver::seeded(Fountain, 0);
    for _ in 0..10 {
        driver.tick();
    }
    assert_eq!(driver.pool().len(), 5);
    assert_eq!(driver.pool().totals().spawned, 5);
}

#[test]
fn driver_snapshot_is_stable_between_ticks() {
    let mut driver = FrameDriver::seeded(Fountain, 0);
    driver.tick();
    driver.tick();
    let first = driver.pool().snapshot().to_vec();
    assert_eq!(first, driver.pool().snapshot());
}

#[test]
fn seek_from_six_for_ten_ticks() {
    let mut pool = ParticlePool::new(1);
    pool.insert(Particle::<Stage>::new(
        Vec3::new(0.0, 0.0, 6.0),
        Motion::seek(Vec3::ZERO, 0.1),
    ));
    let mut table = StandardTable::default();
    for tick in 1..=10 {
        pool.advance(&mut table, &Environment::new(tick));
        pool.cull();
    }
    assert!((pool.snapshot()[0].position.z - 2.09).abs() < 0.01);
}

#[test]
fn energy_runs_out_on_the_ceiling_tick_inside_the_pool() {
    let mut pool = ParticlePool::new(1);
    pool.insert(Particle::<Stage>::new(Vec3::ZERO, Motion::REST).with_energy(1.0));
    let mut table = StandardTable::default().with_decay(0.25);
    let mut states = Vec::new();
    for tick in 1..=5 {
        pool.advance(&mut table, &Environment::new(tick));
        pool.cull();
        states.push(pool.snapshot()[0].state);
    }
    assert_eq!(
        states,
        vec![
            Stage::InTransit,
            Stage::InTransit,
            Stage::InTransit,
            Stage::Decaying,
            Stage::Decaying,
        ]
    );
    assert_eq!(pool.totals().rejected, 0);
}

proptest! {
    #[test]
    fn decay_exhausts_after_ceiling_ticks(e0 in 0.05f32..1.0, step in 0.05f32..1.0) {
        let expected = (e0 / step).ceil() as u32;
        let mut energy = e0;
        let mut ticks = 0u32;
        loop {
            ticks += 1;
            match rules::decay(energy, step) {
                Decay::Remaining(left) => energy = left,
                Decay::Exhausted => break,
            }
            prop_assert!(ticks <= expected);
        }
        prop_assert_eq!(ticks, expected);
    }

    #[test]
    fn seek_distance_shrinks_geometrically(
        x in -10.0f32..10.0, y in -10.0f32..10.0, z in -10.0f32..10.0,
        rate in 0.01f32..0.99,
    ) {
        let start = Vec3::new(x, y, z);
        let d0 = start.length();
        let mut p = start;
        for n in 1..=10 {
            p = rules::seek(p, Vec3::ZERO, rate);
            let expected = d0 * (1.0 - rate).powi(n);
            prop_assert!((p.length() - expected).abs() <= 1e-3 * (1.0 + d0));
        }
    }

    #[test]
    fn swirl_never_produces_nan(
        x in -5.0f32..5.0, y in -5.0f32..5.0, z in -5.0f32..5.0,
        decay in 0.5f32..1.0, step in 0.0f32..1.0,
    ) {
        let swirl = rules::Swirl::new(Vec3::ZERO, decay, step);
        let p = swirl.apply(Vec3::new(x, y, z));
        prop_assert!(p.is_finite());
        prop_assert!(p.truncate().length() <= Vec3::new(x, y, 0.0).length() + 1e-4);
    }
}
