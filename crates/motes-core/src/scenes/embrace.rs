//! Two hearts exchanging particles.
//!
//! Every tick one particle leaves one of the two hearts (a coin flip picks
//! which) and seeks the other with a little jitter. It is consumed once it
//! gets close enough.

use std::f32::consts::PI;

use glam::{Vec3, Vec4};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{palette, Camera, Shape, Sprite};
use crate::particle::{Motion, Particle, Stage};
use crate::pool::Bounds;
use crate::rules;
use crate::scene::Scene;
use crate::signal::{self, Oscillator};
use crate::spawn::SpawnPolicy;

pub const OUTER_HEART: Vec3 = Vec3::new(0.0, 0.4, 0.9);
pub const INNER_HEART: Vec3 = Vec3::new(0.0, 0.3, 0.8);

/// Particle kind: left the outer heart.
pub const FROM_OUTER: u8 = 0;
/// Particle kind: left the inner heart.
pub const FROM_INNER: u8 = 1;

const EXCHANGE_RATE: f32 = 0.1;
const WARMTH: f32 = 0.01;
const ARRIVAL: f32 = 0.1;
const OUTER_SPREAD: f32 = 0.2;
const INNER_SPREAD: f32 = 0.1;
const WIGGLE: Oscillator = Oscillator::sine(0.2).scaled(0.02, 0.0);
const ARM_SAMPLES: usize = 24;

#[derive(Debug, Clone, Copy, Default)]
pub struct Embrace;

fn target_of(kind: u8) -> Vec3 {
    if kind == FROM_OUTER {
        INNER_HEART
    } else {
        OUTER_HEART
    }
}

fn arm(side: f32) -> Vec<Vec3> {
    (0..ARM_SAMPLES)
        .map(|i| {
            let theta = PI * i as f32 / (ARM_SAMPLES - 1) as f32;
            Vec3::new(
                side * (0.5 - theta.cos() * 0.4),
                0.5 - theta.sin() * 0.4,
                0.8 - theta * 0.1,
            )
        })
        .collect()
}

impl Scene for Embrace {
    type State = Stage;
    type Carry = ();

    fn name(&self) -> &'static str {
        "embrace"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "embrace".into(),
            frame_count: 300,
            max_particles: 300,
            interval_ms: 40,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::sphere(Vec3::ZERO, 3.0)
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::chance(1.0)
    }

    fn environment(&self, tick: u64, _carry: &mut ()) -> Environment {
        let beat = if signal::blink(tick, 20, 10) { 1.0 } else { 0.0 };
        Environment::new(tick)
            .with_signal(Vec4::new(WIGGLE.sample(tick), beat, 0.0, 0.0))
            .with_anchors(vec![OUTER_HEART, INNER_HEART])
    }

    fn emit(&self, _env: &Environment, rng: &mut dyn RngCore) -> Particle<Stage> {
        let (origin, spread, kind) = if rng.gen_bool(0.5) {
            (OUTER_HEART, OUTER_SPREAD, FROM_OUTER)
        } else {
            (INNER_HEART, INNER_SPREAD, FROM_INNER)
        };
        let start = origin + Vec3::new(rng.gen_range(-spread..spread), 0.0, 0.0);
        Particle::new(start, Motion::seek(target_of(kind), EXCHANGE_RATE)).with_kind(kind)
    }

    fn transition(
        &self,
        particle: &Particle<Stage>,
        env: &Environment,
        rng: &mut dyn RngCore,
    ) -> Particle<Stage> {
        if particle.state == Stage::Consumed {
            return *particle;
        }
        let jitter = Vec3::new(
            rng.gen_range(-WARMTH..WARMTH),
            rng.gen_range(-WARMTH..WARMTH),
            rng.gen_range(-WARMTH..WARMTH),
        );
        let mut next = *particle;
        next.position = rules::integrate(particle, env) + jitter;
        next.state = if next.position.distance(target_of(particle.kind)) <= ARRIVAL {
            Stage::Consumed
        } else {
            Stage::InTransit
        };
        next
    }

    fn style(&self, particle: &Particle<Stage>) -> Sprite {
        let color = if particle.kind == FROM_OUTER {
            palette::GOLD
        } else {
            palette::CYAN
        };
        Sprite {
            position: particle.position,
            color: palette::fade(color, 0.9),
            size: 15.0,
        }
    }

    fn geometry(&self, env: &Environment, _carry: &()) -> Vec<Shape> {
        let wiggle = env.signal.x;
        vec![
            Shape::Sphere {
                center: Vec3::new(0.0, 0.5, 1.2),
                radius: 0.15,
                color: palette::fade(palette::OBSIDIAN, 0.5),
            },
            Shape::Sphere {
                center: Vec3::new(0.0, 0.4, 0.8),
                radius: 0.4,
                color: palette::fade(palette::OBSIDIAN, 0.5),
            },
            Shape::Polyline {
                points: arm(-1.0),
                color: palette::fade(palette::GOLD, 0.6),
                width: 4.0,
            },
            Shape::Polyline {
                points: arm(1.0),
                color: palette::fade(palette::GOLD, 0.6),
                width: 4.0,
            },
            Shape::Sphere {
                center: Vec3::new(0.0, 0.3, 0.8 + wiggle),
                radius: 0.3,
                color: palette::fade(palette::CYAN, 0.8),
            },
            Shape::Ring {
                center: Vec3::ZERO,
                radius: 1.5,
                color: palette::fade(palette::WHITE, 0.1),
            },
        ]
    }

    fn camera(&self, tick: u64) -> Camera {
        Camera::orbit(tick, 15.0, 0.2)
    }

    fn caption(&self, env: &Environment, _carry: &()) -> Option<String> {
        let beat = if env.signal.y > 0.0 { "\u{2665}" } else { " " };
        Some(format!("embrace {beat}\nfeedback loop: open"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FrameDriver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn particles_head_for_the_other_heart() {
        let mut rng = StdRng::seed_from_u64(21);
        let env = Embrace.environment(1, &mut ());
        for _ in 0..50 {
            let p = Embrace.emit(&env, &mut rng);
            let start = if p.kind == FROM_OUTER {
                OUTER_HEART
            } else {
                INNER_HEART
            };
            assert!((p.position - start).length() <= OUTER_SPREAD);
            assert_eq!(
                rules::remaining(&p, &env).map(|_| ()),
                Some(()),
                "every particle seeks"
            );
        }
    }

    #[test]
    fn exchange_reaches_steady_state() {
        let mut driver = FrameDriver::seeded(Embrace, 4);
        while driver.tick().is_some() {}
        let live = driver.pool().len();
        assert!(live > 0 && live < 60, "live = {live}");
        assert_eq!(driver.pool().totals().rejected, 0);
    }

    #[test]
    fn heartbeat_blinks_in_caption() {
        let on = Embrace.caption(&Embrace.environment(1, &mut ()), &()).unwrap();
        let off = Embrace.caption(&Embrace.environment(15, &mut ()), &()).unwrap();
        assert!(on.contains('\u{2665}'));
        assert!(!off.contains('\u{2665}'));
    }
}
