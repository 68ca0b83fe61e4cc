//! Black hole accretion.
//!
//! Space warps over the first 150 ticks. Once the warp is half formed the
//! event horizon fades in and disk matter spawns on the rim, orbits while it
//! burns energy, then falls through the horizon. The disk spins faster every
//! tick after the horizon appears; that angular velocity is carried between
//! ticks because it accumulates.

use std::f32::consts::TAU;

use glam::{Vec3, Vec4};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{palette, Camera, Shape, Sprite};
use crate::particle::{Lifecycle, Motion, Particle};
use crate::pool::Bounds;
use crate::rules::{self, Decay, Outcome, Swirl};
use crate::scene::Scene;
use crate::signal;
use crate::spawn::{Gate, SpawnPolicy};

const FORMATION_TICKS: f32 = 150.0;
const HORIZON_RADIUS: f32 = 1.5;
const LIGHTHOUSE_ORBIT: f32 = 4.0;
const LIGHTHOUSE_RATE: f32 = 0.05;
const CONTAINMENT_RADIUS: f32 = 5.0;
const PILLARS: usize = 8;
const PILLAR_SPIN: f32 = 0.01;
const PILLAR_HEIGHT: f32 = 5.0;
const RIM_INNER: f32 = 3.0;
const RIM_OUTER: f32 = 3.8;
const DISK_THICKNESS: f32 = 0.1;
const ORBIT_DECAY: f32 = 0.995;
const ORBIT_DRAIN: f32 = 0.005;
const INFALL_ENERGY: f32 = 0.5;
const INFALL_DECAY: f32 = 0.95;
const INFALL_DRAIN: f32 = 0.02;
const INFALL_SPIN: f32 = 1.5;
const WARP_DEPTH: f32 = 5.0;
const WELL_FLOOR: f32 = -10.0;
const GRID_HALF: f32 = 8.0;
const GRID_LINES: usize = 9;
const GRID_SAMPLES: usize = 17;
const SPIRAL_POINTS: usize = 50;
const SPIRAL_TWIST: f32 = 0.5;
const SPIRAL_PITCH: f32 = 0.05;

/// Signal channel: formation progress in `[0, 1]`.
pub const PROGRESS: usize = 0;
/// Signal channel: event horizon opacity in `[0, 1]`.
pub const OPACITY: usize = 1;
/// Signal channel: disk angle step for this tick.
pub const STEP: usize = 2;
/// Signal channel: containment pillar rotation.
pub const PILLAR_ANGLE: usize = 3;
/// Anchor: the orbiting lighthouse star.
pub const LIGHTHOUSE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matter {
    Orbiting,
    Infalling,
    Swallowed,
}

impl Lifecycle for Matter {
    const INITIAL: Self = Matter::Orbiting;

    fn ordinal(self) -> u8 {
        self as u8
    }

    fn is_terminal(self) -> bool {
        self == Matter::Swallowed
    }
}

/// Disk rotation, accumulated tick over tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub angular_velocity: f32,
    pub angle: f32,
}

impl Spin {
    pub const INITIAL_VELOCITY: f32 = 0.02;
    pub const ACCELERATION: f32 = 0.0004;
    pub const MAX_VELOCITY: f32 = 0.2;
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            angular_velocity: Self::INITIAL_VELOCITY,
            angle: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Accretion;

fn pillars(angle: f32) -> impl Iterator<Item = Vec3> {
    (0..PILLARS).map(move |i| {
        let theta = TAU * i as f32 / PILLARS as f32 + angle;
        Vec3::new(
            CONTAINMENT_RADIUS * theta.cos(),
            CONTAINMENT_RADIUS * theta.sin(),
            0.0,
        )
    })
}

/// Inner disk spiral, turned by the carried disk angle.
fn spiral(angle: f32) -> Vec<Vec3> {
    (0..SPIRAL_POINTS)
        .map(|i| {
            let theta = angle + i as f32 * SPIRAL_TWIST;
            let r = HORIZON_RADIUS + 0.2 + i as f32 * SPIRAL_PITCH;
            Vec3::new(r * theta.cos(), r * theta.sin(), 0.0)
        })
        .collect()
}

fn well_depth(x: f32, y: f32, progress: f32) -> f32 {
    let r = x.hypot(y);
    if r < HORIZON_RADIUS {
        WELL_FLOOR
    } else {
        -WARP_DEPTH * progress / (r + 0.5)
    }
}

fn warped_grid(progress: f32) -> Vec<Shape> {
    let color = palette::fade(Vec4::new(0.2, 0.0, 0.4, 1.0), 0.3);
    let coord = |i: usize, n: usize| -GRID_HALF + 2.0 * GRID_HALF * i as f32 / (n - 1) as f32;
    let mut lines = Vec::with_capacity(GRID_LINES * 2);
    for i in 0..GRID_LINES {
        let fixed = coord(i, GRID_LINES);
        let along_x = (0..GRID_SAMPLES)
            .map(|j| {
                let x = coord(j, GRID_SAMPLES);
                Vec3::new(x, fixed, well_depth(x, fixed, progress))
            })
            .collect();
        let along_y = (0..GRID_SAMPLES)
            .map(|j| {
                let y = coord(j, GRID_SAMPLES);
                Vec3::new(fixed, y, well_depth(fixed, y, progress))
            })
            .collect();
        lines.push(Shape::Polyline {
            points: along_x,
            color,
            width: 0.5,
        });
        lines.push(Shape::Polyline {
            points: along_y,
            color,
            width: 0.5,
        });
    }
    lines
}

impl Scene for Accretion {
    type State = Matter;
    type Carry = Spin;

    fn name(&self) -> &'static str {
        "accretion"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "accretion".into(),
            frame_count: 300,
            max_particles: 600,
            interval_ms: 40,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::sphere(Vec3::ZERO, 10.0).with_sink(Vec3::ZERO, HORIZON_RADIUS)
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::Chance {
            probability: 0.9,
            count: 3,
            gate: Gate::Above {
                channel: PROGRESS,
                threshold: 0.5,
            },
        }
    }

    fn environment(&self, tick: u64, spin: &mut Spin) -> Environment {
        let progress = signal::ramp(tick, FORMATION_TICKS);
        if progress > 0.5 {
            spin.angular_velocity =
                (spin.angular_velocity + Spin::ACCELERATION).min(Spin::MAX_VELOCITY);
        }
        spin.angle += spin.angular_velocity;
        let opacity = ((progress - 0.5) * 2.0).clamp(0.0, 1.0);

        let phase = tick as f32 * LIGHTHOUSE_RATE;
        let lighthouse = Vec3::new(
            LIGHTHOUSE_ORBIT * phase.cos(),
            LIGHTHOUSE_ORBIT * phase.sin(),
            phase.sin(),
        );
        Environment::new(tick)
            .with_signal(Vec4::new(
                progress,
                opacity,
                spin.angular_velocity,
                tick as f32 * PILLAR_SPIN,
            ))
            .with_anchors(vec![lighthouse])
    }

    fn emit(&self, _env: &Environment, rng: &mut dyn RngCore) -> Particle<Matter> {
        let radius = rng.gen_range(RIM_INNER..RIM_OUTER);
        let angle = rng.gen_range(0.0..TAU);
        let z = rng.gen_range(-DISK_THICKNESS..DISK_THICKNESS);
        Particle::new(
            Vec3::new(radius * angle.cos(), radius * angle.sin(), z),
            Motion::REST,
        )
        .with_energy(1.0)
    }

    fn transition(
        &self,
        particle: &Particle<Matter>,
        env: &Environment,
        _rng: &mut dyn RngCore,
    ) -> Particle<Matter> {
        let step = env.signal.z;
        let energy = particle.energy.unwrap_or(0.0);
        let mut next = *particle;
        match particle.state {
            Matter::Orbiting => {
                next.position = Swirl::new(Vec3::ZERO, ORBIT_DECAY, step).apply(particle.position);
                let left = match rules::decay(energy, ORBIT_DRAIN) {
                    Decay::Remaining(left) => left,
                    Decay::Exhausted => 0.0,
                };
                next.energy = Some(left);
                if left <= INFALL_ENERGY {
                    next.state = Matter::Infalling;
                }
            }
            Matter::Infalling => {
                next.position = Swirl::new(Vec3::ZERO, INFALL_DECAY, step * INFALL_SPIN)
                    .apply(particle.position);
                let exhausted = match rules::decay(energy, INFALL_DRAIN) {
                    Decay::Remaining(left) => {
                        next.energy = Some(left);
                        false
                    }
                    Decay::Exhausted => {
                        next.energy = Some(0.0);
                        true
                    }
                };
                let arrived = next.position.length() < HORIZON_RADIUS;
                next.state = match rules::resolve(exhausted, arrived) {
                    Outcome::Continue => Matter::Infalling,
                    Outcome::Arrived | Outcome::Exhausted => Matter::Swallowed,
                };
            }
            Matter::Swallowed => {}
        }
        next
    }

    fn style(&self, particle: &Particle<Matter>) -> Sprite {
        let glow = particle.energy.unwrap_or(1.0);
        let color = match particle.state {
            Matter::Orbiting => palette::fade(palette::CYAN, glow),
            Matter::Infalling => palette::fade(palette::MAGENTA, glow + 0.3),
            Matter::Swallowed => palette::fade(palette::BLACK, 0.0),
        };
        Sprite {
            position: particle.position,
            color,
            size: 5.0,
        }
    }

    fn geometry(&self, env: &Environment, spin: &Spin) -> Vec<Shape> {
        let progress = env.signal.x;
        let opacity = env.signal.y;
        let pillar_angle = env.signal.w;

        let mut shapes = warped_grid(progress);
        let nodes: Vec<Vec3> = pillars(pillar_angle).collect();
        for &node in &nodes {
            shapes.push(Shape::segment(
                node - Vec3::Z * PILLAR_HEIGHT,
                node + Vec3::Z * PILLAR_HEIGHT,
                palette::fade(palette::VIOLET, 0.6),
                2.0,
            ));
            shapes.push(Shape::Marker {
                position: node,
                color: palette::VIOLET,
                size: 100.0,
            });
        }
        shapes.push(Shape::Ring {
            center: Vec3::ZERO,
            radius: CONTAINMENT_RADIUS,
            color: palette::fade(palette::VIOLET, 0.4),
        });
        if opacity > 0.0 {
            shapes.push(Shape::Sphere {
                center: Vec3::ZERO,
                radius: HORIZON_RADIUS,
                color: palette::fade(palette::BLACK, opacity),
            });
            shapes.push(Shape::Polyline {
                points: spiral(spin.angle),
                color: palette::fade(palette::CYAN, opacity),
                width: 1.0,
            });
        }

        if let Some(star) = env.anchor(LIGHTHOUSE) {
            shapes.push(Shape::Marker {
                position: star,
                color: palette::GOLD,
                size: 150.0,
            });
            let nearest = nodes.iter().copied().min_by(|a, b| {
                star.truncate()
                    .distance(a.truncate())
                    .total_cmp(&star.truncate().distance(b.truncate()))
            });
            if let Some(pillar) = nearest {
                shapes.push(Shape::segment(
                    star,
                    pillar,
                    palette::fade(palette::GOLD, 0.5),
                    1.0,
                ));
            }
        }
        shapes
    }

    fn camera(&self, tick: u64) -> Camera {
        Camera::orbit(tick, 30.0, 0.2)
    }

    fn caption(&self, env: &Environment, _spin: &Spin) -> Option<String> {
        let status = if env.signal.x < 0.5 {
            "compressing space..."
        } else {
            "horizon stable, lighthouse secure"
        };
        Some(format!("status: {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FrameDriver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spin_accelerates_only_after_horizon_forms() {
        let mut spin = Spin::default();
        for tick in 1..=75 {
            Accretion.environment(tick, &mut spin);
        }
        assert_eq!(spin.angular_velocity, Spin::INITIAL_VELOCITY);
        for tick in 76..=1000 {
            Accretion.environment(tick, &mut spin);
        }
        assert_eq!(spin.angular_velocity, Spin::MAX_VELOCITY);
    }

    #[test]
    fn no_matter_before_half_progress() {
        let mut rng = StdRng::seed_from_u64(8);
        let policy = Accretion.spawn_policy();
        let mut spin = Spin::default();
        for tick in 1..=75 {
            let env = Accretion.environment(tick, &mut spin);
            assert_eq!(policy.attempts(&env, &mut rng), 0);
        }
    }

    #[test]
    fn matter_spirals_into_the_horizon() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut spin = Spin::default();
        let env = Accretion.environment(200, &mut spin);
        let mut p = Accretion.emit(&env, &mut rng);
        let mut states = vec![p.state];
        for _ in 0..400 {
            p = Accretion.transition(&p, &env, &mut rng);
            assert!(p.is_finite());
            if states.last() != Some(&p.state) {
                states.push(p.state);
            }
            if p.state.is_terminal() {
                break;
            }
        }
        assert_eq!(
            states,
            vec![Matter::Orbiting, Matter::Infalling, Matter::Swallowed]
        );
    }

    #[test]
    fn tether_and_horizon_in_geometry() {
        let mut spin = Spin::default();
        let early = Accretion.environment(10, &mut spin);
        let late = Accretion.environment(200, &mut spin);
        let spheres = |shapes: &[Shape]| {
            shapes
                .iter()
                .filter(|s| matches!(s, Shape::Sphere { .. }))
                .count()
        };
        assert_eq!(spheres(&Accretion.geometry(&early, &spin)), 0);
        assert_eq!(spheres(&Accretion.geometry(&late, &spin)), 1);
        assert!(Accretion.geometry(&late, &spin).iter().all(Shape::is_finite));
    }

    #[test]
    fn inner_spiral_follows_the_disk_angle() {
        let head = |env: &Environment, spin: &Spin| {
            Accretion
                .geometry(env, spin)
                .into_iter()
                .find_map(|shape| match shape {
                    Shape::Polyline { points, .. } if points.len() == SPIRAL_POINTS => {
                        Some(points[0])
                    }
                    _ => None,
                })
        };
        let mut spin = Spin::default();
        let mut env = Accretion.environment(1, &mut spin);
        assert_eq!(head(&env, &spin), None);
        for tick in 2..=120 {
            env = Accretion.environment(tick, &mut spin);
        }
        let first = head(&env, &spin).unwrap();
        let expected = Vec3::new(spin.angle.cos(), spin.angle.sin(), 0.0) * (HORIZON_RADIUS + 0.2);
        assert!(first.distance(expected) < 1e-4);

        let before = spin.angle;
        let env = Accretion.environment(121, &mut spin);
        assert!((spin.angle - before - spin.angular_velocity).abs() < 1e-6);
        let turned = head(&env, &spin).unwrap();
        let swept = turned.y.atan2(turned.x) - first.y.atan2(first.x);
        assert!((swept.rem_euclid(TAU) - spin.angular_velocity).abs() < 1e-4);
    }

    #[test]
    fn full_run_keeps_order() {
        let mut driver = FrameDriver::seeded(Accretion, 2);
        while driver.tick().is_some() {}
        let totals = driver.pool().totals();
        assert!(totals.spawned > 0);
        assert_eq!(totals.rejected, 0);
        assert!(driver.pool().len() <= driver.preset().max_particles);
    }
}
