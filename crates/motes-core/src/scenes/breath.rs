//! Respiratory airflow.
//!
//! Air falls down a windpipe while the breath cycle is in its inhale half,
//! drifts into one of two lungs, and is squeezed into the core once the cycle
//! passes the compression threshold. The diaphragm rises and falls with the
//! cycle and stored air never sinks below it.

use glam::{Vec3, Vec4};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{palette, Camera, Shape, Sprite};
use crate::particle::{Lifecycle, Motion, Particle};
use crate::pool::Bounds;
use crate::rules;
use crate::scene::Scene;
use crate::signal::{self, Oscillator};
use crate::spawn::{Gate, SpawnPolicy};

const BREATH: Oscillator = Oscillator::sine(0.05);
const WINDPIPE_TOP: f32 = 6.0;
const WINDPIPE_HALF_WIDTH: f32 = 0.5;
const FALL_STEP: f32 = 0.2;
const LUNG_ENTRY: f32 = 3.0;
const LUNG_OFFSET: f32 = 1.5;
const LUNG_HEIGHT: f32 = 1.0;
const LUNG_RADIUS: f32 = 1.2;
const FILL_RATE: f32 = 0.1;
const SWIRL_JITTER: f32 = 0.1;
const SQUEEZE_THRESHOLD: f32 = 0.5;
const SQUEEZE_RATE: f32 = 0.2;
const CORE_RADIUS: f32 = 0.5;
const SPAWN_CHANCE: f32 = 0.3;
const DIAPHRAGM_REST: f32 = -2.0;
const DIAPHRAGM_TRAVEL: f32 = 0.5;
const DIAPHRAGM_RADIUS: f32 = 3.5;
const DIAPHRAGM_CLEARANCE: f32 = 0.1;
const MAX_PSI: f32 = 5000.0;

/// Signal channel: breath cycle in `[-1, 1]`, negative while inhaling.
pub const CYCLE: usize = 0;
/// Signal channel: pressure in `[0, 1]`.
pub const PRESSURE: usize = 1;
/// Signal channel: diaphragm height.
pub const DIAPHRAGM: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Airflow {
    Inhaled,
    Stored,
    Compressed,
    Consumed,
}

impl Lifecycle for Airflow {
    const INITIAL: Self = Airflow::Inhaled;

    fn ordinal(self) -> u8 {
        self as u8
    }

    fn is_terminal(self) -> bool {
        self == Airflow::Consumed
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Breath;

impl Scene for Breath {
    type State = Airflow;
    type Carry = ();

    fn name(&self) -> &'static str {
        "breath"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "breath".into(),
            frame_count: 300,
            max_particles: 400,
            interval_ms: 30,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::sphere(Vec3::ZERO, 12.0)
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::Chance {
            probability: SPAWN_CHANCE,
            count: 1,
            gate: Gate::Below {
                channel: CYCLE,
                threshold: 0.0,
            },
        }
    }

    fn environment(&self, tick: u64, _carry: &mut ()) -> Environment {
        let cycle = BREATH.sample(tick);
        let pressure = signal::unit(cycle);
        let diaphragm = DIAPHRAGM_REST + cycle * DIAPHRAGM_TRAVEL;
        Environment::new(tick).with_signal(Vec4::new(cycle, pressure, diaphragm, 0.0))
    }

    fn emit(&self, _env: &Environment, rng: &mut dyn RngCore) -> Particle<Airflow> {
        let x = rng.gen_range(-WINDPIPE_HALF_WIDTH..WINDPIPE_HALF_WIDTH);
        let y = rng.gen_range(-WINDPIPE_HALF_WIDTH..WINDPIPE_HALF_WIDTH);
        Particle::new(
            Vec3::new(x, y, WINDPIPE_TOP),
            Motion::Free {
                velocity: Vec3::new(0.0, 0.0, -FALL_STEP),
            },
        )
    }

    fn transition(
        &self,
        particle: &Particle<Airflow>,
        env: &Environment,
        rng: &mut dyn RngCore,
    ) -> Particle<Airflow> {
        let cycle = env.signal.x;
        let diaphragm = env.signal.z;
        let mut next = *particle;
        match particle.state {
            Airflow::Inhaled => {
                next.position = rules::integrate(particle, env);
                if next.position.z < LUNG_ENTRY {
                    let side = if rng.gen_bool(0.5) {
                        -LUNG_OFFSET
                    } else {
                        LUNG_OFFSET
                    };
                    next.state = Airflow::Stored;
                    next.motion = Motion::seek(Vec3::new(side, 0.0, LUNG_HEIGHT), FILL_RATE);
                }
            }
            Airflow::Stored => {
                // Only x is pulled toward the lung; y and z wander.
                let pulled = rules::integrate(particle, env);
                next.position.x = pulled.x;
                next.position.y += rng.gen_range(-SWIRL_JITTER..SWIRL_JITTER);
                next.position.z += rng.gen_range(-SWIRL_JITTER..SWIRL_JITTER);
                if next.position.z < diaphragm {
                    next.position.z = diaphragm + DIAPHRAGM_CLEARANCE;
                }
                if cycle > SQUEEZE_THRESHOLD {
                    next.state = Airflow::Compressed;
                    next.motion = Motion::seek(Vec3::ZERO, SQUEEZE_RATE);
                }
            }
            Airflow::Compressed => {
                next.position = rules::integrate(particle, env);
                if next.position.length() < CORE_RADIUS {
                    next.state = Airflow::Consumed;
                }
            }
            Airflow::Consumed => {}
        }
        next
    }

    fn style(&self, particle: &Particle<Airflow>) -> Sprite {
        let color = match particle.state {
            Airflow::Inhaled => palette::WHITE,
            Airflow::Stored => palette::CYAN,
            Airflow::Compressed => palette::MAGENTA,
            Airflow::Consumed => palette::fade(palette::MAGENTA, 0.0),
        };
        Sprite {
            position: particle.position,
            color,
            size: 10.0,
        }
    }

    fn geometry(&self, env: &Environment, _carry: &()) -> Vec<Shape> {
        let cycle = env.signal.x;
        let pressure = env.signal.y;
        let lung_scale = 1.0 + (1.0 - cycle) * 0.3;
        let lung_color = Vec4::new(pressure, 0.0, 1.0 - pressure, 0.3);

        let mut shapes = vec![Shape::Ring {
            center: Vec3::new(0.0, 0.0, env.signal.z),
            radius: DIAPHRAGM_RADIUS,
            color: palette::fade(palette::GOLD, 0.8),
        }];
        for side in [-LUNG_OFFSET, LUNG_OFFSET] {
            shapes.push(Shape::Sphere {
                center: Vec3::new(side, 0.0, LUNG_HEIGHT),
                radius: LUNG_RADIUS * lung_scale,
                color: lung_color,
            });
        }
        shapes.push(Shape::Marker {
            position: Vec3::ZERO,
            color: palette::fade(palette::WHITE, 0.5),
            size: 200.0,
        });
        shapes.push(Shape::segment(
            Vec3::new(-4.0, -4.0, 0.0),
            Vec3::new(-4.0, -4.0, pressure * 4.0),
            palette::MAGENTA,
            5.0,
        ));
        shapes
    }

    fn camera(&self, tick: u64) -> Camera {
        Camera::orbit(tick, 10.0, 0.2)
    }

    fn caption(&self, env: &Environment, _carry: &()) -> Option<String> {
        let phase = if env.signal.x < 0.0 {
            "inhale (charging)"
        } else {
            "compress (storing)"
        };
        let psi = (env.signal.y * MAX_PSI) as u32;
        Some(format!("respiratory cycle: {phase}\npressure {psi} psi"))
    }
}
