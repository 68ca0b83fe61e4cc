//! Entanglement drop.
//!
//! A probe falls toward a horizon while an anchored observer keeps an
//! entangled link to it. Link fidelity sags with tidal stress and collapses
//! once the probe is inside; the first tick inside produces a single echo
//! spike. Beam motes stream along the link while it carries any signal.

use std::collections::VecDeque;

use glam::{Vec3, Vec4};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{palette, Camera, Shape, Sprite};
use crate::particle::{Lifecycle, Motion, Particle};
use crate::pool::Bounds;
use crate::rules::{self, Decay, Outcome};
use crate::scene::Scene;
use crate::spawn::{Gate, SpawnPolicy};

pub const HORIZON_RADIUS: f32 = 1.5;
pub const DROP_HEIGHT: f32 = 6.0;
pub const OBSERVER: Vec3 = Vec3::new(3.0, 3.0, 4.0);
/// Telemetry keeps this many of the most recent fidelity samples.
pub const WINDOW: usize = 50;

const FLOOR: f32 = 0.1;
const BASE_GRAVITY: f32 = 0.05;
const TIDAL_GRAVITY: f32 = 0.1;
const STRESS_SPAN: f32 = 4.0;
const FIDELITY_LOSS: f32 = 0.1;
const ECHO_THRESHOLD: f32 = 0.5;
const BEAM_JITTER: f32 = 0.2;
const BEAM_PULL: f32 = 0.05;
const LINKED_DRAIN: f32 = 0.08;
const FADING_DRAIN: f32 = 0.2;
const CONTACT: f32 = 0.1;
const DISK_RADIUS: f32 = 3.0;

/// Signal channel: probe height above the singularity.
pub const HEIGHT: usize = 0;
/// Signal channel: link fidelity; `1` is a perfect link, `-1` the echo spike.
pub const FIDELITY: usize = 1;
/// Signal channel: tidal stress in `[0, 1]` outside the horizon.
pub const STRESS: usize = 2;
/// Signal channel: this tick's fall distance.
pub const GRAVITY: usize = 3;

/// Anchor: the observer at the far end of the link.
pub const ANCHOR: usize = 0;
/// Anchor: the falling probe.
pub const PROBE: usize = 1;

/// Mote kind: emitted while the link is healthy.
pub const STEADY: u8 = 0;
/// Mote kind: emitted on the echo spike.
pub const ECHO: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mote {
    Linked,
    Fading,
    Severed,
}

impl Lifecycle for Mote {
    const INITIAL: Self = Mote::Linked;

    fn ordinal(self) -> u8 {
        self as u8
    }

    fn is_terminal(self) -> bool {
        self == Mote::Severed
    }
}

/// Drop state that cannot be recomputed from the tick alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub height: f32,
    pub gravity: f32,
    pub stress: f32,
    pub fidelity: f32,
    window: VecDeque<f32>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            height: DROP_HEIGHT,
            gravity: 0.0,
            stress: 0.0,
            fidelity: 1.0,
            window: VecDeque::with_capacity(WINDOW),
        }
    }
}

impl Telemetry {
    /// Advances the drop by one tick and records the new fidelity.
    pub fn step(&mut self) {
        let lift = rules::guard((self.height + 0.1).powi(2));
        self.gravity = BASE_GRAVITY + TIDAL_GRAVITY / lift;
        if self.height > FLOOR {
            self.height = (self.height - self.gravity).max(FLOOR);
        }

        self.stress = (1.0 - (self.height - HORIZON_RADIUS) / STRESS_SPAN).max(0.0);
        self.fidelity = if self.height > HORIZON_RADIUS {
            1.0 - FIDELITY_LOSS * self.stress
        } else if self.window.back().is_some_and(|last| *last > ECHO_THRESHOLD) {
            -1.0
        } else {
            0.0
        };

        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(self.fidelity);
    }

    pub fn is_inside(&self) -> bool {
        self.height <= HORIZON_RADIUS
    }

    /// Recent fidelities, oldest first.
    pub fn window(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.window.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Probe;

impl Scene for Probe {
    type State = Mote;
    type Carry = Telemetry;

    fn name(&self) -> &'static str {
        "probe"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "probe".into(),
            frame_count: 160,
            max_particles: 240,
            interval_ms: 50,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::sphere(Vec3::ZERO, 10.0)
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::Chance {
            probability: 1.0,
            count: 2,
            gate: Gate::Nonzero { channel: FIDELITY },
        }
    }

    fn environment(&self, tick: u64, telemetry: &mut Telemetry) -> Environment {
        telemetry.step();
        Environment::new(tick)
            .with_signal(Vec4::new(
                telemetry.height,
                telemetry.fidelity,
                telemetry.stress,
                telemetry.gravity,
            ))
            .with_anchors(vec![OBSERVER, Vec3::new(0.0, 0.0, telemetry.height)])
    }

    fn emit(&self, env: &Environment, rng: &mut dyn RngCore) -> Particle<Mote> {
        let observer = env.anchor(ANCHOR).unwrap_or(OBSERVER);
        let probe = env.anchor(PROBE).unwrap_or(Vec3::ZERO);
        let spread = (env.signal.z * BEAM_JITTER).max(f32::EPSILON);
        let jitter = Vec3::new(
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
        );
        let along = rng.gen_range(0.0..1.0);
        let kind = if env.signal.y > 0.0 { STEADY } else { ECHO };
        Particle::new(
            observer.lerp(probe, along) + jitter,
            Motion::follow(PROBE, BEAM_PULL),
        )
        .with_energy(1.0)
        .with_kind(kind)
    }

    fn transition(
        &self,
        particle: &Particle<Mote>,
        env: &Environment,
        _rng: &mut dyn RngCore,
    ) -> Particle<Mote> {
        if particle.state == Mote::Severed {
            return *particle;
        }
        let mut next = *particle;
        next.position = rules::integrate(particle, env);

        let fading = particle.state == Mote::Fading || env.signal.y <= 0.0;
        let drain = if fading { FADING_DRAIN } else { LINKED_DRAIN };
        let exhausted = match rules::decay(particle.energy.unwrap_or(0.0), drain) {
            Decay::Remaining(left) => {
                next.energy = Some(left);
                false
            }
            Decay::Exhausted => {
                next.energy = Some(0.0);
                true
            }
        };
        let touching = rules::remaining(&next, env).is_some_and(|d| d < CONTACT);

        next.state = match rules::resolve(exhausted, touching) {
            Outcome::Exhausted | Outcome::Arrived => Mote::Severed,
            Outcome::Continue if fading => Mote::Fading,
            Outcome::Continue => Mote::Linked,
        };
        next
    }

    fn style(&self, particle: &Particle<Mote>) -> Sprite {
        let base = if particle.kind == ECHO {
            palette::MAGENTA
        } else {
            palette::CYAN
        };
        Sprite {
            position: particle.position,
            color: palette::fade(base, particle.energy.unwrap_or(1.0) * 0.6),
            size: 4.0,
        }
    }

    fn geometry(&self, env: &Environment, telemetry: &Telemetry) -> Vec<Shape> {
        let probe = env.anchor(PROBE).unwrap_or(Vec3::ZERO);
        let probe_color = if telemetry.is_inside() {
            palette::RED
        } else {
            palette::CYAN
        };
        let stretch = (telemetry.gravity * 50.0).max(1.0) * 0.2;

        let mut shapes = vec![
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: HORIZON_RADIUS,
                color: palette::BLACK,
            },
            Shape::Ring {
                center: Vec3::ZERO,
                radius: DISK_RADIUS,
                color: palette::fade(Vec4::new(1.0, 0.55, 0.0, 1.0), 0.3),
            },
            Shape::Marker {
                position: OBSERVER,
                color: palette::WHITE,
                size: 100.0,
            },
            Shape::segment(probe, probe + Vec3::Z * stretch, probe_color, 3.0),
            Shape::Marker {
                position: probe,
                color: probe_color,
                size: 50.0,
            },
            Shape::segment(
                Vec3::new(-4.0, -4.0, -5.0),
                Vec3::new(-4.0, -4.0, 5.0),
                palette::fade(palette::VIOLET, 0.3),
                1.0,
            ),
        ];

        // Telemetry trace, drawn on a fixed panel behind the scene.
        let trace: Vec<Vec3> = telemetry
            .window()
            .enumerate()
            .map(|(i, fidelity)| Vec3::new(-5.0 + i as f32 * 0.15, 5.0, 2.0 + fidelity))
            .collect();
        if trace.len() > 1 {
            shapes.push(Shape::Polyline {
                points: trace,
                color: palette::CYAN,
                width: 2.0,
            });
        }
        shapes
    }

    fn camera(&self, _tick: u64) -> Camera {
        Camera::default()
    }

    fn caption(&self, env: &Environment, telemetry: &Telemetry) -> Option<String> {
        let status = if telemetry.is_inside() {
            "horizon crossed"
        } else {
            "linked"
        };
        let mut caption = format!(
            "target: probe\nstatus: {status}\nfidelity {:+.2}",
            env.signal.y
        );
        if env.signal.y == -1.0 {
            caption.push_str("\nsingularity echo detected");
        }
        Some(caption)
    }
}
