//! Flow state: a running figure whose limbs feed data packets to the head.
//!
//! Each bone is drawn as two counter-rotating helices. Packets rise from the
//! hands and feet toward the head, which moves with the gait, and on arrival
//! they are delivered and then respawned at their limb.

use std::f32::consts::PI;

use glam::{Mat3, Vec3};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;
use crate::environment::Environment;
use crate::frame::{palette, Camera, Shape, Sprite};
use crate::particle::{Lifecycle, Motion, Particle};
use crate::pool::Bounds;
use crate::rules;
use crate::scene::Scene;
use crate::spawn::SpawnPolicy;

const RUN_SPEED: f32 = 0.5;
const BOUNCE: f32 = 0.15;
const LEAN: f32 = 0.3;
const HIP_HEIGHT: f32 = 0.9;
const HELIX_TURNS: f32 = 4.0;
const HELIX_RADIUS: f32 = 0.04;
const HELIX_SAMPLES: usize = 15;
const CLIMB_RATE: f32 = 0.15;
const ARRIVAL: f32 = 0.25;
const PACKETS: u32 = 20;

/// Anchor: the head, where packets are delivered.
pub const HEAD: usize = 0;
/// Limbs packets start from; packet `kind` indexes this list.
pub const LIMBS: [Joint; 4] = [Joint::FootL, Joint::FootR, Joint::HandL, Joint::HandR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Head,
    Neck,
    SpineTop,
    SpineMid,
    SpineBase,
    HipL,
    HipR,
    KneeL,
    KneeR,
    FootL,
    FootR,
    ShoulderL,
    ShoulderR,
    ElbowL,
    ElbowR,
    HandL,
    HandR,
}

impl Joint {
    const COUNT: usize = 17;

    fn rest(self) -> Vec3 {
        match self {
            Joint::Head => Vec3::new(0.0, 0.0, 1.9),
            Joint::Neck => Vec3::new(0.0, 0.0, 1.7),
            Joint::SpineTop => Vec3::new(0.0, 0.0, 1.5),
            Joint::SpineMid => Vec3::new(0.0, 0.0, 1.2),
            Joint::SpineBase => Vec3::new(0.0, 0.0, 1.0),
            Joint::HipL => Vec3::new(-0.2, 0.0, 0.9),
            Joint::HipR => Vec3::new(0.2, 0.0, 0.9),
            Joint::KneeL => Vec3::new(-0.2, 0.0, 0.5),
            Joint::KneeR => Vec3::new(0.2, 0.0, 0.5),
            Joint::FootL => Vec3::new(-0.2, 0.0, 0.1),
            Joint::FootR => Vec3::new(0.2, 0.0, 0.1),
            Joint::ShoulderL => Vec3::new(-0.4, 0.0, 1.5),
            Joint::ShoulderR => Vec3::new(0.4, 0.0, 1.5),
            Joint::ElbowL => Vec3::new(-0.5, 0.0, 1.1),
            Joint::ElbowR => Vec3::new(0.5, 0.0, 1.1),
            Joint::HandL => Vec3::new(-0.6, 0.0, 0.7),
            Joint::HandR => Vec3::new(0.6, 0.0, 0.7),
        }
    }

    fn is_upper(self) -> bool {
        !matches!(
            self,
            Joint::HipL | Joint::HipR | Joint::KneeL | Joint::KneeR | Joint::FootL | Joint::FootR
        )
    }
}

const ALL_JOINTS: [Joint; Joint::COUNT] = [
    Joint::Head,
    Joint::Neck,
    Joint::SpineTop,
    Joint::SpineMid,
    Joint::SpineBase,
    Joint::HipL,
    Joint::HipR,
    Joint::KneeL,
    Joint::KneeR,
    Joint::FootL,
    Joint::FootR,
    Joint::ShoulderL,
    Joint::ShoulderR,
    Joint::ElbowL,
    Joint::ElbowR,
    Joint::HandL,
    Joint::HandR,
];

const BONES: [(Joint, Joint); 16] = [
    (Joint::Head, Joint::Neck),
    (Joint::Neck, Joint::SpineTop),
    (Joint::SpineTop, Joint::SpineMid),
    (Joint::SpineMid, Joint::SpineBase),
    (Joint::SpineBase, Joint::HipL),
    (Joint::SpineBase, Joint::HipR),
    (Joint::HipL, Joint::KneeL),
    (Joint::KneeL, Joint::FootL),
    (Joint::HipR, Joint::KneeR),
    (Joint::KneeR, Joint::FootR),
    (Joint::SpineTop, Joint::ShoulderL),
    (Joint::SpineTop, Joint::ShoulderR),
    (Joint::ShoulderL, Joint::ElbowL),
    (Joint::ElbowL, Joint::HandL),
    (Joint::ShoulderR, Joint::ElbowR),
    (Joint::ElbowR, Joint::HandR),
];

/// Joint positions for one tick of the running gait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose([Vec3; Joint::COUNT]);

impl Pose {
    pub fn at(tick: u64) -> Self {
        let t = tick as f32 * RUN_SPEED;
        let bounce = Vec3::Z * (t.sin().abs() * BOUNCE);
        let lean = Mat3::from_rotation_x(LEAN);
        let hip = Vec3::Z * HIP_HEIGHT;

        let mut joints = ALL_JOINTS.map(|joint| {
            let p = joint.rest() + bounce;
            if joint.is_upper() {
                lean * (p - hip) + hip - Vec3::Y * 0.2
            } else {
                p
            }
        });

        let left = t;
        let right = t + PI;
        let mut stride = |joint: Joint, swing: f32, lift: f32, phase: f32| {
            let p = &mut joints[joint as usize];
            p.y += phase.cos() * swing;
            p.z += (phase.sin() * lift).max(0.0);
        };
        stride(Joint::KneeL, 0.6, 0.0, left);
        stride(Joint::FootL, 0.9, 0.3, left);
        stride(Joint::KneeR, 0.6, 0.0, right);
        stride(Joint::FootR, 0.9, 0.3, right);
        stride(Joint::HandL, 0.7, 0.0, right);
        stride(Joint::HandR, 0.7, 0.0, left);
        Pose(joints)
    }

    pub fn joint(&self, joint: Joint) -> Vec3 {
        self.0[joint as usize]
    }
}

/// Two helices wound around the segment `from -> to`, half a turn apart.
fn nerve(from: Vec3, to: Vec3, tick: u64) -> [Vec<Vec3>; 2] {
    let axis = to - from;
    let helper = if axis.z.abs() < 0.9 { Vec3::Z } else { Vec3::Y };
    let u = axis.cross(helper).normalize_or_zero() * HELIX_RADIUS;
    let v = axis.cross(u).normalize_or_zero() * HELIX_RADIUS;
    let phase = tick as f32 * 0.5;
    let strand = |offset: f32| {
        (0..HELIX_SAMPLES)
            .map(|i| {
                let s = i as f32 / (HELIX_SAMPLES - 1) as f32;
                let angle = s * HELIX_TURNS * PI + phase + offset;
                from + axis * s + u * angle.sin() + v * angle.cos()
            })
            .collect()
    };
    [strand(0.0), strand(PI)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packet {
    Rising,
    Delivered,
}

impl Lifecycle for Packet {
    const INITIAL: Self = Packet::Rising;

    fn ordinal(self) -> u8 {
        self as u8
    }

    /// Delivered packets are recycled, never retired.
    fn is_terminal(self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Flow;

fn limb_anchor(kind: u8) -> usize {
    1 + usize::from(kind) % LIMBS.len()
}

impl Scene for Flow {
    type State = Packet;
    type Carry = ();

    fn name(&self) -> &'static str {
        "flow"
    }

    fn preset(&self) -> ScenePreset {
        ScenePreset {
            name: "flow".into(),
            frame_count: 80,
            max_particles: 64,
            interval_ms: 40,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::sphere(Vec3::new(0.0, 0.0, 1.0), 4.0)
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::Burst {
            tick: 1,
            count: PACKETS,
        }
    }

    fn environment(&self, tick: u64, _carry: &mut ()) -> Environment {
        let pose = Pose::at(tick);
        let mut anchors = vec![pose.joint(Joint::Head)];
        anchors.extend(LIMBS.iter().map(|&limb| pose.joint(limb)));
        Environment::new(tick).with_anchors(anchors)
    }

    fn emit(&self, env: &Environment, rng: &mut dyn RngCore) -> Particle<Packet> {
        let kind = rng.gen_range(0..LIMBS.len() as u8);
        let head = env.anchor(HEAD).unwrap_or(Vec3::ZERO);
        let limb = env.anchor(limb_anchor(kind)).unwrap_or(head);
        let along: f32 = rng.gen_range(0.0..0.8);
        Particle::new(limb.lerp(head, along), Motion::follow(HEAD, CLIMB_RATE)).with_kind(kind)
    }

    fn transition(
        &self,
        particle: &Particle<Packet>,
        env: &Environment,
        _rng: &mut dyn RngCore,
    ) -> Particle<Packet> {
        match particle.state {
            Packet::Rising => {
                let mut next = *particle;
                next.position = rules::integrate(particle, env);
                if rules::remaining(&next, env).is_some_and(|d| d <= ARRIVAL) {
                    next.state = Packet::Delivered;
                }
                next
            }
            Packet::Delivered => {
                let limb = env
                    .anchor(limb_anchor(particle.kind))
                    .unwrap_or(particle.position);
                particle.respawn(limb, Motion::follow(HEAD, CLIMB_RATE))
            }
        }
    }

    fn style(&self, particle: &Particle<Packet>) -> Sprite {
        let (color, size) = match particle.state {
            Packet::Rising => (palette::GOLD, 10.0),
            Packet::Delivered => (palette::WHITE, 25.0),
        };
        Sprite {
            position: particle.position,
            color,
            size,
        }
    }

    fn geometry(&self, env: &Environment, _carry: &()) -> Vec<Shape> {
        let pose = Pose::at(env.tick);
        let mut shapes = Vec::with_capacity(BONES.len() * 3 + 7);
        for (from, to) in BONES {
            let (a, b) = (pose.joint(from), pose.joint(to));
            let [motor, sensor] = nerve(a, b, env.tick);
            shapes.push(Shape::Polyline {
                points: motor,
                color: palette::fade(palette::RED, 0.8),
                width: 1.0,
            });
            shapes.push(Shape::Polyline {
                points: sensor,
                color: palette::fade(palette::CYAN, 0.8),
                width: 1.0,
            });
            shapes.push(Shape::segment(a, b, palette::fade(palette::WHITE, 0.05), 3.0));
        }

        shapes.push(Shape::Marker {
            position: pose.joint(Joint::Head),
            color: palette::fade(palette::MAGENTA, 0.5),
            size: 200.0,
        });
        shapes.push(Shape::Marker {
            position: pose.joint(Joint::Neck),
            color: palette::WHITE,
            size: 50.0,
        });

        // Treadmill grid scrolling under the runner.
        let shift = (env.tick as f32 * 0.2).fract();
        for i in -2..=2 {
            let y = i as f32 - shift;
            shapes.push(Shape::segment(
                Vec3::new(-2.0, y, 0.0),
                Vec3::new(2.0, y, 0.0),
                palette::fade(palette::VIOLET, 0.2),
                1.0,
            ));
        }
        shapes
    }

    fn camera(&self, _tick: u64) -> Camera {
        Camera::fixed(15.0, 110.0)
    }

    fn caption(&self, _env: &Environment, _carry: &()) -> Option<String> {
        Some("status: deep learning (flow state)\nbackpropagation active".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FrameDriver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_fills_once() {
        let mut driver = FrameDriver::seeded(Flow, 3);
        driver.tick();
        assert_eq!(driver.pool().len(), PACKETS as usize);
        for _ in 0..10 {
            driver.tick();
        }
        assert_eq!(driver.pool().totals().spawned, u64::from(PACKETS));
    }

    #[test]
    fn packets_are_recycled_at_their_limb() {
        let mut driver = FrameDriver::seeded(Flow, 3);
        while driver.tick().is_some() {}
        let pool = driver.pool();
        assert_eq!(pool.len(), PACKETS as usize);
        assert_eq!(pool.totals().rejected, 0);
        assert!(pool.snapshot().iter().any(|p| p.generation > 0));
    }

    #[test]
    fn delivery_then_respawn() {
        let mut rng = StdRng::seed_from_u64(0);
        let env = Flow.environment(4, &mut ());
        let head = env.anchor(HEAD).unwrap();
        let p = Particle::new(head - Vec3::Z * 0.2, Motion::follow(HEAD, CLIMB_RATE)).with_kind(2);
        let p = Flow.transition(&p, &env, &mut rng);
        assert_eq!(p.state, Packet::Delivered);
        let again = Flow.transition(&p, &env, &mut rng);
        assert_eq!(again.state, Packet::Rising);
        assert_eq!(again.generation, 1);
        assert_eq!(again.position, env.anchor(limb_anchor(2)).unwrap());
        assert!(again.follows(&p));
    }

    #[test]
    fn pose_is_finite_and_leans() {
        for tick in 0..200 {
            let pose = Pose::at(tick);
            assert!(ALL_JOINTS.iter().all(|&j| pose.joint(j).is_finite()));
        }
        let pose = Pose::at(0);
        assert!(pose.joint(Joint::Head).y < 0.0);
        assert_eq!(pose.joint(Joint::HipL), Joint::HipL.rest());
    }

    #[test]
    fn nerves_survive_degenerate_bones() {
        let [a, b] = nerve(Vec3::ONE, Vec3::ONE, 5);
        assert!(a.iter().chain(&b).all(|p| p.is_finite()));
    }
}
