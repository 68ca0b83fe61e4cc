//! Motes core engine: platform-agnostic particle pools, lifecycle tables and
//! the frame driver that turns a [`Scene`] into a stream of renderable frames.

pub mod config;
pub mod driver;
pub mod environment;
pub mod error;
pub mod frame;
pub mod particle;
pub mod pool;
pub mod rules;
pub mod scene;
pub mod scenes;
pub mod signal;
pub mod spawn;
pub mod transition;

pub use config::{EngineConfig, ScenePreset};
pub use driver::{DriverState, FrameDriver};
pub use environment::Environment;
pub use error::{Error, Result};
pub use frame::{palette, Camera, RenderableFrame, Shape, Sprite};
pub use particle::{Lifecycle, Motion, Particle, Stage, Target};
pub use pool::{Bounds, ParticlePool, PoolTotals, Sink};
pub use scene::Scene;
pub use scenes::SceneKind;
pub use signal::Oscillator;
pub use spawn::{Gate, SpawnPolicy, SpawnRule};
pub use transition::{StandardTable, TransitionTable};
