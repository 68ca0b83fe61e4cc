//! Platform abstraction traits so `motes-core` stays renderer-agnostic.

use motes_core::{FrameDriver, RenderableFrame, Scene, ScenePreset};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Counts gathered while driving one scene to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u64,
    pub sprites: u64,
    pub shapes: u64,
    pub peak_sprites: usize,
}

impl RunSummary {
    fn record(&mut self, frame: &RenderableFrame) {
        self.frames += 1;
        self.sprites += frame.sprites.len() as u64;
        self.shapes += frame.shapes.len() as u64;
        self.peak_sprites = self.peak_sprites.max(frame.sprites.len());
    }
}

/// Consumer of renderable frames (a plotting window, a file, a log).
pub trait RenderAdapter {
    fn init(&mut self, _preset: &ScenePreset) -> Result<()> {
        Ok(())
    }
    fn draw(&mut self, frame: &RenderableFrame) -> Result<()>;
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Paces the driver: `wait` returns at the next tick boundary.
pub trait FrameClock {
    fn wait(&mut self);
}

impl<A: RenderAdapter + ?Sized> RenderAdapter for Box<A> {
    fn init(&mut self, preset: &ScenePreset) -> Result<()> {
        (**self).init(preset)
    }
    fn draw(&mut self, frame: &RenderableFrame) -> Result<()> {
        (**self).draw(frame)
    }
    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl<C: FrameClock + ?Sized> FrameClock for Box<C> {
    fn wait(&mut self) {
        (**self).wait()
    }
}

/// Runs `driver` until it stops, handing every frame to `adapter` and waiting
/// on `clock` between frames. The first adapter error aborts the run.
pub fn drive<Sc, R, A, C>(
    driver: &mut FrameDriver<Sc, R>,
    adapter: &mut A,
    clock: &mut C,
) -> Result<RunSummary>
where
    Sc: Scene,
    R: RngCore,
    A: RenderAdapter + ?Sized,
    C: FrameClock + ?Sized,
{
    adapter.init(driver.preset())?;
    let mut summary = RunSummary::default();
    while let Some(frame) = driver.tick() {
        adapter.draw(&frame)?;
        summary.record(&frame);
        if driver.is_running() {
            clock.wait();
        }
    }
    adapter.finish()?;
    debug!(?summary, "adapter finished");
    info!(
        scene = driver.scene().name(),
        frames = summary.frames,
        peak_sprites = summary.peak_sprites,
        "run complete"
    );
    Ok(summary)
}
