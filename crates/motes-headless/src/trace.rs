use motes_core::{RenderableFrame, ScenePreset};
use motes_platform::{RenderAdapter, Result};
use tracing::{debug, info};

/// Summarizes frames through `tracing` instead of drawing them.
///
/// Captions are logged when they change, so a run reads like the on-screen
/// status line would.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    scene: String,
    frames: u64,
    last_caption: Option<String>,
}

impl TraceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderAdapter for TraceRenderer {
    fn init(&mut self, preset: &ScenePreset) -> Result<()> {
        self.scene = preset.name.clone();
        info!(scene = %self.scene, frames = preset.frame_count, "rendering to log");
        Ok(())
    }

    fn draw(&mut self, frame: &RenderableFrame) -> Result<()> {
        self.frames += 1;
        debug!(
            tick = frame.tick,
            sprites = frame.sprites.len(),
            shapes = frame.shapes.len(),
            azimuth = frame.camera.azimuth,
            "frame"
        );
        if frame.caption != self.last_caption {
            if let Some(caption) = &frame.caption {
                info!(tick = frame.tick, "{}", caption.replace('\n', " | "));
            }
            self.last_caption = frame.caption.clone();
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!(scene = %self.scene, frames = self.frames, "rendering done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motes_core::Camera;

    #[test]
    fn counts_frames() {
        let mut renderer = TraceRenderer::new();
        renderer.init(&ScenePreset::default()).unwrap();
        for tick in 1..=3 {
            let frame = RenderableFrame {
                tick,
                sprites: Vec::new(),
                shapes: Vec::new(),
                camera: Camera::default(),
                caption: Some(format!("tick {tick}")),
            };
            renderer.draw(&frame).unwrap();
        }
        renderer.finish().unwrap();
        assert_eq!(renderer.frames(), 3);
        assert_eq!(renderer.last_caption.as_deref(), Some("tick 3"));
    }
}
