use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use motes_core::{RenderableFrame, ScenePreset};
use motes_platform::{RenderAdapter, Result};
use tracing::info;

/// Writes every frame as one JSON object per line.
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
    written: u64,
}

impl JsonLinesRenderer<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| format!("failed to create {}: {e}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderAdapter for JsonLinesRenderer<W> {
    fn init(&mut self, preset: &ScenePreset) -> Result<()> {
        info!(scene = %preset.name, "recording frames");
        Ok(())
    }

    fn draw(&mut self, frame: &RenderableFrame) -> Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        info!(frames = self.written, "recording closed");
        Ok(())
    }
}
