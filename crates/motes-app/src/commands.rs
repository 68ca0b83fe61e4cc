//! Subcommand implementations.

use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use motes_core::scenes::{Accretion, Breath, Embrace, Flow, Probe};
use motes_core::{EngineConfig, FrameDriver, Scene, SceneKind};
use motes_headless::{IntervalClock, JsonLinesRenderer, TraceRenderer, Unpaced};
use motes_journal::{MemoryLog, Session, SessionEnd};
use motes_platform::{drive, FrameClock, RenderAdapter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::cli::RunArgs;

pub fn list() -> Result<()> {
    for kind in SceneKind::ALL {
        println!("{:<10} {}", kind.name(), kind.summary());
    }
    Ok(())
}

pub fn run(args: &RunArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let config = file.merge(args.overrides());
    match args.scene {
        SceneKind::Breath => play(Breath, &config, args),
        SceneKind::Embrace => play(Embrace, &config, args),
        SceneKind::Accretion => play(Accretion, &config, args),
        SceneKind::Probe => play(Probe, &config, args),
        SceneKind::Flow => play(Flow, &config, args),
    }
}

fn play<Sc: Scene>(scene: Sc, config: &EngineConfig, args: &RunArgs) -> Result<()> {
    let preset = config.apply(scene.preset())?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut clock: Box<dyn FrameClock> = if args.unpaced {
        Box::new(Unpaced)
    } else {
        Box::new(IntervalClock::from_millis(preset.interval_ms))
    };
    let mut adapter: Box<dyn RenderAdapter> = match &args.record {
        Some(path) => Box::new(JsonLinesRenderer::create(path).map_err(|e| anyhow!(e))?),
        None => Box::new(TraceRenderer::new()),
    };

    let mut driver = FrameDriver::with_preset(scene, preset, rng);
    let summary = drive(&mut driver, &mut adapter, &mut clock)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("scene `{}` failed", driver.scene().name()))?;

    let totals = driver.pool().totals();
    println!(
        "{}: {} frames, peak {} particles, {} spawned, {} culled",
        driver.scene().name(),
        summary.frames,
        summary.peak_sprites,
        totals.spawned,
        totals.culled
    );
    if let Some(path) = &args.record {
        println!("frames recorded to {}", path.display());
    }
    Ok(())
}

pub fn memory(path: &Path) -> Result<()> {
    let mut log = MemoryLog::open(path)?;
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout().lock());
    let end = session.run(&mut log)?;
    info!(?end, records = log.len(), "console closed");
    if end == SessionEnd::EndOfInput {
        info!("input closed before a farewell");
    }
    Ok(())
}

pub fn recall(keyword: &str, path: &Path) -> Result<()> {
    let log = MemoryLog::open(path)?;
    let found = log.recall(keyword);
    if found.is_empty() {
        println!("no data found for '{keyword}'");
    }
    for record in found {
        println!("[{}] {} ({})", record.category, record.content, record.timestamp.to_rfc3339());
    }
    Ok(())
}
