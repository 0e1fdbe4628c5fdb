//! Two (or more) simulated participants drawing on one shared document.
//!
//! ```text
//! participant ─► drawing element ─► yrs Doc ─┐
//! participant ─► drawing element ─► yrs Doc ─┼─ LoopbackProvider
//! participant ─► drawing element ─► yrs Doc ─┘
//! ```
//!
//! Usage: `scribble-demo [config.json]`. Set `RUST_LOG` to change the
//! log filter (default `info`).

mod config;
mod participant;
mod provider;

use std::path::PathBuf;

use scribble_drawing::Point;

use crate::config::DemoConfig;
use crate::participant::Participant;
use crate::provider::LoopbackProvider;

/// Points of stroke `index` of participant `peer`: a short wave across the canvas.
fn stroke_points(config: &DemoConfig, peer: usize, index: usize) -> Vec<Point> {
    let rows = (config.peers * config.strokes).max(1) as f64;
    let y = (peer * config.strokes + index) as f64 / rows * 0.8 + 0.1;
    let count = config.points_per_stroke.max(1);
    (0..=count)
        .map(|i| {
            let t = i as f64 / count as f64;
            Point::new(0.1 + 0.8 * t, y + 0.02 * (t * std::f64::consts::TAU).sin())
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(path.as_deref())?;
    log::info!("starting scribble demo: {config:?}");

    let mut provider = LoopbackProvider::new();
    provider.on_synced(|event| log::info!("synced! {} <- {}", event.peer, event.remote));

    let mut participants = Vec::with_capacity(config.peers);
    for i in 0..config.peers {
        participants.push(Participant::join(&mut provider, format!("peer-{i}"), config.canvas_size)?);
    }

    let _updates = participants.first().map(|first| {
        first.drawing().subscribe_strokes(|strokes| match serde_json::to_string(strokes) {
            Ok(json) => log::info!("drawing updated: {json}"),
            Err(err) => log::warn!("cannot serialize drawing: {err}"),
        })
    });

    for (peer, participant) in participants.iter_mut().enumerate() {
        participant.pick_color(peer)?;
        for index in 0..config.strokes {
            participant.draw(&stroke_points(&config, peer, index))?;
        }
    }
    provider.flush()?;
    for participant in &participants {
        participant.render();
        log::info!(
            "{} ({}): {} strokes, {} painted, {} redraws",
            participant.name(),
            participant.peer(),
            participant.drawing().len(),
            participant.painted(),
            participant.redraw_passes(),
        );
    }

    if let Some(last) = participants.last_mut() {
        last.clear()?;
    }
    provider.flush()?;
    for participant in &participants {
        participant.render();
        log::info!("{} after clear: {} strokes", participant.name(), participant.drawing().len());
    }

    if let Some(leaving) = participants.pop() {
        if provider.disconnect(&leaving.peer()) {
            log::info!("{} left, {} peers remain", leaving.name(), provider.peer_count());
        }
    }

    log::info!("done after {} exchanges", provider.exchanges());
    Ok(())
}
