//! Sectorcast Driver
//!
//! Headless driver: loads a map, runs the simulation at the fixed tick
//! rate with a scripted walk, builds both views every tick, then replays
//! the recorded input to verify the run is deterministic.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sectorcast::{
    TICK_RATE, VERSION,
    game::{
        events::WorldEventData,
        input::{InputFrame, InputRecording, Key},
        map::{load_world_file, MapConfig},
        tick::{replay, tick, TickConfig},
    },
    render::{first_person, top_down, Viewport},
};

/// Driver configuration.
#[derive(Clone, Debug)]
struct DriverConfig {
    /// Map file to load
    map_path: PathBuf,
    /// Ticks to simulate
    ticks: u32,
}

impl DriverConfig {
    /// Map from `SECTORCAST_MAP` or the first argument, ticks from
    /// `SECTORCAST_TICKS`.
    fn from_env() -> Self {
        let map_path = std::env::var("SECTORCAST_MAP")
            .ok()
            .or_else(|| std::env::args().nth(1))
            .unwrap_or_else(|| "maps/demo.map".to_string());
        Self {
            map_path: PathBuf::from(map_path),
            ticks: std::env::var("SECTORCAST_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
        }
    }
}

/// Update the held keys: walk forward, veer right, then turn in place,
/// on a two-second cycle.
fn press_scripted_keys(t: u32, held: &mut BTreeSet<Key>) {
    let keys: &[Key] = match t % 120 {
        0..=79 => &[Key::Forward],
        80..=99 => &[Key::TurnRight, Key::Forward],
        _ => &[Key::TurnLeft],
    };
    held.clear();
    held.extend(keys.iter().copied());
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    info!("Sectorcast v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let driver = DriverConfig::from_env();
    let map_config = MapConfig::from_env();
    let tick_config = TickConfig::default();
    let viewport = Viewport::default();

    let mut world = load_world_file(&driver.map_path, &map_config)
        .with_context(|| format!("loading {}", driver.map_path.display()))?;
    for issue in world.issues() {
        warn!("Integrity: sector {} open on {:?}", issue.tag, issue.edges);
    }

    info!("Running {} ticks...", driver.ticks);

    let mut recording = InputRecording::new(map_config.drop_seed, world.tick());
    let mut tick_interval = tokio::time::interval(Duration::from_secs(1) / TICK_RATE);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut total_events = 0;
    let mut draw_commands = 0;
    let mut held = BTreeSet::new();

    for t in 0..driver.ticks {
        tick_interval.tick().await;

        press_scripted_keys(t, &mut held);
        let input = InputFrame::sample(&held);
        recording.record(world.tick(), input);
        let result = tick(&mut world, input, &tick_config);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                WorldEventData::RoomChanged { to, .. } => {
                    info!("Tick {}: entered room {}", event.tick, world.room(*to).tag);
                }
                WorldEventData::DoorOpened { door, .. } => {
                    info!("Tick {}: door {} opened", event.tick, world.door(*door).tag);
                }
                WorldEventData::PlayerStranded { sector, position } => {
                    warn!("Tick {}: stranded in {} at {}", event.tick, world.sector(*sector).tag, position);
                }
                _ => {}
            }
        }

        draw_commands += first_person(&world, &viewport).commands.len();
        draw_commands += top_down(&world, &viewport).commands.len();

        // Report every 5 seconds
        if t % (TICK_RATE * 5) == 0 {
            let p = world.player.position();
            info!(
                "Tick {}: ({:.1}, {:.1}) dir {:.0}, sector {}, {} active rooms",
                world.tick(),
                p.x,
                p.y,
                world.player.direction,
                world.sector(world.player.sector).tag,
                world.active_rooms().len()
            );
        }
    }
    recording.finalize(world.tick());

    info!("=== Run Results ===");
    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}, draw commands: {}", total_events, draw_commands);
    info!("Input deltas: {} ({} bytes encoded)", recording.delta_count(), recording.to_bytes()?.len());
    debug!("Final snapshot: {}", world.snapshot().to_json()?);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let fresh = load_world_file(&driver.map_path, &map_config)?;
    let (replayed, _) = replay(fresh, &recording, &tick_config);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("DETERMINISM FAILURE: hashes differ");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
