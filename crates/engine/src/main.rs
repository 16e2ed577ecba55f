//! capkit Engine - fixed-frame capability simulation.
//!
//! Spawns a character carrying the default capabilities and a player
//! controller that holds the sprint button for a stretch of frames, then logs
//! the final capability state.

use anyhow::Context;
use capkit_engine::capabilities::{builtin_registry, Health, MovementIntent, Pool, Stamina};
use capkit_engine::{CapabilitySet, EngineSettings, EntityKind, TimeSource, World};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Frames (as fractions of the run) during which the controller sprints.
const SPRINT_START: f32 = 0.1;
const SPRINT_END: f32 = 0.5;

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capkit_engine=info,capkit_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = EngineSettings::from_env().context("loading engine settings")?;
    tracing::info!(
        settings = %serde_json::to_string(&settings)?,
        "Starting capkit engine"
    );

    let registry = builtin_registry().context("registering built-in capabilities")?;
    let mut world = World::new(settings.clone(), registry);

    let hero = world.spawn_with_defaults(EntityKind::Character, "hero");
    if let Some(entity) = world.entity_mut(hero) {
        let components = entity.components_mut();
        components.insert(Health(Pool::new(100.0).with_current(60.0)));
        components.insert(Stamina::new(100.0));
        components.insert(MovementIntent::default());
    }
    world.spawn(EntityKind::PlayerController, "player");

    world.begin_play();

    let sprint_frames = (settings.frames as f32 * SPRINT_START) as u32
        ..(settings.frames as f32 * SPRINT_END) as u32;
    let frame_sleep = match settings.time_source {
        TimeSource::Wall => Some(settings.frame_duration()?),
        TimeSource::Game => None,
    };

    for frame in 0..settings.frames {
        let wants_sprint = sprint_frames.contains(&frame);
        if let Some(intent) = world
            .entity_mut(hero)
            .and_then(|entity| entity.components_mut().get_mut::<MovementIntent>())
        {
            if intent.wants_sprint != wants_sprint {
                tracing::info!(frame, wants_sprint, "Player toggled sprint");
                intent.wants_sprint = wants_sprint;
            }
        }

        world.tick(settings.frame_delta_seconds);

        if let Some(sleep) = frame_sleep {
            std::thread::sleep(sleep);
        }
    }

    let snapshot = world.snapshot();
    tracing::info!(
        snapshot = %serde_json::to_string_pretty(&snapshot)?,
        "Simulation finished"
    );

    world.end_play();
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
