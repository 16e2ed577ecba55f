//! World: owns entities, the clock, and the capability registry.

use std::sync::Arc;

use capkit_domain::{CapabilityRegistry, ClockPort, EntityId, GameClock, SystemClock};
use serde::Serialize;
use tracing::{info, warn};

use super::capability_set::CapabilitySet;
use super::entity::{Entity, EntityKind};
use crate::settings::{EngineSettings, TimeSource};

enum WorldClock {
    /// Advanced by `World::tick`.
    Game(Arc<GameClock>),
    /// Read-only source supplied by the host.
    External(Arc<dyn ClockPort>),
}

impl WorldClock {
    fn port(&self) -> Arc<dyn ClockPort> {
        match self {
            WorldClock::Game(clock) => Arc::clone(clock) as Arc<dyn ClockPort>,
            WorldClock::External(clock) => Arc::clone(clock),
        }
    }
}

pub struct World {
    clock: WorldClock,
    registry: CapabilityRegistry,
    settings: EngineSettings,
    entities: Vec<Entity>,
    has_begun_play: bool,
    frame_count: u64,
}

impl World {
    /// Build a world whose clock follows `settings.time_source`.
    pub fn new(settings: EngineSettings, registry: CapabilityRegistry) -> Self {
        let clock = match settings.time_source {
            TimeSource::Game => WorldClock::Game(Arc::new(GameClock::new())),
            TimeSource::Wall => WorldClock::External(Arc::new(SystemClock::new())),
        };
        Self::with_world_clock(settings, registry, clock)
    }

    /// Build a world that reads time from `clock` and never advances it.
    pub fn with_clock(
        settings: EngineSettings,
        registry: CapabilityRegistry,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self::with_world_clock(settings, registry, WorldClock::External(clock))
    }

    fn with_world_clock(
        settings: EngineSettings,
        registry: CapabilityRegistry,
        clock: WorldClock,
    ) -> Self {
        Self {
            clock,
            registry,
            settings,
            entities: Vec::new(),
            has_begun_play: false,
            frame_count: 0,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn now_seconds(&self) -> f64 {
        self.clock.port().now_seconds()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn has_begun_play(&self) -> bool {
        self.has_begun_play
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Spawn an empty entity. Entities spawned after `begin_play` start
    /// playing immediately.
    pub fn spawn(&mut self, kind: EntityKind, name: impl Into<String>) -> EntityId {
        let mut entity = Entity::new(kind, name, self.clock.port(), &self.settings);
        let id = entity.id();
        info!(entity = %id, %kind, name = entity.name(), "Spawned entity");
        if self.has_begun_play {
            entity.begin_play();
        }
        self.entities.push(entity);
        id
    }

    /// Spawn an entity carrying every capability named in
    /// `settings.default_capabilities`. Unknown names are skipped.
    pub fn spawn_with_defaults(&mut self, kind: EntityKind, name: impl Into<String>) -> EntityId {
        let id = self.spawn(kind, name);
        let Some(entity) = self.entities.iter_mut().find(|entity| entity.id() == id) else {
            return id;
        };

        for class_name in &self.settings.default_capabilities {
            if entity
                .capability_manager_mut()
                .add_capability_by_name(&self.registry, class_name)
                .is_none()
            {
                warn!(entity = %id, capability = %class_name, "Unknown capability class, skipping");
            }
        }
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    /// Entities in spawn order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |entity| entity.kind() == kind)
    }

    /// End play for an entity and drop it. Returns false for unknown ids.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.iter().position(|entity| entity.id() == id) else {
            return false;
        };
        let mut entity = self.entities.remove(index);
        entity.end_play();
        info!(entity = %id, "Destroyed entity");
        true
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn begin_play(&mut self) {
        if self.has_begun_play {
            return;
        }
        self.has_begun_play = true;
        info!(entities = self.entities.len(), "World begin play");
        for entity in &mut self.entities {
            entity.begin_play();
        }
    }

    /// Advance game time (when the world owns it), then tick every entity in
    /// spawn order.
    pub fn tick(&mut self, delta_time: f32) {
        if let WorldClock::Game(clock) = &self.clock {
            clock.advance(delta_time);
        }
        for entity in &mut self.entities {
            entity.tick(delta_time);
        }
        self.frame_count += 1;
    }

    /// Tear down and drop every entity.
    pub fn end_play(&mut self) {
        info!(entities = self.entities.len(), frames = self.frame_count, "World end play");
        for mut entity in self.entities.drain(..) {
            entity.end_play();
        }
        self.has_begun_play = false;
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time_seconds: self.now_seconds(),
            frame_count: self.frame_count,
            entities: self.entities.iter().map(EntitySnapshot::from).collect(),
        }
    }
}

/// Serializable summary of the world's capability state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub time_seconds: f64,
    pub frame_count: u64,
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub capabilities: Vec<CapabilitySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySnapshot {
    pub class: &'static str,
    pub priority: i32,
    pub active: bool,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        let manager = entity.capability_manager();
        let capabilities = manager
            .get_all_capabilities()
            .into_iter()
            .filter_map(|handle| {
                Some(CapabilitySnapshot {
                    class: manager.class_of(handle)?.name(),
                    priority: manager.priority(handle)?,
                    active: manager.is_active(handle),
                })
            })
            .collect();
        Self {
            id: entity.id(),
            kind: entity.kind(),
            name: entity.name().to_string(),
            capabilities,
        }
    }
}
