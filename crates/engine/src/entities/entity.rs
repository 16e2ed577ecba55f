//! Host entities: actors, pawns, characters and controllers.

use std::fmt;
use std::sync::Arc;

use capkit_domain::{CapabilityManager, ClockPort, EntityId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::capability_set::CapabilitySet;
use crate::settings::EngineSettings;

/// Host-side flavour of an entity. Capability handling is identical for all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Actor,
    Pawn,
    Character,
    PlayerController,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Actor => write!(f, "actor"),
            EntityKind::Pawn => write!(f, "pawn"),
            EntityKind::Character => write!(f, "character"),
            EntityKind::PlayerController => write!(f, "player_controller"),
        }
    }
}

pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    name: String,
    tick_capabilities: bool,
    has_begun_play: bool,
    capabilities: CapabilityManager,
}

impl Entity {
    pub fn new(
        kind: EntityKind,
        name: impl Into<String>,
        clock: Arc<dyn ClockPort>,
        settings: &EngineSettings,
    ) -> Self {
        let id = EntityId::new();
        Self {
            id,
            kind,
            name: name.into(),
            tick_capabilities: settings.tick_capabilities,
            has_begun_play: false,
            capabilities: CapabilityManager::with_settings(id, clock, settings.manager),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick_capabilities(&self) -> bool {
        self.tick_capabilities
    }

    pub fn set_tick_capabilities(&mut self, enabled: bool) {
        self.tick_capabilities = enabled;
    }

    pub fn has_begun_play(&self) -> bool {
        self.has_begun_play
    }

    /// Runs the initial activation sweep. Repeated calls are ignored.
    pub fn begin_play(&mut self) {
        if self.has_begun_play {
            return;
        }
        self.has_begun_play = true;
        debug!(entity = %self.id, kind = %self.kind, name = %self.name, "Entity begin play");
        self.capabilities.begin_play();
    }

    pub fn tick(&mut self, delta_time: f32) {
        if self.tick_capabilities {
            self.capabilities.tick(delta_time);
        }
    }

    /// Deactivates and destroys every capability and data component.
    pub fn end_play(&mut self) {
        debug!(entity = %self.id, kind = %self.kind, name = %self.name, "Entity end play");
        self.capabilities.teardown();
        self.has_begun_play = false;
    }
}

impl CapabilitySet for Entity {
    fn capability_manager(&self) -> &CapabilityManager {
        &self.capabilities
    }

    fn capability_manager_mut(&mut self) -> &mut CapabilityManager {
        &mut self.capabilities
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("tick_capabilities", &self.tick_capabilities)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use capkit_domain::testing::{ProbeCapability, ProbeState, PROBE};
    use capkit_domain::{CapabilityInstance, GameClock};

    use super::*;

    fn entity(settings: &EngineSettings) -> Entity {
        Entity::new(
            EntityKind::Character,
            "hero",
            Arc::new(GameClock::new()),
            settings,
        )
    }

    #[test]
    fn manager_is_owned_by_entity() {
        let entity = entity(&EngineSettings::default());
        assert_eq!(entity.capability_manager().owner(), entity.id());
        assert_eq!(entity.kind().to_string(), "character");
    }

    #[test]
    fn begin_play_activates_pending_capabilities() {
        let mut entity = entity(&EngineSettings::default());
        let state = ProbeState::new();
        state.set_should_activate(false);
        let handle = entity
            .add_capability_instance(CapabilityInstance::new(ProbeCapability::new(Rc::clone(&state))));

        state.set_should_activate(true);
        entity.begin_play();
        entity.begin_play();

        assert!(entity.is_capability_active(handle));
        assert_eq!(state.activations(), 1);
    }

    #[test]
    fn tick_respects_tick_capabilities_flag() {
        let settings = EngineSettings {
            tick_capabilities: false,
            ..EngineSettings::default()
        };
        let mut entity = entity(&settings);
        let state = ProbeState::new();
        entity.add_capability_instance(CapabilityInstance::new(ProbeCapability::new(Rc::clone(&state))));

        entity.tick(0.016);
        assert_eq!(state.updates(), 0);

        entity.set_tick_capabilities(true);
        entity.tick(0.016);
        assert_eq!(state.updates(), 1);
    }

    #[test]
    fn end_play_tears_down_capabilities() {
        let mut entity = entity(&EngineSettings::default());
        let state = ProbeState::new();
        entity.add_capability_instance(CapabilityInstance::new(ProbeCapability::new(Rc::clone(&state))));
        entity.begin_play();

        entity.end_play();

        assert_eq!(state.deactivations(), 1);
        assert!(entity.get_all_capabilities().is_empty());
        assert!(!entity.has_begun_play());
    }

    #[test]
    fn capability_set_delegates_queries() {
        let mut entity = entity(&EngineSettings::default());
        let handle = entity.add_capability(&PROBE);

        assert_eq!(entity.get_capability(&PROBE), Some(handle));
        assert_eq!(entity.get_capabilities(&PROBE), vec![handle]);
        assert_eq!(entity.get_active_capabilities(), vec![handle]);

        entity.remove_component(handle.into());
        assert!(entity.get_all_capabilities().is_empty());
    }
}
