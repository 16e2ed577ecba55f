//! Sprinting: drains stamina while the controller asks to sprint.

use capkit_domain::{Capability, CapabilityClass, CapabilityContext, ComponentStore, BASE_CAPABILITY};
use tracing::debug;

use super::components::{MovementIntent, Stamina};

pub static SPRINT: CapabilityClass = CapabilityClass::new("Sprint", Some(&BASE_CAPABILITY), new_sprint);

fn new_sprint() -> Box<dyn Capability> {
    Box::new(Sprint::default())
}

/// Runs ahead of the passive capabilities so stamina is drained before any
/// recovery in the same frame.
pub const SPRINT_PRIORITY: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Sprint {
    pub stamina_per_second: f32,
    /// Stamina needed to start a sprint. Once running, the sprint continues
    /// until stamina is exhausted.
    pub minimum_to_start: f32,
    sprints_started: u32,
}

impl Default for Sprint {
    fn default() -> Self {
        Self::new(25.0, 20.0)
    }
}

impl Sprint {
    pub fn new(stamina_per_second: f32, minimum_to_start: f32) -> Self {
        Self {
            stamina_per_second,
            minimum_to_start,
            sprints_started: 0,
        }
    }

    pub fn sprints_started(&self) -> u32 {
        self.sprints_started
    }

    fn set_sprinting(ctx: &mut CapabilityContext<'_>, sprinting: bool) {
        if let Some(intent) = ctx.components_mut().get_mut::<MovementIntent>() {
            intent.is_sprinting = sprinting;
        }
    }
}

impl Capability for Sprint {
    fn class(&self) -> &'static CapabilityClass {
        &SPRINT
    }

    fn initial_priority(&self) -> i32 {
        SPRINT_PRIORITY
    }

    fn should_be_active(&self, components: &ComponentStore) -> bool {
        components.get::<Stamina>().is_some()
            && components
                .get::<MovementIntent>()
                .is_some_and(|intent| intent.wants_sprint)
    }

    fn should_activate(&self, components: &ComponentStore) -> bool {
        components
            .get::<Stamina>()
            .is_some_and(|stamina| stamina.0.current >= self.minimum_to_start)
    }

    fn should_deactivate(&self, components: &ComponentStore) -> bool {
        components
            .get::<Stamina>()
            .is_none_or(|stamina| stamina.0.is_empty())
    }

    fn on_activated(&mut self, ctx: &mut CapabilityContext<'_>) {
        self.sprints_started += 1;
        Self::set_sprinting(ctx, true);
        debug!(owner = %ctx.owner(), "Sprint started");
    }

    fn on_deactivated(&mut self, ctx: &mut CapabilityContext<'_>) {
        Self::set_sprinting(ctx, false);
        debug!(owner = %ctx.owner(), "Sprint stopped");
        // Recovery is gated on not sprinting.
        ctx.request_capability_state_update();
    }

    fn update(&mut self, delta_time: f32, ctx: &mut CapabilityContext<'_>) {
        let Some(stamina) = ctx.components_mut().get_mut::<Stamina>() else {
            return;
        };
        stamina.0.adjust(-self.stamina_per_second * delta_time);
        if stamina.0.is_empty() {
            ctx.request_capability_state_update();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use capkit_domain::{CapabilityManager, EntityId, GameClock};

    use super::*;
    use crate::capabilities::components::Pool;

    fn runner(stamina: f32, wants_sprint: bool) -> CapabilityManager {
        let mut manager = CapabilityManager::new(EntityId::new(), Arc::new(GameClock::new()));
        manager
            .components_mut()
            .insert(Stamina(Pool::new(100.0).with_current(stamina)));
        manager.components_mut().insert(MovementIntent {
            wants_sprint,
            is_sprinting: false,
        });
        manager
    }

    fn is_sprinting(manager: &CapabilityManager) -> bool {
        manager
            .components()
            .get::<MovementIntent>()
            .is_some_and(|intent| intent.is_sprinting)
    }

    #[test]
    fn idle_without_sprint_intent() {
        let mut manager = runner(100.0, false);
        let handle = manager.add_capability(&SPRINT);
        assert!(!manager.is_active(handle));
        assert!(!is_sprinting(&manager));
    }

    #[test]
    fn needs_minimum_stamina_to_start() {
        let mut manager = runner(10.0, true);
        let handle = manager.add_capability(&SPRINT);
        assert!(!manager.is_active(handle));
    }

    #[test]
    fn sprint_runs_until_exhausted() {
        let mut manager = runner(30.0, true);
        let handle = manager.add_capability(&SPRINT);
        assert!(manager.is_active(handle));
        assert!(is_sprinting(&manager));

        manager.tick(1.0);
        assert_eq!(manager.components().get::<Stamina>().map(|s| s.0.current), Some(5.0));
        assert!(manager.is_active(handle));

        manager.tick(1.0);
        assert!(!manager.is_active(handle));
        assert!(!is_sprinting(&manager));
        assert_eq!(manager.capability::<Sprint>(handle).map(Sprint::sprints_started), Some(1));
    }

    #[test]
    fn releasing_intent_stops_sprint() {
        let mut manager = runner(100.0, true);
        let handle = manager.add_capability(&SPRINT);

        if let Some(intent) = manager.components_mut().get_mut::<MovementIntent>() {
            intent.wants_sprint = false;
        }
        manager.update_capability_states();

        assert!(!manager.is_active(handle));
        assert!(!is_sprinting(&manager));
    }
}
