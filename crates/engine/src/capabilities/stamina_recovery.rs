//! Stamina recovery while not sprinting.

use capkit_domain::{Capability, CapabilityClass, CapabilityContext, ComponentStore, BASE_CAPABILITY};

use super::components::{MovementIntent, Stamina};

pub static STAMINA_RECOVERY: CapabilityClass = CapabilityClass::new(
    "StaminaRecovery",
    Some(&BASE_CAPABILITY),
    new_stamina_recovery,
);

fn new_stamina_recovery() -> Box<dyn Capability> {
    Box::new(StaminaRecovery::default())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaminaRecovery {
    pub stamina_per_second: f32,
}

impl Default for StaminaRecovery {
    fn default() -> Self {
        Self {
            stamina_per_second: 15.0,
        }
    }
}

impl Capability for StaminaRecovery {
    fn class(&self) -> &'static CapabilityClass {
        &STAMINA_RECOVERY
    }

    fn initial_priority(&self) -> i32 {
        -10
    }

    fn should_be_active(&self, components: &ComponentStore) -> bool {
        let sprinting = components
            .get::<MovementIntent>()
            .is_some_and(|intent| intent.is_sprinting);
        !sprinting
            && components
                .get::<Stamina>()
                .is_some_and(|stamina| !stamina.0.is_full())
    }

    fn update(&mut self, delta_time: f32, ctx: &mut CapabilityContext<'_>) {
        let Some(stamina) = ctx.components_mut().get_mut::<Stamina>() else {
            return;
        };
        stamina.0.adjust(self.stamina_per_second * delta_time);
        if stamina.0.is_full() {
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

    #[test]
    fn recovers_while_not_sprinting() {
        let mut manager = CapabilityManager::new(EntityId::new(), Arc::new(GameClock::new()));
        manager
            .components_mut()
            .insert(Stamina(Pool::new(100.0).with_current(70.0)));
        let handle = manager.add_capability(&STAMINA_RECOVERY);
        assert!(manager.is_active(handle));

        manager.tick(1.0);
        assert_eq!(manager.components().get::<Stamina>().map(|s| s.0.current), Some(85.0));

        manager.tick(1.0);
        assert!(!manager.is_active(handle));
    }

    #[test]
    fn paused_while_sprinting() {
        let mut manager = CapabilityManager::new(EntityId::new(), Arc::new(GameClock::new()));
        manager
            .components_mut()
            .insert(Stamina(Pool::new(100.0).with_current(50.0)));
        manager.components_mut().insert(MovementIntent {
            wants_sprint: true,
            is_sprinting: true,
        });

        let handle = manager.add_capability(&STAMINA_RECOVERY);
        assert!(!manager.is_active(handle));
    }
}
