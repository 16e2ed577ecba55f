//! Passive health regeneration.

use capkit_domain::{Capability, CapabilityClass, CapabilityContext, ComponentStore, BASE_CAPABILITY};
use tracing::debug;

use super::components::Health;

pub static REGENERATION: CapabilityClass =
    CapabilityClass::new("Regeneration", Some(&BASE_CAPABILITY), new_regeneration);

fn new_regeneration() -> Box<dyn Capability> {
    Box::new(Regeneration::default())
}

/// Heals `Health` while it is below max. Asks for a re-evaluation as soon
/// as health is full so it leaves the active set without waiting for the
/// throttled sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    pub health_per_second: f32,
    healed: f32,
}

impl Default for Regeneration {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl Regeneration {
    pub fn new(health_per_second: f32) -> Self {
        Self {
            health_per_second,
            healed: 0.0,
        }
    }

    /// Total health restored since construction.
    pub fn healed(&self) -> f32 {
        self.healed
    }
}

impl Capability for Regeneration {
    fn class(&self) -> &'static CapabilityClass {
        &REGENERATION
    }

    fn should_be_active(&self, components: &ComponentStore) -> bool {
        components
            .get::<Health>()
            .is_some_and(|health| !health.0.is_full())
    }

    fn update(&mut self, delta_time: f32, ctx: &mut CapabilityContext<'_>) {
        let Some(health) = ctx.components_mut().get_mut::<Health>() else {
            return;
        };
        let before = health.0.current;
        health.0.adjust(self.health_per_second * delta_time);
        self.healed += health.0.current - before;

        if health.0.is_full() {
            debug!(owner = %ctx.owner(), healed = self.healed, "Health full");
            ctx.request_capability_state_update();
        }
    }
}
