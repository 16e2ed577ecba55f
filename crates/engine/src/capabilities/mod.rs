//! Built-in capabilities and the data components they operate on.

pub mod components;
pub mod regeneration;
pub mod sprint;
pub mod stamina_recovery;

use capkit_domain::{CapabilityRegistry, DomainError};

pub use components::{Health, MovementIntent, Pool, Stamina};
pub use regeneration::{Regeneration, REGENERATION};
pub use sprint::{Sprint, SPRINT, SPRINT_PRIORITY};
pub use stamina_recovery::{StaminaRecovery, STAMINA_RECOVERY};

/// Registry holding the base class plus every built-in capability.
pub fn builtin_registry() -> Result<CapabilityRegistry, DomainError> {
    let mut registry = CapabilityRegistry::new();
    registry.register(&REGENERATION)?;
    registry.register(&SPRINT)?;
    registry.register(&STAMINA_RECOVERY)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_lists_all_classes() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.list_classes(),
            vec!["BaseCapability", "Regeneration", "Sprint", "StaminaRecovery"]
        );
    }
}
