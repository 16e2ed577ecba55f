//! Name-based lookup of capability classes.

use std::collections::BTreeMap;

use super::class::{CapabilityClass, BASE_CAPABILITY};
use crate::error::DomainError;

/// Registry of known capability classes, keyed by class name.
#[derive(Debug)]
pub struct CapabilityRegistry {
    classes: BTreeMap<&'static str, &'static CapabilityClass>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// Create a registry containing only the base capability class.
    pub fn new() -> Self {
        let mut classes = BTreeMap::new();
        classes.insert(BASE_CAPABILITY.name(), &BASE_CAPABILITY);
        Self { classes }
    }

    /// Create an empty registry without the base class.
    pub fn empty() -> Self {
        Self {
            classes: BTreeMap::new(),
        }
    }

    /// Register a capability class. Names must be unique.
    pub fn register(&mut self, class: &'static CapabilityClass) -> Result<(), DomainError> {
        if self.classes.contains_key(class.name()) {
            return Err(DomainError::duplicate_capability_class(class.name()));
        }
        self.classes.insert(class.name(), class);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'static CapabilityClass> {
        self.classes.get(name).copied()
    }

    /// Like [`get`](Self::get), but an unknown name is an error.
    pub fn resolve(&self, name: &str) -> Result<&'static CapabilityClass, DomainError> {
        self.get(name)
            .ok_or_else(|| DomainError::unknown_capability_class(name))
    }

    /// List all registered class names, sorted.
    pub fn list_classes(&self) -> Vec<&'static str> {
        self.classes.keys().copied().collect()
    }

    /// Registered classes that are `class` or derive from it.
    pub fn classes_derived_from(&self, class: &CapabilityClass) -> Vec<&'static CapabilityClass> {
        self.classes
            .values()
            .copied()
            .filter(|candidate| candidate.is_a(class))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::behavior::Capability;
    use crate::capability::class::BaseCapability;

    fn new_base() -> Box<dyn Capability> {
        Box::new(BaseCapability)
    }

    static DASH: CapabilityClass = CapabilityClass::new("Dash", Some(&BASE_CAPABILITY), new_base);
    static AIR_DASH: CapabilityClass = CapabilityClass::new("AirDash", Some(&DASH), new_base);

    #[test]
    fn registry_includes_base_class() {
        let registry = CapabilityRegistry::new();
        assert_eq!(registry.list_classes(), vec!["BaseCapability"]);
        assert!(registry.get("BaseCapability").is_some());
    }

    #[test]
    fn empty_registry_has_no_classes() {
        let registry = CapabilityRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get("BaseCapability").is_none());
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = CapabilityRegistry::new();
        registry.register(&DASH).unwrap();

        let class = registry.resolve("Dash").unwrap();
        assert_eq!(class, &DASH);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = CapabilityRegistry::new();
        registry.register(&DASH).unwrap();

        let err = registry.register(&DASH).unwrap_err();
        assert_eq!(err, DomainError::duplicate_capability_class("Dash"));
    }

    #[test]
    fn unknown_name_does_not_resolve() {
        let registry = CapabilityRegistry::new();
        assert!(registry.get("Teleport").is_none());
        assert!(matches!(
            registry.resolve("Teleport"),
            Err(DomainError::UnknownCapabilityClass(_))
        ));
    }

    #[test]
    fn classes_derived_from_walks_hierarchy() {
        let mut registry = CapabilityRegistry::new();
        registry.register(&DASH).unwrap();
        registry.register(&AIR_DASH).unwrap();

        let names: Vec<&str> = registry
            .classes_derived_from(&DASH)
            .iter()
            .map(|class| class.name())
            .collect();
        assert_eq!(names, vec!["AirDash", "Dash"]);
        assert_eq!(registry.classes_derived_from(&BASE_CAPABILITY).len(), 3);
    }
}
