//! Runtime type descriptors for capabilities.
//!
//! A [`CapabilityClass`] names a capability type, links to the class it
//! derives from, and knows how to build a fresh instance. Lookups such as
//! `get_capability` match a class or anything derived from it.

use std::fmt;

use super::behavior::Capability;

/// Static descriptor for a capability type.
///
/// Declare one `static` per capability type:
///
/// ```ignore
/// pub static SPRINT: CapabilityClass =
///     CapabilityClass::new("Sprint", Some(&BASE_CAPABILITY), new_sprint);
///
/// fn new_sprint() -> Box<dyn Capability> {
///     Box::new(Sprint::default())
/// }
/// ```
pub struct CapabilityClass {
    name: &'static str,
    parent: Option<&'static CapabilityClass>,
    factory: fn() -> Box<dyn Capability>,
}

impl CapabilityClass {
    pub const fn new(
        name: &'static str,
        parent: Option<&'static CapabilityClass>,
        factory: fn() -> Box<dyn Capability>,
    ) -> Self {
        Self {
            name,
            parent,
            factory,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static CapabilityClass> {
        self.parent
    }

    /// True when `self` is `other` or derives from it. Descriptors are
    /// compared by identity, so two classes sharing a name stay distinct.
    pub fn is_a(&self, other: &CapabilityClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    /// Build a new, unattached behavior of this class.
    pub fn instantiate(&self) -> Box<dyn Capability> {
        (self.factory)()
    }
}

impl PartialEq for CapabilityClass {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for CapabilityClass {}

impl fmt::Debug for CapabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityClass")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|p| p.name))
            .finish()
    }
}

impl fmt::Display for CapabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Root of every capability class hierarchy.
pub static BASE_CAPABILITY: CapabilityClass =
    CapabilityClass::new("BaseCapability", None, new_base_capability);

fn new_base_capability() -> Box<dyn Capability> {
    Box::new(BaseCapability)
}

/// Behavior of the root class: every hook keeps its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseCapability;

impl Capability for BaseCapability {
    fn class(&self) -> &'static CapabilityClass {
        &BASE_CAPABILITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MOVEMENT: CapabilityClass =
        CapabilityClass::new("Movement", Some(&BASE_CAPABILITY), new_base_capability);
    static FLYING: CapabilityClass =
        CapabilityClass::new("Flying", Some(&MOVEMENT), new_base_capability);
    static COMBAT: CapabilityClass =
        CapabilityClass::new("Combat", Some(&BASE_CAPABILITY), new_base_capability);

    #[test]
    fn class_is_a_itself() {
        assert!(MOVEMENT.is_a(&MOVEMENT));
    }

    #[test]
    fn derived_class_is_a_ancestor() {
        assert!(FLYING.is_a(&MOVEMENT));
        assert!(FLYING.is_a(&BASE_CAPABILITY));
    }

    #[test]
    fn ancestor_is_not_a_derived_class() {
        assert!(!MOVEMENT.is_a(&FLYING));
        assert!(!BASE_CAPABILITY.is_a(&MOVEMENT));
    }

    #[test]
    fn siblings_do_not_match() {
        assert!(!COMBAT.is_a(&MOVEMENT));
        assert!(!FLYING.is_a(&COMBAT));
    }

    static SHADOW_MOVEMENT: CapabilityClass =
        CapabilityClass::new("Movement", None, new_base_capability);

    #[test]
    fn same_name_does_not_make_same_class() {
        assert_ne!(MOVEMENT, SHADOW_MOVEMENT);
        assert!(!SHADOW_MOVEMENT.is_a(&MOVEMENT));
        assert!(!MOVEMENT.is_a(&SHADOW_MOVEMENT));
        assert!(!FLYING.is_a(&SHADOW_MOVEMENT));
        assert!(!SHADOW_MOVEMENT.is_a(&BASE_CAPABILITY));
    }

    #[test]
    fn instantiate_builds_base_behavior() {
        let behavior = BASE_CAPABILITY.instantiate();
        assert_eq!(behavior.class(), &BASE_CAPABILITY);
    }

    #[test]
    fn debug_shows_parent_name() {
        let debug = format!("{:?}", FLYING);
        assert!(debug.contains("Flying"));
        assert!(debug.contains("Movement"));
    }
}
