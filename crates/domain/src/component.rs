//! Data components - pure data containers owned by an entity's manager.
//!
//! Components never tick. Capabilities read them from activation predicates
//! and mutate them from callbacks and per-frame updates.

use std::any::{type_name, Any};
use std::fmt;

use crate::arena::{Arena, SlotKey};
use crate::capability::CapabilityHandle;

/// Marker for plain data that can be stored on an entity.
pub trait Component: Any {}

/// Handle to a data component in a [`ComponentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(SlotKey);

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Anything an entity owns that a caller may ask the manager to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnedComponent {
    Capability(CapabilityHandle),
    Data(ComponentHandle),
}

impl From<CapabilityHandle> for OwnedComponent {
    fn from(handle: CapabilityHandle) -> Self {
        Self::Capability(handle)
    }
}

impl From<ComponentHandle> for OwnedComponent {
    fn from(handle: ComponentHandle) -> Self {
        Self::Data(handle)
    }
}

struct ComponentEntry {
    enabled: bool,
    description: String,
    type_name: &'static str,
    value: Box<dyn Any>,
}

/// Type-erased, insertion-ordered storage for an entity's data components.
#[derive(Default)]
pub struct ComponentStore {
    entries: Arena<ComponentEntry>,
    order: Vec<ComponentHandle>,
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .order
            .iter()
            .filter_map(|handle| self.entries.get(handle.0))
            .map(|entry| entry.type_name)
            .collect();
        f.debug_struct("ComponentStore")
            .field("components", &names)
            .finish()
    }
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a component. New components start enabled with no description.
    pub fn insert<T: Component>(&mut self, value: T) -> ComponentHandle {
        let handle = ComponentHandle(self.entries.insert(ComponentEntry {
            enabled: true,
            description: String::new(),
            type_name: type_name::<T>(),
            value: Box::new(value),
        }));
        self.order.push(handle);
        handle
    }

    /// First component of type `T`, in insertion order.
    pub fn get<T: Component>(&self) -> Option<&T> {
        let handle = self.handle_of::<T>()?;
        self.get_by_handle(handle)
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let handle = self.handle_of::<T>()?;
        self.get_by_handle_mut(handle)
    }

    pub fn get_by_handle<T: Component>(&self, handle: ComponentHandle) -> Option<&T> {
        self.entries
            .get(handle.0)
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    pub fn get_by_handle_mut<T: Component>(&mut self, handle: ComponentHandle) -> Option<&mut T> {
        self.entries
            .get_mut(handle.0)
            .and_then(|entry| entry.value.downcast_mut::<T>())
    }

    pub fn handle_of<T: Component>(&self) -> Option<ComponentHandle> {
        self.order.iter().copied().find(|handle| {
            self.entries
                .get(handle.0)
                .is_some_and(|entry| entry.value.is::<T>())
        })
    }

    /// All components of type `T`, in insertion order.
    pub fn handles_of<T: Component>(&self) -> Vec<ComponentHandle> {
        self.order
            .iter()
            .copied()
            .filter(|handle| {
                self.entries
                    .get(handle.0)
                    .is_some_and(|entry| entry.value.is::<T>())
            })
            .collect()
    }

    pub fn contains(&self, handle: ComponentHandle) -> bool {
        self.entries.contains(handle.0)
    }

    /// Destroy a component. Returns false for stale handles.
    pub fn remove(&mut self, handle: ComponentHandle) -> bool {
        if self.entries.remove(handle.0).is_none() {
            return false;
        }
        self.order.retain(|h| *h != handle);
        true
    }

    pub fn is_enabled(&self, handle: ComponentHandle) -> bool {
        self.entries.get(handle.0).is_some_and(|entry| entry.enabled)
    }

    pub fn set_enabled(&mut self, handle: ComponentHandle, enabled: bool) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.enabled = enabled;
        }
    }

    pub fn description(&self, handle: ComponentHandle) -> Option<&str> {
        self.entries
            .get(handle.0)
            .map(|entry| entry.description.as_str())
    }

    pub fn set_description(&mut self, handle: ComponentHandle, description: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.description = description.into();
        }
    }

    pub fn type_name(&self, handle: ComponentHandle) -> Option<&'static str> {
        self.entries.get(handle.0).map(|entry| entry.type_name)
    }

    pub fn handles(&self) -> &[ComponentHandle] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        for handle in std::mem::take(&mut self.order) {
            self.entries.remove(handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(f32);
    impl Component for Health {}

    #[derive(Debug, PartialEq)]
    struct Armor(u32);
    impl Component for Armor {}

    mod storage {
        use super::*;

        #[test]
        fn insert_and_get_by_type() {
            let mut store = ComponentStore::new();
            store.insert(Health(100.0));
            store.insert(Armor(3));

            assert_eq!(store.get::<Health>(), Some(&Health(100.0)));
            assert_eq!(store.get::<Armor>(), Some(&Armor(3)));
            assert_eq!(store.len(), 2);
        }

        #[test]
        fn get_returns_first_in_insertion_order() {
            let mut store = ComponentStore::new();
            let first = store.insert(Armor(1));
            let second = store.insert(Armor(2));

            assert_eq!(store.get::<Armor>(), Some(&Armor(1)));
            assert_eq!(store.handles_of::<Armor>(), vec![first, second]);
        }

        #[test]
        fn get_mut_modifies_in_place() {
            let mut store = ComponentStore::new();
            store.insert(Health(50.0));
            if let Some(health) = store.get_mut::<Health>() {
                health.0 += 25.0;
            }
            assert_eq!(store.get::<Health>(), Some(&Health(75.0)));
        }

        #[test]
        fn handle_of_wrong_type_is_none() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));
            assert!(store.get_by_handle::<Armor>(handle).is_none());
            assert!(store.get_by_handle::<Health>(handle).is_some());
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn remove_destroys_component() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));

            assert!(store.remove(handle));
            assert!(!store.contains(handle));
            assert!(store.get::<Health>().is_none());
            assert!(store.handles().is_empty());
        }

        #[test]
        fn removing_stale_handle_is_noop() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));
            store.remove(handle);

            assert!(!store.remove(handle));
            assert!(store.is_empty());
        }

        #[test]
        fn clear_empties_store() {
            let mut store = ComponentStore::new();
            store.insert(Health(1.0));
            store.insert(Armor(1));
            store.clear();

            assert!(store.is_empty());
            assert!(store.handles().is_empty());
        }
    }

    mod metadata {
        use super::*;

        #[test]
        fn components_start_enabled_without_description() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));

            assert!(store.is_enabled(handle));
            assert_eq!(store.description(handle), Some(""));
            assert!(store
                .type_name(handle)
                .is_some_and(|name| name.ends_with("Health")));
        }

        #[test]
        fn metadata_can_be_updated() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));
            store.set_enabled(handle, false);
            store.set_description(handle, "Hit points");

            assert!(!store.is_enabled(handle));
            assert_eq!(store.description(handle), Some("Hit points"));
        }

        #[test]
        fn stale_handle_metadata_is_absent() {
            let mut store = ComponentStore::new();
            let handle = store.insert(Health(1.0));
            store.remove(handle);
            store.set_enabled(handle, true);

            assert!(!store.is_enabled(handle));
            assert!(store.description(handle).is_none());
        }
    }
}
