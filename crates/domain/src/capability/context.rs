//! Mutable view of the manager handed to capability hooks.

use super::behavior::CapabilityInstance;
use super::class::CapabilityClass;
use super::manager::CapabilityManager;
use super::CapabilityHandle;
use crate::component::{ComponentStore, OwnedComponent};
use crate::ids::EntityId;

/// Passed to `on_activated`, `on_deactivated` and `update`.
///
/// The running capability is detached from the manager for the duration of
/// the hook, so typed lookups of [`handle`](Self::handle) return `None`.
pub struct CapabilityContext<'a> {
    manager: &'a mut CapabilityManager,
    current: CapabilityHandle,
}

impl<'a> CapabilityContext<'a> {
    pub(crate) fn new(manager: &'a mut CapabilityManager, current: CapabilityHandle) -> Self {
        Self { manager, current }
    }

    /// Handle of the capability running this hook.
    #[inline]
    pub fn handle(&self) -> CapabilityHandle {
        self.current
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.manager.owner()
    }

    pub fn now_seconds(&self) -> f64 {
        self.manager.now_seconds()
    }

    pub fn components(&self) -> &ComponentStore {
        self.manager.components()
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        self.manager.components_mut()
    }

    /// Read-only access for queries such as `get_capability`.
    pub fn manager(&self) -> &CapabilityManager {
        &*self.manager
    }

    pub fn request_capability_state_update(&mut self) {
        self.manager.request_capability_state_update();
    }

    /// Runs a sweep now, or defers it when called from inside the tick loop.
    pub fn update_capability_states(&mut self) {
        self.manager.update_capability_states();
    }

    pub fn add_capability(&mut self, class: &'static CapabilityClass) -> CapabilityHandle {
        self.manager.add_capability(class)
    }

    pub fn add_capability_instance(&mut self, instance: CapabilityInstance) -> CapabilityHandle {
        self.manager.add_capability_instance(instance)
    }

    pub fn remove_capability(&mut self, handle: CapabilityHandle) {
        self.manager.remove_capability(handle);
    }

    pub fn remove_component(&mut self, component: impl Into<OwnedComponent>) {
        self.manager.remove_component(component);
    }

    /// Remove the running capability once this hook returns.
    pub fn remove_self(&mut self) {
        self.manager.remove_capability(self.current);
    }

    pub fn set_priority(&mut self, handle: CapabilityHandle, priority: i32) {
        self.manager.set_priority(handle, priority);
    }
}
