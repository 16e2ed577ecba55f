//! Shared capability surface for every host entity type.

use capkit_domain::{
    CapabilityClass, CapabilityHandle, CapabilityInstance, CapabilityManager, ComponentStore,
    OwnedComponent,
};

/// Anything that owns a [`CapabilityManager`].
///
/// Implementors provide the two accessors; every capability operation is
/// delegated once here instead of on each entity type.
pub trait CapabilitySet {
    fn capability_manager(&self) -> &CapabilityManager;

    fn capability_manager_mut(&mut self) -> &mut CapabilityManager;

    fn add_capability(&mut self, class: &'static CapabilityClass) -> CapabilityHandle {
        self.capability_manager_mut().add_capability(class)
    }

    fn add_capability_instance(&mut self, instance: CapabilityInstance) -> CapabilityHandle {
        self.capability_manager_mut().add_capability_instance(instance)
    }

    fn remove_capability(&mut self, handle: CapabilityHandle) {
        self.capability_manager_mut().remove_capability(handle);
    }

    fn remove_component(&mut self, component: OwnedComponent) {
        self.capability_manager_mut().remove_component(component);
    }

    fn get_capability(&self, class: &CapabilityClass) -> Option<CapabilityHandle> {
        self.capability_manager().get_capability(class)
    }

    fn get_capabilities(&self, class: &CapabilityClass) -> Vec<CapabilityHandle> {
        self.capability_manager().get_capabilities(class)
    }

    fn get_all_capabilities(&self) -> Vec<CapabilityHandle> {
        self.capability_manager().get_all_capabilities()
    }

    fn get_active_capabilities(&self) -> Vec<CapabilityHandle> {
        self.capability_manager().get_active_capabilities()
    }

    fn is_capability_active(&self, handle: CapabilityHandle) -> bool {
        self.capability_manager().is_active(handle)
    }

    fn update_capability_states(&mut self) {
        self.capability_manager_mut().update_capability_states();
    }

    fn request_capability_state_update(&mut self) {
        self.capability_manager_mut().request_capability_state_update();
    }

    fn components(&self) -> &ComponentStore {
        self.capability_manager().components()
    }

    fn components_mut(&mut self) -> &mut ComponentStore {
        self.capability_manager_mut().components_mut()
    }
}
