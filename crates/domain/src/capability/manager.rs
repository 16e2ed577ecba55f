//! Capability Manager - per-entity owner and scheduler of capabilities.
//!
//! # Invariants
//!
//! - `capabilities` is sorted by descending priority; ties keep insertion order.
//! - `active_capabilities` is exactly the active subset of `capabilities`, in
//!   the same relative order.
//! - No capability appears twice (instances are keyed by [`CapabilityId`]).
//! - Only the manager flips a capability's active flag, and each real
//!   transition fires exactly one `on_activated` / `on_deactivated` hook.
//!
//! # Reentrancy
//!
//! While a capability runs one of its hooks its behavior is detached from its
//! slot, so the hook can receive a [`CapabilityContext`] that mutates the
//! manager. A sweep requested during the tick loop is deferred until the loop
//! finishes; a capability removing itself is removed once its hook returns.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::behavior::{Capability, CapabilityInstance};
use super::class::CapabilityClass;
use super::context::CapabilityContext;
use super::registry::CapabilityRegistry;
use super::CapabilityHandle;
use crate::arena::Arena;
use crate::clock::ClockPort;
use crate::component::{ComponentStore, OwnedComponent};
use crate::ids::{CapabilityId, EntityId};
use crate::settings::ManagerSettings;

struct CapabilityEntry {
    id: CapabilityId,
    class: &'static CapabilityClass,
    priority: i32,
    active: bool,
    removal_requested: bool,
    /// `None` while the behavior is running one of its own hooks.
    behavior: Option<Box<dyn Capability>>,
}

enum Transition {
    Activate,
    Deactivate,
    Stay,
}

/// Owns one entity's capabilities and data components, decides which
/// capabilities are active, and ticks the active ones.
pub struct CapabilityManager {
    owner: EntityId,
    settings: ManagerSettings,
    clock: Arc<dyn ClockPort>,
    entries: Arena<CapabilityEntry>,
    capabilities: Vec<CapabilityHandle>,
    active_capabilities: Vec<CapabilityHandle>,
    components: ComponentStore,
    last_evaluation_time: f64,
    is_ticking: bool,
    state_update_requested: bool,
}

impl CapabilityManager {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new(owner: EntityId, clock: Arc<dyn ClockPort>) -> Self {
        Self::with_settings(owner, clock, ManagerSettings::default())
    }

    pub fn with_settings(
        owner: EntityId,
        clock: Arc<dyn ClockPort>,
        settings: ManagerSettings,
    ) -> Self {
        Self {
            owner,
            settings,
            clock,
            entries: Arena::new(),
            capabilities: Vec::new(),
            active_capabilities: Vec::new(),
            components: ComponentStore::new(),
            last_evaluation_time: 0.0,
            is_ticking: false,
            state_update_requested: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn set_update_interval(&mut self, seconds: f32) {
        self.settings.update_interval_seconds = seconds;
    }

    pub fn now_seconds(&self) -> f64 {
        self.clock.now_seconds()
    }

    /// Time of the last throttled activation sweep.
    pub fn last_evaluation_time(&self) -> f64 {
        self.last_evaluation_time
    }

    #[inline]
    pub fn is_ticking(&self) -> bool {
        self.is_ticking
    }

    #[inline]
    pub fn is_state_update_requested(&self) -> bool {
        self.state_update_requested
    }

    #[inline]
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    #[inline]
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Owner started: run the initial activation sweep.
    pub fn begin_play(&mut self) {
        debug!(owner = %self.owner, capabilities = self.capabilities.len(), "Capability manager starting");
        self.update_capability_states();
    }

    /// Owner destroyed: deactivate and destroy every capability, then drop
    /// all data components.
    pub fn teardown(&mut self) {
        while let Some(handle) = self.capabilities.first().copied() {
            self.remove_capability(handle);
        }
        self.components.clear();
        debug!(owner = %self.owner, "Capability manager torn down");
    }

    // =========================================================================
    // Adding
    // =========================================================================

    /// Instantiate `class`, attach it, and evaluate its activation.
    pub fn add_capability(&mut self, class: &'static CapabilityClass) -> CapabilityHandle {
        self.add_capability_instance(CapabilityInstance::from_boxed(class.instantiate()))
    }

    /// Resolve `name` in `registry` and attach a new instance of it.
    ///
    /// Returns `None` when no class is registered under `name`.
    pub fn add_capability_by_name(
        &mut self,
        registry: &CapabilityRegistry,
        name: &str,
    ) -> Option<CapabilityHandle> {
        let class = registry.get(name)?;
        Some(self.add_capability(class))
    }

    /// Attach a pre-built capability.
    ///
    /// Attaching an instance whose id is already present is a no-op that
    /// returns the existing handle.
    pub fn add_capability_instance(&mut self, instance: CapabilityInstance) -> CapabilityHandle {
        if let Some(existing) = self.handle_of(instance.id()) {
            trace!(owner = %self.owner, capability = %instance.id(), "Capability already attached");
            return existing;
        }

        let (id, previous_owner, priority, start_active, behavior) = instance.into_parts();
        let class = behavior.class();
        if previous_owner != Some(self.owner) {
            debug!(
                owner = %self.owner,
                previous_owner = ?previous_owner,
                capability = class.name(),
                "Reparenting capability to manager owner"
            );
        }

        let handle = CapabilityHandle(self.entries.insert(CapabilityEntry {
            id,
            class,
            priority,
            active: false,
            removal_requested: false,
            behavior: Some(behavior),
        }));
        self.capabilities.push(handle);
        self.sort_by_priority();
        debug!(owner = %self.owner, capability = class.name(), priority, %handle, "Capability added");

        if start_active {
            self.activate(handle);
        }
        self.update_capability_activation(handle);
        handle
    }

    // =========================================================================
    // Removing
    // =========================================================================

    /// Deactivate (if active) and destroy a capability. Stale handles are ignored.
    pub fn remove_capability(&mut self, handle: CapabilityHandle) {
        let Some(entry) = self.entries.get_mut(handle.key()) else {
            return;
        };
        if entry.behavior.is_none() {
            // Running one of its own hooks; finish once it returns.
            entry.removal_requested = true;
            return;
        }

        if entry.active {
            self.deactivate(handle);
        }

        // The deactivation hook may already have removed it.
        if !self.entries.contains(handle.key()) {
            return;
        }
        self.capabilities.retain(|h| *h != handle);
        self.active_capabilities.retain(|h| *h != handle);
        if let Some(entry) = self.entries.remove(handle.key()) {
            debug!(owner = %self.owner, capability = entry.class.name(), %handle, "Capability removed");
        }
    }

    /// Remove anything the entity owns: capabilities go through
    /// [`remove_capability`](Self::remove_capability), data components are
    /// destroyed directly.
    pub fn remove_component(&mut self, component: impl Into<OwnedComponent>) {
        match component.into() {
            OwnedComponent::Capability(handle) => self.remove_capability(handle),
            OwnedComponent::Data(handle) => {
                if self.components.remove(handle) {
                    debug!(owner = %self.owner, %handle, "Data component removed");
                }
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First capability, in manager order, whose class is or derives from `class`.
    pub fn get_capability(&self, class: &CapabilityClass) -> Option<CapabilityHandle> {
        self.capabilities
            .iter()
            .copied()
            .find(|handle| self.matches_class(*handle, class))
    }

    /// All capabilities whose class is or derives from `class`, in manager order.
    pub fn get_capabilities(&self, class: &CapabilityClass) -> Vec<CapabilityHandle> {
        self.capabilities
            .iter()
            .copied()
            .filter(|handle| self.matches_class(*handle, class))
            .collect()
    }

    /// Snapshot of every capability, in manager order.
    pub fn get_all_capabilities(&self) -> Vec<CapabilityHandle> {
        self.capabilities.clone()
    }

    /// Snapshot of the active capabilities, in manager order.
    pub fn get_active_capabilities(&self) -> Vec<CapabilityHandle> {
        self.active_capabilities.clone()
    }

    /// Borrow a capability as its concrete type.
    ///
    /// Returns `None` for stale handles, for a different type, and for a
    /// capability that is currently running one of its own hooks.
    pub fn capability<T: Capability>(&self, handle: CapabilityHandle) -> Option<&T> {
        self.entries
            .get(handle.key())?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn capability_mut<T: Capability>(&mut self, handle: CapabilityHandle) -> Option<&mut T> {
        self.entries
            .get_mut(handle.key())?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    pub fn is_active(&self, handle: CapabilityHandle) -> bool {
        self.entries
            .get(handle.key())
            .is_some_and(|entry| entry.active)
    }

    pub fn priority(&self, handle: CapabilityHandle) -> Option<i32> {
        self.entries.get(handle.key()).map(|entry| entry.priority)
    }

    /// Change a capability's priority and restore manager order.
    pub fn set_priority(&mut self, handle: CapabilityHandle, priority: i32) {
        let Some(entry) = self.entries.get_mut(handle.key()) else {
            return;
        };
        entry.priority = priority;
        self.sort_by_priority();
    }

    pub fn class_of(&self, handle: CapabilityHandle) -> Option<&'static CapabilityClass> {
        self.entries.get(handle.key()).map(|entry| entry.class)
    }

    pub fn id_of(&self, handle: CapabilityHandle) -> Option<CapabilityId> {
        self.entries.get(handle.key()).map(|entry| entry.id)
    }

    pub fn handle_of(&self, id: CapabilityId) -> Option<CapabilityHandle> {
        self.capabilities.iter().copied().find(|handle| {
            self.entries
                .get(handle.key())
                .is_some_and(|entry| entry.id == id)
        })
    }

    pub fn contains(&self, handle: CapabilityHandle) -> bool {
        self.entries.contains(handle.key())
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Re-evaluate every capability's activation over a snapshot of the list.
    ///
    /// Called during the tick loop, this only records a request; the sweep
    /// runs after the loop completes.
    pub fn update_capability_states(&mut self) {
        if self.is_ticking {
            self.state_update_requested = true;
            return;
        }

        let snapshot = self.capabilities.clone();
        trace!(owner = %self.owner, capabilities = snapshot.len(), "Activation sweep");
        for handle in snapshot {
            self.update_capability_activation(handle);
        }
    }

    /// Ask for a sweep at the next safe point. This is what a capability's
    /// own `update` should use.
    pub fn request_capability_state_update(&mut self) {
        self.state_update_requested = true;
    }

    fn update_capability_activation(&mut self, handle: CapabilityHandle) {
        match self.desired_transition(handle) {
            Transition::Activate => {
                self.activate(handle);
            }
            Transition::Deactivate => {
                self.deactivate(handle);
            }
            Transition::Stay => {}
        }
    }

    fn desired_transition(&self, handle: CapabilityHandle) -> Transition {
        let Some(entry) = self.entries.get(handle.key()) else {
            return Transition::Stay;
        };
        if entry.removal_requested {
            return Transition::Stay;
        }
        let Some(behavior) = entry.behavior.as_deref() else {
            return Transition::Stay;
        };

        let should_be_active = behavior.should_be_active(&self.components);
        if entry.active {
            if !should_be_active || behavior.should_deactivate(&self.components) {
                return Transition::Deactivate;
            }
        } else if should_be_active && behavior.should_activate(&self.components) {
            return Transition::Activate;
        }
        Transition::Stay
    }

    /// Inactive -> Active. Returns false (and fires no hook) when the handle
    /// is stale or the capability is already active.
    pub(crate) fn activate(&mut self, handle: CapabilityHandle) -> bool {
        let Some(entry) = self.entries.get_mut(handle.key()) else {
            return false;
        };
        if entry.active {
            return false;
        }
        entry.active = true;
        trace!(owner = %self.owner, capability = entry.class.name(), "Capability activated");

        self.rebuild_active_list();
        self.run_detached(handle, |behavior, ctx| behavior.on_activated(ctx));
        true
    }

    /// Active -> Inactive. Returns false (and fires no hook) when the handle
    /// is stale or the capability is already inactive.
    pub(crate) fn deactivate(&mut self, handle: CapabilityHandle) -> bool {
        let Some(entry) = self.entries.get_mut(handle.key()) else {
            return false;
        };
        if !entry.active {
            return false;
        }
        entry.active = false;
        trace!(owner = %self.owner, capability = entry.class.name(), "Capability deactivated");

        self.rebuild_active_list();
        self.run_detached(handle, |behavior, ctx| behavior.on_deactivated(ctx));
        true
    }

    // =========================================================================
    // Ticking
    // =========================================================================

    /// Per-frame driver.
    ///
    /// 1. Run the throttled sweep if `update_interval_seconds` has elapsed.
    /// 2. Run any sweep requested since the last tick.
    /// 3. Update every active capability in manager order.
    /// 4. Run any sweep requested during step 3.
    ///
    /// Hooks only see a [`CapabilityContext`], which cannot tick or tear down
    /// the manager, so neither can run while the update loop is in progress.
    pub fn tick(&mut self, delta_time: f32) {
        let now = self.clock.now_seconds();
        if now - self.last_evaluation_time >= f64::from(self.settings.update_interval_seconds) {
            self.update_capability_states();
            self.last_evaluation_time = now;
        }

        if self.state_update_requested {
            self.state_update_requested = false;
            self.update_capability_states();
        }

        self.is_ticking = true;
        let active = self.active_capabilities.clone();
        for handle in active {
            // Removed by an earlier capability during this loop.
            if !self.is_active(handle) {
                continue;
            }
            self.run_detached(handle, |behavior, ctx| behavior.update(delta_time, ctx));
        }
        self.is_ticking = false;

        if self.state_update_requested {
            self.state_update_requested = false;
            self.update_capability_states();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn matches_class(&self, handle: CapabilityHandle, class: &CapabilityClass) -> bool {
        self.entries
            .get(handle.key())
            .is_some_and(|entry| entry.class.is_a(class))
    }

    /// Stable sort by descending priority, then resync the active list.
    fn sort_by_priority(&mut self) {
        let entries = &self.entries;
        self.capabilities.sort_by_key(|handle| {
            Reverse(
                entries
                    .get(handle.key())
                    .map_or(i32::MIN, |entry| entry.priority),
            )
        });
        self.rebuild_active_list();
    }

    fn rebuild_active_list(&mut self) {
        let entries = &self.entries;
        self.active_capabilities = self
            .capabilities
            .iter()
            .copied()
            .filter(|handle| {
                entries
                    .get(handle.key())
                    .is_some_and(|entry| entry.active)
            })
            .collect();
    }

    /// Take the behavior out of its slot, run `hook` with a context over the
    /// whole manager, then put it back.
    fn run_detached<F>(&mut self, handle: CapabilityHandle, hook: F)
    where
        F: FnOnce(&mut dyn Capability, &mut CapabilityContext<'_>),
    {
        let Some(mut behavior) = self
            .entries
            .get_mut(handle.key())
            .and_then(|entry| entry.behavior.take())
        else {
            return;
        };

        {
            let mut ctx = CapabilityContext::new(self, handle);
            hook(&mut *behavior, &mut ctx);
        }

        let removal_requested = match self.entries.get_mut(handle.key()) {
            Some(entry) => {
                entry.behavior = Some(behavior);
                std::mem::take(&mut entry.removal_requested)
            }
            None => false,
        };
        if removal_requested {
            self.remove_capability(handle);
        }
    }
}

impl Drop for CapabilityManager {
    fn drop(&mut self) {
        if !self.capabilities.is_empty() || !self.components.is_empty() {
            self.teardown();
        }
    }
}

impl fmt::Debug for CapabilityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<(&str, i32, bool)> = self
            .capabilities
            .iter()
            .filter_map(|handle| self.entries.get(handle.key()))
            .map(|entry| (entry.class.name(), entry.priority, entry.active))
            .collect();
        f.debug_struct("CapabilityManager")
            .field("owner", &self.owner)
            .field("settings", &self.settings)
            .field("capabilities", &capabilities)
            .field("components", &self.components)
            .field("is_ticking", &self.is_ticking)
            .finish()
    }
}
