//! The capability contract and pre-built instances.

use std::any::Any;
use std::fmt;

use super::class::CapabilityClass;
use super::context::CapabilityContext;
use crate::component::ComponentStore;
use crate::ids::{CapabilityId, EntityId};

/// Upcast helper so boxed capabilities can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behavior attached to one entity.
///
/// Capabilities never schedule themselves. The owning manager evaluates the
/// activation predicates during sweeps and calls [`Capability::update`] once
/// per tick while the capability is active.
///
/// Predicates see the entity's data components read-only. Callbacks and
/// `update` get a [`CapabilityContext`] for mutation.
pub trait Capability: AsAny {
    /// Runtime type descriptor used for class lookups.
    fn class(&self) -> &'static CapabilityClass;

    /// Priority assigned on insertion. Higher runs earlier.
    fn initial_priority(&self) -> i32 {
        0
    }

    /// Whether the capability auto-activates when registered.
    fn start_active(&self) -> bool {
        false
    }

    /// Coarse gate: while false the capability can never be active.
    fn should_be_active(&self, _components: &ComponentStore) -> bool {
        true
    }

    /// Extra gate checked only while inactive and `should_be_active` holds.
    fn should_activate(&self, _components: &ComponentStore) -> bool {
        true
    }

    /// Lets an active capability force its own exit even while
    /// `should_be_active` still holds.
    fn should_deactivate(&self, _components: &ComponentStore) -> bool {
        false
    }

    fn on_activated(&mut self, _ctx: &mut CapabilityContext<'_>) {}

    fn on_deactivated(&mut self, _ctx: &mut CapabilityContext<'_>) {}

    /// Per-frame work. Only the manager's tick loop calls this.
    fn update(&mut self, _delta_time: f32, _ctx: &mut CapabilityContext<'_>) {}
}

/// A capability built outside a manager, waiting to be attached.
pub struct CapabilityInstance {
    id: CapabilityId,
    owner: Option<EntityId>,
    priority: i32,
    start_active: bool,
    behavior: Box<dyn Capability>,
}

impl CapabilityInstance {
    pub fn new(behavior: impl Capability) -> Self {
        Self::from_boxed(Box::new(behavior))
    }

    pub fn from_boxed(behavior: Box<dyn Capability>) -> Self {
        Self {
            id: CapabilityId::new(),
            owner: None,
            priority: behavior.initial_priority(),
            start_active: behavior.start_active(),
            behavior,
        }
    }

    /// Reuse a known identity; attaching the same id twice is a no-op.
    pub fn with_id(mut self, id: CapabilityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_start_active(mut self, start_active: bool) -> Self {
        self.start_active = start_active;
        self
    }

    pub fn id(&self) -> CapabilityId {
        self.id
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn start_active(&self) -> bool {
        self.start_active
    }

    pub fn class(&self) -> &'static CapabilityClass {
        self.behavior.class()
    }

    pub(crate) fn into_parts(self) -> (CapabilityId, Option<EntityId>, i32, bool, Box<dyn Capability>) {
        (
            self.id,
            self.owner,
            self.priority,
            self.start_active,
            self.behavior,
        )
    }
}

impl fmt::Debug for CapabilityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityInstance")
            .field("id", &self.id)
            .field("class", &self.class().name())
            .field("owner", &self.owner)
            .field("priority", &self.priority)
            .field("start_active", &self.start_active)
            .finish()
    }
}

impl From<Box<dyn Capability>> for CapabilityInstance {
    fn from(behavior: Box<dyn Capability>) -> Self {
        Self::from_boxed(behavior)
    }
}
