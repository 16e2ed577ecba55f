//! Capabilities and the per-entity manager that schedules them.
//!
//! # Activation model
//!
//! The manager separates "is this behavior allowed to run" from "run this
//! behavior":
//!
//! - **Activation sweeps** re-evaluate every capability's predicates. They run
//!   on a throttle (default 10 Hz), when a capability is inserted, and when a
//!   re-evaluation is requested.
//! - **Ticks** run every frame and only touch the active set.
//!
//! ```text
//! Inactive --(should_be_active && should_activate)--> Active
//! Active   --(!should_be_active || should_deactivate)--> Inactive
//! ```
//!
//! A sweep requested while the active set is being iterated is deferred until
//! the iteration finishes.

mod behavior;
mod class;
mod context;
mod manager;
mod registry;

use std::fmt;

use crate::arena::SlotKey;

pub use behavior::{AsAny, Capability, CapabilityInstance};
pub use class::{BaseCapability, CapabilityClass, BASE_CAPABILITY};
pub use context::CapabilityContext;
pub use manager::CapabilityManager;
pub use registry::CapabilityRegistry;

/// Handle to a capability attached to a [`CapabilityManager`].
///
/// Handles go stale once the capability is removed; stale handles are
/// accepted everywhere and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityHandle(SlotKey);

impl CapabilityHandle {
    pub(crate) fn key(self) -> SlotKey {
        self.0
    }
}

impl fmt::Display for CapabilityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capability#{}", self.0)
    }
}
