//! capkit domain: capabilities, their per-entity manager, and data components.
//!
//! This crate is synchronous and host-agnostic. The host supplies a
//! [`ClockPort`], drives [`CapabilityManager::tick`] once per frame, and owns
//! one manager per entity.

mod arena;

pub mod capability;
pub mod clock;
pub mod component;
pub mod error;
pub mod ids;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export the capability surface
pub use capability::{
    AsAny, BaseCapability, Capability, CapabilityClass, CapabilityContext, CapabilityHandle,
    CapabilityInstance, CapabilityManager, CapabilityRegistry, BASE_CAPABILITY,
};

pub use arena::SlotKey;
pub use clock::{ClockPort, GameClock, SystemClock};
pub use component::{Component, ComponentHandle, ComponentStore, OwnedComponent};
pub use error::DomainError;
pub use ids::{CapabilityId, EntityId};
pub use settings::{ManagerSettings, DEFAULT_UPDATE_INTERVAL_SECONDS};
