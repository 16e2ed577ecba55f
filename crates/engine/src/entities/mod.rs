//! Entity modules - host-side owners of capability managers.
//!
//! Every entity kind shares one capability surface through [`CapabilitySet`];
//! the [`World`] owns the entities and drives their frames.

pub mod capability_set;
pub mod entity;
pub mod world;

pub use capability_set::CapabilitySet;
pub use entity::{Entity, EntityKind};
pub use world::{CapabilitySnapshot, EntitySnapshot, World, WorldSnapshot};
