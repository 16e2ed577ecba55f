//! capkit Engine library.
//!
//! Host-side code around the capability manager.
//!
//! ## Structure
//!
//! - `entities/` - Host entities, the shared capability surface, and the world loop
//! - `capabilities/` - Built-in capabilities and the data components they use
//! - `settings` - Environment-driven configuration

pub mod capabilities;
pub mod entities;
pub mod settings;

pub use entities::{CapabilitySet, Entity, EntityKind, World, WorldSnapshot};
pub use settings::{EngineSettings, SettingsError, TimeSource};
