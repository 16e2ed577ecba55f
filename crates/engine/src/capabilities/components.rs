//! Data components read and written by the built-in capabilities.

use capkit_domain::Component;
use serde::{Deserialize, Serialize};

/// Bounded pool shared by `Health` and `Stamina`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub current: f32,
    pub max: f32,
}

impl Pool {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Add `amount` (may be negative), clamped to `[0, max]`.
    pub fn adjust(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health(pub Pool);

impl Component for Health {}

impl Health {
    pub fn new(max: f32) -> Self {
        Self(Pool::new(max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamina(pub Pool);

impl Component for Stamina {}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self(Pool::new(max))
    }
}

/// What the entity's controller is asking for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub wants_sprint: bool,
    /// Set while `Sprint` is active.
    pub is_sprinting: bool,
}

impl Component for MovementIntent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_adjust_clamps_to_bounds() {
        let mut pool = Pool::new(10.0);
        pool.adjust(5.0);
        assert_eq!(pool.current, 10.0);
        assert!(pool.is_full());

        pool.adjust(-25.0);
        assert_eq!(pool.current, 0.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn with_current_clamps() {
        assert_eq!(Pool::new(10.0).with_current(12.0).current, 10.0);
        assert_eq!(Pool::new(10.0).with_current(-1.0).current, 0.0);
        assert_eq!(Pool::new(10.0).with_current(4.0).current, 4.0);
    }
}
