//! Logical input actions and key bindings
//!
//! Physical keys map to logical actions, so gameplay code never looks at
//! key names and bindings can be changed at runtime.
//!
//! # Example
//!
//! ```ignore
//! let mut mapper = InputMapper::with_defaults();
//! mapper.bind("KeyI", InputAction::MoveUp);
//!
//! if let Some(action) = mapper.get_action("KeyW") {
//!     state.press(action);
//! }
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Input Actions
// ============================================================================

/// What the player can ask for, independent of the key pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------
    /// Talk to a client or pick up at a restaurant
    Interact,
    /// Freeze the simulation
    Pause,
}

impl InputAction {
    /// All actions, movement first
    pub const ALL: [Self; 6] = [
        Self::MoveUp,
        Self::MoveDown,
        Self::MoveLeft,
        Self::MoveRight,
        Self::Interact,
        Self::Pause,
    ];
}

// ============================================================================
// Input Mapper
// ============================================================================

/// Maps key names to logical actions.
///
/// Keys are identified by name (`"KeyW"`, `"ArrowUp"`, ...) so bindings can
/// live in configuration files.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    /// Key to action bindings
    key_bindings: FxHashMap<String, InputAction>,
    /// Reverse lookup: action to keys
    action_keys: FxHashMap<InputAction, Vec<String>>,
}

impl InputMapper {
        #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input mapper with WASD, arrow keys, `E` and `Escape`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut mapper = Self::new();

        // Movement (WASD)
        mapper.bind("KeyW", InputAction::MoveUp);
        mapper.bind("KeyS", InputAction::MoveDown);
        mapper.bind("KeyA", InputAction::MoveLeft);
        mapper.bind("KeyD", InputAction::MoveRight);

        // Arrow key alternatives
        mapper.bind("ArrowUp", InputAction::MoveUp);
        mapper.bind("ArrowDown", InputAction::MoveDown);
        mapper.bind("ArrowLeft", InputAction::MoveLeft);
        mapper.bind("ArrowRight", InputAction::MoveRight);

        mapper.bind("KeyE", InputAction::Interact);
        mapper.bind("Escape", InputAction::Pause);

        mapper
    }

    /// Bind a key name to an action, replacing any earlier binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, action: InputAction) {
        let key = key.into();
        if let Some(old_action) = self.key_bindings.get(&key)
            && let Some(keys) = self.action_keys.get_mut(old_action)
        {
            keys.retain(|k| *k != key);
        }

        self.key_bindings.insert(key.clone(), action);
        self.action_keys.entry(action).or_default().push(key);
    }

        pub fn unbind(&mut self, key: &str) {
        if let Some(action) = self.key_bindings.remove(key)
            && let Some(keys) = self.action_keys.get_mut(&action)
        {
            keys.retain(|k| k != key);
        }
    }

    /// Action bound to a key name
    #[must_use]
    pub fn get_action(&self, key: &str) -> Option<InputAction> {
        self.key_bindings.get(key).copied()
    }

    /// Keys bound to an action
    #[must_use]
    pub fn get_keys(&self, action: InputAction) -> &[String] {
        self.action_keys.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Actions for a set of held keys. Unbound keys are ignored.
    pub fn actions_for<'a>(
        &'a self,
        keys: impl IntoIterator<Item = &'a str> + 'a,
    ) -> impl Iterator<Item = InputAction> + 'a {
        keys.into_iter().filter_map(|key| self.get_action(key))
    }

    /// Number of bound keys
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.key_bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let mapper = InputMapper::with_defaults();
        assert_eq!(mapper.get_action("KeyW"), Some(InputAction::MoveUp));
        assert_eq!(mapper.get_action("ArrowLeft"), Some(InputAction::MoveLeft));
        assert_eq!(mapper.get_action("KeyQ"), None);
        assert_eq!(mapper.get_keys(InputAction::MoveRight).len(), 2);
        assert_eq!(mapper.binding_count(), 10);
    }

    #[test]
    fn test_rebind_replaces_old_action() {
        let mut mapper = InputMapper::with_defaults();
        mapper.bind("KeyW", InputAction::Interact);

        assert_eq!(mapper.get_action("KeyW"), Some(InputAction::Interact));
        assert_eq!(mapper.get_keys(InputAction::MoveUp), &["ArrowUp".to_string()]);
    }

    #[test]
    fn test_unbind() {
        let mut mapper = InputMapper::with_defaults();
        mapper.unbind("Escape");
        assert_eq!(mapper.get_action("Escape"), None);
        assert!(mapper.get_keys(InputAction::Pause).is_empty());
    }

    #[test]
    fn test_actions_for_held_keys() {
        let mapper = InputMapper::with_defaults();
        let actions: Vec<_> = mapper.actions_for(["KeyD", "Space", "KeyS"]).collect();
        assert_eq!(actions, vec![InputAction::MoveRight, InputAction::MoveDown]);
    }
}
