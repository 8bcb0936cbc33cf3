//! Per-tick action state

use glam::IVec2;
use rustc_hash::FxHashSet;

use super::InputAction;

/// Which logical actions are held, and which changed this tick
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    /// Currently held actions
    pressed: FxHashSet<InputAction>,
    /// Actions that went down this tick
    just_pressed: FxHashSet<InputAction>,
    /// Actions that went up this tick
    just_released: FxHashSet<InputAction>,
}

impl ActionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State with the given actions held
    #[must_use]
    pub fn holding(actions: impl IntoIterator<Item = InputAction>) -> Self {
        let mut state = Self::new();
        for action in actions {
            state.press(action);
        }
        state
    }

    /// Call at the start of each tick to clear per-tick state
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub fn press(&mut self, action: InputAction) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: InputAction) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Replace the held set, recording what went down and up
    pub fn set_held(&mut self, actions: impl IntoIterator<Item = InputAction>) {
        let held: FxHashSet<InputAction> = actions.into_iter().collect();
        for action in InputAction::ALL {
            match (self.pressed.contains(&action), held.contains(&action)) {
                (false, true) => self.press(action),
                (true, false) => self.release(action),
                _ => {}
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    #[must_use]
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    #[must_use]
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Unit movement direction per axis.
    ///
    /// Left wins over right and up wins over down when both are held.
    #[must_use]
    pub fn movement(&self) -> IVec2 {
        let x = if self.is_pressed(InputAction::MoveLeft) {
            -1
        } else if self.is_pressed(InputAction::MoveRight) {
            1
        } else {
            0
        };
        let y = if self.is_pressed(InputAction::MoveUp) {
            -1
        } else if self.is_pressed(InputAction::MoveDown) {
            1
        } else {
            0
        };
        IVec2::new(x, y)
    }
}
