//! The player character

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::inventory::{InsufficientItems, Inventory, ItemCounts, ItemKind};
use crate::input::ActionState;
use crate::physics::{Body, CollisionResolver, Facing};
use crate::world::PixelRect;

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision box, narrower than the sprite
    pub size: IVec2,
    /// Pixels per tick on each held axis
    pub speed: i32,
    pub lives: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: IVec2::new(12, 24),
            speed: 3,
            lives: 3,
        }
    }
}

/// The player: movement, lives, coins and carried items
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    body: Body,
    spawn_point: Vec2,
    facing: Facing,
    moving: bool,
    lives: u32,
    coins: u32,
    inventory: ItemCounts,
}

impl Player {
    /// Create a player with its top-left corner at `spawn_point`
    #[must_use]
    pub fn new(spawn_point: Vec2, config: PlayerConfig) -> Self {
        Self {
            body: Body::new(spawn_point, config.size),
            spawn_point,
            facing: Facing::default(),
            moving: false,
            lives: config.lives,
            coins: 0,
            inventory: ItemCounts::new(),
            config,
        }
    }

    /// Move according to the held actions and return the applied
    /// displacement.
    ///
    /// Collision is resolved X then Y, after which the box is kept inside
    /// the map's pixel bounds.
    pub fn update(&mut self, actions: &ActionState, resolver: &CollisionResolver<'_>) -> IVec2 {
        let request = actions.movement() * self.config.speed;

        self.moving = request != IVec2::ZERO;
        if request.x != 0 {
            self.facing = if request.x < 0 { Facing::Left } else { Facing::Right };
        } else if request.y != 0 {
            self.facing = if request.y < 0 { Facing::Up } else { Facing::Down };
        }

        let start = self.body.rect().top_left();
        resolver.move_by(&mut self.body, request);

        let rect = self.body.rect();
        let clamped = rect.clamped_to(&resolver.grid().pixel_bounds());
        if clamped != rect {
            self.body.translate(clamped.top_left() - rect.top_left());
        }

        self.body.rect().top_left() - start
    }

    /// Lose a life and go back to the spawn point. Returns the lives left.
    pub fn hit(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.body.set_position(self.spawn_point);
        log::info!("Player hit, {} lives left", self.lives);
        self.lives
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    #[must_use]
    pub fn inventory(&self) -> &ItemCounts {
        &self.inventory
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.body.rect()
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    #[must_use]
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }
}

impl Inventory for Player {
    fn count(&self, kind: ItemKind) -> u32 {
        self.inventory.count(kind)
    }

    fn add(&mut self, kind: ItemKind, amount: u32) {
        self.inventory.add(kind, amount);
    }

    fn remove(&mut self, kind: ItemKind, amount: u32) -> Result<(), InsufficientItems> {
        self.inventory.remove(kind, amount)
    }

    fn clear(&mut self) {
        self.inventory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAction;
    use crate::world::Grid;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), PlayerConfig::default())
    }

    #[test]
    fn test_moves_by_speed_per_axis() {
        let grid = Grid::new(8, 8, 32);
        let resolver = CollisionResolver::new(&grid);
        let mut player = player_at(40.0, 40.0);

        let actions = ActionState::holding([InputAction::MoveRight, InputAction::MoveDown]);
        let moved = player.update(&actions, &resolver);
        assert_eq!(moved, IVec2::new(3, 3));
        assert!(player.is_moving());
        assert_eq!(player.facing(), Facing::Right);
    }

    #[test]
    fn test_vertical_facing_and_idle() {
        let grid = Grid::new(8, 8, 32);
        let resolver = CollisionResolver::new(&grid);
        let mut player = player_at(40.0, 40.0);

        player.update(&ActionState::holding([InputAction::MoveUp]), &resolver);
        assert_eq!(player.facing(), Facing::Up);

        let moved = player.update(&ActionState::new(), &resolver);
        assert_eq!(moved, IVec2::ZERO);
        assert!(!player.is_moving());
        assert_eq!(player.facing(), Facing::Up);
    }

    #[test]
    fn test_stays_inside_map_bounds() {
        let grid = Grid::new(2, 2, 32);
        let resolver = CollisionResolver::new(&grid);
        let mut player = player_at(1.0, 1.0);

        let actions = ActionState::holding([InputAction::MoveLeft, InputAction::MoveUp]);
        for _ in 0..5 {
            player.update(&actions, &resolver);
        }
        assert_eq!(player.rect().top_left(), IVec2::ZERO);
    }

    #[test]
    fn test_walls_block_player() {
        let grid = Grid::from_ascii(".#", 32);
        let resolver = CollisionResolver::new(&grid);
        let mut player = player_at(10.0, 4.0);

        let actions = ActionState::holding([InputAction::MoveRight]);
        for _ in 0..20 {
            player.update(&actions, &resolver);
        }
        assert_eq!(player.rect().right(), 32);
    }

    #[test]
    fn test_hit_respawns_and_costs_a_life() {
        let grid = Grid::new(8, 8, 32);
        let resolver = CollisionResolver::new(&grid);
        let mut player = player_at(40.0, 40.0);
        player.update(&ActionState::holding([InputAction::MoveRight]), &resolver);

        assert_eq!(player.hit(), 2);
        assert_eq!(player.position(), Vec2::new(40.0, 40.0));
        player.hit();
        player.hit();
        assert!(!player.is_alive());
        assert_eq!(player.hit(), 0);
    }

    #[test]
    fn test_player_is_an_inventory() {
        let mut player = player_at(0.0, 0.0);
        player.add(ItemKind::Empanada, 2);
        assert!(player.has(ItemKind::Empanada, 2));
        assert!(player.remove(ItemKind::Empanada, 3).is_err());
        assert_eq!(player.inventory().count(ItemKind::Empanada), 2);
    }
}
