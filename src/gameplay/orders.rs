//! Client orders
//!
//! Orders ask for a set of items at a client's door within a time limit.
//! Completing one takes the items from the player and pays the reward in
//! coins. New orders are drawn from templates at a fixed interval while
//! fewer than the maximum are active.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::inventory::{Inventory, ItemCounts, ItemKind};
use super::player::Player;

/// Order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Completed,
    Expired,
}

/// A single client order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub id: u32,
    pub client_position: Vec2,
    pub items: ItemCounts,
    /// Coins paid on completion
    pub reward: u32,
    /// Seconds from creation until expiry
    pub time_limit: f32,
    pub created_at: f32,
    pub status: OrderStatus,
}

impl OrderRequest {
    /// Seconds left, 0 once the order is no longer active
    #[must_use]
    pub fn remaining(&self, now: f32) -> f32 {
        if self.status != OrderStatus::Active {
            return 0.0;
        }
        (self.time_limit - (now - self.created_at)).max(0.0)
    }

    #[must_use]
    pub fn is_expired(&self, now: f32) -> bool {
        self.status == OrderStatus::Active && self.remaining(now) <= 0.0
    }

    /// Fraction of the time limit used, 1 once the order is closed
    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        if self.status != OrderStatus::Active || self.time_limit <= 0.0 {
            return 1.0;
        }
        ((now - self.created_at) / self.time_limit).min(1.0)
    }

    #[must_use]
    pub fn can_be_completed_by(&self, inventory: &(impl Inventory + ?Sized)) -> bool {
        self.items.satisfied_by(inventory)
    }
}

/// Order board tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBoardConfig {
    pub max_active: usize,
    /// Seconds between generation attempts
    pub generation_interval: f32,
    /// Distance from the client at which an order can be handed over
    pub tolerance: f32,
    pub reward_per_item: u32,
    pub base_time_limit: f32,
    /// Extra seconds granted per requested item
    pub time_per_item: f32,
    /// Item lists new orders are drawn from
    pub templates: Vec<Vec<(ItemKind, u32)>>,
}

impl Default for OrderBoardConfig {
    fn default() -> Self {
        use ItemKind::{Burger, Empanada, Honey, Lomito, Pizza, Rum, Tobacco};
        Self {
            max_active: 3,
            generation_interval: 10.0,
            tolerance: 50.0,
            reward_per_item: 50,
            base_time_limit: 30.0,
            time_per_item: 5.0,
            templates: vec![
                vec![(Empanada, 2), (Rum, 1)],
                vec![(Lomito, 1), (Tobacco, 1)],
                vec![(Pizza, 1), (Honey, 2)],
                vec![(Burger, 2)],
                vec![(Empanada, 1), (Lomito, 1), (Rum, 1)],
            ],
        }
    }
}

/// An order handed over this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedOrder {
    pub id: u32,
    pub reward: u32,
}

/// Orders opened and closed by one [`OrderBoard::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub generated: Option<u32>,
    pub expired: Vec<u32>,
}

/// Aggregate counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderStatistics {
    pub active: usize,
    pub completed: usize,
    pub expired: usize,
    pub total: u32,
    pub completion_rate: f32,
}

/// All orders of a session
#[derive(Debug, Clone)]
pub struct OrderBoard {
    config: OrderBoardConfig,
    clients: Vec<Vec2>,
    active: Vec<OrderRequest>,
    /// Orders handed over so far
    completed: usize,
    expired: usize,
    next_id: u32,
    last_generation: f32,
}

impl OrderBoard {
    /// Board serving the given client positions
    #[must_use]
    pub fn new(clients: Vec<Vec2>, config: OrderBoardConfig) -> Self {
        Self {
            config,
            clients,
            active: Vec::new(),
            completed: 0,
            expired: 0,
            next_id: 1,
            last_generation: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OrderBoardConfig {
        &self.config
    }

    #[must_use]
    pub fn clients(&self) -> &[Vec2] {
        &self.clients
    }

    #[must_use]
    pub fn active(&self) -> &[OrderRequest] {
        &self.active
    }

    /// Open an order. Returns `None` when the board is full or the order
    /// asks for nothing.
    pub fn post(&mut self, client_position: Vec2, items: ItemCounts, now: f32) -> Option<u32> {
        if self.active.len() >= self.config.max_active || items.is_empty() {
            return None;
        }

        let total = items.total();
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Order #{id}: {items} at {client_position}");
        self.active.push(OrderRequest {
            id,
            client_position,
            items,
            reward: total * self.config.reward_per_item,
            time_limit: self.config.base_time_limit + total as f32 * self.config.time_per_item,
            created_at: now,
            status: OrderStatus::Active,
        });
        Some(id)
    }

    /// Open a random order at a random client
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f32) -> Option<u32> {
        let client = *self.clients.choose(rng)?;
        let items: ItemCounts = self.config.templates.choose(rng)?.iter().copied().collect();
        self.post(client, items, now)
    }

    /// Generate on schedule and retire expired orders
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f32) -> OrderUpdate {
        let mut update = OrderUpdate::default();

        if now - self.last_generation >= self.config.generation_interval {
            update.generated = self.generate(rng, now);
            self.last_generation = now;
        }

        self.active.retain_mut(|order| {
            if order.is_expired(now) {
                order.status = OrderStatus::Expired;
                log::debug!("Order #{} expired", order.id);
                update.expired.push(order.id);
                false
            } else {
                true
            }
        });
        self.expired += update.expired.len();

        update
    }

    /// Hand over the first active order whose client is within tolerance of
    /// `position` and whose items the player carries.
    pub fn try_complete_at(&mut self, player: &mut Player, position: Vec2, now: f32) -> Option<CompletedOrder> {
        let index = self.active.iter().position(|order| {
            order.client_position.distance(position) <= self.config.tolerance
                && order.can_be_completed_by(&*player)
        })?;

        let order = self.active.remove(index);
        for (kind, count) in order.items.iter() {
            if let Err(err) = player.remove(kind, count) {
                log::warn!("Order #{}: {err}", order.id);
            }
        }
        player.add_coins(order.reward);
        log::debug!("Order #{} completed at {now:.1}s, reward {}", order.id, order.reward);

        let completed = CompletedOrder {
            id: order.id,
            reward: order.reward,
        };
        self.completed += 1;
        Some(completed)
    }

    #[must_use]
    pub fn statistics(&self) -> OrderStatistics {
        let total = self.next_id - 1;
        OrderStatistics {
            active: self.active.len(),
            completed: self.completed,
            expired: self.expired,
            total,
            completion_rate: self.completed as f32 / total.max(1) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::PlayerConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board() -> OrderBoard {
        OrderBoard::new(
            vec![Vec2::new(100.0, 100.0), Vec2::new(300.0, 40.0)],
            OrderBoardConfig::default(),
        )
    }

    #[test]
    fn test_post_sets_reward_and_limit() {
        let mut board = board();
        let items = ItemCounts::new().with(ItemKind::Empanada, 2).with(ItemKind::Rum, 1);
        let id = board.post(Vec2::new(100.0, 100.0), items, 0.0).unwrap();

        let order = &board.active()[0];
        assert_eq!(order.id, id);
        assert_eq!(order.reward, 150);
        assert!((order.time_limit - 45.0).abs() < 1e-6);
        assert!((order.remaining(15.0) - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = board();
        let items = ItemCounts::new().with(ItemKind::Burger, 1);
        for _ in 0..3 {
            assert!(board.post(Vec2::ZERO, items.clone(), 0.0).is_some());
        }
        assert!(board.post(Vec2::ZERO, items, 0.0).is_none());
        assert!(board.post(Vec2::ZERO, ItemCounts::new(), 0.0).is_none());
    }

    #[test]
    fn test_orders_expire() {
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(1);
        board.post(Vec2::ZERO, ItemCounts::new().with(ItemKind::Honey, 1), 0.0);

        assert!(board.update(&mut rng, 20.0).expired.is_empty());
        let update = board.update(&mut rng, 36.0);
        assert_eq!(update.expired, vec![1]);
        assert_eq!(board.statistics().expired, 1);
        assert!(board.active().iter().all(|order| order.id != 1));
    }

    #[test]
    fn test_generation_interval() {
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(board.update(&mut rng, 5.0).generated, None);
        let id = board.update(&mut rng, 10.0).generated.unwrap();
        let order = &board.active()[0];
        assert_eq!(order.id, id);
        assert!(board.clients().contains(&order.client_position));
        assert!(!order.items.is_empty());
        assert_eq!(board.update(&mut rng, 15.0).generated, None);
    }

    #[test]
    fn test_complete_at_client() {
        let mut board = board();
        let mut player = Player::new(Vec2::ZERO, PlayerConfig::default());
        board.post(Vec2::new(100.0, 100.0), ItemCounts::new().with(ItemKind::Lomito, 1), 0.0);

        // Missing items
        assert!(board.try_complete_at(&mut player, Vec2::new(100.0, 100.0), 1.0).is_none());

        player.add(ItemKind::Lomito, 2);
        // Too far away
        assert!(board.try_complete_at(&mut player, Vec2::new(200.0, 100.0), 1.0).is_none());

        let done = board.try_complete_at(&mut player, Vec2::new(120.0, 110.0), 2.0).unwrap();
        assert_eq!(done, CompletedOrder { id: 1, reward: 50 });
        assert_eq!(player.count(ItemKind::Lomito), 1);
        assert_eq!(player.coins(), 50);
        assert!(board.active().is_empty());

        let stats = board.statistics();
        assert_eq!(stats.completed, 1);
        assert!((stats.completion_rate - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_clients_no_orders() {
        let mut board = OrderBoard::new(Vec::new(), OrderBoardConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(board.generate(&mut rng, 0.0), None);
    }
}
