//! Game session
//!
//! A [`GameSession`] owns everything one level needs: map, player, enemies,
//! pickups, zones, orders, clock, RNG and event queue. It is advanced one
//! fixed tick at a time and never touches a window or the wall clock, so a
//! session can be driven by a renderer, a test or a script alike.

use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::events::{EventQueue, GameEvent};
use super::time::Time;
use crate::ai::{Enemy, EnemySnapshot, PursuitContext};
use crate::gameplay::{
    DeliveryZone, FoodZone, ItemKind, OrderBoard, Pickup, PickupKind, Player,
};
use crate::input::{ActionState, InputAction};
use crate::physics::CollisionResolver;
use crate::world::{MapError, PixelRect, TileMap, ZoneKind, spawn_on_path};

/// How the level stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Running,
    /// Enough coins collected
    LevelComplete,
    /// No lives left
    GameOver,
}

impl Outcome {
    /// Whether the level is over
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// One level in play
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    map: TileMap,
    /// Auxiliary obstacle rects, one per solid tile
    obstacles: Vec<PixelRect>,
    player: Player,
    enemies: Vec<Enemy>,
    pickups: Vec<Pickup>,
    food_zones: Vec<FoodZone>,
    delivery_zones: Vec<DeliveryZone>,
    orders: OrderBoard,
    events: EventQueue,
    time: Time,
    rng: StdRng,
    outcome: Outcome,
    paused: bool,
}

impl GameSession {
    /// Set up a level on `map`.
    ///
    /// The player starts on the first safe-zone tile if one fits them,
    /// otherwise somewhere random. Enemies, coins and food are scattered on
    /// walkable ground. Restaurants and client houses become food and
    /// delivery zones.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NoSpawnPosition`] if an entity cannot be placed.
    pub fn new(config: GameConfig, map: TileMap) -> Result<Self, MapError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let grid = map.grid();
        let attempts = config.spawn_attempts;

        let safe_spawn = map
            .zone_tiles(ZoneKind::SafeZone)
            .iter()
            .map(|&tile| grid.centered_top_left(tile, config.player.size))
            .find(|&position| {
                grid.is_rect_walkable(&PixelRect::from_position(position, config.player.size))
            });
        let spawn = match safe_spawn {
            Some(position) => position,
            None => spawn_on_path(grid, config.player.size, &mut rng, attempts)?,
        };
        let player = Player::new(spawn, config.player.clone());

        let mut enemies = Vec::with_capacity(config.enemy_count);
        for id in 0..config.enemy_count {
            let position = spawn_on_path(grid, config.enemy.size, &mut rng, attempts)?;
            let enemy_rng = StdRng::seed_from_u64(rng.random());
            enemies.push(Enemy::new(id, position, config.enemy.clone(), enemy_rng));
        }

        let pickup_size = IVec2::splat(config.pickup_size);
        let mut pickups = Vec::with_capacity(config.coin_count + config.food_count);
        for _ in 0..config.coin_count {
            let position = spawn_on_path(grid, pickup_size, &mut rng, attempts)?;
            pickups.push(Pickup::coin(PixelRect::from_position(position, pickup_size)));
        }
        for _ in 0..config.food_count {
            let position = spawn_on_path(grid, pickup_size, &mut rng, attempts)?;
            let item = ItemKind::ALL[rng.random_range(0..ItemKind::COUNT)];
            pickups.push(Pickup::food(PixelRect::from_position(position, pickup_size), item));
        }

        let food_zones: Vec<FoodZone> = map
            .zone_tiles(ZoneKind::Restaurant)
            .iter()
            .zip(config.restaurant_items.iter().copied().cycle())
            .map(|(&tile, item)| FoodZone::new(grid.tile_rect(tile), item, config.food_give_time))
            .collect();

        let delivery_zones: Vec<DeliveryZone> = map
            .zone_tiles(ZoneKind::ClientHouse)
            .iter()
            .map(|&tile| {
                DeliveryZone::new(grid.tile_rect(tile), config.delivery_dwell)
                    .with_deliverables(config.deliverables.clone())
            })
            .collect();

        let orders = OrderBoard::new(map.zone_centers(ZoneKind::ClientHouse), config.orders.clone());
        let obstacles = map.obstacle_rects();

        log::info!(
            "Session started: {}x{} map, {} enemies, {} pickups, {} restaurants, {} clients",
            grid.width(),
            grid.height(),
            enemies.len(),
            pickups.len(),
            food_zones.len(),
            delivery_zones.len()
        );

        Ok(Self {
            config,
            map,
            obstacles,
            player,
            enemies,
            pickups,
            food_zones,
            delivery_zones,
            orders,
            events: EventQueue::new(),
            time: Time::new(),
            rng,
            outcome: Outcome::Running,
            paused: false,
        })
    }

    /// Advance the session by one tick of `dt` seconds.
    ///
    /// Order: player, enemies in spawn order, player-vs-enemy hits, pickups,
    /// zones, orders, outcome. Once the outcome is terminal only the event
    /// queue still turns over.
    pub fn tick(&mut self, dt: f32, input: &ActionState) -> Outcome {
        self.events.swap();
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        if input.is_just_pressed(InputAction::Pause) {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
            self.events.push(GameEvent::PauseToggled {
                paused: self.paused,
            });
        }
        if self.paused {
            return self.outcome;
        }

        self.time.advance(dt);
        let now = self.time.elapsed();
        let grid = self.map.grid();

        let player_resolver = if self.config.player_obstacles {
            CollisionResolver::with_obstacles(grid, &self.obstacles)
        } else {
            CollisionResolver::new(grid)
        };
        self.player.update(input, &player_resolver);

        let player_safe = self
            .map
            .zone_tiles(ZoneKind::SafeZone)
            .contains(&grid.tile_at(self.player.center()));

        let ctx = PursuitContext {
            resolver: CollisionResolver::new(grid),
            player: (!player_safe).then(|| self.player.center()),
            now,
        };
        for enemy in &mut self.enemies {
            let update = enemy.update(&ctx);
            if let Some((from, to)) = update.transition {
                self.events.push(GameEvent::EnemyStateChanged {
                    enemy: enemy.id(),
                    from,
                    to,
                });
            }
            if let Some(offset) = update.unstuck {
                self.events.push(GameEvent::EnemyUnstuck {
                    enemy: enemy.id(),
                    offset,
                });
            }
        }

        if !player_safe {
            let player_rect = self.player.rect();
            let caught_by = self
                .enemies
                .iter()
                .find(|enemy| enemy.rect().intersects(&player_rect))
                .map(Enemy::id);
            if let Some(enemy) = caught_by {
                let lives_left = self.player.hit();
                self.events.push(GameEvent::PlayerCaught { enemy, lives_left });
            }
        }

        self.collect_pickups();
        self.update_zones(now);
        self.update_orders(now, input);
        self.update_outcome()
    }

    fn collect_pickups(&mut self) {
        for pickup in &mut self.pickups {
            match pickup.try_collect(&mut self.player) {
                Some(PickupKind::Item(item)) => {
                    log::debug!("Picked up {item}");
                    self.events.push(GameEvent::ItemPickedUp { item });
                }
                Some(PickupKind::Coin) => {
                    let total = self.player.coins();
                    log::debug!("Coin collected ({total})");
                    self.events.push(GameEvent::CoinCollected { total });
                }
                None => {}
            }
        }
        self.pickups.retain(|pickup| !pickup.is_collected());
    }

    fn update_zones(&mut self, now: f32) {
        for zone in &mut self.food_zones {
            if let Some(item) = zone.update(&mut self.player, now) {
                self.events.push(GameEvent::ItemPickedUp { item });
            }
        }
        for zone in &mut self.delivery_zones {
            if let Some(item) = zone.update(&mut self.player, now) {
                self.events.push(GameEvent::ItemDelivered { item });
            }
        }
    }

    fn update_orders(&mut self, now: f32, input: &ActionState) {
        let update = self.orders.update(&mut self.rng, now);
        if let Some(id) = update.generated {
            self.events.push(GameEvent::OrderPosted { id });
        }
        for id in update.expired {
            self.events.push(GameEvent::OrderExpired { id });
        }

        if input.is_just_pressed(InputAction::Interact) {
            let position = self.player.center();
            if let Some(done) = self.orders.try_complete_at(&mut self.player, position, now) {
                self.events.push(GameEvent::OrderCompleted {
                    id: done.id,
                    reward: done.reward,
                });
            }
        }
    }

    fn update_outcome(&mut self) -> Outcome {
        let outcome = if !self.player.is_alive() {
            Outcome::GameOver
        } else if self.player.coins() >= self.config.coin_goal {
            Outcome::LevelComplete
        } else {
            Outcome::Running
        };

        if outcome != self.outcome {
            match outcome {
                Outcome::GameOver => log::info!("Game over at {:.1}s", self.time.elapsed()),
                Outcome::LevelComplete => log::info!(
                    "Level complete at {:.1}s with {} coins",
                    self.time.elapsed(),
                    self.player.coins()
                ),
                Outcome::Running => {}
            }
            self.outcome = outcome;
            self.events.push(GameEvent::OutcomeChanged { outcome });
        }
        outcome
    }

    /// Replace the player with a fresh one spawning at `position`
    pub fn place_player(&mut self, position: Vec2) {
        self.player = Player::new(position, self.config.player.clone());
    }

    /// Add an enemy at `position` using the configured tuning. Returns its id.
    pub fn spawn_enemy(&mut self, position: Vec2) -> usize {
        let id = self.enemies.len();
        let rng = StdRng::seed_from_u64(self.rng.random());
        self.enemies
            .push(Enemy::new(id, position, self.config.enemy.clone(), rng));
        id
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }

    pub fn add_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    pub fn clear_pickups(&mut self) {
        self.pickups.clear();
    }

    /// Read-only view of every enemy, in spawn order
    #[must_use]
    pub fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies.iter().map(Enemy::snapshot).collect()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[must_use]
    pub fn obstacles(&self) -> &[PixelRect] {
        &self.obstacles
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    #[must_use]
    pub fn food_zones(&self) -> &[FoodZone] {
        &self.food_zones
    }

    #[must_use]
    pub fn delivery_zones(&self) -> &[DeliveryZone] {
        &self.delivery_zones
    }

    #[must_use]
    pub fn orders(&self) -> &OrderBoard {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut OrderBoard {
        &mut self.orders
    }

    /// Events pushed during the previous tick
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    #[must_use]
    pub fn time(&self) -> &Time {
        &self.time
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PursuitState;
    use crate::gameplay::{Inventory, ItemCounts};
    use crate::world::{TileCoord, TilePalette};

    const DT: f32 = 1.0 / 60.0;

    /// 1 road, 0 wall, 2 restaurant, 3 client house, 4 safe zone
    const TEST_MAP: &str = "\
0,0,0,0,0,0,0,0
0,4,1,1,1,1,1,0
0,1,1,1,1,1,1,0
0,2,1,1,1,1,3,0
0,0,0,0,0,0,0,0
";

    fn quiet_config() -> GameConfig {
        GameConfig::default()
            .with_seed(1)
            .with_enemy_count(0)
            .with_coins(1, 0)
            .with_food_count(0)
    }

    fn session(config: GameConfig) -> GameSession {
        let map = TileMap::parse_csv(TEST_MAP, &TilePalette::classic(), config.tile_size).unwrap();
        GameSession::new(config, map).unwrap()
    }

    fn centered(session: &GameSession, x: i32, y: i32, size: IVec2) -> Vec2 {
        session.map().grid().centered_top_left(TileCoord::new(x, y), size)
    }

    fn run(session: &mut GameSession, input: &ActionState, ticks: usize) -> Vec<GameEvent> {
        let mut seen = Vec::new();
        for _ in 0..ticks {
            session.tick(DT, input);
            seen.extend(session.events().iter().cloned());
        }
        seen
    }

    #[test]
    fn test_new_session_places_everything_on_walkable_ground() {
        let session = session(GameConfig::default().with_seed(3));
        let grid = session.map().grid();

        assert_eq!(session.enemies().len(), 3);
        assert_eq!(session.pickups().len(), 5);
        assert_eq!(session.food_zones().len(), 1);
        assert_eq!(session.delivery_zones().len(), 1);
        assert_eq!(session.orders().clients().len(), 1);
        assert_eq!(session.obstacles().len(), grid.solid_tiles().count());

        // Player starts in the safe zone
        assert_eq!(grid.tile_at(session.player().center()), TileCoord::new(1, 1));
        for enemy in session.enemies() {
            assert!(grid.is_rect_walkable(&enemy.rect()));
            assert_eq!(enemy.state(), PursuitState::Patrolling);
        }
        for pickup in session.pickups() {
            assert!(grid.is_rect_walkable(&pickup.rect()));
        }
    }

    #[test]
    fn test_demo_map_session() {
        let config = GameConfig::default().with_coins(5, 1);
        let map = TileMap::parse_csv(
            include_str!("../../maps/demo.csv"),
            &config.palette,
            config.tile_size,
        )
        .unwrap();
        assert_eq!(map.zone_tiles(ZoneKind::Restaurant).len(), 2);

        let mut session = GameSession::new(config, map).unwrap();
        assert_eq!(session.food_zones().len(), 2);
        assert_eq!(session.delivery_zones().len(), 2);
        assert_eq!(session.food_zones()[1].item(), ItemKind::Empanada);

        let outcome = session.tick(DT, &ActionState::new());
        assert_eq!(outcome, Outcome::Running);
        assert_eq!(session.time().ticks(), 1);
    }

    #[test]
    fn test_enemy_catches_idle_player_until_game_over() {
        let mut session = session(quiet_config());
        let player_size = session.config().player.size;
        let enemy_size = session.config().enemy.size;
        let spot = centered(&session, 2, 2, player_size);
        session.place_player(spot);
        let enemy_at = centered(&session, 5, 2, enemy_size);
        session.spawn_enemy(enemy_at);

        let idle = ActionState::new();
        let mut catches = Vec::new();
        let mut chased = false;
        // `pushed_at` is the tick whose events are readable now
        let mut read = |session: &GameSession, pushed_at: u64, catches: &mut Vec<(u64, u32)>| {
            for event in session.events().iter() {
                match event {
                    GameEvent::PlayerCaught { enemy, lives_left } => {
                        assert_eq!(*enemy, 0);
                        catches.push((pushed_at, *lives_left));
                    }
                    GameEvent::EnemyStateChanged { to, .. } if *to == PursuitState::Chasing => {
                        chased = true;
                    }
                    _ => {}
                }
            }
        };

        for _ in 0..600 {
            let outcome = session.tick(DT, &idle);
            read(&session, session.time().ticks() - 1, &mut catches);
            if outcome.is_terminal() {
                break;
            }
        }
        assert_eq!(session.outcome(), Outcome::GameOver);
        assert_eq!(session.player().lives(), 0);

        // The deciding tick's events become visible on the next tick; nothing else moves
        let ticks = session.time().ticks();
        assert_eq!(session.tick(DT, &idle), Outcome::GameOver);
        assert_eq!(session.time().ticks(), ticks);
        read(&session, ticks, &mut catches);
        assert!(chased);
        assert!(session.events().iter().any(|event| matches!(
            event,
            GameEvent::OutcomeChanged {
                outcome: Outcome::GameOver
            }
        )));

        // Respawn lands on the enemy, so the lives drain on consecutive ticks
        let lives: Vec<u32> = catches.iter().map(|&(_, lives)| lives).collect();
        assert_eq!(lives, vec![2, 1, 0]);
        assert_eq!(catches[1].0, catches[0].0 + 1);
        assert_eq!(catches[2].0, catches[1].0 + 1);
        assert_eq!(catches[2].0, ticks);
    }

    #[test]
    fn test_safe_zone_protects_player() {
        let mut session = session(quiet_config());
        let player_size = session.config().player.size;
        let enemy_size = session.config().enemy.size;
        let spot = centered(&session, 1, 1, player_size);
        session.place_player(spot);
        let enemy_at = centered(&session, 2, 1, enemy_size);
        session.spawn_enemy(enemy_at);

        let events = run(&mut session, &ActionState::new(), 600);
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, GameEvent::PlayerCaught { .. }))
        );
        assert_eq!(session.player().lives(), 3);
        assert_eq!(session.enemies()[0].state(), PursuitState::Patrolling);
    }

    #[test]
    fn test_coin_completes_level() {
        let mut session = session(quiet_config());
        let rect = session.player().rect();
        session.add_pickup(Pickup::coin(PixelRect::new(rect.x, rect.y, 8, 8)));

        assert_eq!(session.tick(DT, &ActionState::new()), Outcome::LevelComplete);
        assert_eq!(session.player().coins(), 1);
        assert!(session.pickups().is_empty());

        session.tick(DT, &ActionState::new());
        let events: Vec<_> = session.events().iter().cloned().collect();
        assert!(events.contains(&GameEvent::CoinCollected { total: 1 }));
        assert!(events.contains(&GameEvent::OutcomeChanged {
            outcome: Outcome::LevelComplete
        }));
    }

    #[test]
    fn test_restaurant_then_delivery() {
        let mut session = session(quiet_config().with_coins(100, 0));
        let player_size = session.config().player.size;
        let spot = centered(&session, 1, 3, player_size);
        session.place_player(spot);

        // Wait at the restaurant counter
        let events = run(&mut session, &ActionState::new(), 130);
        assert!(events.contains(&GameEvent::ItemPickedUp {
            item: ItemKind::Lomito
        }));
        assert_eq!(session.player().count(ItemKind::Lomito), 1);

        // Walk to the client house and wait there
        let right = ActionState::holding([InputAction::MoveRight]);
        let events = run(&mut session, &right, 200);
        assert!(events.contains(&GameEvent::ItemDelivered {
            item: ItemKind::Lomito
        }));
        assert_eq!(session.player().count(ItemKind::Lomito), 0);
        assert_eq!(session.outcome(), Outcome::Running);
    }

    #[test]
    fn test_order_handover_on_interact() {
        let mut session = session(quiet_config());
        let player_size = session.config().player.size;
        let spot = centered(&session, 6, 3, player_size);
        session.place_player(spot);

        let client = session.orders().clients()[0];
        let items = ItemCounts::new().with(ItemKind::Rum, 1);
        let id = session.orders_mut().post(client, items, 0.0).unwrap();
        session.player_mut().add(ItemKind::Rum, 1);

        let interact = ActionState::holding([InputAction::Interact]);
        assert_eq!(session.tick(DT, &interact), Outcome::LevelComplete);
        assert_eq!(session.player().coins(), 50);

        session.tick(DT, &ActionState::new());
        assert!(
            session
                .events()
                .iter()
                .any(|event| *event == GameEvent::OrderCompleted { id, reward: 50 })
        );
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = session(quiet_config());
        let pause = ActionState::holding([InputAction::Pause]);
        let right = ActionState::holding([InputAction::MoveRight]);

        session.tick(DT, &pause);
        assert!(session.is_paused());
        let position = session.player().position();
        session.tick(DT, &right);
        assert_eq!(session.player().position(), position);
        assert_eq!(session.time().ticks(), 0);

        session.tick(DT, &pause);
        assert!(!session.is_paused());
        session.tick(DT, &right);
        assert_ne!(session.player().position(), position);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = GameConfig::default().with_seed(11).with_coins(99, 0);
        let mut first = session(config.clone());
        let mut second = session(config);
        let input = ActionState::holding([InputAction::MoveDown]);

        for _ in 0..300 {
            first.tick(DT, &input);
            second.tick(DT, &input);
        }
        assert_eq!(first.enemy_snapshots(), second.enemy_snapshots());
        assert_eq!(first.player().position(), second.player().position());
    }
}
