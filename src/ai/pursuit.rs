//! Enemy pursuit state machine
//!
//! Each enemy patrols until the player comes within its aggro radius, then
//! plans a path to the player's tile and follows it waypoint by waypoint,
//! re-planning at most once per cooldown. When the trail goes cold it
//! either walks back to its patrol origin or starts wandering between
//! random tiles.
//!
//! Movement is always routed through the [`CollisionResolver`]. An enemy
//! whose requested moves produce no displacement for several ticks in a row
//! jumps to a free neighbouring offset and drops its path, forcing a fresh
//! plan on the next tick.

use std::fmt;

use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::pathfinding::{Path, SearchStrategy, find_path};
use super::steering::{Arrive, Seek, SteeringBehavior, SteeringOutput};
use crate::physics::{Body, CollisionResolver, Facing};
use crate::world::{Grid, PixelRect, TileCoord};

/// Behavioural state of an enemy. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitState {
    /// Ping-pong along the patrol axis
    Patrolling,
    /// Following a path to the player, or heading straight at them
    Chasing,
    /// Walking back to the patrol origin
    Returning,
    /// Following paths to random tiles
    Wandering,
}

impl PursuitState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Patrolling => "Patrolling",
            Self::Chasing => "Chasing",
            Self::Returning => "Returning",
            Self::Wandering => "Wandering",
        }
    }
}

impl fmt::Display for PursuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis of the patrol ping-pong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatrolAxis {
    #[default]
    Horizontal,
    Vertical,
}

impl PatrolAxis {
    fn unit(self) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::X,
            Self::Vertical => Vec2::Y,
        }
    }
}

/// What an enemy does once it loses the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChaseFallback {
    /// Walk back to the patrol origin, then patrol again
    #[default]
    Return,
    /// Roam between random walkable tiles
    Wander,
}

/// Tuning for a single enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Collision box size in pixels
    pub size: IVec2,
    /// Pixels per tick
    pub speed: f32,
    /// Distance at which the player is noticed
    pub aggro_radius: f32,
    /// Minimum seconds between two path requests
    pub repath_cooldown: f32,
    pub patrol_axis: PatrolAxis,
    /// Patrol half-length around the origin, in pixels
    pub patrol_distance: f32,
    /// Distance at which a waypoint or the patrol origin counts as reached
    pub waypoint_epsilon: f32,
    /// Ticks without displacement before the unstick maneuver fires
    pub stuck_threshold: u32,
    /// Seconds before a wandering enemy picks a new target
    pub wander_interval: f32,
    pub fallback: ChaseFallback,
    pub strategy: SearchStrategy,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: IVec2::new(24, 24),
            speed: 2.0,
            aggro_radius: 200.0,
            repath_cooldown: 0.5,
            patrol_axis: PatrolAxis::Horizontal,
            patrol_distance: 128.0,
            waypoint_epsilon: 1.0,
            stuck_threshold: 5,
            wander_interval: 3.0,
            fallback: ChaseFallback::Return,
            strategy: SearchStrategy::AStar,
        }
    }
}

impl EnemyConfig {
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = IVec2::new(width, height);
        self
    }

    #[must_use]
    pub fn with_aggro_radius(mut self, radius: f32) -> Self {
        self.aggro_radius = radius;
        self
    }

    #[must_use]
    pub fn with_patrol(mut self, axis: PatrolAxis, distance: f32) -> Self {
        self.patrol_axis = axis;
        self.patrol_distance = distance;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: ChaseFallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_repath_cooldown(mut self, seconds: f32) -> Self {
        self.repath_cooldown = seconds;
        self
    }

    #[must_use]
    pub fn with_stuck_threshold(mut self, ticks: u32) -> Self {
        self.stuck_threshold = ticks;
        self
    }
}

/// Everything an enemy reads from the world during a tick
#[derive(Debug, Clone, Copy)]
pub struct PursuitContext<'a> {
    pub resolver: CollisionResolver<'a>,
    /// Player center, if there is a player to chase
    pub player: Option<Vec2>,
    /// Simulation time in seconds
    pub now: f32,
}

/// What happened to an enemy during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyUpdate {
    /// `(from, to)` when the state changed this tick
    pub transition: Option<(PursuitState, PursuitState)>,
    /// Offset applied by the unstick maneuver, if it fired
    pub unstuck: Option<IVec2>,
    /// Total displacement this tick
    pub displacement: IVec2,
}

/// Read-only view of an enemy for rendering and collision checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub id: usize,
    pub rect: PixelRect,
    pub position: Vec2,
    pub facing: Facing,
    pub moving: bool,
    pub state: PursuitState,
}

/// Offsets tried by the unstick maneuver, scaled by speed
const ESCAPE_DIRECTIONS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// A pursuing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    id: usize,
    config: EnemyConfig,
    body: Body,
    state: PursuitState,
    patrol_origin: Vec2,
    /// +1 or -1 along the patrol axis
    patrol_sign: f32,
    path: Path,
    waypoint: Option<Vec2>,
    last_repath: Option<f32>,
    wander_started: Option<f32>,
    stuck_ticks: u32,
    facing: Facing,
    moving: bool,
    rng: StdRng,
}

impl Enemy {
    /// Create an enemy with its top-left corner at `position`.
    ///
    /// The spawn position doubles as the patrol origin.
    #[must_use]
    pub fn new(id: usize, position: Vec2, config: EnemyConfig, rng: StdRng) -> Self {
        Self {
            id,
            body: Body::new(position, config.size),
            config,
            state: PursuitState::Patrolling,
            patrol_origin: position,
            patrol_sign: 1.0,
            path: Path::empty(),
            waypoint: None,
            last_repath: None,
            wander_started: None,
            stuck_ticks: 0,
            facing: Facing::default(),
            moving: false,
            rng,
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> PursuitState {
        self.state
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
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the enemy moved during the last tick
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Remaining cells of the current path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel target currently steered toward
    #[must_use]
    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    #[must_use]
    pub fn patrol_origin(&self) -> Vec2 {
        self.patrol_origin
    }

    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            rect: self.body.rect(),
            position: self.body.position(),
            facing: self.facing,
            moving: self.moving,
            state: self.state,
        }
    }

    /// Advance the enemy by one tick
    pub fn update(&mut self, ctx: &PursuitContext<'_>) -> EnemyUpdate {
        let from = self.state;

        if let Some(player) = ctx.player {
            self.sense_player(ctx, player);
        }

        let steering = match self.state {
            PursuitState::Patrolling => self.patrol_steering(),
            PursuitState::Chasing => self.chase_steering(ctx),
            PursuitState::Returning => self.return_steering(),
            PursuitState::Wandering => self.wander_steering(ctx),
        };

        let requested = steering.pixels();
        let mut displacement = ctx.resolver.move_by(&mut self.body, requested);

        if self.state == PursuitState::Patrolling {
            self.turn_patrol(requested, displacement);
        }

        if requested != IVec2::ZERO && displacement == IVec2::ZERO {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }

        let mut unstuck = None;
        if self.stuck_ticks >= self.config.stuck_threshold.max(1) {
            unstuck = self.unstick(ctx);
            if let Some(offset) = unstuck {
                displacement += offset;
                self.stuck_ticks = 0;
            }
        }

        if let Some(facing) = Facing::from_vector(steering.linear) {
            self.facing = facing;
        }
        self.moving = displacement != IVec2::ZERO;

        EnemyUpdate {
            transition: (from != self.state).then_some((from, self.state)),
            unstuck,
            displacement,
        }
    }

    fn set_state(&mut self, state: PursuitState) {
        if self.state != state {
            log::debug!("Enemy {}: {} -> {}", self.id, self.state, state);
            self.state = state;
        }
    }

    fn within_aggro(&self, player: Vec2) -> bool {
        self.body.center().distance(player) <= self.config.aggro_radius
    }

    fn repath_due(&self, now: f32) -> bool {
        self.last_repath
            .is_none_or(|last| now - last >= self.config.repath_cooldown)
    }

    /// Aggro check and, when the cooldown allows, a fresh path to the player
    fn sense_player(&mut self, ctx: &PursuitContext<'_>, player: Vec2) {
        if !self.within_aggro(player) || !self.repath_due(ctx.now) {
            return;
        }
        self.last_repath = Some(ctx.now);

        let grid = ctx.resolver.grid();
        let start = grid.tile_at(self.body.center());
        let goal = grid.tile_at(player);
        let path = find_path(grid, start, goal, self.config.strategy);

        if path.is_empty() {
            log::trace!("Enemy {}: no path from {start} to {goal}", self.id);
            if self.state == PursuitState::Chasing {
                // Direct pursuit until a route shows up again
                self.clear_path();
            }
            return;
        }

        log::trace!(
            "Enemy {}: path {start} -> {goal} ({} steps)",
            self.id,
            path.steps()
        );
        self.adopt_path(grid, path);
        self.set_state(PursuitState::Chasing);
    }

    /// Take ownership of a freshly planned path. The start cell is the one
    /// the enemy stands on, so steering begins at the cell after it.
    fn adopt_path(&mut self, grid: &Grid, mut path: Path) {
        if path.len() > 1 {
            path.pop_front();
        }
        self.waypoint = path.front().map(|tile| grid.tile_center(tile));
        self.path = path;
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.waypoint = None;
    }

    /// Pop the reached waypoint and aim at the next cell, if any
    fn advance_waypoint(&mut self, grid: &Grid) {
        if let Some(reached) = self.path.pop_front() {
            log::trace!("Enemy {}: reached {reached}", self.id);
        }
        self.waypoint = self.path.front().map(|tile| grid.tile_center(tile));
    }

    /// Steering toward the current waypoint, or `None` once the path is
    /// exhausted
    fn follow_path(&mut self, grid: &Grid) -> Option<SteeringOutput> {
        let center = self.body.center();
        loop {
            let waypoint = self.waypoint?;
            let arrive = Arrive::new(waypoint, self.config.speed, self.config.waypoint_epsilon);
            if arrive.arrived(center) {
                self.advance_waypoint(grid);
                continue;
            }
            return Some(arrive.calculate(center));
        }
    }

    fn patrol_steering(&self) -> SteeringOutput {
        SteeringOutput {
            linear: self.config.patrol_axis.unit() * self.config.speed * self.patrol_sign,
        }
    }

    /// Reverse at the end of the patrol span, or when a wall is in the way
    fn turn_patrol(&mut self, requested: IVec2, moved: IVec2) {
        let axis = self.config.patrol_axis.unit();
        let offset = (self.body.position() - self.patrol_origin).dot(axis);
        let reached_end = offset * self.patrol_sign >= self.config.patrol_distance;
        let blocked = requested != IVec2::ZERO && moved == IVec2::ZERO;
        if reached_end || blocked {
            self.patrol_sign = -self.patrol_sign;
        }
    }

    fn chase_steering(&mut self, ctx: &PursuitContext<'_>) -> SteeringOutput {
        if let Some(steering) = self.follow_path(ctx.resolver.grid()) {
            return steering;
        }

        match ctx.player {
            Some(player) if self.within_aggro(player) => {
                Seek::new(player, self.config.speed).calculate(self.body.center())
            }
            _ => {
                self.lose_player();
                SteeringOutput::ZERO
            }
        }
    }

    fn lose_player(&mut self) {
        self.clear_path();
        match self.config.fallback {
            ChaseFallback::Return => self.set_state(PursuitState::Returning),
            ChaseFallback::Wander => {
                self.wander_started = None;
                self.set_state(PursuitState::Wandering);
            }
        }
    }

    fn return_steering(&mut self) -> SteeringOutput {
        let arrive = Arrive::new(
            self.patrol_origin,
            self.config.speed,
            self.config.waypoint_epsilon,
        );
        let position = self.body.position();
        if arrive.arrived(position) {
            self.set_state(PursuitState::Patrolling);
            return self.patrol_steering();
        }
        arrive.calculate(position)
    }

    fn wander_steering(&mut self, ctx: &PursuitContext<'_>) -> SteeringOutput {
        let grid = ctx.resolver.grid();
        let due = match self.wander_started {
            None => true,
            Some(started) => {
                let elapsed = ctx.now - started;
                elapsed >= self.config.wander_interval
                    || (self.waypoint.is_none() && elapsed >= self.config.repath_cooldown)
            }
        };
        if due {
            self.plan_wander(grid, ctx.now);
        }
        self.follow_path(grid).unwrap_or(SteeringOutput::ZERO)
    }

    fn plan_wander(&mut self, grid: &Grid, now: f32) {
        self.wander_started = Some(now);
        let walkable: Vec<TileCoord> = grid.walkable_tiles().collect();
        let Some(&target) = walkable.choose(&mut self.rng) else {
            self.clear_path();
            return;
        };
        let start = grid.tile_at(self.body.center());
        let path = find_path(grid, start, target, self.config.strategy);
        log::trace!(
            "Enemy {}: wandering to {target} ({} cells)",
            self.id,
            path.len()
        );
        if path.is_empty() {
            self.clear_path();
        } else {
            self.adopt_path(grid, path);
        }
    }

    /// Jump to the first free offset among shuffled cardinal and diagonal
    /// directions, then invalidate the path so the next tick replans.
    fn unstick(&mut self, ctx: &PursuitContext<'_>) -> Option<IVec2> {
        let step = self.config.speed.round().max(1.0) as i32;
        let mut offsets = ESCAPE_DIRECTIONS.map(|direction| direction * step);
        offsets.shuffle(&mut self.rng);

        let rect = self.body.rect();
        let Some(offset) = offsets
            .into_iter()
            .find(|&offset| ctx.resolver.can_translate(&rect, offset))
        else {
            log::warn!("Enemy {}: stuck with no free offset", self.id);
            return None;
        };

        self.body.translate(offset);
        self.clear_path();
        self.last_repath = None;
        self.wander_started = None;
        log::debug!("Enemy {}: unstuck by {offset}", self.id);
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TICK: f32 = 1.0 / 60.0;

    fn enemy_on_tile(grid: &Grid, tile: TileCoord, config: EnemyConfig) -> Enemy {
        let position = grid.centered_top_left(tile, config.size);
        Enemy::new(0, position, config, StdRng::seed_from_u64(42))
    }

    fn small_config() -> EnemyConfig {
        EnemyConfig::default()
            .with_size(12, 12)
            .with_aggro_radius(100.0)
            .with_patrol(PatrolAxis::Horizontal, 32.0)
    }

    fn run(enemy: &mut Enemy, grid: &Grid, player: Option<Vec2>, ticks: usize, now: &mut f32) -> Vec<EnemyUpdate> {
        let resolver = CollisionResolver::new(grid);
        (0..ticks)
            .map(|_| {
                let ctx = PursuitContext {
                    resolver,
                    player,
                    now: *now,
                };
                *now += TICK;
                enemy.update(&ctx)
            })
            .collect()
    }

    #[test]
    fn test_initial_state_is_patrolling() {
        let grid = Grid::new(8, 8, 16);
        let enemy = enemy_on_tile(&grid, TileCoord::new(2, 2), small_config());
        assert_eq!(enemy.state(), PursuitState::Patrolling);
        assert!(enemy.path().is_empty());
        assert!(enemy.waypoint().is_none());
    }

    #[test]
    fn test_never_chases_player_outside_aggro() {
        let grid = Grid::new(30, 6, 16);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(3, 2), small_config());
        let player = grid.tile_center(TileCoord::new(28, 2));
        let mut now = 0.0;

        for update in run(&mut enemy, &grid, Some(player), 600, &mut now) {
            assert_ne!(enemy.state(), PursuitState::Chasing);
            assert!(update.transition.is_none());
        }
    }

    #[test]
    fn test_chases_adjacent_player_immediately() {
        let grid = Grid::new(8, 8, 16);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(2, 2), small_config());
        let player = grid.tile_center(TileCoord::new(3, 2));
        let mut now = 0.0;

        let updates = run(&mut enemy, &grid, Some(player), 1, &mut now);
        assert_eq!(enemy.state(), PursuitState::Chasing);
        assert_eq!(
            updates[0].transition,
            Some((PursuitState::Patrolling, PursuitState::Chasing))
        );
        assert_eq!(enemy.facing(), Facing::Right);
    }

    #[test]
    fn test_follows_path_to_player_tile() {
        let grid = Grid::from_ascii(
            "
            ......
            .####.
            ......
            ",
            16,
        );
        let config = small_config().with_aggro_radius(200.0);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(1, 0), config);
        let target = TileCoord::new(1, 2);
        let player = grid.tile_center(target);
        let mut now = 0.0;

        run(&mut enemy, &grid, Some(player), 200, &mut now);
        assert_eq!(enemy.state(), PursuitState::Chasing);
        assert!(enemy.body().center().distance(player) < 1.5);
        assert!(grid.is_rect_walkable(&enemy.rect()));
    }

    #[test]
    fn test_repath_respects_cooldown() {
        let grid = Grid::new(10, 10, 16);
        let config = small_config().with_repath_cooldown(0.5);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(2, 2), config);
        let resolver = CollisionResolver::new(&grid);

        let ctx = PursuitContext {
            resolver,
            player: Some(grid.tile_center(TileCoord::new(5, 2))),
            now: 0.0,
        };
        enemy.update(&ctx);
        let goal = enemy.path().goal();
        assert_eq!(goal, Some(TileCoord::new(5, 2)));

        // Player moves, but the cooldown has not elapsed: old plan kept
        let ctx = PursuitContext {
            player: Some(grid.tile_center(TileCoord::new(2, 5))),
            now: 0.2,
            ..ctx
        };
        enemy.update(&ctx);
        assert_eq!(enemy.path().goal(), goal);

        let ctx = PursuitContext { now: 0.6, ..ctx };
        enemy.update(&ctx);
        assert_eq!(enemy.path().goal(), Some(TileCoord::new(2, 5)));
    }

    #[test]
    fn test_failed_pathing_keeps_patrolling() {
        // Player sealed off behind a full wall
        let grid = Grid::from_ascii(
            "
            ...#..
            ...#..
            ...#..
            ",
            16,
        );
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(1, 1), small_config());
        let player = grid.tile_center(TileCoord::new(4, 1));
        let mut now = 0.0;

        run(&mut enemy, &grid, Some(player), 120, &mut now);
        assert_eq!(enemy.state(), PursuitState::Patrolling);
    }

    #[test]
    fn test_returns_to_origin_then_patrols() {
        let grid = Grid::new(24, 6, 16);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(2, 2), small_config());
        let origin = enemy.patrol_origin();
        let mut now = 0.0;

        // Lure the enemy away
        let lure = grid.tile_center(TileCoord::new(6, 2));
        run(&mut enemy, &grid, Some(lure), 90, &mut now);
        assert_eq!(enemy.state(), PursuitState::Chasing);
        assert!(enemy.position().distance(origin) > 32.0);

        // Player leaves for good
        let mut saw_returning = false;
        for _ in 0..400 {
            let update = run(&mut enemy, &grid, None, 1, &mut now)[0];
            if update.transition == Some((PursuitState::Chasing, PursuitState::Returning)) {
                saw_returning = true;
            }
            if enemy.state() == PursuitState::Patrolling {
                break;
            }
        }
        assert!(saw_returning);
        assert_eq!(enemy.state(), PursuitState::Patrolling);
        assert!(enemy.position().distance(origin) <= 3.0);
    }

    #[test]
    fn test_wander_fallback() {
        let grid = Grid::new(12, 12, 16);
        let config = small_config().with_fallback(ChaseFallback::Wander);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(2, 2), config);
        let mut now = 0.0;

        run(&mut enemy, &grid, Some(grid.tile_center(TileCoord::new(3, 2))), 1, &mut now);
        assert_eq!(enemy.state(), PursuitState::Chasing);

        let start = enemy.position();
        run(&mut enemy, &grid, None, 240, &mut now);
        assert_eq!(enemy.state(), PursuitState::Wandering);
        assert!(enemy.position() != start, "wandering enemy never moved");
        assert!(grid.is_rect_walkable(&enemy.rect()));
    }

    #[test]
    fn test_patrol_ping_pong() {
        let grid = Grid::new(20, 3, 16);
        let config = small_config().with_patrol(PatrolAxis::Horizontal, 20.0);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(8, 1), config);
        let origin = enemy.patrol_origin();
        let mut now = 0.0;

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..200 {
            run(&mut enemy, &grid, None, 1, &mut now);
            min_x = min_x.min(enemy.position().x);
            max_x = max_x.max(enemy.position().x);
            assert_eq!(enemy.position().y, origin.y);
        }
        assert!((max_x - (origin.x + 20.0)).abs() <= 2.0);
        assert!((min_x - (origin.x - 20.0)).abs() <= 2.0);
    }

    #[test]
    fn test_patrol_turns_at_wall() {
        let grid = Grid::from_ascii("#...#", 16);
        let config = small_config().with_patrol(PatrolAxis::Horizontal, 500.0);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(2, 0), config);
        let mut now = 0.0;

        run(&mut enemy, &grid, None, 300, &mut now);
        assert!(grid.is_rect_walkable(&enemy.rect()));
        assert_eq!(enemy.state(), PursuitState::Patrolling);
    }

    #[test]
    fn test_stuck_enemy_unsticks() {
        // Enemy pocket in the top-left, player unreachable beyond the walls
        let grid = Grid::from_ascii(
            "
            ..#.
            ..#.
            ###.
            ....
            ",
            16,
        );
        let config = small_config().with_stuck_threshold(5);
        let mut enemy = Enemy::new(0, Vec2::new(20.0, 20.0), config, StdRng::seed_from_u64(3));
        enemy.state = PursuitState::Chasing;
        let player = grid.tile_center(TileCoord::new(3, 3));
        let mut now = 0.0;

        // Direct pursuit pushes into the corner
        let updates = run(&mut enemy, &grid, Some(player), 4, &mut now);
        for update in &updates {
            assert_eq!(update.displacement, IVec2::ZERO);
            assert!(update.unstuck.is_none());
        }

        let update = run(&mut enemy, &grid, Some(player), 1, &mut now)[0];
        assert!(update.unstuck.is_some());
        assert_ne!(update.displacement, IVec2::ZERO);
        assert!(enemy.path().is_empty());
        assert!(grid.is_rect_walkable(&enemy.rect()));
    }

    #[test]
    fn test_unstick_gives_up_when_boxed_in() {
        let grid = Grid::from_ascii("#.#", 16);
        let config = small_config().with_stuck_threshold(1);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(1, 0), config.with_size(16, 16));
        let mut now = 0.0;

        let update = run(&mut enemy, &grid, None, 1, &mut now)[0];
        assert!(update.unstuck.is_none());
        assert_eq!(enemy.rect().top_left(), IVec2::new(16, 0));
    }

    #[test]
    fn test_facing_unchanged_without_movement() {
        let grid = Grid::new(4, 4, 16);
        let config = small_config().with_patrol(PatrolAxis::Vertical, 0.0).with_speed(0.0);
        let mut enemy = enemy_on_tile(&grid, TileCoord::new(1, 1), config);
        let mut now = 0.0;
        run(&mut enemy, &grid, None, 3, &mut now);
        assert_eq!(enemy.facing(), Facing::Down);
        assert!(!enemy.is_moving());
    }
}
