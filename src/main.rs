//! Headless demo: plays a level with a scripted key sequence and logs what
//! happens.
//!
//! Usage: `delivery-chase [CONFIG.ron|CONFIG.json] [MAP.csv]`

use delivery_chase::prelude::*;

/// Map used when no CSV is given
const DEMO_MAP: &str = include_str!("../maps/demo.csv");

/// Longest run, in seconds of simulated time
const MAX_SECONDS: u32 = 90;

/// Keys held and for how many ticks. Played in a loop.
const SCRIPT: &[(u32, &[&str])] = &[
    (40, &["KeyD"]),
    (60, &["KeyS"]),
    (20, &["KeyS", "KeyE"]),
    (90, &[]),
    (50, &["ArrowRight"]),
    (1, &["Escape"]),
    (30, &[]),
    (1, &["Escape"]),
    (80, &["KeyW", "KeyA"]),
    (120, &["ArrowDown"]),
    (40, &["KeyE"]),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let map = match args.next() {
        Some(path) => TileMap::load_csv(path, &config.palette, config.tile_size)?,
        None => TileMap::parse_csv(DEMO_MAP, &config.palette, config.tile_size)?,
    };

    let dt = config.tick_duration();
    let max_ticks = MAX_SECONDS * config.tick_rate;
    let mapper = InputMapper::with_defaults();
    let mut actions = ActionState::new();
    let mut session = GameSession::new(config, map)?;

    let mut script = SCRIPT
        .iter()
        .flat_map(|&(ticks, keys)| std::iter::repeat_n(keys, ticks as usize))
        .cycle();

    let mut outcome = Outcome::Running;
    for _ in 0..max_ticks {
        let keys = script.next().unwrap_or(&[]);
        actions.update();
        actions.set_held(mapper.actions_for(keys.iter().copied()));

        outcome = session.tick(dt, &actions);
        for event in session.events().iter() {
            match event {
                GameEvent::EnemyStateChanged { enemy, from, to } => {
                    log::info!("Enemy {enemy}: {from} -> {to}");
                }
                GameEvent::PlayerCaught { enemy, lives_left } => {
                    log::warn!("Caught by enemy {enemy}, {lives_left} lives left");
                }
                other => log::debug!("{other:?}"),
            }
        }
        if outcome.is_terminal() {
            break;
        }
    }

    let player = session.player();
    log::info!(
        "Finished after {:.1}s: {outcome:?}, {} coins, {} lives, carrying {}",
        session.time().elapsed(),
        player.coins(),
        player.lives(),
        player.inventory()
    );
    for enemy in session.enemy_snapshots() {
        log::info!("Enemy {} {} at {}", enemy.id, enemy.state, enemy.position);
    }
    let stats = session.orders().statistics();
    log::info!("Orders: {stats:?}");

    Ok(())
}
