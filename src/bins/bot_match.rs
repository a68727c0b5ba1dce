use anyhow::Context;
use std::env::args;
use tactics::ai::bot::greedy_bot;
use tactics::config::Rules;
use tactics::game::{self, Commander, Game, GameState, Map, Player};
use tactics::model::Catalog;
use tactics::protocol::EventLog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Usage: bot_match <map.json> [rounds] [seed]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tactics=debug,{}=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = args().skip(1);
    let file_path = args.next().context("First argument should be map file path")?;
    let rounds: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0);

    let map_json = std::fs::read_to_string(&file_path)
        .with_context(|| format!("Error reading {file_path}"))?;
    let map = Map::from_json(&map_json, &Catalog::standard())?;
    let players: Vec<_> = map.player_numbers().into_iter()
        .map(|number| Player::new(number, number, Commander::new(&format!("Bot {number}"))))
        .collect();
    let rules = Rules { seed, ..Rules::default() };
    let mut game = Game::new(map, players, rules);

    let mut log = EventLog::new(seed);
    log.record(game::start(&mut game)?);
    while game.state == GameState::InProgress && game.round_count <= rounds {
        let events = greedy_bot(&mut game);
        if events.is_empty() {
            break;
        }
        log.record(events);
    }

    tracing::info!(rounds = game.round_count, winner = ?game.winner(), "match over");
    println!("{}", log.as_text()?);
    Ok(())
}
