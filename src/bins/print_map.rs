use anyhow::Context;
use std::env::args;
use tactics::config::Rules;
use tactics::game::{Commander, Game, Map, Player};
use tactics::model::Catalog;

fn main() -> anyhow::Result<()> {
    let file_path = args()
        .nth(1) // first command line argument
        .context("First argument should be map file path")?;
    let map_json = std::fs::read_to_string(&file_path)
        .with_context(|| format!("Error reading {file_path}"))?;
    let map = Map::from_json(&map_json, &Catalog::standard())?;

    println!("{} ({}x{})", map.name, map.tiles.width(), map.tiles.height());
    let players: Vec<_> = map.player_numbers().into_iter()
        .map(|number| Player::new(number, number, Commander::new(&format!("Player {number}"))))
        .collect();
    let game = Game::new(map, players, Rules::default());
    println!("{}", game.ascii_representation());
    Ok(())
}
