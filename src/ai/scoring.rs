use crate::game::{self, Action, BattleSummary, Game, TerrainStrike};
use crate::model::{self, Catalog, Terrain};

/// Rates an attack with caller-supplied scorers: `combat` for a unit target,
/// `demolition` for a structure. Outcomes are computed without touching
/// `game`. Anything other than an attack has no score.
pub fn score_attack_action<C, D>(game: &Game, action: &Action, combat: C, demolition: D) -> Option<f64>
where
    C: Fn(&BattleSummary) -> f64,
    D: Fn(Terrain, &TerrainStrike) -> f64,
{
    let Action::Attack(unit_id, path, target) = action else {
        return None;
    };
    let from = path.end()?;
    match game.tiles.unit_at(target) {
        Some(_) => game::simulate_battle(game, *unit_id, from, *target).map(|summary| combat(&summary)),
        None => {
            let strike = game.calculate_terrain_damage(*unit_id, from, *target)?;
            let terrain = game.tiles.get(target)?.terrain;
            Some(demolition(terrain, &strike))
        }
    }
}

/// Funds worth of enemy health removed minus funds worth of own health lost.
pub fn value_exchange(catalog: &Catalog) -> impl Fn(&BattleSummary) -> f64 + '_ {
    move |summary: &BattleSummary| {
        let worth = |model, loss: f64| catalog.unit_model(model).price as f64 * loss / model::UNIT_MAX_HEALTH;
        worth(summary.defender_model, summary.defender_health_loss())
            - worth(summary.attacker_model, summary.attacker_health_loss())
    }
}

/// Durability worn down, doubled when the structure falls.
pub fn demolition_value(_: Terrain, strike: &TerrainStrike) -> f64 {
    match strike.destroys() {
        true => 2.0 * strike.damage as f64,
        false => strike.damage as f64,
    }
}
