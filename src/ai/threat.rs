use crate::game::{Game, Position, UnitId};
use crate::model::UnitModelId;
use std::collections::BTreeMap;

/// Cells `unit_id` could strike next turn and the worst damage it could deal
/// there. Movable weapons are measured from every destination, ignoring
/// occupants, since the owner is free to reposition first. Without a
/// `target` every reachable cell scores 1.
pub fn find_threat_power(game: &Game, unit_id: UnitId, target: Option<UnitModelId>) -> BTreeMap<Position, f64> {
    let mut threats = BTreeMap::new();
    let Some(unit) = game.units.get_ref(&unit_id) else {
        return threats;
    };
    let Some(origin) = unit.position else {
        return threats;
    };
    let destinations = game.find_possible_destinations(unit_id, true);

    for &weapon in game.unit_model(unit).weapons {
        let damage = match target {
            Some(model) => game.catalog.base_damage(weapon, model) as f64 * unit.hp_factor(),
            None => 1.0,
        };
        if damage <= 0.0 {
            continue;
        }
        let data = game.catalog.weapon(weapon);
        let max_range = game.weapon_max_range(unit, weapon);
        let origins: Vec<Position> = match data.fire_after_moving {
            true => destinations.iter().copied().collect(),
            false => vec![origin],
        };
        for from in origins {
            for cell in game.tiles.locations_in_range(&from, data.min_range, max_range) {
                let threat = threats.entry(cell).or_insert(damage);
                *threat = f64::max(*threat, damage);
            }
        }
    }

    tracing::trace!(unit_id, cells = threats.len(), "threat mapped");
    threats
}
