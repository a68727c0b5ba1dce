use crate::game::{Ability, AbilityFlag, Action, Commander, Game, Path, PlayerNumber, Position, Unit, UnitId};
use crate::model::{Catalog, TerrainFlag, UnitModelId};
use enum_iterator::all;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Capturable tiles that are unowned or held by an enemy.
pub fn find_non_allied_properties(game: &Game, player: PlayerNumber) -> Vec<Position> {
    game.tiles.iter_with_positions()
        .filter(|(_, tile)| game.catalog.terrain(tile.terrain).has_flag(TerrainFlag::Capturable))
        .filter(|(_, tile)| !tile.owner.is_some_and(|owner| game.are_allied(owner, player)))
        .map(|(position, _)| position)
        .collect()
}

pub fn find_enemy_units(game: &Game, player: PlayerNumber) -> Vec<Position> {
    game.tiles.iter_with_positions()
        .filter(|(_, tile)| {
            tile.unit
                .and_then(|id| game.units.get_ref(&id))
                .is_some_and(|unit| !game.are_allied(unit.owner, player))
        })
        .map(|(position, _)| position)
        .collect()
}

/// Enemy units on the map grouped by owner. Allied units are left out.
pub fn enemy_units_by_owner(game: &Game, player: PlayerNumber) -> BTreeMap<PlayerNumber, Vec<UnitId>> {
    let mut result: BTreeMap<PlayerNumber, Vec<UnitId>> = BTreeMap::new();
    for (&id, unit) in game.units.iter_with_ids() {
        if unit.position.is_some() && !game.are_allied(unit.owner, player) {
            result.entry(unit.owner).or_default().push(id);
        }
    }
    result
}

/// A wait action that brings `unit_id` closer to `destination`, routing
/// around obstacles. The unit heads for the free tile nearest to where its
/// budget runs out along the cheapest route. `None` when no route exists or
/// every reachable tile is excluded.
pub fn move_toward_location(
    game: &Game,
    unit_id: UnitId,
    destination: Position,
    exclude: &BTreeSet<Position>,
) -> Option<Action> {
    let route = game.find_shortest_path(unit_id, &destination, true);
    let waypoint = route.end()?;
    let choice = game.find_possible_destinations(unit_id, false)
        .into_iter()
        .filter(|p| !exclude.contains(p))
        .min_by_key(|p| p.distance_to(&waypoint))?;
    let path = game.find_shortest_path(unit_id, &choice, false);
    match path.is_empty() {
        true => None,
        false => Some(Action::Wait(unit_id, path)),
    }
}

/// Owned tiles where the unit gets repaired and resupplied.
pub fn find_repair_depots(game: &Game, unit_id: UnitId) -> Vec<Position> {
    let Some(unit) = game.units.get_ref(&unit_id) else {
        return Vec::new();
    };
    let class = game.unit_model(unit).class;
    game.tiles.owned_by_player(unit.owner)
        .filter(|(_, tile)| game.catalog.terrain(tile.terrain).repair_classes.contains(&class))
        .map(|(position, _)| position)
        .collect()
}

/// The most expensive ready ability carrying every one of `flags`.
pub fn find_ability_with_flags<'a>(commander: &'a Commander, flags: &[AbilityFlag]) -> Option<&'a Ability> {
    commander.ready_abilities()
        .filter(|ability| flags.iter().all(|flag| ability.flags.contains(flag)))
        .max_by_key(|ability| ability.cost)
}

/// Longest reach of any weapon that fires after moving, over every model
/// in the catalog.
pub fn find_max_strike_weapon_range(game: &Game) -> u32 {
    all::<UnitModelId>()
        .flat_map(|model| game.catalog.unit_model(model).weapons.iter())
        .map(|&weapon| game.catalog.weapon(weapon))
        .filter(|data| data.fire_after_moving)
        .map(|data| data.max_range)
        .max()
        .unwrap_or(0)
}

/// Whether a unit friendly to `player` is partway through capturing `position`.
pub fn is_capturing(game: &Game, player: PlayerNumber, position: Position) -> bool {
    game.tiles.unit_at(&position)
        .and_then(|id| game.units.get_ref(&id))
        .filter(|unit| game.are_allied(unit.owner, player))
        .and_then(|unit| unit.capture)
        .is_some_and(|capture| capture.target == position && capture.progress > 0)
}

/// Whether a player friendly to `player` can build at `position`.
pub fn is_friendly_production(game: &Game, player: PlayerNumber, position: Position) -> bool {
    let Some(tile) = game.tiles.get(&position) else {
        return false;
    };
    match tile.owner {
        Some(owner) if game.are_allied(owner, player) => !game.shopping_list(owner, tile.terrain).is_empty(),
        _ => false,
    }
}

/// Everything `unit_id` could attack this turn from any free destination.
/// Destructible terrain is included on request.
pub fn find_possible_targets(game: &Game, unit_id: UnitId, include_terrain: bool) -> BTreeSet<Position> {
    let Some(start) = game.unit_position(unit_id) else {
        return BTreeSet::new();
    };
    let mut targets = BTreeSet::new();
    for from in game.find_possible_destinations(unit_id, false) {
        targets.extend(
            game.attack_targets(unit_id, from, from != start)
                .into_iter()
                .filter(|target| include_terrain || game.tiles.unit_at(target).is_some()),
        );
    }
    targets.remove(&start);
    targets
}

/// Production tiles among `positions` held by `player` or an ally.
pub fn find_allied_industries(
    game: &Game,
    player: PlayerNumber,
    positions: impl IntoIterator<Item = Position>,
    ignore_own: bool,
) -> BTreeSet<Position> {
    positions.into_iter()
        .filter(|position| {
            let owner = game.tiles.get(position).and_then(|t| t.owner);
            !(ignore_own && owner == Some(player)) && is_friendly_production(game, player, *position)
        })
        .collect()
}

/// Orders units by price scaled with visible HP, most valuable first.
pub fn compare_unit_value(catalog: &Catalog, a: &Unit, b: &Unit) -> Ordering {
    b.value(catalog).total_cmp(&a.value(catalog))
}

/// The player's units on the map, most valuable first.
pub fn units_by_value(game: &Game, player: PlayerNumber) -> Vec<UnitId> {
    let mut units: Vec<(UnitId, &Unit)> = game.units.owned_by_player(player)
        .filter(|(_, unit)| unit.position.is_some())
        .map(|(&id, unit)| (id, unit))
        .collect();
    units.sort_by(|(_, a), (_, b)| compare_unit_value(&game.catalog, a, b));
    units.into_iter().map(|(id, _)| id).collect()
}

/// Path of a unit that stays where it is.
pub fn stationary_path(position: Position) -> Path {
    Path::new(vec![position], 0)
}

#[cfg(test)]
mod test {
    use crate::ai::*;
    use crate::game::{fixtures, Ability, AbilityFlag, Action, Capture, Commander, Game, Path, Position};
    use crate::model::UnitModelId;
    use std::collections::{BTreeMap, BTreeSet};

    fn front() -> Game {
        let mut game = fixtures::game(&["c.F..H", "......"], &[
            (UnitModelId::Infantry, 1, (1, 0)),
            (UnitModelId::Infantry, 2, (4, 0)),
            (UnitModelId::Tank, 2, (3, 1)),
        ]);
        game.tiles.get_mut(&Position(2, 0)).unwrap().owner = Some(1);
        game.tiles.get_mut(&Position(5, 0)).unwrap().owner = Some(2);
        game
    }

    #[test]
    fn map_queries_skip_allies() {
        let game = front();
        assert_eq!(find_non_allied_properties(&game, 1), vec![Position(0, 0), Position(5, 0)]);
        assert_eq!(find_enemy_units(&game, 1), vec![Position(4, 0), Position(3, 1)]);
        assert_eq!(enemy_units_by_owner(&game, 1), BTreeMap::from([(2, vec![1, 2])]));
        assert!(enemy_units_by_owner(&game, 2).get(&2).is_none());
        assert_eq!(find_repair_depots(&game, 0), vec![Position(2, 0)]);
    }

    #[test]
    fn production_belongs_to_friends() {
        let game = front();
        assert!(is_friendly_production(&game, 1, Position(2, 0)));
        assert!(!is_friendly_production(&game, 1, Position(5, 0)));
        assert!(!is_friendly_production(&game, 1, Position(0, 0)));

        let all = [Position(0, 0), Position(2, 0), Position(5, 0)];
        assert_eq!(find_allied_industries(&game, 1, all, false), BTreeSet::from([Position(2, 0)]));
        assert!(find_allied_industries(&game, 1, all, true).is_empty());
    }

    #[test]
    fn capture_progress_is_visible() {
        let mut game = front();
        assert!(!is_capturing(&game, 1, Position(1, 0)));
        game.units.get_mut(&0).unwrap().capture = Some(Capture { target: Position(1, 0), progress: 5 });
        assert!(is_capturing(&game, 1, Position(1, 0)));
        assert!(!is_capturing(&game, 2, Position(1, 0)));
    }

    #[test]
    fn valuable_units_come_first() {
        let mut game = front();
        assert_eq!(units_by_value(&game, 2), vec![2, 1]);
        game.units.get_mut(&2).unwrap().damage(9.0);
        assert_eq!(units_by_value(&game, 2), vec![1, 2]);
    }

    #[test]
    fn abilities_need_every_flag() {
        let mut commander = Commander::new("Red")
            .with_ability(Ability::new("a", "A", 3, &[AbilityFlag::PhaseTurnStart]))
            .with_ability(Ability::new("b", "B", 5, &[AbilityFlag::PhaseTurnStart, AbilityFlag::PhaseBuy]))
            .with_ability(Ability::new("c", "C", 9, &[AbilityFlag::PhaseBuy]));
        commander.add_energy(6);
        let id = |flags: &[AbilityFlag]| find_ability_with_flags(&commander, flags).map(|a| a.id);
        assert_eq!(id(&[AbilityFlag::PhaseTurnStart]), Some("b"));
        assert_eq!(id(&[AbilityFlag::PhaseBuy]), Some("b"));
        assert_eq!(id(&[AbilityFlag::PhaseTurnEnd]), None);
        commander.add_energy(4);
        assert_eq!(find_ability_with_flags(&commander, &[AbilityFlag::PhaseBuy]).map(|a| a.id), Some("c"));
    }

    #[test]
    fn moving_toward_far_goals() {
        let mut game = fixtures::game(&[".........."], &[(UnitModelId::Infantry, 1, (0, 0))]);
        let nowhere = BTreeSet::new();
        let step = Path::new(fixtures::path(&[(0, 0), (1, 0), (2, 0), (3, 0)]), 3);
        assert_eq!(move_toward_location(&game, 0, Position(9, 0), &nowhere), Some(Action::Wait(0, step)));

        let short = Path::new(fixtures::path(&[(0, 0), (1, 0), (2, 0)]), 2);
        let excluded = BTreeSet::from([Position(3, 0)]);
        assert_eq!(move_toward_location(&game, 0, Position(9, 0), &excluded), Some(Action::Wait(0, short.clone())));

        // A friend standing at the end of the route.
        game.units.insert(1, crate::game::Unit::new(&game.catalog, UnitModelId::Infantry, 1, Some(Position(3, 0))));
        game.tiles.get_mut(&Position(3, 0)).unwrap().unit = Some(1);
        assert_eq!(move_toward_location(&game, 0, Position(9, 0), &nowhere), Some(Action::Wait(0, short)));
    }

    #[test]
    fn unreachable_goals_give_no_move() {
        let game = fixtures::game(&["..~~.."], &[(UnitModelId::Infantry, 1, (0, 0))]);
        assert_eq!(move_toward_location(&game, 0, Position(5, 0), &BTreeSet::new()), None);
    }

    #[test]
    fn targets_from_every_destination() {
        let game = fixtures::game(&["..#.."], &[
            (UnitModelId::Artillery, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (3, 0)),
        ]);
        assert_eq!(find_possible_targets(&game, 0, false), BTreeSet::from([Position(3, 0)]));
        assert_eq!(find_possible_targets(&game, 0, true), BTreeSet::from([Position(2, 0), Position(3, 0)]));
        assert_eq!(find_max_strike_weapon_range(&game), 1);
    }
}
