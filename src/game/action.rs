use crate::game::*;
use crate::model::{self, Terrain, TerrainFlag, UnitModelId};

impl Game {
    pub fn unit_has_turn(&self, unit: &Unit) -> ActionResult<()> {
        if self.state != GameState::InProgress {
            return Err(ActionError::GameNotInProgress);
        }
        if unit.moved {
            return Err(ActionError::UnitAlreadyMoved);
        }
        if Some(unit.owner) != self.in_turn_number() {
            return Err(ActionError::OwnerNotInTurn);
        }
        Ok(())
    }
}

pub fn start(game: &mut Game) -> ActionResult<Vec<Event>> {
    game.set_state(GameState::InProgress).map_err(|_| ActionError::GameAlreadyStarted)?;
    game.round_count = 1;
    let in_turn_number = game.in_turn_number().ok_or(ActionError::InternalError)?;
    let mut events = Vec::new();
    start_turn(game, in_turn_number, &mut events)?;
    Ok(events)
}

fn start_turn(game: &mut Game, player_number: PlayerNumber, events: &mut Vec<Event>) -> ActionResult<()> {
    events.push(Event::StartTurn(player_number));
    game.turn_count += 1;

    let expired = game.players.get_mut(player_number)?.commander.modifiers.expire_turn();
    if !expired.is_empty() {
        tracing::trace!(player_number, expired = expired.len(), "turn modifiers expired");
    }

    game.tiles.advance_weather(game.rules.default_weather);

    // Generate player funds
    let catalog = game.catalog.clone();
    let income = game.tiles.owned_by_player(player_number)
        .filter(|(_, tile)| catalog.terrain(tile.terrain).has_flag(TerrainFlag::Income))
        .count() as u32 * game.rules.income_per_property;
    let player = game.players.get_mut(player_number)?;
    player.funds += income;
    events.push(Event::Funds(player_number, income));

    // Ready units, burning fuel after the first day
    let burns = game.round_count > 1;
    let unit_ids: Vec<UnitId> = game.units.owned_by_player(player_number).map(|(&id, _)| id).collect();
    for unit_id in &unit_ids {
        let unit = game.units.get_mut(unit_id)?;
        unit.moved = false;
        if burns && unit.position.is_some() {
            unit.fuel = unit.fuel.saturating_sub(catalog.unit_model(unit.model).idle_fuel_burn);
        }
    }

    // Repair and resupply on own property
    let serviced: Vec<(UnitId, u32)> = game.tiles.owned_by_player(player_number)
        .filter_map(|(_, tile)| {
            let unit_id = tile.unit?;
            let unit = game.units.get_ref(&unit_id)?;
            let model = catalog.unit_model(unit.model);
            let repairs = unit.owner == player_number
                && catalog.terrain(tile.terrain).repair_classes.contains(&model.class);
            repairs.then_some((unit_id, model.price / 10))
        })
        .collect();
    for (unit_id, price_per_hp) in serviced {
        let unit = game.units.get_mut(&unit_id)?;
        unit.resupply(&catalog);
        let missing = (model::UNIT_MAX_HEALTH as u32).saturating_sub(unit.hp());
        let wanted = missing.min(game.rules.repair_hp);
        let player = game.players.get_mut(player_number)?;
        let affordable = match price_per_hp {
            0 => wanted,
            price => player.funds / price,
        };
        let repaired = wanted.min(affordable);
        if repaired > 0 {
            player.funds -= repaired * price_per_hp;
            game.units.get_mut(&unit_id)?.repair(repaired);
            events.push(Event::UnitRepair(unit_id, repaired));
        }
    }

    Ok(())
}

pub fn end_turn(game: &mut Game) -> ActionResult<Vec<Event>> {
    let in_turn_number = game.in_turn_number().ok_or(ActionError::GameNotInProgress)?;
    let mut events = vec![Event::EndTurn(in_turn_number)];

    let unit_ids: Vec<UnitId> = game.units.owned_by_player(in_turn_number).map(|(&id, _)| id).collect();
    for unit_id in unit_ids {
        game.units.get_mut(&unit_id)?.moved = true;
    }

    let next_index = game.next_player_index().ok_or(ActionError::InternalError)?;
    if next_index <= game.in_turn_index {
        game.round_count += 1;
    }
    game.in_turn_index = next_index;
    let next_number = game.in_turn_number().ok_or(ActionError::InternalError)?;
    start_turn(game, next_number, &mut events)?;
    Ok(events)
}

pub fn build(game: &mut Game, position: Position, model: UnitModelId) -> ActionResult<Vec<Event>> {
    let player = game.in_turn_player().ok_or(ActionError::GameNotInProgress)?;
    let (player_number, funds) = (player.number, player.funds);
    let tile = game.tiles.get(&position).ok_or(ActionError::CannotBuild)?;

    if tile.owner != Some(player_number) || tile.unit.is_some() {
        return Err(ActionError::CannotBuild);
    }
    if !game.shopping_list(player_number, tile.terrain).contains(&model) {
        return Err(ActionError::CannotBuild);
    }
    let price = game.catalog.unit_model(model).price;
    if funds < price {
        return Err(ActionError::InsufficientFunds);
    }

    let unit_id = game.next_unit_id;
    game.next_unit_id += 1;
    let unit = Unit { moved: true, ..Unit::new(&game.catalog, model, player_number, Some(position)) };
    game.units.insert(unit_id, unit);
    game.tiles.get_mut(&position)?.unit = Some(unit_id);
    game.players.get_mut(player_number)?.funds -= price;

    Ok(vec![Event::Build(position, unit_id, model, price)])
}

/// Spends commander energy on a ready ability and registers its modifiers
/// until the player's next turn.
pub fn activate_ability(game: &mut Game, ability_id: &str) -> ActionResult<Vec<Event>> {
    let player_number = game.in_turn_number().ok_or(ActionError::GameNotInProgress)?;
    let commander = game.commander(player_number).ok_or(ActionError::InternalError)?;
    let ability = commander.ready_abilities()
        .find(|a| a.id == ability_id)
        .ok_or(ActionError::AbilityNotReady)?;
    let effect = game.abilities.get(ability.id).ok_or(ActionError::AbilityNotReady)?;
    let (cost, name) = (ability.cost, ability.name.clone());
    let modifiers = effect(commander, game);

    let commander = &mut game.players.get_mut(player_number)?.commander;
    commander.energy -= cost;
    for modifier in modifiers {
        commander.add_modifier(modifier, Lifetime::Turn);
    }
    Ok(vec![Event::AbilityActivated(player_number, name)])
}

pub fn perform(game: &mut Game, action: &Action) -> ActionResult<Vec<Event>> {
    let unit_id = action.unit_id();
    let unit = game.units.get_ref(&unit_id).ok_or(ActionError::UnitNotFound)?;
    game.unit_has_turn(unit)?;

    let fuel_cost = game.unit_can_move_path(unit_id, &action.path().waypoints)?;
    let action = action.with_path(Path::new(action.path().waypoints.clone(), fuel_cost));
    let available = game.actions_at(unit_id, action.path(), false);
    if !available.iter().any(|set| set.actions.contains(&action)) {
        return Err(ActionError::ActionNotAvailable);
    }

    let mut events = Vec::new();
    let moved = !action.path().is_stationary();
    move_unit(game, unit_id, action.path(), &mut events)?;

    match &action {
        Action::Wait(..) => events.push(Event::Wait(unit_id)),
        Action::Attack(_, _, target) => match game.tiles.unit_at(target) {
            Some(defender_id) => events.extend(resolve_combat(game, unit_id, defender_id, moved, true).events),
            None => events.extend(demolish(game, unit_id, *target)),
        },
        Action::Capture(..) => capture(game, unit_id, &mut events)?,
        Action::Load(..) => (),
        Action::Unload(_, _, cargo_id, drop) => unload(game, unit_id, *cargo_id, *drop, &mut events)?,
        Action::Resupply(..) => resupply(game, unit_id, &mut events)?,
    }

    if let Ok(unit) = game.units.get_mut(&unit_id) {
        unit.moved = true;
    }
    Ok(events)
}

/// Like [`perform`], but a rejected action produces no events.
pub fn execute(game: &mut Game, action: &Action) -> Vec<Event> {
    perform(game, action).unwrap_or_else(|error| {
        tracing::debug!(?action, %error, "action rejected");
        Vec::new()
    })
}

fn move_unit(game: &mut Game, unit_id: UnitId, path: &Path, events: &mut Vec<Event>) -> ActionResult<()> {
    if path.is_stationary() {
        return Ok(());
    }
    let destination = path.end().ok_or(ActionError::InvalidPath)?;
    let unit = game.units.get_mut(&unit_id)?;
    unit.fuel = unit.fuel.saturating_sub(path.fuel_cost);
    unit.capture = None;
    events.push(Event::Move(unit_id, path.waypoints.clone()));

    match game.tiles.unit_at(&destination).filter(|&id| id != unit_id) {
        Some(transport_id) => {
            if let Some(start) = game.units.get_mut(&unit_id)?.position.take() {
                game.tiles.get_mut(&start)?.unit = None;
            }
            game.units.get_mut(&transport_id)?.carried.push(unit_id);
            events.push(Event::Load(unit_id, transport_id));
        }
        None => game.relocate_unit(unit_id, destination)?,
    }
    Ok(())
}

fn capture(game: &mut Game, unit_id: UnitId, events: &mut Vec<Event>) -> ActionResult<()> {
    let threshold = game.rules.capture_threshold;
    let unit = game.units.get_mut(&unit_id)?;
    let position = unit.position.ok_or(ActionError::InternalError)?;
    let progress = match unit.capture {
        Some(capture) if capture.target == position => capture.progress + unit.hp(),
        _ => unit.hp(),
    };

    if progress < threshold {
        unit.capture = Some(Capture { target: position, progress });
        events.push(Event::Capture(unit_id, position, progress));
        return Ok(());
    }

    unit.capture = None;
    let owner = unit.owner;
    let tile = game.tiles.get_mut(&position)?;
    let previous_owner = tile.owner.replace(owner);
    let headquarters = game.catalog.terrain(tile.terrain).has_flag(TerrainFlag::Headquarters);
    events.push(Event::Captured(unit_id, position));

    if let (true, Some(loser)) = (headquarters, previous_owner) {
        defeat_player(game, loser, events);
    }
    Ok(())
}

fn unload(game: &mut Game, transport_id: UnitId, cargo_id: UnitId, drop: Position, events: &mut Vec<Event>) -> ActionResult<()> {
    game.units.get_mut(&transport_id)?.carried.retain(|&id| id != cargo_id);
    let cargo = game.units.get_mut(&cargo_id)?;
    cargo.position = Some(drop);
    cargo.moved = true;
    game.tiles.get_mut(&drop)?.unit = Some(cargo_id);
    events.push(Event::Unload(transport_id, cargo_id, drop));
    Ok(())
}

fn resupply(game: &mut Game, supplier_id: UnitId, events: &mut Vec<Event>) -> ActionResult<()> {
    let supplier = game.units.get_ref(&supplier_id).ok_or(ActionError::UnitNotFound)?;
    let (owner, position) = (supplier.owner, supplier.position.ok_or(ActionError::InternalError)?);
    let receivers: Vec<UnitId> = position.adjacent()
        .filter_map(|p| game.tiles.unit_at(&p))
        .filter(|id| game.units.get_ref(id).is_some_and(|u| u.owner == owner))
        .collect();

    let catalog = game.catalog.clone();
    for unit_id in receivers {
        game.units.get_mut(&unit_id)?.resupply(&catalog);
        events.push(Event::Resupply(supplier_id, unit_id));
    }
    Ok(())
}

/// Removes a unit and, recursively, everything it carries.
pub fn destroy_unit(game: &mut Game, unit_id: UnitId, events: &mut Vec<Event>) {
    let Ok(unit) = game.units.remove(unit_id) else {
        tracing::warn!(unit_id, "destroyed unit is already gone");
        return;
    };
    if let Some(tile) = unit.position.and_then(|p| game.tiles.get_mut(&p).ok()) {
        if tile.unit == Some(unit_id) {
            tile.unit = None;
        }
    }
    events.push(Event::UnitDie(unit_id));
    for cargo_id in unit.carried {
        destroy_unit(game, cargo_id, events);
    }
}

pub fn defeat_armies_without_units(game: &mut Game, players: &[PlayerNumber], events: &mut Vec<Event>) {
    for &player_number in players {
        let beaten = game.players.get(player_number).is_some_and(|p| !p.defeated)
            && game.units.owned_by_player(player_number).next().is_none();
        if beaten {
            defeat_player(game, player_number, events);
        }
    }
}

/// Neutralizes a player's properties, turning its headquarters into a city,
/// and removes its units. Ends the game when a single team remains.
pub fn defeat_player(game: &mut Game, player_number: PlayerNumber, events: &mut Vec<Event>) {
    match game.players.get_mut(player_number) {
        Ok(player) if !player.defeated => player.defeated = true,
        _ => return,
    }

    let catalog = game.catalog.clone();
    let properties: Vec<Position> = game.tiles.owned_by_player(player_number).map(|(p, _)| p).collect();
    for position in properties {
        if let Ok(tile) = game.tiles.get_mut(&position) {
            tile.owner = None;
            if catalog.terrain(tile.terrain).has_flag(TerrainFlag::Headquarters) {
                tile.terrain = Terrain::City;
            }
        }
    }

    let on_map: Vec<UnitId> = game.units.owned_by_player(player_number)
        .filter(|(_, u)| u.position.is_some())
        .map(|(&id, _)| id)
        .collect();
    for unit_id in on_map {
        destroy_unit(game, unit_id, events);
    }
    events.push(Event::ArmyDefeat(player_number));

    if game.state != GameState::InProgress {
        return;
    }
    if let Some(team) = game.winner() {
        events.push(Event::WinGame(team));
        if game.set_state(GameState::Finished).is_err() {
            tracing::warn!(team, "could not finish the game");
        }
    }
}

#[cfg(test)]
mod test {
    use crate::game::fixtures::{self, path};
    use crate::game::*;
    use crate::model::{Terrain, UnitModelId, Weapon, Weather};

    fn stay(at: (i32, i32)) -> Path {
        Path::new(path(&[at]), 0)
    }

    #[test]
    fn turns_rotate_between_players() {
        let mut game = fixtures::game(&["c.c"], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (2, 0)),
        ]);
        game.tiles.get_mut(&Position(0, 0)).unwrap().owner = Some(1);
        assert_eq!(start(&mut game).unwrap(), vec![Event::StartTurn(1), Event::Funds(1, 1000)]);
        assert_eq!(start(&mut game), Err(ActionError::GameAlreadyStarted));
        assert_eq!(game.in_turn_number(), Some(1));

        assert_eq!(end_turn(&mut game).unwrap(), vec![
            Event::EndTurn(1),
            Event::StartTurn(2),
            Event::Funds(2, 0),
        ]);
        assert_eq!(game.in_turn_number(), Some(2));
        end_turn(&mut game).unwrap();
        assert_eq!((game.in_turn_number(), game.round_count), (Some(1), 2));
        assert_eq!(game.players.get(1).unwrap().funds, 2000);
    }

    #[test]
    fn actions_need_the_turn() {
        let mut game = fixtures::started(&["....."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (4, 0)),
        ]);
        let enemy_wait = Action::Wait(1, stay((4, 0)));
        assert_eq!(perform(&mut game, &enemy_wait), Err(ActionError::OwnerNotInTurn));
        assert!(execute(&mut game, &enemy_wait).is_empty());

        let too_far = Action::Wait(0, Path::new(path(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 0)]), 0));
        assert_eq!(perform(&mut game, &too_far), Err(ActionError::InvalidPath));
        let capture_plains = Action::Capture(0, stay((0, 0)));
        assert_eq!(perform(&mut game, &capture_plains), Err(ActionError::ActionNotAvailable));

        let wait = Action::Wait(0, Path::new(path(&[(0, 0), (1, 0)]), 0));
        assert_eq!(perform(&mut game, &wait).unwrap(), vec![
            Event::Move(0, path(&[(0, 0), (1, 0)])),
            Event::Wait(0),
        ]);
        assert_eq!(game.tiles.unit_at(&Position(1, 0)), Some(0));
        assert_eq!(game.tiles.unit_at(&Position(0, 0)), None);
        assert_eq!(game.units.get_ref(&0).unwrap().fuel, 98);
        assert_eq!(perform(&mut game, &Action::Wait(0, stay((1, 0)))), Err(ActionError::UnitAlreadyMoved));
    }

    #[test]
    fn capture_takes_two_full_strength_turns() {
        let mut game = fixtures::started(&["c...."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (4, 0)),
        ]);
        let capture = Action::Capture(0, stay((0, 0)));
        assert_eq!(perform(&mut game, &capture).unwrap(), vec![Event::Capture(0, Position(0, 0), 10)]);
        end_turn(&mut game).unwrap();
        end_turn(&mut game).unwrap();
        assert_eq!(perform(&mut game, &capture).unwrap(), vec![Event::Captured(0, Position(0, 0))]);
        assert_eq!(game.tiles.get(&Position(0, 0)).unwrap().owner, Some(1));
        assert_eq!(game.units.get_ref(&0).unwrap().capture, None);
    }

    #[test]
    fn leaving_resets_capture_progress() {
        let mut game = fixtures::started(&["c...."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (4, 0)),
        ]);
        perform(&mut game, &Action::Capture(0, stay((0, 0)))).unwrap();
        end_turn(&mut game).unwrap();
        end_turn(&mut game).unwrap();
        perform(&mut game, &Action::Wait(0, Path::new(path(&[(0, 0), (1, 0)]), 1))).unwrap();
        assert_eq!(game.units.get_ref(&0).unwrap().capture, None);
        end_turn(&mut game).unwrap();
        end_turn(&mut game).unwrap();
        let back = Action::Capture(0, Path::new(path(&[(1, 0), (0, 0)]), 1));
        assert_eq!(perform(&mut game, &back).unwrap(), vec![
            Event::Move(0, path(&[(1, 0), (0, 0)])),
            Event::Capture(0, Position(0, 0), 10),
        ]);
    }

    #[test]
    fn capturing_headquarters_wins() {
        let mut game = fixtures::game(&["H.c"], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (2, 0)),
        ]);
        game.tiles.get_mut(&Position(0, 0)).unwrap().owner = Some(2);
        game.tiles.get_mut(&Position(2, 0)).unwrap().owner = Some(2);
        game.units.get_mut(&0).unwrap().capture = Some(Capture { target: Position(0, 0), progress: 10 });
        start(&mut game).unwrap();

        let events = perform(&mut game, &Action::Capture(0, stay((0, 0)))).unwrap();
        assert_eq!(events, vec![
            Event::Captured(0, Position(0, 0)),
            Event::UnitDie(1),
            Event::ArmyDefeat(2),
            Event::WinGame(1),
        ]);
        assert_eq!(game.state, GameState::Finished);
        assert_eq!(game.tiles.get(&Position(0, 0)).unwrap().owner, Some(1));
        assert_eq!(game.tiles.get(&Position(2, 0)).unwrap().owner, None);
    }

    #[test]
    fn last_unit_lost_defeats_the_army() {
        let mut game = fixtures::game(&["...H"], &[
            (UnitModelId::Mech, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (2, 0)),
        ]);
        game.tiles.get_mut(&Position(3, 0)).unwrap().owner = Some(2);
        game.units.get_mut(&1).unwrap().damage(7.0);
        start(&mut game).unwrap();

        let attack = Action::Attack(0, Path::new(path(&[(0, 0), (1, 0)]), 1), Position(2, 0));
        assert_eq!(perform(&mut game, &attack).unwrap(), vec![
            Event::Move(0, path(&[(0, 0), (1, 0)])),
            Event::Fire(0, Weapon::MechGun),
            Event::Attack(0, 1, 6.3),
            Event::UnitDie(1),
            Event::ArmyDefeat(2),
            Event::WinGame(1),
        ]);
        let hq = game.tiles.get(&Position(3, 0)).unwrap();
        assert_eq!((hq.terrain, hq.owner), (Terrain::City, None));
        assert!(game.players.get(2).unwrap().defeated);
    }

    #[test]
    fn transports_carry_and_drop() {
        let mut game = fixtures::started(&[".....", "....."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Apc, 1, (2, 0)),
            (UnitModelId::Infantry, 2, (4, 1)),
        ]);
        let board = Action::Load(0, Path::new(path(&[(0, 0), (1, 0), (2, 0)]), 2));
        assert_eq!(perform(&mut game, &board).unwrap(), vec![
            Event::Move(0, path(&[(0, 0), (1, 0), (2, 0)])),
            Event::Load(0, 1),
        ]);
        assert_eq!(game.units.get_ref(&0).unwrap().position, None);
        assert_eq!(game.units.get_ref(&1).unwrap().carried, vec![0]);
        assert_eq!(game.tiles.unit_at(&Position(2, 0)), Some(1));
        assert_eq!(game.tiles.unit_at(&Position(0, 0)), None);

        let drop = Action::Unload(1, Path::new(path(&[(2, 0), (3, 0)]), 1), 0, Position(3, 1));
        assert_eq!(perform(&mut game, &drop).unwrap(), vec![
            Event::Move(1, path(&[(2, 0), (3, 0)])),
            Event::Unload(1, 0, Position(3, 1)),
        ]);
        assert_eq!(game.units.get_ref(&0).unwrap().position, Some(Position(3, 1)));
        assert_eq!(game.tiles.unit_at(&Position(3, 1)), Some(0));
        assert!(game.units.get_ref(&1).unwrap().carried.is_empty());
    }

    #[test]
    fn cargo_dies_with_its_transport() {
        let mut game = fixtures::started(&["...."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Apc, 1, (1, 0)),
            (UnitModelId::Infantry, 2, (3, 0)),
        ]);
        perform(&mut game, &Action::Load(0, Path::new(path(&[(0, 0), (1, 0)]), 1))).unwrap();
        let mut events = Vec::new();
        destroy_unit(&mut game, 1, &mut events);
        assert_eq!(events, vec![Event::UnitDie(1), Event::UnitDie(0)]);
        assert!(game.units.owned_by_player(1).next().is_none());
        assert_eq!(game.tiles.unit_at(&Position(1, 0)), None);
    }

    #[test]
    fn supply_units_refill_neighbours() {
        let mut game = fixtures::started(&["...."], &[
            (UnitModelId::Apc, 1, (0, 0)),
            (UnitModelId::Tank, 1, (1, 0)),
            (UnitModelId::Infantry, 2, (3, 0)),
        ]);
        let tank = game.units.get_mut(&1).unwrap();
        tank.fuel = 3;
        tank.ammo = vec![Some(0), None];
        assert_eq!(perform(&mut game, &Action::Resupply(0, stay((0, 0)))).unwrap(),
                   vec![Event::Resupply(0, 1)]);
        let tank = game.units.get_ref(&1).unwrap();
        assert_eq!((tank.fuel, tank.ammo.clone()), (70, vec![Some(9), None]));
    }

    #[test]
    fn building_spends_funds() {
        let mut game = fixtures::game(&["F.F"], &[(UnitModelId::Infantry, 2, (1, 0))]);
        game.tiles.get_mut(&Position(0, 0)).unwrap().owner = Some(1);
        start(&mut game).unwrap();
        assert_eq!(game.players.get(1).unwrap().funds, 1000);

        assert_eq!(build(&mut game, Position(2, 0), UnitModelId::Infantry), Err(ActionError::CannotBuild));
        assert_eq!(build(&mut game, Position(0, 0), UnitModelId::Fighter), Err(ActionError::CannotBuild));
        assert_eq!(build(&mut game, Position(0, 0), UnitModelId::Tank), Err(ActionError::InsufficientFunds));
        assert_eq!(build(&mut game, Position(0, 0), UnitModelId::Infantry).unwrap(),
                   vec![Event::Build(Position(0, 0), 1, UnitModelId::Infantry, 1000)]);
        assert_eq!(game.players.get(1).unwrap().funds, 0);
        assert_eq!(game.tiles.unit_at(&Position(0, 0)), Some(1));
        assert!(game.units.get_ref(&1).unwrap().moved);
        assert_eq!(build(&mut game, Position(0, 0), UnitModelId::Infantry), Err(ActionError::CannotBuild));
    }

    #[test]
    fn turn_start_repairs_on_property() {
        let mut game = fixtures::game(&["c..."], &[
            (UnitModelId::Tank, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (3, 0)),
        ]);
        game.tiles.get_mut(&Position(0, 0)).unwrap().owner = Some(1);
        let tank = game.units.get_mut(&0).unwrap();
        tank.damage(4.5);
        tank.fuel = 10;
        let events = start(&mut game).unwrap();
        assert_eq!(events, vec![Event::StartTurn(1), Event::Funds(1, 1000), Event::UnitRepair(0, 1)]);
        let tank = game.units.get_ref(&0).unwrap();
        assert_eq!((tank.health, tank.fuel), (7.0, 70));
        assert_eq!(game.players.get(1).unwrap().funds, 300);
    }

    #[test]
    fn abilities_last_until_next_turn() {
        let mut game = fixtures::game(&["...", "..."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (2, 1)),
        ]);
        let commander = &mut game.players.get_mut(1).unwrap().commander;
        *commander = Commander::new("Red")
            .with_ability(Ability::new("rally", "Rally", 2, &[AbilityFlag::PhaseTurnStart]));
        commander.add_energy(3);
        start(&mut game).unwrap();

        assert_eq!(activate_ability(&mut game, "lucky_star"), Err(ActionError::AbilityNotReady));
        assert_eq!(activate_ability(&mut game, "rally").unwrap(),
                   vec![Event::AbilityActivated(1, "Rally".into())]);
        assert_eq!(activate_ability(&mut game, "rally"), Err(ActionError::AbilityNotReady));
        assert_eq!(game.commander(1).unwrap().energy, 1);
        assert_eq!(game.unit_move_budget(game.units.get_ref(&0).unwrap()), 4);

        end_turn(&mut game).unwrap();
        assert_eq!(game.modifiers(1).len(), 1);
        end_turn(&mut game).unwrap();
        assert!(game.modifiers(1).is_empty());
    }

    #[test]
    fn weather_follows_the_forecast() {
        let mut game = fixtures::game(&[".."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 2, (1, 0)),
        ]);
        game.tiles.get_mut(&Position(1, 0)).unwrap().set_forecast(Weather::Snow, 1);
        start(&mut game).unwrap();
        assert_eq!(game.tiles.get(&Position(1, 0)).unwrap().weather, Weather::Snow);
        end_turn(&mut game).unwrap();
        assert_eq!(game.tiles.get(&Position(1, 0)).unwrap().weather, Weather::Clear);
    }
}
