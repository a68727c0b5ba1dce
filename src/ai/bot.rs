//! A computer player that takes the best immediate gain for each unit.

use crate::ai::*;
use crate::game::{self, AbilityFlag, Action, Event, Game, GameState, PlayerNumber, Position, UnitId};
use crate::model::{ActionKind, UnitModelId};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Plays the whole turn of the player in turn and returns what happened.
/// Units act in order of value, then free facilities are stocked and the
/// turn is ended.
pub fn greedy_bot(game: &mut Game) -> Vec<Event> {
    let mut events = Vec::new();
    let Some(player) = game.in_turn_number() else {
        return events;
    };
    if game.state != GameState::InProgress {
        return events;
    }

    let ability = game.commander(player)
        .and_then(|c| find_ability_with_flags(c, &[AbilityFlag::PhaseTurnStart]))
        .map(|a| a.id);
    if let Some(id) = ability {
        match game::activate_ability(game, id) {
            Ok(activated) => events.extend(activated),
            Err(error) => tracing::debug!(player, id, %error, "ability not activated"),
        }
    }

    let mut claimed = BTreeSet::new();
    for unit_id in units_by_value(game, player) {
        if game.state == GameState::Finished {
            return events;
        }
        let ready = game.units.get_ref(&unit_id).is_some_and(|u| !u.moved && u.position.is_some());
        if !ready {
            continue;
        }
        if let Some(action) = choose_action(game, unit_id, &mut claimed) {
            events.extend(game::execute(game, &action));
        }
    }
    if game.state == GameState::Finished {
        return events;
    }

    events.extend(buy_units(game, player));
    match game::end_turn(game) {
        Ok(ended) => events.extend(ended),
        Err(error) => tracing::warn!(player, %error, "bot could not end its turn"),
    }
    events
}

fn choose_action(game: &Game, unit_id: UnitId, claimed: &mut BTreeSet<Position>) -> Option<Action> {
    let mut by_kind = game.available_actions_by_kind(unit_id, false);
    let catalog = Arc::clone(&game.catalog);

    let best_attack = by_kind.remove(&ActionKind::Attack)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|action| {
            let score = score_attack_action(game, &action, value_exchange(&catalog), demolition_value)?;
            (score > 0.0).then_some((score, action))
        })
        .max_by(|(a, _), (b, _)| a.total_cmp(b));
    if let Some((score, action)) = best_attack {
        tracing::trace!(unit_id, score, "attacking");
        return Some(action);
    }

    let capture = by_kind.remove(&ActionKind::Capture)
        .unwrap_or_default()
        .into_iter()
        .filter(|action| action.path().end().is_some_and(|p| !claimed.contains(&p)))
        .min_by_key(|action| action.path().fuel_cost);
    if let Some(action) = capture {
        claimed.extend(action.path().end());
        return Some(action);
    }

    let unit = game.units.get_ref(&unit_id)?;
    let position = unit.position?;
    let goals = match game.unit_model(unit).has_action(ActionKind::Capture) {
        true => find_non_allied_properties(game, unit.owner),
        false => find_enemy_units(game, unit.owner),
    };
    let goal = goals.into_iter()
        .filter(|p| !claimed.contains(p))
        .min_by_key(|p| p.distance_to(&position));
    if let Some(goal) = goal {
        if let Some(action) = move_toward_location(game, unit_id, goal, &BTreeSet::new()) {
            claimed.insert(goal);
            return Some(action);
        }
    }

    Some(Action::Wait(unit_id, stationary_path(position)))
}

/// Spends funds on free facilities: infantry while there are more
/// properties to take than units able to take them, otherwise the most
/// expensive affordable model.
fn buy_units(game: &mut Game, player: PlayerNumber) -> Vec<Event> {
    let mut events = Vec::new();
    let mut info = CommanderProductionInfo::new(game, player, false);
    let targets = find_non_allied_properties(game, player).len();
    let mut capturers = game.units.owned_by_player(player)
        .filter(|(_, u)| game.unit_model(u).has_action(ActionKind::Capture))
        .count();

    loop {
        let funds = game.players.get(player).map(|p| p.funds).unwrap_or(0);
        let affordable = |model: &UnitModelId| game.catalog.unit_model(*model).price <= funds;
        let model = match capturers < targets {
            true => info.available_models.get(&UnitModelId::Infantry).filter(|m| affordable(m)).copied(),
            false => None,
        };
        let model = model.or_else(|| {
            info.available_models.iter()
                .filter(|m| affordable(m))
                .max_by_key(|m| game.catalog.unit_model(**m).price)
                .copied()
        });
        let Some(model) = model else {
            break;
        };
        let Some(location) = info.location_to_build(model) else {
            break;
        };
        info.remove_build_location(location);

        match game::build(game, location, model) {
            Ok(built) => {
                events.extend(built);
                if game.catalog.unit_model(model).has_action(ActionKind::Capture) {
                    capturers += 1;
                }
            }
            Err(error) => tracing::debug!(player, ?model, ?location, %error, "purchase refused"),
        }
    }
    events
}
