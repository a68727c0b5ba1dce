use crate::game::{Game, PlayerNumber, Position};
use crate::model::{Terrain, UnitModelId};
use std::collections::{BTreeMap, BTreeSet};

/// A player's usable production facilities for one planning pass. Removing
/// a location once a purchase is planned keeps the same building from being
/// booked twice.
#[derive(Clone, Debug)]
pub struct CommanderProductionInfo {
    pub player: PlayerNumber,
    pub available_models: BTreeSet<UnitModelId>,
    pub available_locations: BTreeMap<Position, Terrain>,
    pub facility_counts: BTreeMap<Terrain, u32>,
    pub model_terrains: BTreeMap<UnitModelId, BTreeSet<Terrain>>,
    shopping_lists: BTreeMap<Terrain, Vec<UnitModelId>>,
}

impl CommanderProductionInfo {
    /// Catalogs the player's empty facilities. With `include_friendly_occupied`
    /// a facility under one of the player's units that can still move counts
    /// as free.
    pub fn new(game: &Game, player: PlayerNumber, include_friendly_occupied: bool) -> CommanderProductionInfo {
        let mut info = CommanderProductionInfo {
            player,
            available_models: BTreeSet::new(),
            available_locations: BTreeMap::new(),
            facility_counts: BTreeMap::new(),
            model_terrains: BTreeMap::new(),
            shopping_lists: BTreeMap::new(),
        };

        for (position, tile) in game.tiles.owned_by_player(player) {
            let free = match tile.unit.and_then(|id| game.units.get_ref(&id)) {
                None => true,
                Some(blocker) => include_friendly_occupied && blocker.owner == player && !blocker.moved,
            };
            let models = game.shopping_list(player, tile.terrain);
            if !free || models.is_empty() {
                continue;
            }
            info.available_locations.insert(position, tile.terrain);
            *info.facility_counts.entry(tile.terrain).or_insert(0) += 1;
            for &model in &models {
                info.available_models.insert(model);
                info.model_terrains.entry(model).or_default().insert(tile.terrain);
            }
            info.shopping_lists.insert(tile.terrain, models);
        }
        info
    }

    /// Any free facility that produces `model`.
    pub fn location_to_build(&self, model: UnitModelId) -> Option<Position> {
        let terrains = self.model_terrains.get(&model)?;
        self.available_locations.iter()
            .find(|(_, terrain)| terrains.contains(terrain))
            .map(|(&position, _)| position)
    }

    /// Takes a facility out of the plan. Models no remaining facility can
    /// produce are no longer available.
    pub fn remove_build_location(&mut self, location: Position) {
        let Some(terrain) = self.available_locations.remove(&location) else {
            return;
        };
        let Some(count) = self.facility_counts.get_mut(&terrain) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }
        for model in self.shopping_lists.get(&terrain).into_iter().flatten() {
            if self.facilities_for(*model) == 0 {
                self.available_models.remove(model);
            }
        }
    }

    pub fn facilities_for(&self, model: UnitModelId) -> u32 {
        self.model_terrains.get(&model)
            .map(|terrains| terrains.iter().filter_map(|t| self.facility_counts.get(t)).sum())
            .unwrap_or(0)
    }
}
