use crate::game::*;
use crate::model::{ActionKind, TerrainFlag};
use enum_iterator::all;
use std::collections::{BTreeMap, BTreeSet, HashMap};

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Wait(..) => ActionKind::Wait,
            Action::Attack(..) => ActionKind::Attack,
            Action::Capture(..) => ActionKind::Capture,
            Action::Load(..) => ActionKind::Load,
            Action::Unload(..) => ActionKind::Unload,
            Action::Resupply(..) => ActionKind::Resupply,
        }
    }
    pub fn unit_id(&self) -> UnitId {
        match self {
            Action::Wait(u, _) | Action::Attack(u, _, _) | Action::Capture(u, _)
                | Action::Load(u, _) | Action::Unload(u, _, _, _) | Action::Resupply(u, _) => *u,
        }
    }
    pub fn path(&self) -> &Path {
        match self {
            Action::Wait(_, p) | Action::Attack(_, p, _) | Action::Capture(_, p)
                | Action::Load(_, p) | Action::Unload(_, p, _, _) | Action::Resupply(_, p) => p,
        }
    }
    pub fn with_path(&self, path: Path) -> Action {
        let mut action = self.clone();
        match &mut action {
            Action::Wait(_, p) | Action::Attack(_, p, _) | Action::Capture(_, p)
                | Action::Load(_, p) | Action::Unload(_, p, _, _) | Action::Resupply(_, p) => *p = path,
        }
        action
    }
}

impl Game {
    /// Cells `unit_id` could fire at from `from`: enemy units some weapon can
    /// damage, and empty destructible tiles some weapon can wear down.
    pub fn attack_targets(&self, unit_id: UnitId, from: Position, moved: bool) -> BTreeSet<Position> {
        let mut targets = BTreeSet::new();
        let Some(unit) = self.units.get_ref(&unit_id) else {
            return targets;
        };
        for (index, &weapon) in self.unit_model(unit).weapons.iter().enumerate() {
            let data = self.catalog.weapon(weapon);
            let max_range = self.weapon_max_range(unit, weapon);
            for target in self.tiles.locations_in_range(&from, data.min_range, max_range) {
                if Some(target) == unit.position || targets.contains(&target) {
                    continue;
                }
                if !self.weapon_reaches(unit, index, from.distance_to(&target), moved) {
                    continue;
                }
                let Some(tile) = self.tiles.get(&target) else {
                    continue;
                };
                let hits = match tile.unit.and_then(|id| self.units.get_ref(&id)) {
                    Some(other) => {
                        !self.are_allied(unit.owner, other.owner)
                            && self.catalog.base_damage(weapon, other.model) > 0
                    }
                    None => {
                        data.structure_damage.is_some_and(|d| d > 0)
                            && self.catalog.terrain(tile.terrain).has_flag(TerrainFlag::Destructible)
                    }
                };
                if hits {
                    targets.insert(target);
                }
            }
        }
        targets
    }

    fn can_capture_at(&self, unit: &Unit, tile: &Tile) -> bool {
        self.catalog.terrain(tile.terrain).has_flag(TerrainFlag::Capturable)
            && !tile.owner.is_some_and(|owner| self.are_allied(owner, unit.owner))
    }

    /// Legal actions for `unit_id` after following `path`, one set per kind.
    /// A destination held by another unit only offers boarding it, unless
    /// `ignore_resident` asks to evaluate the tile as if it were free.
    pub fn actions_at(&self, unit_id: UnitId, path: &Path, ignore_resident: bool) -> Vec<ActionSet> {
        let (Some(unit), Some(destination)) = (self.units.get_ref(&unit_id), path.end()) else {
            return Vec::new();
        };
        let Some(tile) = self.tiles.get(&destination) else {
            return Vec::new();
        };
        let model = self.unit_model(unit);
        let moved = !path.is_stationary();
        let mut sets = Vec::new();

        if let Some(resident) = tile.unit.filter(|&id| id != unit_id) {
            let boards = self.units.get_ref(&resident)
                .is_some_and(|transport| transport.can_carry(&self.catalog, unit));
            if boards {
                sets.push(ActionSet { kind: ActionKind::Load, actions: vec![Action::Load(unit_id, path.clone())] });
            }
            if !ignore_resident {
                return sets;
            }
        }

        for kind in all::<ActionKind>().filter(|&k| model.has_action(k)) {
            let actions = match kind {
                ActionKind::Attack => self.attack_targets(unit_id, destination, moved)
                    .into_iter()
                    .map(|target| Action::Attack(unit_id, path.clone(), target))
                    .collect(),
                ActionKind::Capture if self.can_capture_at(unit, tile) => {
                    vec![Action::Capture(unit_id, path.clone())]
                }
                ActionKind::Unload => self.unload_options(unit_id, destination)
                    .into_iter()
                    .map(|(cargo_id, drop)| Action::Unload(unit_id, path.clone(), cargo_id, drop))
                    .collect(),
                ActionKind::Resupply => {
                    let supplies = destination.adjacent()
                        .filter_map(|p| self.tiles.unit_at(&p))
                        .filter(|&id| id != unit_id)
                        .any(|id| self.units.get_ref(&id).is_some_and(|u| u.owner == unit.owner));
                    match supplies {
                        true => vec![Action::Resupply(unit_id, path.clone())],
                        false => Vec::new(),
                    }
                }
                ActionKind::Wait => vec![Action::Wait(unit_id, path.clone())],
                _ => Vec::new(),
            };
            if !actions.is_empty() {
                sets.push(ActionSet { kind, actions });
            }
        }
        sets
    }

    pub fn unload_options(&self, transport_id: UnitId, at: Position) -> Vec<(UnitId, Position)> {
        let Some(transport) = self.units.get_ref(&transport_id) else {
            return Vec::new();
        };
        let mut options = Vec::new();
        for &cargo_id in &transport.carried {
            let Some(cargo) = self.units.get_ref(&cargo_id) else {
                tracing::warn!(transport_id, cargo_id, "carried unit is missing");
                continue;
            };
            for drop in at.adjacent() {
                let Some(tile) = self.tiles.get(&drop) else {
                    continue;
                };
                if tile.is_empty_or(transport_id) && self.unit_move_cost(cargo, tile).is_some() {
                    options.push((cargo_id, drop));
                }
            }
        }
        options
    }

    /// Legal actions per reachable destination. Destinations held by a
    /// friendly unit are only listed when they offer something, see
    /// [`Game::actions_at`].
    pub fn available_actions(&self, unit_id: UnitId, include_occupied: bool) -> BTreeMap<Position, Vec<ActionSet>> {
        let Some(unit) = self.units.get_ref(&unit_id) else {
            return BTreeMap::new();
        };
        let Some(exploration) = self.explore(unit_id, Some(self.unit_move_budget(unit))) else {
            return BTreeMap::new();
        };
        exploration.costs.keys()
            .filter_map(|destination| {
                let path = exploration.path_to(destination)?;
                let sets = self.actions_at(unit_id, &path, include_occupied);
                (!sets.is_empty()).then_some((*destination, sets))
            })
            .collect()
    }

    pub fn available_actions_by_kind(&self, unit_id: UnitId, include_occupied: bool) -> HashMap<ActionKind, Vec<Action>> {
        let mut result: HashMap<ActionKind, Vec<Action>> = HashMap::new();
        for set in self.available_actions(unit_id, include_occupied).into_values().flatten() {
            result.entry(set.kind).or_default().extend(set.actions);
        }
        result
    }
}
