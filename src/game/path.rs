use crate::game::*;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

impl Path {
    pub fn new(waypoints: Vec<Position>, fuel_cost: u32) -> Path {
        Path { waypoints, fuel_cost }
    }
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
    pub fn start(&self) -> Option<Position> {
        self.waypoints.first().copied()
    }
    pub fn end(&self) -> Option<Position> {
        self.waypoints.last().copied()
    }
    pub fn is_stationary(&self) -> bool {
        self.waypoints.len() == 1
    }
}

pub struct Exploration {
    pub start: Position,
    pub costs: BTreeMap<Position, u32>,
    previous: HashMap<Position, Position>,
}

impl Exploration {
    pub fn path_to(&self, destination: &Position) -> Option<Path> {
        let &fuel_cost = self.costs.get(destination)?;
        let mut waypoints = vec![*destination];
        let mut current = *destination;
        while current != self.start {
            current = *self.previous.get(&current)?;
            waypoints.push(current);
        }
        waypoints.reverse();
        Some(Path::new(waypoints, fuel_cost))
    }
}

impl Game {
    pub fn unit_move_cost(&self, unit: &Unit, tile: &Tile) -> Option<u32> {
        let model = self.unit_model(unit);
        let modifiers = self.modifiers(unit.owner);
        let weather = modifiers.weather(tile.weather);
        let base = self.catalog.move_cost(unit.model, tile.terrain, weather);
        modifiers.move_cost(unit.model, model.class, tile.terrain, base)
    }

    pub fn unit_move_budget(&self, unit: &Unit) -> u32 {
        let model = self.unit_model(unit);
        let power = self.modifiers(unit.owner).move_power(unit.model, model.class, model.move_power);
        power.min(unit.fuel)
    }

    fn blocks(&self, unit: &Unit, tile: &Tile) -> bool {
        tile.unit
            .and_then(|id| self.units.get_ref(&id))
            .is_some_and(|other| !self.are_allied(other.owner, unit.owner))
    }

    /// Dijkstra from the unit's tile. Enemy units block passage; `budget`
    /// bounds the accumulated cost when given.
    pub fn explore(&self, unit_id: UnitId, budget: Option<u32>) -> Option<Exploration> {
        let unit = self.units.get_ref(&unit_id)?;
        let start = unit.position?;
        let mut costs = BTreeMap::from([(start, 0)]);
        let mut previous = HashMap::new();
        let mut queue = BinaryHeap::from([Reverse((0, 0usize, start))]);
        let mut visit_order = 0;

        while let Some(Reverse((cost, _, position))) = queue.pop() {
            if costs.get(&position).is_some_and(|&known| known < cost) {
                continue;
            }
            for next in position.adjacent() {
                let Some(tile) = self.tiles.get(&next) else {
                    continue;
                };
                if self.blocks(unit, tile) {
                    continue;
                }
                let Some(step) = self.unit_move_cost(unit, tile) else {
                    continue;
                };
                let next_cost = cost + step;
                if budget.is_some_and(|b| next_cost > b) {
                    continue;
                }
                if costs.get(&next).is_none_or(|&known| next_cost < known) {
                    costs.insert(next, next_cost);
                    previous.insert(next, position);
                    visit_order += 1;
                    queue.push(Reverse((next_cost, visit_order, next)));
                }
            }
        }

        tracing::trace!(unit_id, reachable = costs.len(), "explored");
        Some(Exploration { start, costs, previous })
    }

    pub fn find_possible_destinations(&self, unit_id: UnitId, include_occupied: bool) -> BTreeSet<Position> {
        let Some(unit) = self.units.get_ref(&unit_id) else {
            return BTreeSet::new();
        };
        let Some(exploration) = self.explore(unit_id, Some(self.unit_move_budget(unit))) else {
            return BTreeSet::new();
        };
        exploration.costs.into_keys()
            .filter(|p| {
                include_occupied || self.tiles.get(p).is_some_and(|t| t.is_empty_or(unit_id))
            })
            .collect()
    }

    /// Cheapest path to `destination`. With `allow_partial` an out-of-reach
    /// destination yields the cheapest route toward it, cut where the unit's
    /// budget runs out. No route gives an empty path.
    pub fn find_shortest_path(&self, unit_id: UnitId, destination: &Position, allow_partial: bool) -> Path {
        let Some(unit) = self.units.get_ref(&unit_id) else {
            return Path::default();
        };
        let budget = self.unit_move_budget(unit);
        let within_budget = self.explore(unit_id, Some(budget))
            .and_then(|e| e.path_to(destination));
        if let Some(path) = within_budget {
            return path;
        }
        if !allow_partial {
            return Path::default();
        }

        let Some(full) = self.explore(unit_id, None).and_then(|e| e.path_to(destination)) else {
            return Path::default();
        };
        let mut waypoints = Vec::new();
        let mut fuel_cost = 0;
        for (i, position) in full.waypoints.into_iter().enumerate() {
            if i > 0 {
                let step = self.tiles.get(&position)
                    .and_then(|t| self.unit_move_cost(unit, t))
                    .unwrap_or(u32::MAX);
                if fuel_cost + step > budget {
                    break;
                }
                fuel_cost += step;
            }
            waypoints.push(position);
        }
        Path::new(waypoints, fuel_cost)
    }

    pub fn unit_can_move_path(&self, unit_id: UnitId, path: &[Position]) -> ActionResult<u32> {
        let unit = self.units.get_ref(&unit_id).ok_or(ActionError::UnitNotFound)?;
        let start = unit.position.ok_or(ActionError::InvalidPath)?;
        if path.first() != Some(&start) {
            return Err(ActionError::InvalidPath);
        }

        let mut cost = 0;
        for step in path.windows(2) {
            if step[0].distance_to(&step[1]) != 1 {
                return Err(ActionError::InvalidPath);
            }
            let tile = self.tiles.get(&step[1]).ok_or(ActionError::InvalidPath)?;
            if self.blocks(unit, tile) {
                return Err(ActionError::InvalidPath);
            }
            cost += self.unit_move_cost(unit, tile).ok_or(ActionError::InvalidPath)?;
        }

        if cost > self.unit_move_budget(unit) {
            return Err(ActionError::InvalidPath);
        }
        Ok(cost)
    }
}

#[cfg(test)]
mod test {
    use crate::game::fixtures::{self, path};
    use crate::game::*;
    use crate::model::{Terrain, UnitModelId, Weather};

    #[test]
    fn stationary_path_costs_nothing() {
        let game = fixtures::game(&["...", "..."], &[(UnitModelId::Infantry, 1, (0, 0))]);
        let p = game.find_shortest_path(0, &Position(0, 0), false);
        assert_eq!(p, Path::new(path(&[(0, 0)]), 0));
    }

    #[test]
    fn destinations_respect_budget_and_terrain() {
        let game = fixtures::game(&[
            ".....~",
            ".m...~",
            ".....~",
        ], &[(UnitModelId::Infantry, 1, (0, 0))]);
        let destinations = game.find_possible_destinations(0, false);
        assert!(destinations.contains(&Position(0, 0)));
        assert!(destinations.contains(&Position(3, 0)));
        assert!(destinations.contains(&Position(1, 1)));
        assert!(!destinations.contains(&Position(4, 0)));
        assert!(!destinations.contains(&Position(5, 0)));
        assert!(!destinations.contains(&Position(2, 2)));

        for destination in &destinations {
            let p = game.find_shortest_path(0, destination, false);
            assert_eq!(p.start(), Some(Position(0, 0)));
            assert_eq!(p.end(), Some(*destination));
            assert!(p.fuel_cost <= game.units.get_ref(&0).unwrap().fuel);
            assert_eq!(game.unit_can_move_path(0, &p.waypoints), Ok(p.fuel_cost));
        }
    }

    #[test]
    fn fuel_caps_the_budget() {
        let mut game = fixtures::game(&["......"], &[(UnitModelId::Tank, 1, (0, 0))]);
        game.units.get_mut(&0).unwrap().fuel = 2;
        let destinations = game.find_possible_destinations(0, false);
        assert_eq!(destinations.into_iter().collect::<Vec<_>>(),
                   path(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn occupied_tiles_need_include_occupied() {
        let game = fixtures::game(&["....."], &[
            (UnitModelId::Infantry, 1, (0, 0)),
            (UnitModelId::Infantry, 1, (1, 0)),
            (UnitModelId::Infantry, 2, (3, 0)),
        ]);
        let plain = game.find_possible_destinations(0, false);
        assert!(!plain.contains(&Position(1, 0)));
        assert!(plain.contains(&Position(2, 0)));
        assert!(!plain.contains(&Position(3, 0)));

        let occupied = game.find_possible_destinations(0, true);
        assert!(occupied.contains(&Position(1, 0)));
        // Enemies still block.
        assert!(!occupied.contains(&Position(3, 0)));
    }

    #[test]
    fn enemies_block_passage() {
        let game = fixtures::game(&[
            "...",
            "~.~",
            "...",
        ], &[
            (UnitModelId::Infantry, 1, (1, 0)),
            (UnitModelId::Infantry, 2, (1, 1)),
        ]);
        assert!(game.find_shortest_path(0, &Position(1, 2), false).is_empty());
        assert!(game.unit_can_move_path(0, &path(&[(1, 0), (1, 1), (1, 2)])).is_err());
    }

    #[test]
    fn partial_path_stops_at_budget() {
        let game = fixtures::game(&["........"], &[(UnitModelId::Infantry, 1, (0, 0))]);
        assert!(game.find_shortest_path(0, &Position(7, 0), false).is_empty());
        let p = game.find_shortest_path(0, &Position(7, 0), true);
        assert_eq!(p, Path::new(path(&[(0, 0), (1, 0), (2, 0), (3, 0)]), 3));
    }

    #[test]
    fn unreachable_even_partially_is_empty() {
        let game = fixtures::game(&["..~.."], &[(UnitModelId::Infantry, 1, (0, 0))]);
        assert!(game.find_shortest_path(0, &Position(4, 0), true).is_empty());
        assert!(game.find_shortest_path(9, &Position(1, 0), true).is_empty());
    }

    #[test]
    fn weather_and_modifiers_change_costs() {
        let mut game = fixtures::game(&["....."], &[(UnitModelId::Tank, 1, (0, 0))]);
        game.units.get_mut(&0).unwrap().fuel = 99;
        for tile in [Position(1, 0), Position(2, 0), Position(3, 0), Position(4, 0)] {
            game.tiles.get_mut(&tile).unwrap().weather = Weather::Rain;
        }
        assert_eq!(game.find_shortest_path(0, &Position(3, 0), false).fuel_cost, 6);
        assert!(game.find_shortest_path(0, &Position(4, 0), false).is_empty());

        game.players.get_mut(1).unwrap().commander.add_modifier(
            Modifier::IgnoreWeather { weather: Weather::Rain }, Lifetime::Permanent);
        assert_eq!(game.find_shortest_path(0, &Position(4, 0), false).fuel_cost, 4);

        game.players.get_mut(1).unwrap().commander.add_modifier(
            Modifier::MoveCost { terrain: Terrain::Plains, cost: 2, applies: Applies::All }, Lifetime::Permanent);
        assert_eq!(game.find_shortest_path(0, &Position(3, 0), false).fuel_cost, 6);
    }

    #[test]
    fn invalid_paths_are_rejected() {
        let game = fixtures::game(&["...", "..."], &[(UnitModelId::Infantry, 1, (0, 0))]);
        assert_eq!(game.unit_can_move_path(0, &[]), Err(ActionError::InvalidPath));
        assert_eq!(game.unit_can_move_path(0, &path(&[(1, 0)])), Err(ActionError::InvalidPath));
        assert_eq!(game.unit_can_move_path(0, &path(&[(0, 0), (1, 1)])), Err(ActionError::InvalidPath));
        assert_eq!(game.unit_can_move_path(0, &path(&[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1)])),
                   Err(ActionError::InvalidPath));
        assert_eq!(game.unit_can_move_path(0, &path(&[(0, 0), (1, 0), (1, 1)])), Ok(2));
    }
}
