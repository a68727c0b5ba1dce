use crate::config::Rules;
use crate::game::*;
use crate::model::*;
use std::collections::BTreeSet;
use std::sync::Arc;

impl Position {
    pub fn distance_to(&self, &Position(x, y): &Position) -> u32 {
        let &Position(sx, sy) = self;
        (sx - x).unsigned_abs() + (sy - y).unsigned_abs()
    }
    pub fn adjacent(&self) -> impl Iterator<Item = Self> {
        let &Position(x, y) = self;
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .map(move |(dx, dy)| Position(x + dx, y + dy))
    }
}

impl From<&(i32, i32)> for Position {
    fn from(&(x, y): &(i32, i32)) -> Self {
        Position(x, y)
    }
}

impl From<GameUpdateError> for ActionError {
    fn from(_: GameUpdateError) -> Self {
        Self::InternalError
    }
}

impl Tiles {
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> GameUpdateResult<Tiles> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return Err(GameUpdateError::InvalidPosition);
        }
        let height = rows.len() as i32;
        let cells = rows.into_iter().flatten().collect();
        Ok(Tiles { width: width as i32, height, cells })
    }
    pub fn width(&self) -> i32 {
        self.width
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn rect(&self) -> Option<Rect> {
        if self.cells.is_empty() {
            None
        } else {
            Some((0, 0, self.width - 1, self.height - 1))
        }
    }
    pub fn is_valid_location(&self, &Position(x, y): &Position) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
    fn index(&self, position: &Position) -> Option<usize> {
        let &Position(x, y) = position;
        self.is_valid_location(position).then(|| (x + y * self.width) as usize)
    }
    pub fn get(&self, position: &Position) -> Option<&Tile> {
        self.index(position).map(|i| &self.cells[i])
    }
    pub fn get_mut(&mut self, position: &Position) -> GameUpdateResult<&mut Tile> {
        let index = self.index(position).ok_or(GameUpdateError::InvalidPosition)?;
        Ok(&mut self.cells[index])
    }
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter()
    }
    pub fn iter_with_positions(&self) -> impl Iterator<Item = (Position, &Tile)> {
        let width = self.width;
        self.cells.iter().enumerate()
            .map(move |(i, t)| (Position(i as i32 % width, i as i32 / width), t))
    }
    pub fn owned_by_player(&self, player_number: PlayerNumber) -> impl Iterator<Item = (Position, &Tile)> {
        self.iter_with_positions()
            .filter(move |(_, t)| t.owner == Some(player_number))
    }
    pub fn unit_at(&self, position: &Position) -> Option<UnitId> {
        self.get(position).and_then(|t| t.unit)
    }
    /// Cells whose distance from `origin` lies in `min..=max`.
    pub fn locations_in_range(&self, origin: &Position, min: u32, max: u32) -> Vec<Position> {
        let &Position(ox, oy) = origin;
        let reach = max as i32;
        let mut result = Vec::new();
        for y in (oy - reach)..=(oy + reach) {
            for x in (ox - reach)..=(ox + reach) {
                let position = Position(x, y);
                let distance = origin.distance_to(&position);
                if distance >= min && distance <= max && self.is_valid_location(&position) {
                    result.push(position);
                }
            }
        }
        result
    }
    pub fn advance_weather(&mut self, default: Weather) {
        self.cells.iter_mut().for_each(|t| t.advance_weather(default));
    }
}

impl Units {
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.0.values()
    }
    pub fn iter_ids(&self) -> impl Iterator<Item = &UnitId> {
        self.0.keys()
    }
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (&UnitId, &Unit)> {
        self.0.iter()
    }
    pub fn get_ref(&self, id: &UnitId) -> Option<&Unit> {
        self.0.get(id)
    }
    pub fn get_mut(&mut self, id: &UnitId) -> GameUpdateResult<&mut Unit> {
        self.0.get_mut(id).ok_or(GameUpdateError::InvalidUnit)
    }
    pub fn contains(&self, id: &UnitId) -> bool {
        self.0.contains_key(id)
    }
    pub fn owned_by_player(&self, player_number: PlayerNumber) -> impl Iterator<Item = (&UnitId, &Unit)> {
        self.0.iter().filter(move |(_, u)| u.owner == player_number)
    }
    pub fn insert(&mut self, id: UnitId, unit: Unit) {
        self.0.insert(id, unit);
    }
    pub fn remove(&mut self, unit_id: UnitId) -> GameUpdateResult<Unit> {
        self.0.remove(&unit_id).ok_or(GameUpdateError::InvalidUnit)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Players {
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.0.iter()
    }
    pub fn get(&self, player_number: PlayerNumber) -> Option<&Player> {
        self.0.iter().find(|p| p.number == player_number)
    }
    pub fn get_mut(&mut self, player_number: PlayerNumber) -> GameUpdateResult<&mut Player> {
        self.0.iter_mut()
            .find(|p| p.number == player_number)
            .ok_or(GameUpdateError::InvalidPlayer)
    }
    pub fn by_index(&self, index: usize) -> Option<&Player> {
        self.0.get(index)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Player {
    pub fn new(number: PlayerNumber, team: TeamId, commander: Commander) -> Player {
        Player { number, team, funds: 0, defeated: false, commander }
    }
}

static NO_MODIFIERS: ModifierPipeline = ModifierPipeline::new();

impl Game {
    pub fn new(map: Map, players: Vec<Player>, rules: Rules) -> Game {
        Game::with_tables(map, players, rules, Arc::new(Catalog::standard()), Arc::new(AbilityRegistry::standard()))
    }

    pub fn with_tables(
        map: Map,
        players: Vec<Player>,
        rules: Rules,
        catalog: Arc<Catalog>,
        abilities: Arc<AbilityRegistry>,
    ) -> Game {
        let Map { tiles, units, funds, .. } = map;
        let mut tiles = tiles;
        for (&id, unit) in units.iter_with_ids() {
            let Some(position) = unit.position else {
                continue;
            };
            if let Ok(tile) = tiles.get_mut(&position) {
                tile.unit = Some(id);
            }
        }
        let players = players.into_iter().map(|p| Player { funds, ..p }).collect();
        let next_unit_id = units.iter_ids().max().map(|id| id + 1).unwrap_or(0);
        let rng = fastrand::Rng::with_seed(rules.seed);

        Game {
            state: GameState::Pregame,
            catalog,
            abilities,
            rules,
            tiles,
            units,
            players: Players(players),
            in_turn_index: 0,
            round_count: 0,
            turn_count: 0,
            next_unit_id,
            rng,
        }
    }

    pub fn set_state(&mut self, state: GameState) -> GameUpdateResult<()> {
        let valid = matches!(
            (self.state, state),
            (GameState::Pregame, GameState::InProgress) | (GameState::InProgress, GameState::Finished)
        );
        if !valid {
            return Err(GameUpdateError::InvalidState);
        }
        self.state = state;
        Ok(())
    }

    pub fn ascii_representation(&self) -> String {
        let mut rows = Vec::new();
        for y in 0..self.tiles.height() {
            let row: String = (0..self.tiles.width())
                .filter_map(|x| self.tiles.get(&Position(x, y)))
                .map(|tile| {
                    let owner = tile.unit.and_then(|id| self.units.get_ref(&id)).map(|u| u.owner);
                    match owner.and_then(|o| char::from_digit(o, 36)) {
                        Some(c) => c,
                        None => self.catalog.terrain(tile.terrain).symbol,
                    }
                })
                .collect();
            rows.push(row);
        }

        let legend: Vec<String> = self.units.iter_with_ids()
            .filter_map(|(id, u)| {
                let Position(x, y) = u.position?;
                Some(format!("{} {} ({}, {}) p{} {}hp",
                             id, self.catalog.unit_model(u.model).name, x, y, u.owner, u.hp()))
            })
            .collect();

        rows.extend(legend);
        rows.join("\n")
    }

    // Selectors

    pub fn in_turn_number(&self) -> Option<PlayerNumber> {
        match self.state {
            GameState::InProgress => self.players.by_index(self.in_turn_index).map(|p| p.number),
            _ => None,
        }
    }
    pub fn in_turn_player(&self) -> Option<&Player> {
        self.players.get(self.in_turn_number()?)
    }
    pub fn commander(&self, player_number: PlayerNumber) -> Option<&Commander> {
        self.players.get(player_number).map(|p| &p.commander)
    }
    pub fn modifiers(&self, player_number: PlayerNumber) -> &ModifierPipeline {
        self.commander(player_number)
            .map(|c| &c.modifiers)
            .unwrap_or(&NO_MODIFIERS)
    }
    pub fn team_of(&self, player_number: PlayerNumber) -> Option<TeamId> {
        self.players.get(player_number).map(|p| p.team)
    }
    pub fn are_allied(&self, a: PlayerNumber, b: PlayerNumber) -> bool {
        a == b || matches!((self.team_of(a), self.team_of(b)), (Some(x), Some(y)) if x == y)
    }
    pub fn unit_model(&self, unit: &Unit) -> &UnitModel<'static> {
        self.catalog.unit_model(unit.model)
    }
    pub fn unit_position(&self, unit_id: UnitId) -> Option<Position> {
        self.units.get_ref(&unit_id)?.position
    }

    pub fn shopping_list(&self, player_number: PlayerNumber, terrain: Terrain) -> Vec<UnitModelId> {
        let base = self.catalog.buildable_on(terrain);
        self.modifiers(player_number).shopping_list(terrain, base)
    }

    pub fn next_player_index(&self) -> Option<usize> {
        let count = self.players.len();
        (1..=count)
            .map(|offset| (self.in_turn_index + offset) % count)
            .find(|&i| self.players.by_index(i).is_some_and(|p| !p.defeated))
    }
    // Mutators

    pub fn relocate_unit(&mut self, unit_id: UnitId, to: Position) -> GameUpdateResult<()> {
        if !self.tiles.get(&to).is_some_and(|t| t.is_empty_or(unit_id)) {
            return Err(GameUpdateError::InvalidPosition);
        }
        let unit = self.units.get_mut(&unit_id)?;
        let from = unit.position.replace(to);
        if let Some(from) = from {
            if let Ok(tile) = self.tiles.get_mut(&from) {
                tile.unit = None;
            }
        }
        self.tiles.get_mut(&to)?.unit = Some(unit_id);
        Ok(())
    }

    pub fn winner(&self) -> Option<TeamId> {
        let teams: BTreeSet<TeamId> = self.players.iter()
            .filter(|p| !p.defeated)
            .map(|p| p.team)
            .collect();
        match teams.len() {
            1 => teams.into_iter().next(),
            _ => None,
        }
    }
}
