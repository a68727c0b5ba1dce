use crate::game::*;
use crate::model::{Catalog, UnitModelId};
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map parse error")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown terrain symbol {0:?}")]
    UnknownTerrain(char),
    #[error("Map rows differ in length")]
    RaggedRows,
    #[error("Position ({0}, {1}) is outside the map")]
    OutsideMap(i32, i32),
    #[error("Two units at ({0}, {1})")]
    Overlap(i32, i32),
}

impl Map {
    pub fn from_json(data: &str, catalog: &Catalog) -> Result<Map, MapError> {
        let map_data: JsonMap = serde_json::from_str(data)?;
        map_data.into_map(catalog)
    }
    pub fn player_numbers(&self) -> Vec<PlayerNumber> {
        let tile_owners = self.tiles.iter().filter_map(|t| t.owner);
        let unit_owners = self.units.iter().map(|u| u.owner);
        tile_owners.chain(unit_owners).collect::<BTreeSet<_>>().into_iter().collect()
    }
}

#[derive(Serialize, Deserialize)]
struct JsonMap {
    name: String,
    #[serde(default)]
    funds: u32,
    /// One string of terrain symbols per row.
    terrain: Vec<String>,
    #[serde(default)]
    owners: Vec<JsonOwner>,
    #[serde(default)]
    units: Vec<JsonUnit>,
}

#[derive(Serialize, Deserialize)]
struct JsonOwner {
    x: i32,
    y: i32,
    owner: PlayerNumber,
}

#[derive(Serialize, Deserialize)]
struct JsonUnit {
    x: i32,
    y: i32,
    #[serde(rename = "type")]
    unit_type: UnitModelId,
    owner: PlayerNumber,
}

impl JsonMap {
    fn into_map(self, catalog: &Catalog) -> Result<Map, MapError> {
        let rows = self.terrain.iter()
            .map(|row| row.chars()
                 .map(|c| catalog.terrain_from_symbol(c).map(Tile::new).ok_or(MapError::UnknownTerrain(c)))
                 .collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        let mut tiles = Tiles::from_rows(rows).map_err(|_| MapError::RaggedRows)?;

        for &JsonOwner { x, y, owner } in &self.owners {
            tiles.get_mut(&Position(x, y)).map_err(|_| MapError::OutsideMap(x, y))?.owner = Some(owner);
        }

        let mut units = Units::default();
        for (unit_id, &JsonUnit { x, y, unit_type, owner }) in self.units.iter().enumerate() {
            let tile = tiles.get_mut(&Position(x, y)).map_err(|_| MapError::OutsideMap(x, y))?;
            if tile.unit.replace(unit_id).is_some() {
                return Err(MapError::Overlap(x, y));
            }
            units.insert(unit_id, Unit::new(catalog, unit_type, owner, Some(Position(x, y))));
        }

        Ok(Map { name: self.name, funds: self.funds, tiles, units })
    }
}
