use crate::model::*;
use enum_iterator::all;
use std::collections::HashMap;

/// Movement cost per (terrain, weather, movement class). Missing entries are
/// impassable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainCostTable(HashMap<(Terrain, Weather, MovementClass), u32>);

impl TerrainCostTable {
    pub fn new() -> TerrainCostTable {
        TerrainCostTable(HashMap::new())
    }

    pub fn standard() -> TerrainCostTable {
        let mut table = TerrainCostTable::new();
        for terrain in all::<Terrain>() {
            for movement in all::<MovementClass>() {
                let Some(clear) = clear_move_cost(movement, terrain) else {
                    continue;
                };
                for weather in all::<Weather>() {
                    let cost = clear + weather_penalty(weather, movement, terrain, clear);
                    table.set(terrain, weather, movement, Some(cost));
                }
            }
        }
        table
    }

    pub fn cost(&self, terrain: Terrain, weather: Weather, movement: MovementClass) -> Option<u32> {
        self.0.get(&(terrain, weather, movement)).copied()
    }

    pub fn set(&mut self, terrain: Terrain, weather: Weather, movement: MovementClass, cost: Option<u32>) {
        match cost {
            Some(cost) => self.0.insert((terrain, weather, movement), cost),
            None => self.0.remove(&(terrain, weather, movement)),
        };
    }
}

fn weather_penalty(weather: Weather, movement: MovementClass, terrain: Terrain, clear: u32) -> u32 {
    use crate::model::MovementClass::*;
    use crate::model::Terrain::*;

    match weather {
        Weather::Clear | Weather::Sandstorm => 0,
        Weather::Rain => match (movement, terrain) {
            (Tires | Treads, Plains | Forest) => 1,
            _ => 0,
        },
        Weather::Snow => match (movement, terrain) {
            (Foot | Boots | Tires | Treads, Plains | Forest | Mountains) => 1,
            (Air, _) => clear,
            (Ship | Lander, Sea) => 1,
            _ => 0,
        },
    }
}
