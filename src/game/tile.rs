use crate::game::{Tile, UnitId};
use crate::model::{self, Terrain, Weather};
use std::collections::VecDeque;

impl Default for Tile {
    fn default() -> Tile {
        Tile {
            terrain: Terrain::Plains,
            owner: None,
            unit: None,
            weather: Weather::Clear,
            forecast: VecDeque::new(),
            durability: model::MAX_DURABILITY,
        }
    }
}

impl Tile {
    pub fn new(terrain: Terrain) -> Tile {
        Tile { terrain, ..Tile::default() }
    }

    pub fn set_forecast(&mut self, weather: Weather, duration: usize) {
        for turn in 0..duration {
            match self.forecast.get_mut(turn) {
                Some(w) => *w = weather,
                None => self.forecast.push_back(weather),
            }
        }
    }

    pub fn advance_weather(&mut self, default: Weather) {
        self.weather = self.forecast.pop_front().unwrap_or(default);
    }

    pub fn is_empty_or(&self, unit_id: UnitId) -> bool {
        self.unit.is_none_or(|u| u == unit_id)
    }
}
