use crate::model::*;
use enum_iterator::all;
use std::collections::HashMap;

/// Owned lookup tables for one scenario. Every enum value has an entry, so the
/// accessors index directly.
pub struct Catalog {
    pub costs: TerrainCostTable,
    units: HashMap<UnitModelId, UnitModel<'static>>,
    weapons: HashMap<Weapon, WeaponData<'static>>,
    terrains: HashMap<Terrain, TerrainData<'static>>,
}

impl Catalog {
    pub fn standard() -> Catalog {
        Catalog::with_costs(TerrainCostTable::standard())
    }

    pub fn with_costs(costs: TerrainCostTable) -> Catalog {
        Catalog {
            costs,
            units: all::<UnitModelId>().map(|m| (m, unit_model(m))).collect(),
            weapons: all::<Weapon>().map(|w| (w, weapon(w))).collect(),
            terrains: all::<Terrain>().map(|t| (t, terrain(t))).collect(),
        }
    }

    pub fn unit_model(&self, id: UnitModelId) -> &UnitModel<'static> {
        &self.units[&id]
    }
    pub fn weapon(&self, id: Weapon) -> &WeaponData<'static> {
        &self.weapons[&id]
    }
    pub fn terrain(&self, id: Terrain) -> &TerrainData<'static> {
        &self.terrains[&id]
    }

    pub fn move_cost(&self, model: UnitModelId, terrain: Terrain, weather: Weather) -> Option<u32> {
        self.costs.cost(terrain, weather, self.unit_model(model).movement)
    }

    pub fn base_damage(&self, weapon: Weapon, target: UnitModelId) -> u32 {
        self.weapon(weapon).damage_against(self.unit_model(target).armor)
    }

    pub fn buildable_on(&self, terrain: Terrain) -> Vec<UnitModelId> {
        let classes = self.terrain(terrain).build_classes;
        all::<UnitModelId>()
            .filter(|&m| classes.contains(&self.unit_model(m).class))
            .collect()
    }

    pub fn terrain_from_symbol(&self, symbol: char) -> Option<Terrain> {
        all::<Terrain>().find(|&t| self.terrain(t).symbol == symbol)
    }
}
