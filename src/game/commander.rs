use crate::game::*;
use crate::model::{Terrain, TerrainFlag, UnitClass, UnitModelId, Weather};
use std::collections::HashMap;

pub type AbilityId = &'static str;

/// Hints telling an AI when an ability is worth using.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbilityFlag {
    PhaseTurnStart,
    PhaseBuy,
    PhaseTurnEnd,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub cost: u32,
    pub flags: Vec<AbilityFlag>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Commander {
    pub name: String,
    pub energy: u32,
    pub abilities: Vec<Ability>,
    pub modifiers: ModifierPipeline,
}

/// Computes the modifiers an ability registers when it is activated.
pub type AbilityEffect = fn(&Commander, &Game) -> Vec<Modifier>;

#[derive(Clone, Default)]
pub struct AbilityRegistry(HashMap<AbilityId, AbilityEffect>);

impl Ability {
    pub fn new(id: AbilityId, name: &str, cost: u32, flags: &[AbilityFlag]) -> Ability {
        Ability { id, name: name.into(), cost, flags: flags.to_vec() }
    }
    pub fn has_any_flag(&self, flags: &[AbilityFlag]) -> bool {
        self.flags.iter().any(|f| flags.contains(f))
    }
}

impl Commander {
    pub fn new(name: &str) -> Commander {
        Commander { name: name.into(), energy: 0, abilities: Vec::new(), modifiers: ModifierPipeline::new() }
    }
    pub fn with_ability(mut self, ability: Ability) -> Commander {
        self.abilities.push(ability);
        self
    }
    pub fn with_modifier(mut self, modifier: Modifier) -> Commander {
        self.modifiers.add(modifier, Lifetime::Permanent);
        self
    }

    pub fn ready_abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.iter().filter(|a| a.cost <= self.energy)
    }
    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }
    pub fn add_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount);
    }
    pub fn add_modifier(&mut self, modifier: Modifier, lifetime: Lifetime) {
        self.modifiers.add(modifier, lifetime);
    }
    pub fn remove_modifier(&mut self, modifier: &Modifier) -> bool {
        self.modifiers.remove(modifier)
    }
}

impl AbilityRegistry {
    pub fn new() -> AbilityRegistry {
        AbilityRegistry(HashMap::new())
    }
    pub fn register(&mut self, id: AbilityId, effect: AbilityEffect) {
        self.0.insert(id, effect);
    }
    pub fn get(&self, id: AbilityId) -> Option<AbilityEffect> {
        self.0.get(id).copied()
    }

    pub fn standard() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry.register("morale_boost", morale_boost);
        registry.register("rally", rally);
        registry.register("snipe", snipe);
        registry.register("lucky_star", lucky_star);
        registry.register("samurai_spirit", samurai_spirit);
        registry.register("tactical_genius", tactical_genius);
        registry.register("all_weather", all_weather);
        registry
    }
}

fn morale_boost(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![Modifier::FirePower { percent: 10, applies: Applies::All }]
}

fn rally(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![Modifier::Movement { delta: 1, applies: Applies::Classes(vec![UnitClass::Infantry, UnitClass::Vehicle]) }]
}

fn snipe(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![
        Modifier::RangeBoost { delta: 1, applies: Applies::All },
        Modifier::FirePower { percent: 5, applies: Applies::All },
    ]
}

fn lucky_star(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![
        Modifier::BaseDamageBoost { amount: 10.0 },
        Modifier::LuckCeiling { max: 5 },
    ]
}

fn samurai_spirit(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![
        Modifier::FirePower { percent: 10, applies: Applies::All },
        Modifier::Defense { percent: 10, applies: Applies::All },
        Modifier::CounterMultiplier { factor: 1.5 },
    ]
}

/// Lets every income property on the map that cannot build anything recruit infantry.
fn tactical_genius(_: &Commander, game: &Game) -> Vec<Modifier> {
    let mut terrains: Vec<Terrain> = game.tiles.iter()
        .map(|t| t.terrain)
        .filter(|&t| {
            let data = game.catalog.terrain(t);
            data.has_flag(TerrainFlag::Income) && data.build_classes.is_empty()
        })
        .collect();
    terrains.sort();
    terrains.dedup();
    terrains.into_iter()
        .map(|terrain| Modifier::ProductionGrant { terrain, model: UnitModelId::Infantry })
        .collect()
}

fn all_weather(_: &Commander, _: &Game) -> Vec<Modifier> {
    vec![
        Modifier::IgnoreWeather { weather: Weather::Rain },
        Modifier::IgnoreWeather { weather: Weather::Snow },
    ]
}
