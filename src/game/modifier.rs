//! Commander modifiers and the pipeline that applies them.
//!
//! A pipeline applies its modifiers strictly in registration order, and each
//! modifier sees the parameters as left by the ones before it. Nothing here
//! prevents the same modifier from being registered twice; commanders own
//! that bookkeeping.

use crate::game::CombatParameters;
use crate::model::{Terrain, UnitClass, UnitModelId, Weather};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Applies {
    All,
    Models(Vec<UnitModelId>),
    Classes(Vec<UnitClass>),
}

impl Applies {
    pub fn matches(&self, model: UnitModelId, class: UnitClass) -> bool {
        match self {
            Applies::All => true,
            Applies::Models(models) => models.contains(&model),
            Applies::Classes(classes) => classes.contains(&class),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Added to the attack factor when one of our units strikes.
    FirePower { percent: i32, applies: Applies },
    /// Added to the defense factor when one of our units is struck.
    Defense { percent: i32, applies: Applies },
    /// Multiplies the attack factor of our counterattacks.
    CounterMultiplier { factor: f64 },
    /// Replaces the upper bound of our luck rolls.
    LuckCeiling { max: i32 },
    /// Added to the base damage of our strikes that can hit at all.
    BaseDamageBoost { amount: f64 },
    Movement { delta: i32, applies: Applies },
    MoveCost { terrain: Terrain, cost: u32, applies: Applies },
    /// Movement in this weather costs the same as in clear weather.
    IgnoreWeather { weather: Weather },
    /// Extends the maximum range of indirect weapons.
    RangeBoost { delta: u32, applies: Applies },
    ProductionGrant { terrain: Terrain, model: UnitModelId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatSide { Attacker, Defender }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifetime {
    Permanent,
    /// Expires when the owner's next turn starts.
    Turn,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveModifier {
    pub modifier: Modifier,
    pub lifetime: Lifetime,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierPipeline {
    entries: Vec<ActiveModifier>,
}

impl Modifier {
    pub fn alter_combat(&self, params: &mut CombatParameters, side: CombatSide) {
        let striker = &params.attacker;
        match (self, side) {
            (Modifier::FirePower { percent, applies }, CombatSide::Attacker) => {
                if applies.matches(striker.model, striker.class) {
                    params.attack_factor += *percent as f64;
                }
            }
            (Modifier::Defense { percent, applies }, CombatSide::Defender) => {
                if let Some(target) = &params.defender {
                    if applies.matches(target.model, target.class) {
                        params.defense_factor += *percent as f64;
                    }
                }
            }
            (Modifier::CounterMultiplier { factor }, CombatSide::Attacker) => {
                if params.is_counter {
                    params.attack_factor *= factor;
                }
            }
            (Modifier::LuckCeiling { max }, CombatSide::Attacker) => {
                params.luck_max = (*max).max(0);
            }
            (Modifier::BaseDamageBoost { amount }, CombatSide::Attacker) => {
                if params.base_damage > 0.0 {
                    params.base_damage += amount;
                }
            }
            _ => (),
        }
    }

    pub fn alter_move_power(&self, model: UnitModelId, class: UnitClass, power: u32) -> u32 {
        match self {
            Modifier::Movement { delta, applies } if applies.matches(model, class) => {
                (power as i32 + delta).max(0) as u32
            }
            _ => power,
        }
    }

    pub fn alter_move_cost(&self, model: UnitModelId, class: UnitClass, terrain: Terrain, cost: Option<u32>) -> Option<u32> {
        match self {
            Modifier::MoveCost { terrain: t, cost: c, applies } if *t == terrain && applies.matches(model, class) => {
                Some(*c)
            }
            _ => cost,
        }
    }

    pub fn alter_weather(&self, weather: Weather) -> Weather {
        match self {
            Modifier::IgnoreWeather { weather: w } if *w == weather => Weather::Clear,
            _ => weather,
        }
    }

    pub fn alter_range(&self, model: UnitModelId, class: UnitClass, range: u32) -> u32 {
        match self {
            Modifier::RangeBoost { delta, applies } if applies.matches(model, class) => range + delta,
            _ => range,
        }
    }

    pub fn alter_production(&self, terrain: Terrain, models: &mut Vec<UnitModelId>) {
        if let Modifier::ProductionGrant { terrain: t, model } = self {
            if *t == terrain && !models.contains(model) {
                models.push(*model);
            }
        }
    }
}

impl ModifierPipeline {
    pub const fn new() -> ModifierPipeline {
        ModifierPipeline { entries: Vec::new() }
    }

    pub fn add(&mut self, modifier: Modifier, lifetime: Lifetime) {
        self.entries.push(ActiveModifier { modifier, lifetime });
    }

    pub fn remove(&mut self, modifier: &Modifier) -> bool {
        match self.entries.iter().rposition(|e| &e.modifier == modifier) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn expire_turn(&mut self) -> Vec<Modifier> {
        let (expired, kept): (Vec<ActiveModifier>, Vec<ActiveModifier>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.lifetime == Lifetime::Turn);
        self.entries = kept;
        expired.into_iter().map(|e| e.modifier).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.entries.iter().map(|e| &e.modifier)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply_combat(&self, params: &mut CombatParameters, side: CombatSide) {
        self.iter().for_each(|m| m.alter_combat(params, side));
    }
    pub fn move_power(&self, model: UnitModelId, class: UnitClass, base: u32) -> u32 {
        self.iter().fold(base, |power, m| m.alter_move_power(model, class, power))
    }
    pub fn move_cost(&self, model: UnitModelId, class: UnitClass, terrain: Terrain, base: Option<u32>) -> Option<u32> {
        self.iter().fold(base, |cost, m| m.alter_move_cost(model, class, terrain, cost))
    }
    pub fn weather(&self, weather: Weather) -> Weather {
        self.iter().fold(weather, |w, m| m.alter_weather(w))
    }
    pub fn max_range(&self, model: UnitModelId, class: UnitClass, base: u32) -> u32 {
        self.iter().fold(base, |range, m| m.alter_range(model, class, range))
    }
    pub fn shopping_list(&self, terrain: Terrain, base: Vec<UnitModelId>) -> Vec<UnitModelId> {
        let mut models = base;
        self.iter().for_each(|m| m.alter_production(terrain, &mut models));
        models
    }
}
