use crate::game::*;
use crate::model::{self, Catalog, UnitModelId};

impl Unit {
    pub fn new(catalog: &Catalog, model: UnitModelId, owner: PlayerNumber, position: Option<Position>) -> Unit {
        let data = catalog.unit_model(model);
        Unit {
            model,
            owner,
            health: model::UNIT_MAX_HEALTH,
            fuel: data.max_fuel,
            ammo: data.weapons.iter().map(|&w| catalog.weapon(w).max_ammo).collect(),
            position,
            carried: Vec::new(),
            moved: false,
            capture: None,
        }
    }

    pub fn hp(&self) -> u32 {
        self.health.ceil() as u32
    }
    pub fn hp_factor(&self) -> f64 {
        self.hp() as f64 / model::UNIT_MAX_HEALTH
    }
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health is kept in tenths, which is the resolution of combat damage.
    pub fn damage(&mut self, amount: f64) {
        let health = ((self.health - amount.max(0.0)) * 10.0).round() / 10.0;
        self.health = health.max(0.0);
    }
    pub fn repair(&mut self, hp: u32) {
        self.health = ((self.hp() + hp) as f64).min(model::UNIT_MAX_HEALTH);
    }
    pub fn resupply(&mut self, catalog: &Catalog) {
        let data = catalog.unit_model(self.model);
        self.fuel = data.max_fuel;
        self.ammo = data.weapons.iter().map(|&w| catalog.weapon(w).max_ammo).collect();
    }
    pub fn needs_supplies(&self, catalog: &Catalog) -> bool {
        let data = catalog.unit_model(self.model);
        self.fuel < data.max_fuel
            || data.weapons.iter().zip(&self.ammo).any(|(&w, &ammo)| ammo != catalog.weapon(w).max_ammo)
    }

    pub fn has_ammo(&self, weapon_index: usize) -> bool {
        matches!(self.ammo.get(weapon_index), Some(None) | Some(Some(1..)))
    }
    pub fn fire(&mut self, weapon_index: usize) -> GameUpdateResult<()> {
        match self.ammo.get_mut(weapon_index) {
            Some(Some(ammo)) => {
                *ammo = ammo.saturating_sub(1);
                Ok(())
            }
            Some(None) => Ok(()),
            None => Err(GameUpdateError::InvalidUnit),
        }
    }

    pub fn can_carry(&self, catalog: &Catalog, cargo: &Unit) -> bool {
        let data = catalog.unit_model(self.model);
        self.owner == cargo.owner
            && self.carried.len() < data.carry_num
            && data.can_carry_class(catalog.unit_model(cargo.model).class)
    }

    pub fn value(&self, catalog: &Catalog) -> f64 {
        catalog.unit_model(self.model).price as f64 * self.hp_factor()
    }
}
