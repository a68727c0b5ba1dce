mod model;
mod costs;
mod catalog;
pub use self::model::*;
pub use self::costs::*;
pub use self::catalog::*;

use enum_iterator::Sequence;

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum UnitModelId {
    Infantry, Mech, Recon,
    Tank, MdTank, Artillery,
    Rockets, AntiAir, Apc,
    TCopter, BCopter, Fighter, Bomber,
    Lander, Cruiser, Battleship
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum UnitClass {
    Infantry, Vehicle, Aerial, Naval
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum MovementClass {
    Foot, Boots, Tires, Treads, Air, Ship, Lander
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum Armor {
    Infantry, LightVehicle, Tank, HeavyTank,
    Copter, Plane, Ship
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum Weapon {
    Rifle, MechGun, Bazooka, Machinegun,
    Cannon, HeavyCannon, Shell, Rocket,
    Vulcan, CopterMissile, CopterGun, AirMissile,
    Bomb, AntiShipMissile, AntiAirGun, NavalCannon
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum Terrain {
    Plains, Forest, Mountains, Road, Bridge,
    River, Shoal, Sea, Reef,
    City, Factory, Airport, Seaport, Headquarters,
    Pipeseam
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Default, Serialize, Deserialize, Sequence)]
pub enum Weather {
    #[default]
    Clear,
    Rain, Snow, Sandstorm
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum TerrainFlag {
    Capturable, Income, Headquarters, Destructible
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize, Sequence)]
pub enum ActionKind {
    Attack, Capture, Unload, Resupply, Load, Wait
}

pub struct WeaponData<'a> {
    pub name: &'a str,
    pub min_range: u32,
    pub max_range: u32,
    pub fire_after_moving: bool,
    /// `None` for weapons that never run dry.
    pub max_ammo: Option<u32>,
    pub power_map: fn(Armor) -> Option<u32>,
    pub structure_damage: Option<u32>,
}

impl WeaponData<'_> {
    pub fn damage_against(&self, armor: Armor) -> u32 {
        (self.power_map)(armor).unwrap_or(0)
    }
    pub fn is_indirect(&self) -> bool {
        self.max_range > 1
    }
}

pub struct UnitModel<'a> {
    pub name: &'a str,
    pub class: UnitClass,
    pub movement: MovementClass,
    pub move_power: u32,
    pub max_fuel: u32,
    pub idle_fuel_burn: u32,
    pub armor: Armor,
    pub weapons: &'a [Weapon],
    pub price: u32,
    pub carry_classes: &'a [UnitClass],
    pub carry_num: usize,
    pub actions: &'a [ActionKind],
}

impl UnitModel<'_> {
    pub fn has_action(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }
    pub fn can_carry_class(&self, class: UnitClass) -> bool {
        self.carry_num > 0 && self.carry_classes.contains(&class)
    }
}

pub struct TerrainData<'a> {
    pub name: &'a str,
    pub symbol: char,
    pub defense: u32,
    pub build_classes: &'a [UnitClass],
    pub repair_classes: &'a [UnitClass],
    pub flags: &'a [TerrainFlag],
    pub destroyed_into: Option<Terrain>,
}

impl TerrainData<'_> {
    pub fn has_flag(&self, flag: TerrainFlag) -> bool {
        self.flags.contains(&flag)
    }
}
