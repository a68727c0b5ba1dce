use crate::model::*;

pub const UNIT_MAX_HEALTH: f64 = 10.0;
pub const MAX_DURABILITY: u32 = 99;

pub fn weapon(x: Weapon) -> WeaponData<'static> {
    use crate::model::Weapon::*;

    let name = match x {
        Rifle => "Rifle",
        MechGun => "Mech gun",
        Bazooka => "Bazooka",
        Machinegun => "Machinegun",
        Cannon => "Cannon",
        HeavyCannon => "Heavy cannon",
        Shell => "Shell",
        Rocket => "Rocket",
        Vulcan => "Vulcan",
        CopterMissile => "Copter missile",
        CopterGun => "Copter gun",
        AirMissile => "Air missile",
        Bomb => "Bomb",
        AntiShipMissile => "Anti-ship missile",
        AntiAirGun => "Anti-air gun",
        NavalCannon => "Naval cannon",
    };

    let power_map: fn(Armor) -> Option<u32> = {
        use crate::model::Armor::*;

        match x {
            Rifle => |a| match a {
                Infantry => Some(55), LightVehicle => Some(12), Tank => Some(5), HeavyTank => Some(1),
                Copter => Some(7), Plane | Ship => None,
            },
            MechGun => |a| match a {
                Infantry => Some(65), LightVehicle => Some(18), Tank => Some(6), HeavyTank => Some(1),
                Copter => Some(9), Plane | Ship => None,
            },
            Bazooka => |a| match a {
                LightVehicle => Some(85), Tank => Some(55), HeavyTank => Some(15),
                Infantry | Copter | Plane | Ship => None,
            },
            Machinegun => |a| match a {
                Infantry => Some(70), LightVehicle => Some(35), Tank => Some(6), HeavyTank => Some(1),
                Copter => Some(10), Plane | Ship => None,
            },
            Cannon => |a| match a {
                LightVehicle => Some(85), Tank => Some(55), HeavyTank => Some(15), Ship => Some(10),
                Infantry | Copter | Plane => None,
            },
            HeavyCannon => |a| match a {
                LightVehicle => Some(105), Tank => Some(85), HeavyTank => Some(55), Ship => Some(35),
                Infantry | Copter | Plane => None,
            },
            Shell => |a| match a {
                Infantry => Some(90), LightVehicle => Some(80), Tank => Some(70), HeavyTank => Some(45),
                Ship => Some(55), Copter | Plane => None,
            },
            Rocket => |a| match a {
                Infantry => Some(95), LightVehicle => Some(90), Tank => Some(80), HeavyTank => Some(55),
                Ship => Some(60), Copter | Plane => None,
            },
            Vulcan => |a| match a {
                Infantry => Some(105), LightVehicle => Some(60), Tank => Some(25), HeavyTank => Some(10),
                Copter => Some(120), Plane => Some(65), Ship => None,
            },
            CopterMissile => |a| match a {
                LightVehicle => Some(55), Tank => Some(55), HeavyTank => Some(25), Ship => Some(25),
                Infantry | Copter | Plane => None,
            },
            CopterGun => |a| match a {
                Infantry => Some(75), LightVehicle => Some(30), Tank => Some(6), HeavyTank => Some(1),
                Copter => Some(65), Plane | Ship => None,
            },
            AirMissile => |a| match a {
                Copter => Some(100), Plane => Some(55),
                Infantry | LightVehicle | Tank | HeavyTank | Ship => None,
            },
            Bomb => |a| match a {
                Infantry => Some(110), LightVehicle => Some(105), Tank => Some(105), HeavyTank => Some(95),
                Ship => Some(85), Copter | Plane => None,
            },
            AntiShipMissile => |a| match a {
                Ship => Some(60),
                Infantry | LightVehicle | Tank | HeavyTank | Copter | Plane => None,
            },
            AntiAirGun => |a| match a {
                Copter => Some(115), Plane => Some(65),
                Infantry | LightVehicle | Tank | HeavyTank | Ship => None,
            },
            NavalCannon => |a| match a {
                Infantry => Some(95), LightVehicle => Some(90), Tank => Some(85), HeavyTank => Some(55),
                Ship => Some(65), Copter | Plane => None,
            },
        }
    };

    let (min_range, max_range) = match x {
        Shell => (2, 3),
        Rocket => (3, 5),
        NavalCannon => (2, 6),
        _ => (1, 1),
    };

    let max_ammo = match x {
        Rifle | MechGun | Machinegun | CopterGun | AntiAirGun => None,
        Bazooka => Some(3),
        Rocket | CopterMissile => Some(6),
        HeavyCannon => Some(8),
        _ => Some(9),
    };

    let structure_damage = match x {
        Bazooka | Cannon | CopterMissile => Some(55),
        HeavyCannon | Rocket | NavalCannon => Some(80),
        Shell => Some(70),
        Bomb => Some(95),
        _ => None,
    };

    WeaponData {
        name,
        min_range,
        max_range,
        fire_after_moving: min_range == 1,
        max_ammo,
        power_map,
        structure_damage,
    }
}

pub fn unit_model(x: UnitModelId) -> UnitModel<'static> {
    use crate::model::UnitModelId::*;
    use crate::model::ActionKind::{Attack, Capture, Resupply, Unload, Wait};

    const FIGHT: &[ActionKind] = &[Attack, Wait];
    const TROOP: &[ActionKind] = &[Attack, Capture, Wait];

    match x {
        Infantry => UnitModel {
            name: "Infantry", class: UnitClass::Infantry, movement: MovementClass::Foot,
            move_power: 3, max_fuel: 99, idle_fuel_burn: 0, armor: Armor::Infantry,
            weapons: &[Weapon::Rifle], price: 1000,
            carry_classes: &[], carry_num: 0, actions: TROOP,
        },
        Mech => UnitModel {
            name: "Mech", class: UnitClass::Infantry, movement: MovementClass::Boots,
            move_power: 2, max_fuel: 70, idle_fuel_burn: 0, armor: Armor::Infantry,
            weapons: &[Weapon::Bazooka, Weapon::MechGun], price: 3000,
            carry_classes: &[], carry_num: 0, actions: TROOP,
        },
        Recon => UnitModel {
            name: "Recon", class: UnitClass::Vehicle, movement: MovementClass::Tires,
            move_power: 8, max_fuel: 80, idle_fuel_burn: 0, armor: Armor::LightVehicle,
            weapons: &[Weapon::Machinegun], price: 4000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Tank => UnitModel {
            name: "Tank", class: UnitClass::Vehicle, movement: MovementClass::Treads,
            move_power: 6, max_fuel: 70, idle_fuel_burn: 0, armor: Armor::Tank,
            weapons: &[Weapon::Cannon, Weapon::Machinegun], price: 7000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        MdTank => UnitModel {
            name: "Md. Tank", class: UnitClass::Vehicle, movement: MovementClass::Treads,
            move_power: 5, max_fuel: 50, idle_fuel_burn: 0, armor: Armor::HeavyTank,
            weapons: &[Weapon::HeavyCannon, Weapon::Machinegun], price: 16000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Artillery => UnitModel {
            name: "Artillery", class: UnitClass::Vehicle, movement: MovementClass::Treads,
            move_power: 5, max_fuel: 50, idle_fuel_burn: 0, armor: Armor::LightVehicle,
            weapons: &[Weapon::Shell], price: 6000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Rockets => UnitModel {
            name: "Rockets", class: UnitClass::Vehicle, movement: MovementClass::Tires,
            move_power: 5, max_fuel: 50, idle_fuel_burn: 0, armor: Armor::LightVehicle,
            weapons: &[Weapon::Rocket], price: 15000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        AntiAir => UnitModel {
            name: "Anti-Air", class: UnitClass::Vehicle, movement: MovementClass::Treads,
            move_power: 6, max_fuel: 60, idle_fuel_burn: 0, armor: Armor::LightVehicle,
            weapons: &[Weapon::Vulcan], price: 8000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Apc => UnitModel {
            name: "APC", class: UnitClass::Vehicle, movement: MovementClass::Treads,
            move_power: 6, max_fuel: 70, idle_fuel_burn: 0, armor: Armor::LightVehicle,
            weapons: &[], price: 5000,
            carry_classes: &[UnitClass::Infantry], carry_num: 1, actions: &[Unload, Resupply, Wait],
        },
        TCopter => UnitModel {
            name: "T-Copter", class: UnitClass::Aerial, movement: MovementClass::Air,
            move_power: 6, max_fuel: 99, idle_fuel_burn: 2, armor: Armor::Copter,
            weapons: &[], price: 5000,
            carry_classes: &[UnitClass::Infantry], carry_num: 1, actions: &[Unload, Wait],
        },
        BCopter => UnitModel {
            name: "B-Copter", class: UnitClass::Aerial, movement: MovementClass::Air,
            move_power: 6, max_fuel: 99, idle_fuel_burn: 2, armor: Armor::Copter,
            weapons: &[Weapon::CopterMissile, Weapon::CopterGun], price: 9000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Fighter => UnitModel {
            name: "Fighter", class: UnitClass::Aerial, movement: MovementClass::Air,
            move_power: 9, max_fuel: 99, idle_fuel_burn: 5, armor: Armor::Plane,
            weapons: &[Weapon::AirMissile], price: 20000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Bomber => UnitModel {
            name: "Bomber", class: UnitClass::Aerial, movement: MovementClass::Air,
            move_power: 7, max_fuel: 99, idle_fuel_burn: 5, armor: Armor::Plane,
            weapons: &[Weapon::Bomb], price: 22000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Lander => UnitModel {
            name: "Lander", class: UnitClass::Naval, movement: MovementClass::Lander,
            move_power: 6, max_fuel: 99, idle_fuel_burn: 1, armor: Armor::Ship,
            weapons: &[], price: 12000,
            carry_classes: &[UnitClass::Infantry, UnitClass::Vehicle], carry_num: 2, actions: &[Unload, Wait],
        },
        Cruiser => UnitModel {
            name: "Cruiser", class: UnitClass::Naval, movement: MovementClass::Ship,
            move_power: 6, max_fuel: 99, idle_fuel_burn: 1, armor: Armor::Ship,
            weapons: &[Weapon::AntiShipMissile, Weapon::AntiAirGun], price: 18000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
        Battleship => UnitModel {
            name: "Battleship", class: UnitClass::Naval, movement: MovementClass::Ship,
            move_power: 5, max_fuel: 99, idle_fuel_burn: 1, armor: Armor::Ship,
            weapons: &[Weapon::NavalCannon], price: 28000,
            carry_classes: &[], carry_num: 0, actions: FIGHT,
        },
    }
}

pub fn terrain(x: Terrain) -> TerrainData<'static> {
    use crate::model::Terrain::*;

    const GROUND: &[UnitClass] = &[UnitClass::Infantry, UnitClass::Vehicle];
    const PROPERTY: &[TerrainFlag] = &[TerrainFlag::Capturable, TerrainFlag::Income];

    fn plain(name: &'static str, symbol: char, defense: u32) -> TerrainData<'static> {
        TerrainData {
            name, symbol, defense,
            build_classes: &[], repair_classes: &[], flags: &[], destroyed_into: None,
        }
    }

    match x {
        Plains => plain("Plains", '.', 1),
        Forest => plain("Forest", 'f', 2),
        Mountains => plain("Mountains", 'm', 4),
        Road => plain("Road", '=', 0),
        Bridge => plain("Bridge", 'b', 0),
        River => plain("River", 'r', 0),
        Shoal => plain("Shoal", 's', 0),
        Sea => plain("Sea", '~', 0),
        Reef => plain("Reef", 'x', 1),
        City => TerrainData {
            name: "City", symbol: 'c', defense: 3,
            build_classes: &[], repair_classes: GROUND,
            flags: PROPERTY, destroyed_into: None,
        },
        Factory => TerrainData {
            name: "Factory", symbol: 'F', defense: 3,
            build_classes: GROUND, repair_classes: GROUND,
            flags: PROPERTY, destroyed_into: None,
        },
        Airport => TerrainData {
            name: "Airport", symbol: 'A', defense: 3,
            build_classes: &[UnitClass::Aerial], repair_classes: &[UnitClass::Aerial],
            flags: PROPERTY, destroyed_into: None,
        },
        Seaport => TerrainData {
            name: "Seaport", symbol: 'P', defense: 3,
            build_classes: &[UnitClass::Naval], repair_classes: &[UnitClass::Naval],
            flags: PROPERTY, destroyed_into: None,
        },
        Headquarters => TerrainData {
            name: "Headquarters", symbol: 'H', defense: 4,
            build_classes: &[], repair_classes: GROUND,
            flags: &[TerrainFlag::Capturable, TerrainFlag::Income, TerrainFlag::Headquarters],
            destroyed_into: None,
        },
        Pipeseam => TerrainData {
            name: "Pipe seam", symbol: '#', defense: 0,
            build_classes: &[], repair_classes: &[],
            flags: &[TerrainFlag::Destructible], destroyed_into: Some(Plains),
        },
    }
}

pub fn clear_move_cost(movement: MovementClass, x: Terrain) -> Option<u32> {
    use crate::model::MovementClass::*;
    use crate::model::Terrain::*;

    match movement {
        Foot | Boots => match x {
            Mountains => Some(if movement == Boots { 1 } else { 2 }),
            River => Some(if movement == Boots { 1 } else { 2 }),
            Sea | Reef | Pipeseam => None,
            _ => Some(1),
        },
        Tires => match x {
            Plains => Some(2),
            Forest => Some(3),
            Mountains | River | Sea | Reef | Pipeseam => None,
            _ => Some(1),
        },
        Treads => match x {
            Forest => Some(2),
            Mountains | River | Sea | Reef | Pipeseam => None,
            _ => Some(1),
        },
        Air => match x {
            Pipeseam => None,
            _ => Some(1),
        },
        Ship => match x {
            Sea | Seaport => Some(1),
            Reef => Some(2),
            _ => None,
        },
        Lander => match x {
            Sea | Shoal | Seaport => Some(1),
            Reef => Some(2),
            _ => None,
        },
    }
}
