use enum_iterator::all;
use tactics::model::{Catalog, UnitModelId};

fn main() {
    let catalog = Catalog::standard();

    for model in all::<UnitModelId>() {
        let data = catalog.unit_model(model);
        let weapons: Vec<String> = data.weapons.iter()
            .map(|&w| {
                let weapon = catalog.weapon(w);
                format!("{} {}-{}", weapon.name, weapon.min_range, weapon.max_range)
            })
            .collect();
        println!("{:<10} | {:?}/{:?} | move {} | fuel {} | {} | {}",
                 data.name, data.class, data.movement, data.move_power, data.max_fuel,
                 data.price, weapons.join(", "));
    }
}
