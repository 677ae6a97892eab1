//! Shelf stocking

use hecs::{Entity, World};

use unitrates_logic::items::ItemKind;

use crate::components::{Bag, Position};
use crate::containers::Shelf;

/// Spawn the scene's bags and place them into shelf cells, left to right.
pub fn stock_shelf(world: &mut World, shelf: &mut Shelf, kind: ItemKind) -> Vec<Entity> {
    let data = kind.data();
    let mut bags = Vec::with_capacity(data.bags_per_scene as usize);
    for _ in 0..data.bags_per_scene {
        let index = match shelf.bags.first_unoccupied_cell() {
            Some(index) => index,
            None => break, // shelf rows are sized to the stock
        };
        let (x, y) = shelf.bags.cell_position(index);
        let bag = world.spawn((Position::new(x, y), Bag { kind }));
        shelf.bags.put(bag, index);
        bags.push(bag);
    }
    log::debug!("stocked shelf with {} bags of {}", bags.len(), data.name);
    bags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;
    use crate::containers::ContainerSpec;

    #[test]
    fn test_stock_fills_left_to_right() {
        let mut world = World::new();
        let mut shelf = Shelf::new(&ContainerSpec {
            position: Vec2::new(350.0, 420.0),
            bag_cells: 3,
            bag_cell_width: 70.0,
            item_cells: 15,
            item_cell_width: 30.0,
            cell_spacing: 8.0,
            back_row_dy: 12.0,
        });
        let bags = stock_shelf(&mut world, &mut shelf, ItemKind::Apples);
        assert_eq!(bags.len(), 3);
        assert_eq!(shelf.bags.occupied_count(), 3);
        for (i, bag) in bags.iter().enumerate() {
            assert_eq!(shelf.bags.occupant_at(i), Some(*bag));
            // Bag rests exactly on its cell.
            let (x, y) = shelf.bags.cell_position(i);
            let pos = world.get::<&Position>(*bag).unwrap().point;
            assert_eq!((pos.x, pos.y), (x, y));
        }
    }
}
