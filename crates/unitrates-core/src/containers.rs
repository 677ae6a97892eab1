//! Shelf and Scale - the two containers movables live in.
//!
//! Both share one layout: an optional bag row plus a front/back pair of
//! item rows (the pair gives the illusion of depth; a host renders the
//! rows on separate layers). The scale additionally prices its occupants.
//!
//! Containers own the rows; ownership of a movable means occupying
//! exactly one cell in exactly one row. All placement decisions go
//! through [`RowPair::closest_unoccupied`] or the bag row's own search.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use unitrates_logic::rates;
use unitrates_logic::row::{Row, RowSpec};

use crate::components::{Bag, CellRef, ContainerKind, MarketItem, RowSlot, Vec2};

/// Geometry for one container's rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Reference point; rows are centered on its x.
    pub position: Vec2,
    pub bag_cells: usize,
    pub bag_cell_width: f32,
    /// Total item cells, split across the front/back pair.
    pub item_cells: usize,
    pub item_cell_width: f32,
    pub cell_spacing: f32,
    /// How far above the front row the back row sits.
    pub back_row_dy: f32,
}

impl ContainerSpec {
    fn bag_row_spec(&self) -> RowSpec {
        RowSpec {
            center_x: self.position.x,
            y: self.position.y,
            cell_width: self.bag_cell_width,
            spacing: self.cell_spacing,
            cell_count: self.bag_cells,
        }
    }

    fn front_row_spec(&self) -> RowSpec {
        RowSpec {
            center_x: self.position.x,
            y: self.position.y,
            cell_width: self.item_cell_width,
            spacing: self.cell_spacing,
            // Front row takes the larger half of an odd split.
            cell_count: self.item_cells - self.item_cells / 2,
        }
    }

    fn back_row_spec(&self) -> RowSpec {
        RowSpec {
            center_x: self.position.x,
            y: self.position.y - self.back_row_dy,
            cell_width: self.item_cell_width,
            spacing: self.cell_spacing,
            cell_count: self.item_cells / 2,
        }
    }
}

/// Front/back item rows of one container.
#[derive(Debug, Clone)]
pub struct RowPair {
    front: Row<Entity>,
    back: Row<Entity>,
}

impl RowPair {
    fn new(spec: &ContainerSpec) -> Self {
        Self {
            front: Row::new(&spec.front_row_spec()),
            back: Row::new(&spec.back_row_spec()),
        }
    }

    pub fn row(&self, slot: RowSlot) -> &Row<Entity> {
        match slot {
            RowSlot::FrontItems => &self.front,
            RowSlot::BackItems => &self.back,
            RowSlot::Bags => panic!("bag row is not part of the item row pair"),
        }
    }

    pub fn row_mut(&mut self, slot: RowSlot) -> &mut Row<Entity> {
        match slot {
            RowSlot::FrontItems => &mut self.front,
            RowSlot::BackItems => &mut self.back,
            RowSlot::Bags => panic!("bag row is not part of the item row pair"),
        }
    }

    /// Nearest empty cell across both rows. On an exact distance tie the
    /// back row wins (items fill toward the back first).
    pub fn closest_unoccupied(&self, x: f32, y: f32) -> Option<(RowSlot, usize)> {
        let dist2 = |row: &Row<Entity>, i: usize| {
            let (cx, cy) = row.cell_position(i);
            let dx = cx - x;
            let dy = cy - y;
            dx * dx + dy * dy
        };
        let front = self
            .front
            .closest_unoccupied_cell(x, y)
            .map(|i| (i, dist2(&self.front, i)));
        let back = self
            .back
            .closest_unoccupied_cell(x, y)
            .map(|i| (i, dist2(&self.back, i)));
        match (front, back) {
            (None, None) => None,
            (Some((i, _)), None) => Some((RowSlot::FrontItems, i)),
            (None, Some((i, _))) => Some((RowSlot::BackItems, i)),
            (Some((fi, fd)), Some((bi, bd))) => {
                if fd < bd {
                    Some((RowSlot::FrontItems, fi))
                } else {
                    Some((RowSlot::BackItems, bi))
                }
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.front.occupied_count() + self.back.occupied_count()
    }

    /// Row and cell index of the entity, if placed here.
    pub fn find(&self, entity: Entity) -> Option<(RowSlot, usize)> {
        if let Some(i) = self.front.index_of(entity) {
            return Some((RowSlot::FrontItems, i));
        }
        self.back.index_of(entity).map(|i| (RowSlot::BackItems, i))
    }

    pub fn clear(&mut self) {
        self.front.clear();
        self.back.clear();
    }
}

/// The shelf: bags at rest plus any items dragged back off the scale.
#[derive(Debug, Clone)]
pub struct Shelf {
    pub position: Vec2,
    pub bags: Row<Entity>,
    pub items: RowPair,
}

impl Shelf {
    pub fn new(spec: &ContainerSpec) -> Self {
        Self {
            position: spec.position,
            bags: Row::new(&spec.bag_row_spec()),
            items: RowPair::new(spec),
        }
    }

    /// Remove the entity from whichever row holds it. Returns the vacated
    /// cell, or `None` if the entity is not on the shelf.
    pub fn take(&mut self, entity: Entity) -> Option<CellRef> {
        cell_taken(ContainerKind::Shelf, &mut self.bags, &mut self.items, entity)
    }

    pub fn clear(&mut self) {
        self.bags.clear();
        self.items.clear();
    }
}

/// Aggregate reading of everything on the scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleTotals {
    /// Units on the scale: item count for countables, pounds for candy.
    pub quantity: f64,
    /// Dollars, rounded to the cent.
    pub cost: f64,
}

/// The scale: prices whatever lands on it. Bags that open never rest
/// here - they decompose on arrival; candy bags occupy the bag row.
#[derive(Debug, Clone)]
pub struct Scale {
    pub position: Vec2,
    pub bags: Row<Entity>,
    pub items: RowPair,
    totals: ScaleTotals,
}

impl Scale {
    pub fn new(spec: &ContainerSpec) -> Self {
        Self {
            position: spec.position,
            bags: Row::new(&spec.bag_row_spec()),
            items: RowPair::new(spec),
            totals: ScaleTotals::default(),
        }
    }

    pub fn totals(&self) -> ScaleTotals {
        self.totals
    }

    /// Recompute totals from current occupants. Returns the new totals
    /// and whether they changed.
    pub fn recompute_totals(&mut self, world: &World) -> (ScaleTotals, bool) {
        let mut quantity = 0.0;
        let mut cost = 0.0;
        for (_, entity) in self.bags.occupants() {
            if let Ok(bag) = world.get::<&Bag>(entity) {
                let data = bag.kind.data();
                quantity += data.bag_quantity;
                cost += data.bag_rate();
            }
        }
        for slot in [RowSlot::FrontItems, RowSlot::BackItems] {
            for (_, entity) in self.items.row(slot).occupants() {
                if let Ok(item) = world.get::<&MarketItem>(entity) {
                    quantity += 1.0;
                    cost += item.kind.data().unit_rate;
                }
            }
        }
        let new = ScaleTotals {
            quantity,
            cost: rates::round_to_cents(cost),
        };
        let changed = new != self.totals;
        self.totals = new;
        (new, changed)
    }

    /// Remove the entity from whichever row holds it. Returns the vacated
    /// cell, or `None` if the entity is not on the scale.
    pub fn take(&mut self, entity: Entity) -> Option<CellRef> {
        cell_taken(ContainerKind::Scale, &mut self.bags, &mut self.items, entity)
    }

    pub fn clear(&mut self) {
        self.bags.clear();
        self.items.clear();
        self.totals = ScaleTotals::default();
    }
}

fn cell_taken(
    container: ContainerKind,
    bags: &mut Row<Entity>,
    items: &mut RowPair,
    entity: Entity,
) -> Option<CellRef> {
    if bags.contains(entity) {
        let index = bags.remove(entity);
        return Some(CellRef {
            container,
            row: RowSlot::Bags,
            index,
        });
    }
    if let Some((row, _)) = items.find(entity) {
        let index = items.row_mut(row).remove(entity);
        return Some(CellRef {
            container,
            row,
            index,
        });
    }
    None
}

/// Resolve a cell reference to its row.
pub fn row_for<'a>(shelf: &'a Shelf, scale: &'a Scale, cell: CellRef) -> &'a Row<Entity> {
    match (cell.container, cell.row) {
        (ContainerKind::Shelf, RowSlot::Bags) => &shelf.bags,
        (ContainerKind::Shelf, slot) => shelf.items.row(slot),
        (ContainerKind::Scale, RowSlot::Bags) => &scale.bags,
        (ContainerKind::Scale, slot) => scale.items.row(slot),
    }
}

/// Resolve a cell reference to its row, mutably.
pub fn row_for_mut<'a>(
    shelf: &'a mut Shelf,
    scale: &'a mut Scale,
    cell: CellRef,
) -> &'a mut Row<Entity> {
    match (cell.container, cell.row) {
        (ContainerKind::Shelf, RowSlot::Bags) => &mut shelf.bags,
        (ContainerKind::Shelf, slot) => shelf.items.row_mut(slot),
        (ContainerKind::Scale, RowSlot::Bags) => &mut scale.bags,
        (ContainerKind::Scale, slot) => scale.items.row_mut(slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ContainerSpec {
        ContainerSpec {
            position: Vec2::new(350.0, 400.0),
            bag_cells: 4,
            bag_cell_width: 70.0,
            item_cells: 9,
            item_cell_width: 30.0,
            cell_spacing: 8.0,
            back_row_dy: 12.0,
        }
    }

    #[test]
    fn test_row_split_counts() {
        let shelf = Shelf::new(&spec());
        assert_eq!(shelf.bags.len(), 4);
        // 9 item cells: 5 front, 4 back.
        assert_eq!(shelf.items.row(RowSlot::FrontItems).len(), 5);
        assert_eq!(shelf.items.row(RowSlot::BackItems).len(), 4);
    }

    #[test]
    fn test_back_row_sits_above_front_row() {
        let shelf = Shelf::new(&spec());
        let (_, front_y) = shelf.items.row(RowSlot::FrontItems).cell_position(0);
        let (_, back_y) = shelf.items.row(RowSlot::BackItems).cell_position(0);
        assert_eq!(front_y, 400.0);
        assert_eq!(back_y, 388.0);
    }

    #[test]
    fn test_pair_closest_prefers_back_on_tie() {
        let mut world = World::new();
        let a = world.spawn((crate::components::Position::new(0.0, 0.0),));
        let mut shelf = Shelf::new(&ContainerSpec {
            item_cells: 2, // one front cell, one back cell, same x
            ..spec()
        });
        let (fx, fy) = shelf.items.row(RowSlot::FrontItems).cell_position(0);
        let (_, by) = shelf.items.row(RowSlot::BackItems).cell_position(0);
        // Query from the midpoint between the rows: equidistant.
        let mid_y = (fy + by) / 2.0;
        assert_eq!(
            shelf.items.closest_unoccupied(fx, mid_y),
            Some((RowSlot::BackItems, 0))
        );
        // With the back cell taken, the front cell is the only choice.
        shelf.items.row_mut(RowSlot::BackItems).put(a, 0);
        assert_eq!(
            shelf.items.closest_unoccupied(fx, mid_y),
            Some((RowSlot::FrontItems, 0))
        );
    }

    #[test]
    fn test_take_reports_vacated_cell() {
        let mut world = World::new();
        let bag = world.spawn((crate::components::Position::new(0.0, 0.0),));
        let mut shelf = Shelf::new(&spec());
        shelf.bags.put(bag, 2);

        let cell = shelf.take(bag).unwrap();
        assert_eq!(cell.container, ContainerKind::Shelf);
        assert_eq!(cell.row, RowSlot::Bags);
        assert_eq!(cell.index, 2);
        assert!(shelf.take(bag).is_none());
    }

    #[test]
    fn test_scale_totals_from_occupants() {
        use unitrates_logic::items::ItemKind;

        let mut world = World::new();
        let mut scale = Scale::new(&spec());

        let candy = world.spawn((Bag {
            kind: ItemKind::PurpleCandy,
        },));
        scale.bags.put(candy, 0);
        let apple_a = world.spawn((MarketItem {
            kind: ItemKind::Apples,
        },));
        let apple_b = world.spawn((MarketItem {
            kind: ItemKind::Apples,
        },));
        scale.items.row_mut(RowSlot::FrontItems).put(apple_a, 0);
        scale.items.row_mut(RowSlot::BackItems).put(apple_b, 0);

        let (totals, changed) = scale.recompute_totals(&world);
        assert!(changed);
        // 0.4 lb of candy + 2 apples.
        assert!((totals.quantity - 2.4).abs() < 1e-9);
        // $2.16 + $1.00
        assert!((totals.cost - 3.16).abs() < 1e-9);

        // Unchanged occupancy does not report a change.
        let (_, changed) = scale.recompute_totals(&world);
        assert!(!changed);
    }

    #[test]
    fn test_clear_resets_totals_and_cells() {
        let mut world = World::new();
        let mut scale = Scale::new(&spec());
        let e = world.spawn((MarketItem {
            kind: unitrates_logic::items::ItemKind::Lemons,
        },));
        scale.items.row_mut(RowSlot::FrontItems).put(e, 1);
        scale.recompute_totals(&world);
        scale.clear();
        assert_eq!(scale.totals(), ScaleTotals::default());
        assert_eq!(scale.items.occupied_count(), 0);
        scale.clear();
        assert_eq!(scale.items.occupied_count(), 0);
    }
}
