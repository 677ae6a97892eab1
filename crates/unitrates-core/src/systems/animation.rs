//! Animation system - steps in-flight movables each frame, retargets
//! stale claims, and commits arrivals into cells.
//!
//! Multiple movables can be in flight at once (a user releasing items in
//! quick succession, or a decomposed bag's items flying together), so the
//! cell chosen at release time can be stale by arrival time. An
//! unreserved claim is therefore re-checked before stepping and again
//! immediately before assignment; a stolen cell triggers recomputation of
//! the next-closest free cell without passing through Idle.
//!
//! Within one `animation_system` call all mutations are sequential, so no
//! two movables can commit to the same cell in the same frame.

use hecs::{Entity, World};

use unitrates_logic::motion::{Easing, Flight};

use crate::components::{Animation, Bag, CellRef, ContainerKind, Position, Vec2};
use crate::containers::{row_for, row_for_mut, Scale, Shelf};

use super::drag::search_cell_with_fallback;

/// A movable that finished its flight and now owns its cell. The row slot
/// tells a host which render layer to reparent the node to.
#[derive(Debug, Clone, Copy)]
pub struct Arrival {
    pub entity: Entity,
    pub cell: CellRef,
}

/// Advance every flight by `dt`. Returns the arrivals committed this
/// frame, in processing order.
pub fn animation_system(
    world: &mut World,
    shelf: &mut Shelf,
    scale: &mut Scale,
    speed: f32,
    dt: f32,
) -> Vec<Arrival> {
    // Collect steps first (can't mutate components while iterating).
    let mut updates: Vec<(Entity, Vec2, Option<Animation>, bool)> = Vec::new();

    for (entity, (pos, anim)) in world.query::<(&Position, &Animation)>().iter() {
        let mut anim = anim.clone();
        let is_bag = world.get::<&Bag>(entity).is_ok();

        // Retarget check: has a competitor taken the claimed cell?
        if !anim.reserved && !row_for(shelf, scale, anim.claim).is_cell_empty(anim.claim.index) {
            match retarget(shelf, scale, anim.claim.container, is_bag, pos.point, speed) {
                Some((claim, flight)) => {
                    anim.claim = claim;
                    anim.flight = flight;
                }
                None => {
                    // Nowhere left to go; strand the movable where it is.
                    updates.push((entity, pos.point, None, false));
                    continue;
                }
            }
        }

        let new_pos = Vec2::from(anim.flight.advance(dt));
        let arrived = anim.flight.is_done();
        updates.push((entity, new_pos, Some(anim), arrived));
    }

    // Apply steps. Occupancy is re-checked immediately before each
    // assignment, so an arrival earlier in this loop forces a retarget on
    // a later one instead of a double occupancy.
    let mut arrivals = Vec::new();
    for (entity, new_pos, anim, arrived) in updates {
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.point = new_pos;
        }
        let anim = match anim {
            Some(anim) => anim,
            None => {
                let _ = world.remove_one::<Animation>(entity);
                continue;
            }
        };
        if !arrived {
            let _ = world.insert_one(entity, anim);
            continue;
        }

        if anim.reserved {
            // Cell was assigned at decomposition time; just land.
            let _ = world.remove_one::<Animation>(entity);
            arrivals.push(Arrival {
                entity,
                cell: anim.claim,
            });
            continue;
        }

        if row_for(shelf, scale, anim.claim).is_cell_empty(anim.claim.index) {
            row_for_mut(shelf, scale, anim.claim).put(entity, anim.claim.index);
            let _ = world.remove_one::<Animation>(entity);
            arrivals.push(Arrival {
                entity,
                cell: anim.claim,
            });
        } else {
            // Stolen between stepping and arrival within this frame.
            let is_bag = world.get::<&Bag>(entity).is_ok();
            match retarget(shelf, scale, anim.claim.container, is_bag, new_pos, speed) {
                Some((claim, flight)) => {
                    let _ = world.insert_one(
                        entity,
                        Animation {
                            flight,
                            claim,
                            reserved: false,
                        },
                    );
                }
                None => {
                    log::warn!("arrival found every cell occupied");
                    let _ = world.remove_one::<Animation>(entity);
                }
            }
        }
    }
    arrivals
}

fn retarget(
    shelf: &Shelf,
    scale: &Scale,
    preferred: ContainerKind,
    is_bag: bool,
    from: Vec2,
    speed: f32,
) -> Option<(CellRef, Flight)> {
    let claim = search_cell_with_fallback(shelf, scale, preferred, is_bag, from)?;
    let dest = row_for(shelf, scale, claim).cell_position(claim.index);
    log::debug!(
        "retargeting movable to {:?} cell {} in {:?}",
        claim.row,
        claim.index,
        claim.container
    );
    Some((claim, Flight::new(from.into(), dest, speed, Easing::QuadOut)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{MarketItem, RowSlot};
    use crate::containers::ContainerSpec;
    use unitrates_logic::items::ItemKind;

    fn small_world() -> (World, Shelf, Scale) {
        let spec = |y: f32| ContainerSpec {
            position: Vec2::new(200.0, y),
            bag_cells: 3,
            bag_cell_width: 70.0,
            item_cells: 4,
            item_cell_width: 30.0,
            cell_spacing: 8.0,
            back_row_dy: 12.0,
        };
        (World::new(), Shelf::new(&spec(400.0)), Scale::new(&spec(200.0)))
    }

    fn spawn_flying_item(
        world: &mut World,
        shelf: &Shelf,
        scale: &Scale,
        claim: CellRef,
        from: Vec2,
    ) -> Entity {
        let dest = row_for(shelf, scale, claim).cell_position(claim.index);
        world.spawn((
            Position { point: from },
            MarketItem {
                kind: ItemKind::Apples,
            },
            Animation {
                flight: Flight::new(from.into(), dest, 400.0, Easing::QuadOut),
                claim,
                reserved: false,
            },
        ))
    }

    fn run_until_settled(world: &mut World, shelf: &mut Shelf, scale: &mut Scale) -> Vec<Arrival> {
        let mut all = Vec::new();
        for _ in 0..600 {
            all.extend(animation_system(world, shelf, scale, 400.0, 1.0 / 60.0));
            if world.query::<&Animation>().iter().count() == 0 {
                break;
            }
        }
        all
    }

    #[test]
    fn test_arrival_commits_cell_and_removes_animation() {
        let (mut world, mut shelf, mut scale) = small_world();
        let claim = CellRef {
            container: ContainerKind::Scale,
            row: RowSlot::FrontItems,
            index: 0,
        };
        let item = spawn_flying_item(&mut world, &shelf, &scale, claim, Vec2::new(0.0, 0.0));

        let arrivals = run_until_settled(&mut world, &mut shelf, &mut scale);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].entity, item);
        assert_eq!(arrivals[0].cell, claim);
        assert_eq!(scale.items.row(RowSlot::FrontItems).occupant_at(0), Some(item));
        assert!(world.get::<&Animation>(item).is_err());
        // Landed exactly on the cell.
        let (cx, cy) = scale.items.row(RowSlot::FrontItems).cell_position(0);
        let pos = world.get::<&Position>(item).unwrap().point;
        assert_eq!((pos.x, pos.y), (cx, cy));
    }

    #[test]
    fn test_competitors_for_one_cell_end_in_distinct_cells() {
        let (mut world, mut shelf, mut scale) = small_world();
        let claim = CellRef {
            container: ContainerKind::Scale,
            row: RowSlot::FrontItems,
            index: 0,
        };
        // Two items racing for the same cell from different distances.
        let near = spawn_flying_item(&mut world, &shelf, &scale, claim, Vec2::new(150.0, 190.0));
        let far = spawn_flying_item(&mut world, &shelf, &scale, claim, Vec2::new(-400.0, -400.0));

        let arrivals = run_until_settled(&mut world, &mut shelf, &mut scale);
        assert_eq!(arrivals.len(), 2);
        let near_cell = arrivals.iter().find(|a| a.entity == near).unwrap().cell;
        let far_cell = arrivals.iter().find(|a| a.entity == far).unwrap().cell;
        assert_ne!(near_cell, far_cell);
        // The nearer one won the contested cell; the later one retargeted.
        assert_eq!(near_cell, claim);
        assert_eq!(scale.items.occupied_count(), 2);
    }

    #[test]
    fn test_reserved_claims_never_retarget() {
        let (mut world, mut shelf, mut scale) = small_world();
        let claim = CellRef {
            container: ContainerKind::Scale,
            row: RowSlot::BackItems,
            index: 1,
        };
        let dest = row_for(&shelf, &scale, claim).cell_position(claim.index);
        let item = world.spawn((
            Position {
                point: Vec2::new(0.0, 0.0),
            },
            MarketItem {
                kind: ItemKind::Apples,
            },
            Animation {
                flight: Flight::new((0.0, 0.0), dest, 400.0, Easing::QuadOut),
                claim,
                reserved: true,
            },
        ));
        // Reserved placement happens up front.
        scale.items.row_mut(RowSlot::BackItems).put(item, 1);

        let arrivals = run_until_settled(&mut world, &mut shelf, &mut scale);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].cell, claim);
        assert_eq!(scale.items.row(RowSlot::BackItems).occupant_at(1), Some(item));
    }
}
