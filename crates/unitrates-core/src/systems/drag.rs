//! Drag system - pointer-driven state transitions for movables.
//!
//! A movable is Idle (resting in a container cell), Dragging (following
//! the pointer, owned by nothing), or Animating (en route to a claimed
//! cell). The pointer API below performs the Idle→Dragging,
//! Dragging→Dragging, and Dragging→Animating transitions; the animation
//! system finishes the rest each frame.
//!
//! All operations are synchronous with the caller's pointer events.

use hecs::{Entity, World};

use unitrates_logic::drop_zone::{DropTarget, DropZones};
use unitrates_logic::items::ItemKind;
use unitrates_logic::motion::{Easing, Flight};

use crate::components::{
    Animation, Bag, CellRef, ContainerKind, Dragging, MarketItem, Position, RowSlot, Vec2,
};
use crate::containers::{row_for, row_for_mut, Scale, Shelf};

/// Find the closest free cell for a movable in one container.
/// Bags search the bag row; items search the front/back pair.
pub(crate) fn search_cell(
    shelf: &Shelf,
    scale: &Scale,
    container: ContainerKind,
    is_bag: bool,
    at: Vec2,
) -> Option<CellRef> {
    match (container, is_bag) {
        (ContainerKind::Shelf, true) => {
            shelf.bags.closest_unoccupied_cell(at.x, at.y).map(|index| CellRef {
                container,
                row: RowSlot::Bags,
                index,
            })
        }
        (ContainerKind::Shelf, false) => {
            shelf.items.closest_unoccupied(at.x, at.y).map(|(row, index)| CellRef {
                container,
                row,
                index,
            })
        }
        (ContainerKind::Scale, true) => {
            scale.bags.closest_unoccupied_cell(at.x, at.y).map(|index| CellRef {
                container,
                row: RowSlot::Bags,
                index,
            })
        }
        (ContainerKind::Scale, false) => {
            scale.items.closest_unoccupied(at.x, at.y).map(|(row, index)| CellRef {
                container,
                row,
                index,
            })
        }
    }
}

/// Same search, falling back to the other container when the preferred
/// one is full.
pub(crate) fn search_cell_with_fallback(
    shelf: &Shelf,
    scale: &Scale,
    preferred: ContainerKind,
    is_bag: bool,
    at: Vec2,
) -> Option<CellRef> {
    let other = match preferred {
        ContainerKind::Shelf => ContainerKind::Scale,
        ContainerKind::Scale => ContainerKind::Shelf,
    };
    search_cell(shelf, scale, preferred, is_bag, at)
        .or_else(|| search_cell(shelf, scale, other, is_bag, at))
}

/// Idle/Animating → Dragging. Detaches the entity from its container cell
/// (if it owns one) and cancels any in-flight animation.
pub fn begin_drag(
    world: &mut World,
    shelf: &mut Shelf,
    scale: &mut Scale,
    entity: Entity,
    pointer: Vec2,
) {
    // Cancel an in-flight animation; a reserved claim also owns a cell,
    // which the container removal below releases.
    let _ = world.remove_one::<Animation>(entity);
    let _ = shelf.take(entity).or_else(|| scale.take(entity));

    let grab_offset = world
        .get::<&Position>(entity)
        .map(|p| p.point - pointer)
        .unwrap_or(Vec2::ZERO);
    let _ = world.insert_one(entity, Dragging { grab_offset });
}

/// Dragging → Dragging. Position follows the pointer immediately.
pub fn drag_move(world: &mut World, entity: Entity, pointer: Vec2) {
    let grab_offset = match world.get::<&Dragging>(entity) {
        Ok(dragging) => dragging.grab_offset,
        Err(_) => return,
    };
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.point = pointer + grab_offset;
    }
}

/// Dragging → Animating. Decides the target container from the release
/// point, claims the closest free cell, and starts the flight. A bag of
/// countables released over the scale decomposes instead. Returns the
/// chosen target, or `None` if the entity was not being dragged.
pub fn end_drag(
    world: &mut World,
    shelf: &mut Shelf,
    scale: &mut Scale,
    zones: &DropZones,
    speed: f32,
    entity: Entity,
    pointer: Vec2,
) -> Option<DropTarget> {
    let grab_offset = world.remove_one::<Dragging>(entity).ok()?.grab_offset;
    let release = pointer + grab_offset;
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.point = release;
    }

    let target = zones.choose(release.y);
    let bag_kind = world.get::<&Bag>(entity).map(|b| b.kind).ok();

    if target == DropTarget::Scale {
        if let Some(kind) = bag_kind {
            if kind.data().bag_opens {
                decompose_bag(world, shelf, scale, speed, entity, release, kind);
                return Some(target);
            }
        }
    }

    let preferred = match target {
        DropTarget::Shelf => ContainerKind::Shelf,
        DropTarget::Scale => ContainerKind::Scale,
    };
    match search_cell_with_fallback(shelf, scale, preferred, bag_kind.is_some(), release) {
        Some(claim) => {
            let dest = row_for(shelf, scale, claim).cell_position(claim.index);
            let _ = world.insert_one(
                entity,
                Animation {
                    flight: Flight::new(release.into(), dest, speed, Easing::QuadOut),
                    claim,
                    reserved: false,
                },
            );
        }
        None => {
            // Both containers full for this movable type. Scene configs
            // size rows so this cannot happen; leave the movable at the
            // release point.
            log::warn!("no free cell anywhere for released movable");
        }
    }
    Some(target)
}

/// Bag decomposition: a bag of countables lands on the scale, so its N
/// items take its place. Cells are assigned synchronously (reserved
/// claims, one per item, never retargeted) while each item animates from
/// the release point to its cell; the bag entity is despawned. The caller
/// recomputes scale totals once for the whole batch.
fn decompose_bag(
    world: &mut World,
    shelf: &mut Shelf,
    scale: &mut Scale,
    speed: f32,
    bag_entity: Entity,
    release: Vec2,
    kind: ItemKind,
) {
    let count = kind.data().items_per_bag().unwrap_or(0);
    for _ in 0..count {
        // Scale first; an overfull scale spills onto the shelf.
        let claim = match scale
            .items
            .closest_unoccupied(release.x, release.y)
            .map(|(row, index)| CellRef {
                container: ContainerKind::Scale,
                row,
                index,
            })
            .or_else(|| search_cell(shelf, scale, ContainerKind::Shelf, false, release))
        {
            Some(claim) => claim,
            None => {
                log::warn!("no free cell for decomposed {} item", kind.data().name);
                continue;
            }
        };
        let dest = row_for(shelf, scale, claim).cell_position(claim.index);
        let item = world.spawn((
            Position { point: release },
            MarketItem { kind },
            Animation {
                flight: Flight::new(release.into(), dest, speed, Easing::QuadOut),
                claim,
                reserved: true,
            },
        ));
        row_for_mut(shelf, scale, claim).put(item, claim.index);
    }
    log::debug!("bag of {} opened into {} items", kind.data().name, count);
    let _ = world.despawn(bag_entity);
}
