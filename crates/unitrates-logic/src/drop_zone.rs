//! Release-point → target container decision.
//!
//! When a drag ends, the release point alone decides whether the movable
//! heads for the scale or back to the shelf: anything released above the
//! scale line goes to the scale. Coordinates are screen-style, y growing
//! downward, so "above" means a smaller y.

use serde::{Deserialize, Serialize};

/// Which container a released movable should animate toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    Shelf,
    Scale,
}

/// The vertical split between scale territory and shelf territory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DropZones {
    /// Release points with y strictly less than this go to the scale.
    pub y_above_scale: f32,
}

impl DropZones {
    pub fn new(y_above_scale: f32) -> Self {
        Self { y_above_scale }
    }

    pub fn choose(&self, release_y: f32) -> DropTarget {
        if release_y < self.y_above_scale {
            DropTarget::Scale
        } else {
            DropTarget::Shelf
        }
    }
}
