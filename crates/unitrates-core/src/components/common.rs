//! Common components used by every movable entity type.

use serde::{Deserialize, Serialize};
use unitrates_logic::motion::Flight;

/// 2D position vector, screen-style coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Spatial position component - where a movable currently is.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub point: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            point: Vec2::new(x, y),
        }
    }
}

/// Which container a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    Shelf,
    Scale,
}

/// Which of a container's rows a cell belongs to. Front/back item rows
/// give the depth illusion; a host renders them on separate layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSlot {
    Bags,
    FrontItems,
    BackItems,
}

/// A specific cell in a specific container row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub container: ContainerKind,
    pub row: RowSlot,
    pub index: usize,
}

/// Dragging component - present only while the pointer holds the entity.
/// The entity owns no container cell while this is attached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dragging {
    /// Pointer-to-entity offset captured at grab time, so the entity does
    /// not jump under the pointer.
    pub grab_offset: Vec2,
}

/// Animation component - present only while an entity is en route to a
/// cell. Removed on arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    pub flight: Flight,
    /// The cell this flight is heading for.
    pub claim: CellRef,
    /// Reserved claims already occupy their cell (assigned synchronously
    /// at decomposition time) and never retarget. Unreserved claims are
    /// candidates only: the cell stays empty until arrival, and a
    /// competitor finishing first forces a retarget.
    pub reserved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec2::new(5.0, 8.0));

        let diff = b - a;
        assert_eq!(diff, Vec2::new(3.0, 4.0));

        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_vec2_tuple_round_trip() {
        let v = Vec2::new(3.5, -2.0);
        let t: (f32, f32) = v.into();
        assert_eq!(Vec2::from(t), v);
    }
}
