//! Double number line - paired cost/quantity markers along a shared axis.
//!
//! The top axis carries dollars, the bottom axis the matching quantity;
//! every marker is a (cost, quantity) pair at the same horizontal position.
//! Markers come from different creators with different permanence: answers
//! to questions stick around, scale snapshots are replaceable, and markers
//! typed into the editor can be undone one at a time.

use serde::{Deserialize, Serialize};

use crate::rates;

/// Who created a marker. Order is precedence: when a duplicate position is
/// added, the higher-precedence creator wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerOrigin {
    /// Typed into the marker editor; undoable, erasable.
    Editable = 0,
    /// Snapshot of the current scale reading; erasable.
    Scale = 1,
    /// Revealed by answering a question; permanent.
    Question = 2,
}

/// One cost/quantity pair on the line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Marker {
    /// Dollars (top axis).
    pub cost: f64,
    /// Units (bottom axis).
    pub quantity: f64,
    pub origin: MarkerOrigin,
}

/// What happened to an added marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New position, marker placed.
    Added,
    /// Same position existed with lower precedence; origin upgraded.
    Upgraded,
    /// Same position existed with equal or higher precedence; no change.
    Ignored,
    /// Quantity beyond the axis range; not placed.
    OutOfRange,
}

/// The double number line model for one item scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleNumberLine {
    /// Largest quantity the bottom axis can show.
    pub quantity_max: f64,
    markers: Vec<Marker>,
    /// Quantities of editable markers in creation order, for undo.
    undo_stack: Vec<f64>,
}

impl DoubleNumberLine {
    pub fn new(quantity_max: f64) -> Self {
        Self {
            quantity_max,
            markers: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn position_of(&self, quantity: f64) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| (m.quantity - quantity).abs() < 1e-6)
    }

    /// Add a marker, merging with any marker already at the same quantity.
    pub fn add(&mut self, marker: Marker) -> AddOutcome {
        if marker.quantity < 0.0 || marker.quantity > self.quantity_max {
            return AddOutcome::OutOfRange;
        }
        if let Some(i) = self.position_of(marker.quantity) {
            if marker.origin > self.markers[i].origin {
                self.markers[i].origin = marker.origin;
                self.undo_stack
                    .retain(|&q| (q - marker.quantity).abs() >= 1e-6);
                return AddOutcome::Upgraded;
            }
            return AddOutcome::Ignored;
        }
        if marker.origin == MarkerOrigin::Editable {
            self.undo_stack.push(marker.quantity);
        }
        self.markers.push(marker);
        AddOutcome::Added
    }

    /// Remove the most recently added editable marker, returning it.
    pub fn undo(&mut self) -> Option<Marker> {
        let quantity = self.undo_stack.pop()?;
        let i = self.position_of(quantity)?;
        Some(self.markers.remove(i))
    }

    /// Remove everything except permanent (question) markers.
    pub fn erase(&mut self) {
        self.markers.retain(|m| m.origin == MarkerOrigin::Question);
        self.undo_stack.clear();
    }

    /// Full reset to the empty line.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.undo_stack.clear();
    }
}

/// Marker for a cost/quantity reading at a given unit rate.
pub fn marker_for(unit_rate: f64, quantity: f64, origin: MarkerOrigin) -> Marker {
    Marker {
        cost: rates::round_to_cents(rates::cost_of(unit_rate, quantity)),
        quantity,
        origin,
    }
}
