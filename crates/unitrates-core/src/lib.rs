//! Unit Rates Core - Market Simulation Engine
//!
//! An ECS-based model of the Unit Rates market: a shelf stocked with
//! grocery bags, a scale that prices what lands on it, and draggable
//! movables animated into row cells with mid-flight retargeting.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Bags and individual market items
//! - **Components**: Pure data attached to entities (Position, Dragging, Animation, ...)
//! - **Systems**: Logic that queries and updates components
//!
//! Rendering and input devices live outside this crate: a host drives the
//! engine with pointer calls and a per-frame `update`, and reads committed
//! placements (container, row, cell) to order its own scene graph.
//!
//! # Example
//!
//! ```rust,no_run
//! use unitrates_core::prelude::*;
//! use unitrates_logic::items::ItemKind;
//!
//! let mut engine = MarketEngine::new(SceneConfig::for_kind(ItemKind::Apples));
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod containers;
pub mod engine;
pub mod generation;
pub mod notify;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::containers::{Scale, ScaleTotals, Shelf};
    pub use crate::engine::{MarketEngine, SceneConfig};
}
