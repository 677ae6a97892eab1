//! Market entity components - bags and the individual items they hold.

use serde::{Deserialize, Serialize};
use unitrates_logic::items::ItemKind;

/// A bag of groceries. Kind data (contents, pricing, whether the bag
/// opens on the scale) comes from the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bag {
    pub kind: ItemKind,
}

/// One individual item, spawned when a bag opens on the scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketItem {
    pub kind: ItemKind,
}
