//! Item catalog - the kinds of groceries the market sells and their
//! per-kind data: unit rate, bag quantity, shelf stock, and whether a bag
//! opens into individual items when it lands on the scale.
//!
//! Countable kinds (fruit, vegetables) are priced per item and their bags
//! open on the scale. Candy is priced per pound and stays bagged.

use serde::{Deserialize, Serialize};

/// What one unit of an item means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measure {
    /// Priced and counted per individual item.
    Count,
    /// Priced and weighed per pound.
    Pounds,
}

/// Item groupings, one market scene per kind within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fruit,
    Vegetable,
    Candy,
}

/// Static data for one item kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemData {
    pub name: &'static str,
    pub category: Category,
    pub measure: Measure,
    /// Dollars per unit (per item or per pound).
    pub unit_rate: f64,
    /// Units in one bag (items, or pounds of candy).
    pub bag_quantity: f64,
    /// Bags stocked on the shelf at scene start.
    pub bags_per_scene: u32,
    /// Whether a bag dropped on the scale opens into individual items.
    pub bag_opens: bool,
}

impl ItemData {
    /// Dollars for one full bag.
    pub fn bag_rate(&self) -> f64 {
        self.unit_rate * self.bag_quantity
    }

    /// Individual items per bag, for kinds whose bags open.
    pub fn items_per_bag(&self) -> Option<u32> {
        if self.bag_opens {
            Some(self.bag_quantity as u32)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemKind {
    Apples = 0,
    Lemons = 1,
    Oranges = 2,
    Carrots = 3,
    Cucumbers = 4,
    Tomatoes = 5,
    PurpleCandy = 6,
    RedCandy = 7,
}

/// Every kind, in catalog order.
pub const ALL_KINDS: [ItemKind; 8] = [
    ItemKind::Apples,
    ItemKind::Lemons,
    ItemKind::Oranges,
    ItemKind::Carrots,
    ItemKind::Cucumbers,
    ItemKind::Tomatoes,
    ItemKind::PurpleCandy,
    ItemKind::RedCandy,
];

impl ItemKind {
    pub fn from_u8(id: u8) -> Option<Self> {
        ALL_KINDS.get(id as usize).copied()
    }

    pub fn data(&self) -> ItemData {
        match self {
            Self::Apples => ItemData {
                name: "Apples",
                category: Category::Fruit,
                measure: Measure::Count,
                unit_rate: 0.50,
                bag_quantity: 5.0,
                bags_per_scene: 3,
                bag_opens: true,
            },
            Self::Lemons => ItemData {
                name: "Lemons",
                category: Category::Fruit,
                measure: Measure::Count,
                unit_rate: 0.25,
                bag_quantity: 5.0,
                bags_per_scene: 3,
                bag_opens: true,
            },
            Self::Oranges => ItemData {
                name: "Oranges",
                category: Category::Fruit,
                measure: Measure::Count,
                unit_rate: 0.75,
                bag_quantity: 5.0,
                bags_per_scene: 3,
                bag_opens: true,
            },
            Self::Carrots => ItemData {
                name: "Carrots",
                category: Category::Vegetable,
                measure: Measure::Count,
                unit_rate: 0.15,
                bag_quantity: 4.0,
                bags_per_scene: 4,
                bag_opens: true,
            },
            Self::Cucumbers => ItemData {
                name: "Cucumbers",
                category: Category::Vegetable,
                measure: Measure::Count,
                unit_rate: 0.22,
                bag_quantity: 3.0,
                bags_per_scene: 4,
                bag_opens: true,
            },
            Self::Tomatoes => ItemData {
                name: "Tomatoes",
                category: Category::Vegetable,
                measure: Measure::Count,
                unit_rate: 0.16,
                bag_quantity: 4.0,
                bags_per_scene: 4,
                bag_opens: true,
            },
            Self::PurpleCandy => ItemData {
                name: "Purple Candy",
                category: Category::Candy,
                measure: Measure::Pounds,
                unit_rate: 5.40,
                bag_quantity: 0.4,
                bags_per_scene: 4,
                bag_opens: false,
            },
            Self::RedCandy => ItemData {
                name: "Red Candy",
                category: Category::Candy,
                measure: Measure::Pounds,
                unit_rate: 3.80,
                bag_quantity: 0.3,
                bags_per_scene: 4,
                bag_opens: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(ItemKind::from_u8(kind as u8), Some(kind));
        }
        assert_eq!(ItemKind::from_u8(200), None);
    }

    #[test]
    fn test_countable_bags_open() {
        for kind in ALL_KINDS {
            let data = kind.data();
            match data.measure {
                Measure::Count => {
                    assert!(data.bag_opens, "{} should open", data.name);
                    let per_bag = data.items_per_bag().unwrap();
                    assert!(per_bag > 0);
                    assert_eq!(per_bag as f64, data.bag_quantity);
                }
                Measure::Pounds => {
                    assert!(!data.bag_opens, "{} should stay bagged", data.name);
                    assert_eq!(data.items_per_bag(), None);
                }
            }
        }
    }

    #[test]
    fn test_bag_rate() {
        let apples = ItemKind::Apples.data();
        assert!((apples.bag_rate() - 2.50).abs() < 1e-9);
        let candy = ItemKind::PurpleCandy.data();
        assert!((candy.bag_rate() - 2.16).abs() < 1e-9);
    }

    #[test]
    fn test_rates_positive() {
        for kind in ALL_KINDS {
            let data = kind.data();
            assert!(data.unit_rate > 0.0);
            assert!(data.bag_quantity > 0.0);
            assert!(data.bags_per_scene > 0);
        }
    }
}
