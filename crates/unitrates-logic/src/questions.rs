//! Rate questions - the "Unit Rate?", "Cost of N?", and "How many for $X?"
//! exercises posed for each item kind, with exact expected answers and
//! tolerant answer checking.
//!
//! Construction is deterministic given a kind and quantity; picking and
//! ordering candidate quantities is the engine's job (it shuffles).

use serde::{Deserialize, Serialize};

use crate::items::{ItemKind, Measure};
use crate::rates;

/// The three question forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// "What is the unit rate?" - answer in dollars per unit.
    UnitRate,
    /// "What is the cost of N units?" - answer in dollars.
    CostOf,
    /// "How many units for $X?" - answer in units.
    QuantityFor,
}

/// One posed question with its exact expected answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    pub item: ItemKind,
    /// The quantity the question is about (units for CostOf, units expected
    /// back for QuantityFor, 1 for UnitRate).
    pub quantity: f64,
    /// Expected answer: dollars for UnitRate/CostOf, units for QuantityFor.
    pub answer: f64,
}

impl Question {
    pub fn unit_rate(item: ItemKind) -> Self {
        Self {
            kind: QuestionKind::UnitRate,
            item,
            quantity: 1.0,
            answer: item.data().unit_rate,
        }
    }

    pub fn cost_of(item: ItemKind, quantity: f64) -> Self {
        Self {
            kind: QuestionKind::CostOf,
            item,
            quantity,
            answer: rates::round_to_cents(rates::cost_of(item.data().unit_rate, quantity)),
        }
    }

    /// "How many units for the cost of `quantity` units?" - built from a
    /// quantity so the answer is always exact.
    pub fn quantity_for(item: ItemKind, quantity: f64) -> Self {
        Self {
            kind: QuestionKind::QuantityFor,
            item,
            quantity,
            answer: quantity,
        }
    }

    /// The dollar amount named in the question text (for QuantityFor), or
    /// the cost being asked about.
    pub fn dollars(&self) -> f64 {
        match self.kind {
            QuestionKind::UnitRate => self.answer,
            QuestionKind::CostOf => self.answer,
            QuestionKind::QuantityFor => {
                rates::round_to_cents(rates::cost_of(self.item.data().unit_rate, self.quantity))
            }
        }
    }

    /// Check a guessed answer. Dollar answers are right to the cent;
    /// quantity answers must match to a tenth of a unit (candy weights are
    /// fractional).
    pub fn check(&self, guess: f64) -> bool {
        match self.kind {
            QuestionKind::UnitRate | QuestionKind::CostOf => rates::eq_to_cents(self.answer, guess),
            QuestionKind::QuantityFor => (self.answer - guess).abs() < 0.05,
        }
    }
}

/// Candidate quantities to ask about for a kind - small multiples of one
/// bag, excluding the trivial single unit.
pub fn candidate_quantities(item: ItemKind) -> Vec<f64> {
    let data = item.data();
    let per_bag = data.bag_quantity;
    match data.measure {
        Measure::Count => {
            let per_bag = per_bag as u32;
            let max = per_bag * data.bags_per_scene;
            (2..=max).map(f64::from).collect()
        }
        // Whole bags only for weighed goods.
        Measure::Pounds => (1..=data.bags_per_scene)
            .map(|n| f64::from(n) * per_bag)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_rate_question() {
        let q = Question::unit_rate(ItemKind::Apples);
        assert_eq!(q.answer, 0.50);
        assert!(q.check(0.50));
        assert!(!q.check(0.55));
    }

    #[test]
    fn test_cost_of_question() {
        let q = Question::cost_of(ItemKind::Lemons, 8.0);
        // 8 lemons at $0.25.
        assert_eq!(q.answer, 2.00);
        assert!(q.check(2.0));
        assert!(q.check(2.004));
        assert!(!q.check(2.01));
    }

    #[test]
    fn test_quantity_for_question() {
        let q = Question::quantity_for(ItemKind::Carrots, 6.0);
        assert_eq!(q.answer, 6.0);
        assert_eq!(q.dollars(), 0.90);
        assert!(q.check(6.0));
        assert!(!q.check(7.0));
    }

    #[test]
    fn test_candidates_countable() {
        let candidates = candidate_quantities(ItemKind::Apples);
        // 2..=15 apples (3 bags of 5).
        assert_eq!(candidates.first(), Some(&2.0));
        assert_eq!(candidates.last(), Some(&15.0));
        assert_eq!(candidates.len(), 14);
    }

    #[test]
    fn test_candidates_weighed_are_whole_bags() {
        let candidates = candidate_quantities(ItemKind::PurpleCandy);
        assert_eq!(candidates.len(), 4);
        assert!((candidates[0] - 0.4).abs() < 1e-9);
        assert!((candidates[3] - 1.6).abs() < 1e-9);
    }
}
