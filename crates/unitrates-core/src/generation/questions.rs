//! Question-set generation
//!
//! Each set poses the unit-rate question first, then three exercises
//! about shuffled quantities: two "what does N cost?" and one "how many
//! for $X?". Quantities are drawn without replacement from the kind's
//! candidate pool, reshuffling the pool when it runs dry.

use rand::seq::SliceRandom;
use rand::Rng;

use unitrates_logic::items::ItemKind;
use unitrates_logic::questions::{candidate_quantities, Question};

/// Questions per set: unit rate + three quantity exercises.
pub const QUESTIONS_PER_SET: usize = 4;

/// Generate `set_count` question sets for the kind.
pub fn generate_question_sets(
    kind: ItemKind,
    set_count: usize,
    rng: &mut impl Rng,
) -> Vec<Vec<Question>> {
    let mut pool: Vec<f64> = Vec::new();
    let mut sets = Vec::with_capacity(set_count);
    for _ in 0..set_count {
        let a = draw(&mut pool, kind, &[], rng);
        let b = draw(&mut pool, kind, &[a], rng);
        let c = draw(&mut pool, kind, &[a, b], rng);
        sets.push(vec![
            Question::unit_rate(kind),
            Question::cost_of(kind, a),
            Question::cost_of(kind, b),
            Question::quantity_for(kind, c),
        ]);
    }
    sets
}

/// Pop the next quantity from the shuffled pool, refilling it when dry
/// and skipping anything already used in the current set.
fn draw(pool: &mut Vec<f64>, kind: ItemKind, exclude: &[f64], rng: &mut impl Rng) -> f64 {
    loop {
        if pool.is_empty() {
            *pool = candidate_quantities(kind);
            pool.shuffle(rng);
        }
        let quantity = match pool.pop() {
            Some(quantity) => quantity,
            None => continue, // refilled above; candidate lists are never empty
        };
        if !exclude.iter().any(|&q| (q - quantity).abs() < 1e-9) {
            return quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use unitrates_logic::questions::QuestionKind;

    #[test]
    fn test_set_structure() {
        let mut rng = StdRng::seed_from_u64(7);
        let sets = generate_question_sets(ItemKind::Apples, 3, &mut rng);
        assert_eq!(sets.len(), 3);
        for set in &sets {
            assert_eq!(set.len(), QUESTIONS_PER_SET);
            assert_eq!(set[0].kind, QuestionKind::UnitRate);
            assert_eq!(set[1].kind, QuestionKind::CostOf);
            assert_eq!(set[2].kind, QuestionKind::CostOf);
            assert_eq!(set[3].kind, QuestionKind::QuantityFor);
        }
    }

    #[test]
    fn test_no_repeated_quantity_within_a_set() {
        let mut rng = StdRng::seed_from_u64(42);
        // Candy has only four candidates, forcing pool refills.
        let sets = generate_question_sets(ItemKind::PurpleCandy, 5, &mut rng);
        for set in &sets {
            let quantities: Vec<f64> = set[1..].iter().map(|q| q.quantity).collect();
            for (i, a) in quantities.iter().enumerate() {
                for b in &quantities[i + 1..] {
                    assert!((a - b).abs() > 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_quantities_come_from_candidates() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = candidate_quantities(ItemKind::Carrots);
        let sets = generate_question_sets(ItemKind::Carrots, 4, &mut rng);
        for set in &sets {
            for question in &set[1..] {
                assert!(candidates
                    .iter()
                    .any(|&c| (c - question.quantity).abs() < 1e-9));
            }
        }
    }
}
