//! Unit-rate arithmetic - cost/quantity conversions and cents rounding.
//!
//! All money values are dollars in f64; display rounding is to the cent.

/// Round dollars to the nearest cent.
pub fn round_to_cents(dollars: f64) -> f64 {
    (dollars * 100.0).round() / 100.0
}

/// Two dollar amounts equal to the cent.
pub fn eq_to_cents(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.005
}

/// Cost of `quantity` units at `unit_rate` dollars per unit.
pub fn cost_of(unit_rate: f64, quantity: f64) -> f64 {
    unit_rate * quantity
}

/// Units purchasable for `cost` dollars at `unit_rate` dollars per unit.
/// Returns 0 for a non-positive rate.
pub fn quantity_for(unit_rate: f64, cost: f64) -> f64 {
    if unit_rate <= 0.0 {
        0.0
    } else {
        cost / unit_rate
    }
}

/// Dollars per unit given a total cost and quantity. Returns 0 for a
/// non-positive quantity.
pub fn unit_rate(cost: f64, quantity: f64) -> f64 {
    if quantity <= 0.0 {
        0.0
    } else {
        cost / quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(1.005), 1.01);
        assert_eq!(round_to_cents(2.504), 2.5);
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn test_eq_to_cents() {
        assert!(eq_to_cents(1.50, 1.501));
        assert!(!eq_to_cents(1.50, 1.51));
    }

    #[test]
    fn test_cost_quantity_inverse() {
        let rate = 0.50;
        let cost = cost_of(rate, 7.0);
        assert_eq!(cost, 3.50);
        assert_eq!(quantity_for(rate, cost), 7.0);
    }

    #[test]
    fn test_unit_rate_from_totals() {
        assert_eq!(unit_rate(2.50, 5.0), 0.50);
        assert_eq!(unit_rate(2.50, 0.0), 0.0);
        assert_eq!(quantity_for(0.0, 5.0), 0.0);
    }
}
