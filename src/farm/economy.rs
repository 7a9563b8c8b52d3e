//! Animal shop arithmetic.

use std::collections::BTreeSet;

use crate::api::{AnimalDefinition, OwnedAnimal};

/// Whether `balance` covers `price`. Exact balance is enough.
#[must_use]
pub fn can_afford(balance: f64, price: f64) -> bool {
    balance >= price
}

/// Lowest enclosure position, starting at 1, not in `occupied`.
#[must_use]
pub fn next_free_position(occupied: &BTreeSet<u32>) -> u32 {
    let mut position = 1;
    while occupied.contains(&position) {
        position += 1;
    }
    position
}

/// Next level and its price for an owned animal, if the catalog has one.
#[must_use]
pub fn upgrade_price(animal: &OwnedAnimal, definition: &AnimalDefinition) -> Option<(u32, f64)> {
    let next = animal.level + 1;
    definition.level_price(next).map(|price| (next, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AnimalLevel;

    #[test]
    fn test_can_afford_boundary() {
        assert!(can_afford(500.0, 500.0));
        assert!(!can_afford(499.0, 500.0));
    }

    #[test]
    fn test_next_free_position_fills_gap() {
        let occupied: BTreeSet<u32> = [1, 2, 4].into_iter().collect();
        assert_eq!(next_free_position(&occupied), 3);
    }

    #[test]
    fn test_next_free_position_empty_and_dense() {
        assert_eq!(next_free_position(&BTreeSet::new()), 1);
        let occupied: BTreeSet<u32> = (1..=5).collect();
        assert_eq!(next_free_position(&occupied), 6);
    }

    #[test]
    fn test_upgrade_price() {
        let definition = AnimalDefinition {
            key: "fox".to_owned(),
            title: None,
            levels: vec![
                AnimalLevel { level: 1, price: 100.0 },
                AnimalLevel { level: 2, price: 300.0 },
            ],
        };
        let mut fox = OwnedAnimal {
            key: "fox".to_owned(),
            level: 1,
            position: 1,
        };
        assert_eq!(upgrade_price(&fox, &definition), Some((2, 300.0)));

        fox.level = 2;
        assert_eq!(upgrade_price(&fox, &definition), None);
    }
}
