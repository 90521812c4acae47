//! Position computation
//!
//! Pure arithmetic over an ascending sibling sequence. Nothing here touches
//! storage.

use std::marker::PhantomData;

use crate::config::OrderingConfig;
use crate::domain::OrderedItem;

/// Computes fractional position keys for one kind of ordered item
#[derive(Clone)]
pub struct PositionEngine<T> {
    config: OrderingConfig,
    _item: PhantomData<fn(&T)>,
}

impl<T: OrderedItem> PositionEngine<T> {
    pub fn new(config: OrderingConfig) -> Self {
        Self {
            config,
            _item: PhantomData,
        }
    }

    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Key for an item inserted at `target_index` of `siblings`.
    ///
    /// `siblings` must be ascending and must not contain the item being placed.
    /// The caller validates `target_index <= siblings.len()`; a larger index is
    /// treated as an append.
    ///
    /// When repeated bisection has exhausted the gap the mean can equal a
    /// neighbour; that value is still returned and [`Self::needs_reindex`]
    /// reports the collision.
    pub fn compute_insertion_position(&self, siblings: &[T], target_index: usize) -> f64 {
        let position = match siblings {
            [] => self.config.empty_position,
            [first, ..] if target_index == 0 => first.position() / 2.0,
            [.., last] if target_index >= siblings.len() => last.position() + self.config.spacing,
            _ => {
                let prev = siblings[target_index - 1].position();
                let next = siblings[target_index].position();
                let mid = (prev + next) / 2.0;
                if mid <= prev || mid >= next {
                    log::warn!(
                        "{} bisection between {} and {} is degenerate ({})",
                        T::KIND,
                        prev,
                        next,
                        mid
                    );
                }
                mid
            }
        };
        log::debug!(
            "{} position for index {} of {}: {}",
            T::KIND,
            target_index,
            siblings.len(),
            position
        );
        position
    }

    /// Key for a newly created item appended to a container holding
    /// `live_count` live items, whose highest existing key is `last`.
    ///
    /// Follows the `(count + 1) * spacing` convention, bumped past `last`
    /// when moves or archiving have left a higher key behind.
    pub fn append_position(&self, live_count: usize, last: Option<f64>) -> f64 {
        let by_count = (live_count as f64 + 1.0) * self.config.spacing;
        match last {
            Some(last) if by_count <= last => last + self.config.spacing,
            _ => by_count,
        }
    }

    /// True iff two adjacent siblings are closer than the configured minimum
    /// gap. Pass the full sequence with the placed item already in its slot.
    pub fn needs_reindex(&self, siblings: &[T]) -> bool {
        siblings
            .windows(2)
            .any(|pair| (pair[1].position() - pair[0].position()).abs() < self.config.min_gap)
    }

    /// Evenly spaced keys for `count` items: spacing, 2 * spacing, ...
    pub fn spaced_positions(&self, count: usize) -> impl Iterator<Item = f64> + '_ {
        (1..=count).map(move |i| i as f64 * self.config.spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Card;

    fn cards(positions: &[f64]) -> Vec<Card> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut card = Card::new(format!("c{}", i));
                card.id = i as u32 + 1;
                card.place(1, *p);
                card
            })
            .collect()
    }

    fn engine() -> PositionEngine<Card> {
        PositionEngine::new(OrderingConfig::default())
    }

    #[test]
    fn test_empty_container_gets_default() {
        assert_eq!(engine().compute_insertion_position(&[], 0), 100.0);
    }

    #[test]
    fn test_head_insert_halves_first() {
        let siblings = cards(&[100.0, 200.0]);
        assert_eq!(engine().compute_insertion_position(&siblings, 0), 50.0);
    }

    #[test]
    fn test_append_adds_spacing() {
        let siblings = cards(&[100.0, 200.0]);
        assert_eq!(engine().compute_insertion_position(&siblings, 2), 300.0);
        // Out-of-range index degrades to append
        assert_eq!(engine().compute_insertion_position(&siblings, 9), 300.0);
    }

    #[test]
    fn test_interior_insert_is_strictly_between() {
        let siblings = cards(&[100.0, 150.0, 400.0, 401.0]);
        for k in 1..siblings.len() {
            let p = engine().compute_insertion_position(&siblings, k);
            assert!(p > siblings[k - 1].position && p < siblings[k].position, "k = {}", k);
        }
    }

    #[test]
    fn test_degenerate_mean_is_returned() {
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        let siblings = cards(&[a, b]);
        let p = engine().compute_insertion_position(&siblings, 1);
        assert!(p == a || p == b);
    }

    #[test]
    fn test_needs_reindex_checks_every_pair() {
        let e = engine();
        assert!(!e.needs_reindex(&cards(&[100.0, 200.0, 300.0])));
        assert!(e.needs_reindex(&cards(&[100.0, 100.00005, 300.0])));
        // A tight pair far from the insertion slot still counts
        assert!(e.needs_reindex(&cards(&[1.0, 500.0, 600.0, 600.00001])));
        assert!(!e.needs_reindex(&cards(&[])));
        assert!(!e.needs_reindex(&cards(&[7.0])));
    }

    #[test]
    fn test_append_position_follows_count() {
        let e = engine();
        assert_eq!(e.append_position(0, None), 100.0);
        assert_eq!(e.append_position(1, Some(100.0)), 200.0);
        assert_eq!(e.append_position(3, Some(50.0)), 400.0);
    }

    #[test]
    fn test_append_position_never_collides_with_last() {
        // [100, 300] after the middle card moved out
        assert_eq!(engine().append_position(2, Some(300.0)), 400.0);
    }

    #[test]
    fn test_spaced_positions() {
        let keys: Vec<f64> = engine().spaced_positions(3).collect();
        assert_eq!(keys, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_repeated_bisection_trips_reindex() {
        let e = engine();
        let mut siblings = cards(&[50.0, 100.0]);
        let mut inserts = 0;
        while !e.needs_reindex(&siblings) {
            let p = e.compute_insertion_position(&siblings, 1);
            let mut card = Card::new("n");
            card.place(1, p);
            siblings.insert(1, card);
            inserts += 1;
            assert!(inserts < 64, "gap never closed");
        }
        // 50 / 2^19 < 1e-4 <= 50 / 2^18
        assert_eq!(inserts, 19);
    }
}
