//! Favorites slice: an ordered set of product ids with snapshots.
//!
//! `order` holds ids most-recently-toggled-on first; `snapshots` maps
//! each id to the product as it looked when favorited. The two stay in
//! lockstep: `order` is exactly the key set of `snapshots`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vitrine_core::{Product, ProductId};

/// Favorites slice state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesState {
    /// Favorited ids, most recently toggled on first.
    pub order: Vec<ProductId>,
    /// Product snapshot per favorited id.
    pub snapshots: HashMap<ProductId, Product>,
}

impl FavoritesState {
    /// Whether a product is currently favorited.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.snapshots.contains_key(&id)
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Snapshots in display order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Product> {
        self.order
            .iter()
            .filter_map(|id| self.snapshots.get(id))
            .collect()
    }

    /// Check the order/snapshots invariant: `order` is exactly the key
    /// set of `snapshots`, with no duplicates.
    ///
    /// Hydration uses this to reject records that drifted out of shape
    /// (hand-edited storage, older format).
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.snapshots.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.order
            .iter()
            .all(|id| seen.insert(*id) && self.snapshots.contains_key(id))
    }
}

/// Actions understood by the favorites reducer.
#[derive(Debug, Clone)]
pub enum FavoritesAction {
    /// Flip a product's favorited status. Toggling off drops the stored
    /// snapshot, so toggling back on stores the product passed in at
    /// that moment - a fresh snapshot, not the stale one.
    Toggle(Product),
    /// Unfavorite by id. No-op when absent.
    Remove(ProductId),
    /// Drop all favorites.
    Clear,
    /// Wholesale replacement, used only by hydration.
    Replace(FavoritesState),
}

/// Pure state transition for the favorites slice.
#[must_use]
pub fn reduce(state: &FavoritesState, action: &FavoritesAction) -> FavoritesState {
    match action {
        FavoritesAction::Toggle(product) => {
            if state.contains(product.id) {
                remove(state, product.id)
            } else {
                let mut order = Vec::with_capacity(state.order.len() + 1);
                order.push(product.id);
                order.extend(state.order.iter().copied());
                let mut snapshots = state.snapshots.clone();
                snapshots.insert(product.id, product.clone());
                FavoritesState { order, snapshots }
            }
        }
        FavoritesAction::Remove(id) => remove(state, *id),
        FavoritesAction::Clear => FavoritesState::default(),
        FavoritesAction::Replace(next) => next.clone(),
    }
}

fn remove(state: &FavoritesState, id: ProductId) -> FavoritesState {
    if !state.contains(id) {
        return state.clone();
    }
    let mut snapshots = state.snapshots.clone();
    snapshots.remove(&id);
    FavoritesState {
        order: state.order.iter().copied().filter(|o| *o != id).collect(),
        snapshots,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::test_support::sample_product;

    #[test]
    fn test_toggle_on_prepends() {
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        let state = reduce(&state, &FavoritesAction::Toggle(sample_product(2)));

        assert_eq!(state.order, vec![ProductId::new(2), ProductId::new(1)]);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_toggle_twice_restores_prior_order() {
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        let before = state.clone();

        let state = reduce(&state, &FavoritesAction::Toggle(sample_product(2)));
        let state = reduce(&state, &FavoritesAction::Toggle(sample_product(2)));

        assert_eq!(state.order, before.order);
        assert!(!state.contains(ProductId::new(2)));
        assert!(state.contains(ProductId::new(1)));
    }

    #[test]
    fn test_retoggle_stores_fresh_snapshot() {
        let mut product = sample_product(1);
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(product.clone()),
        );
        let state = reduce(&state, &FavoritesAction::Toggle(product.clone()));

        // The catalog product changed between toggles.
        product.title = "Renamed".to_string();
        let state = reduce(&state, &FavoritesAction::Toggle(product.clone()));

        assert_eq!(
            state.snapshots.get(&product.id).unwrap().title,
            "Renamed"
        );
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        let before = state.clone();
        let state = reduce(&state, &FavoritesAction::Remove(ProductId::new(9)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_clear() {
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        let state = reduce(&state, &FavoritesAction::Clear);
        assert!(state.is_empty());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_is_consistent_detects_dangling_order_entry() {
        let mut state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        state.order.push(ProductId::new(99));
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_is_consistent_detects_duplicate_order_entry() {
        let mut state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        state.order.push(ProductId::new(1));
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_ordered_follows_order_vec() {
        let state = reduce(
            &FavoritesState::default(),
            &FavoritesAction::Toggle(sample_product(1)),
        );
        let state = reduce(&state, &FavoritesAction::Toggle(sample_product(2)));
        let ordered = state.ordered();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].id, ProductId::new(2));
        assert_eq!(ordered[1].id, ProductId::new(1));
    }
}
