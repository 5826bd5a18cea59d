//! Cart slice: product snapshots with quantities.
//!
//! Lines are keyed by product id (unique, insertion order preserved) and
//! every quantity is at least 1. A quantity driven to zero deletes the
//! line instead of persisting a non-positive count, so malformed inputs
//! are clamped rather than rejected.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrine_core::{Product, ProductId};

/// One cart line: a product snapshot plus a quantity.
///
/// The snapshot is copied at the moment the product is added; later
/// catalog edits do not flow into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product as it looked when added.
    pub product: Product,
    /// Units of this product, always >= 1.
    pub quantity: u32,
}

/// Cart slice state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Lines in insertion order, unique per product id.
    pub lines: Vec<CartLine>,
    /// When the cart last changed. `None` until the first mutation.
    pub last_modified: Option<DateTime<Utc>>,
}

impl CartState {
    /// Look up the line for a product id, if present.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line price x quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.product.price * Decimal::from(line.quantity))
            .sum()
    }
}

/// Actions understood by the cart reducer.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add one unit of a product: increments the existing line or appends
    /// a new line with quantity 1.
    AddItem(Product),
    /// Delete the line for an id. No-op when absent.
    RemoveItem(ProductId),
    /// Set an existing line's quantity. Non-positive values delete the
    /// line. No-op when absent.
    UpdateQuantity {
        /// Product id of the line to change.
        id: ProductId,
        /// Requested quantity; `<= 0` means delete.
        quantity: i64,
    },
    /// Empty the cart.
    Clear,
    /// Wholesale replacement, used only by hydration.
    Replace(CartState),
}

/// Pure state transition for the cart slice.
#[must_use]
pub fn reduce(state: &CartState, action: &CartAction) -> CartState {
    match action {
        CartAction::AddItem(product) => {
            let mut lines = state.lines.clone();
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product.id) {
                line.quantity += 1;
            } else {
                lines.push(CartLine {
                    product: product.clone(),
                    quantity: 1,
                });
            }
            CartState {
                lines,
                last_modified: Some(Utc::now()),
            }
        }
        CartAction::RemoveItem(id) => CartState {
            lines: state
                .lines
                .iter()
                .filter(|line| line.product.id != *id)
                .cloned()
                .collect(),
            last_modified: Some(Utc::now()),
        },
        CartAction::UpdateQuantity { id, quantity } => {
            // Only stamps last_modified when the line actually exists.
            if state.line(*id).is_none() {
                return state.clone();
            }
            let lines = if *quantity > 0 {
                let clamped = u32::try_from(*quantity).unwrap_or(u32::MAX);
                state
                    .lines
                    .iter()
                    .map(|line| {
                        if line.product.id == *id {
                            CartLine {
                                product: line.product.clone(),
                                quantity: clamped,
                            }
                        } else {
                            line.clone()
                        }
                    })
                    .collect()
            } else {
                state
                    .lines
                    .iter()
                    .filter(|line| line.product.id != *id)
                    .cloned()
                    .collect()
            };
            CartState {
                lines,
                last_modified: Some(Utc::now()),
            }
        }
        CartAction::Clear => CartState {
            lines: Vec::new(),
            last_modified: Some(Utc::now()),
        },
        CartAction::Replace(next) => next.clone(),
    }
}
