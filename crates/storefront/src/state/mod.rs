//! Client-side application state: four independent slices composed into
//! one tree.
//!
//! Each slice is a pure `reduce(&state, &action) -> state` function with
//! no side effects and no reference to storage or the network. Slices
//! never fail: malformed inputs are clamped (a non-positive quantity
//! deletes the cart line) rather than rejected, so callers never branch
//! on a reducer error.
//!
//! The [`Store`] composes the slices, routes each [`Action`] to exactly
//! one of them, and notifies subscribers synchronously after every
//! mutation. Persistence is layered on top in [`crate::persist`]; the
//! reducers know nothing about it.

pub mod auth;
pub mod cart;
pub mod favorites;
mod store;
pub mod theme;

pub use auth::{AuthAction, AuthState};
pub use cart::{CartAction, CartLine, CartState};
pub use favorites::{FavoritesAction, FavoritesState};
pub use store::{Store, Subscription};
pub use theme::{ThemeAction, ThemeMode, ThemeState};

use serde::{Deserialize, Serialize};

/// The full state tree: one slot per slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    /// Shopping cart.
    pub cart: CartState,
    /// Favorites list.
    pub favorites: FavoritesState,
    /// Theme preference.
    pub theme: ThemeState,
    /// Demo identity.
    pub auth: AuthState,
}

/// An action addressed to one slice.
#[derive(Debug, Clone)]
pub enum Action {
    Cart(CartAction),
    Favorites(FavoritesAction),
    Theme(ThemeAction),
    Auth(AuthAction),
}

/// Route an action to its slice reducer and rebuild the tree.
///
/// Exactly one slice changes per action; the other three are carried
/// over unchanged.
#[must_use]
pub fn reduce(state: &RootState, action: &Action) -> RootState {
    match action {
        Action::Cart(action) => RootState {
            cart: cart::reduce(&state.cart, action),
            ..state.clone()
        },
        Action::Favorites(action) => RootState {
            favorites: favorites::reduce(&state.favorites, action),
            ..state.clone()
        },
        Action::Theme(action) => RootState {
            theme: theme::reduce(&state.theme, action),
            ..state.clone()
        },
        Action::Auth(action) => RootState {
            auth: auth::reduce(&state.auth, action),
            ..state.clone()
        },
    }
}
