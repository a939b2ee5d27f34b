//! Shopping basket state.
//!
//! The basket lives only for the app session and changes only through
//! [`CartState::reduce`], a pure transition over the five [`CartAction`]s.
//! Line items are keyed by product ID, kept in the order they were first
//! added, and never carry a quantity of zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use laundry_core::{ImageRef, Price, ProductId};

/// A product as offered for adding to the basket (no quantity yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product identifier; unique within a basket.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image.
    pub image: ImageRef,
}

/// One line item in the basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image.
    pub image: ImageRef,
    quantity: u32,
}

impl CartItem {
    fn first(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
        }
    }

    /// Units of this product in the basket. Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Actions accepted by the basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit, creating the line item if needed.
    AddItem(NewCartItem),
    /// Drop the line item entirely.
    RemoveItem(ProductId),
    /// One more unit of an existing line item.
    Increment(ProductId),
    /// One fewer unit; the line item goes away when it reaches zero.
    Decrement(ProductId),
    /// Empty the basket.
    ClearBasket,
}

/// The basket: line items in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// An empty basket.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Apply `action` and return the next state.
    ///
    /// Total over every state and action: actions naming a product that is
    /// not in the basket leave it unchanged.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem(item) => match self.position(&item.id) {
                Some(idx) => self.bump(idx),
                None => self.items.push(CartItem::first(item)),
            },
            CartAction::RemoveItem(id) => self.items.retain(|item| item.id != id),
            CartAction::Increment(id) => {
                if let Some(idx) = self.position(&id) {
                    self.bump(idx);
                }
            }
            CartAction::Decrement(id) => {
                if let Some(idx) = self.position(&id) {
                    self.drop_one(idx);
                }
            }
            CartAction::ClearBasket => self.items.clear(),
        }
        self
    }

    /// Apply `action` in place.
    pub fn dispatch(&mut self, action: CartAction) {
        *self = std::mem::take(self).reduce(action);
    }

    /// Line items in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line item for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals.
    ///
    /// Currency is not checked; the catalogue is single-currency per tenant.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn bump(&mut self, idx: usize) {
        if let Some(item) = self.items.get_mut(idx) {
            item.quantity = item.quantity.saturating_add(1);
        }
    }

    fn drop_one(&mut self, idx: usize) {
        let Some(item) = self.items.get_mut(idx) else {
            return;
        };
        if item.quantity > 1 {
            item.quantity -= 1;
        } else {
            self.items.remove(idx);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_core::CurrencyCode;

    use super::*;

    fn product(id: &str, cents: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Service {id}"),
            price: Price::from_cents(cents, CurrencyCode::USD).unwrap(),
            image: ImageRef::new(format!("{id}.png")),
        }
    }

    fn quantities(cart: &CartState) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|item| (item.id.as_str(), item.quantity()))
            .collect()
    }

    #[test]
    fn test_add_same_id_twice_merges() {
        let cart = CartState::new()
            .reduce(CartAction::AddItem(product("x", 100)))
            .reduce(CartAction::AddItem(product("x", 100)));
        assert_eq!(quantities(&cart), vec![("x", 2)]);
    }

    #[test]
    fn test_add_add_decrement_leaves_one() {
        let cart = CartState::new()
            .reduce(CartAction::AddItem(product("x", 100)))
            .reduce(CartAction::AddItem(product("x", 100)))
            .reduce(CartAction::Decrement(ProductId::new("x")));
        assert_eq!(quantities(&cart), vec![("x", 1)]);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let cart = CartState::new()
            .reduce(CartAction::AddItem(product("x", 100)))
            .reduce(CartAction::AddItem(product("y", 100)))
            .reduce(CartAction::Decrement(ProductId::new("x")));
        assert_eq!(quantities(&cart), vec![("y", 1)]);
        assert!(cart.get(&ProductId::new("x")).is_none());
    }

    #[test]
    fn test_insertion_order_is_first_add() {
        let cart = CartState::new()
            .reduce(CartAction::AddItem(product("a", 100)))
            .reduce(CartAction::AddItem(product("b", 100)))
            .reduce(CartAction::AddItem(product("a", 100)))
            .reduce(CartAction::Increment(ProductId::new("b")));
        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let start = CartState::new().reduce(CartAction::AddItem(product("a", 100)));
        for action in [
            CartAction::RemoveItem(ProductId::new("zzz")),
            CartAction::Increment(ProductId::new("zzz")),
            CartAction::Decrement(ProductId::new("zzz")),
        ] {
            assert_eq!(start.clone().reduce(action), start);
        }
    }

    #[test]
    fn test_remove_item() {
        let cart = CartState::new()
            .reduce(CartAction::AddItem(product("a", 100)))
            .reduce(CartAction::Increment(ProductId::new("a")))
            .reduce(CartAction::RemoveItem(ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_basket_is_idempotent() {
        let mut cart = CartState::new();
        cart.dispatch(CartAction::AddItem(product("a", 100)));
        cart.dispatch(CartAction::AddItem(product("b", 100)));
        cart.dispatch(CartAction::ClearBasket);
        assert!(cart.is_empty());
        cart.dispatch(CartAction::ClearBasket);
        assert_eq!(cart, CartState::new());
    }

    #[test]
    fn test_totals() {
        let mut cart = CartState::new();
        cart.dispatch(CartAction::AddItem(product("shirt", 250)));
        cart.dispatch(CartAction::AddItem(product("shirt", 250)));
        cart.dispatch(CartAction::AddItem(product("duvet", 1500)));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(2000, 2));
    }

    /// Deterministic pseudo-random action sequences never leave a zero
    /// quantity or a duplicate ID behind.
    #[test]
    fn test_invariants_hold_over_action_sequences() {
        let ids = ["a", "b", "c"];
        let mut seed: u32 = 0x9E37_79B9;
        let mut cart = CartState::new();

        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let id = ids[(seed % 3) as usize];
            let action = match (seed >> 8) % 5 {
                0 => CartAction::AddItem(product(id, 100)),
                1 => CartAction::RemoveItem(ProductId::new(id)),
                2 => CartAction::Increment(ProductId::new(id)),
                3 => CartAction::Decrement(ProductId::new(id)),
                _ => CartAction::ClearBasket,
            };
            cart.dispatch(action);

            assert!(cart.items().iter().all(|item| item.quantity() >= 1));
            let mut seen: Vec<_> = cart.items().iter().map(|item| &item.id).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), cart.len());
        }
    }
}
