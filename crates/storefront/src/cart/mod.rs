//! Shopping cart store.
//!
//! The cart is an ordered list of line items, unique by product id, kept in
//! the visitor's session. Every mutation is followed by [`save`], so the
//! session store always holds the latest cart (last write wins).

use glowglaz_core::{Money, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::catalog::{Deal, Product};
use crate::models::session_keys;

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// A line for `product` at its list price.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.primary_image().to_owned(),
            quantity,
        }
    }

    /// A line for `product` at the deal's discounted price.
    #[must_use]
    pub fn from_deal(deal: &Deal, product: &Product, quantity: u32) -> Self {
        Self {
            price: deal.price_for(product),
            ..Self::from_product(product, quantity)
        }
    }

    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `line.quantity` units of a product.
    ///
    /// If the product is already in the cart its quantity grows and the
    /// existing title, price and image are kept. A quantity of zero counts
    /// as one.
    pub fn add(&mut self, mut line: CartLineItem) {
        line.quantity = line.quantity.max(1);
        match self.lines.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Remove a product. Returns whether it was in the cart.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Set a line's quantity, never below one. Returns whether the product
    /// was in the cart.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .map(|line| line.quantity = quantity.max(1))
            .is_some()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Comma-separated product titles, as used in order emails.
    #[must_use]
    pub fn titles(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Load the cart from the session.
///
/// A missing or unreadable cart is treated as empty.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session, starting empty");
            Cart::default()
        }
    }
}

/// Persist the cart to the session.
///
/// # Errors
///
/// Returns the session store error if the cart cannot be written.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
