//! Persistent shopping cart.
//!
//! Every operation is a read-modify-write against client storage: the current
//! cart is loaded, changed, written back and only then announced. A failed
//! write leaves the previously persisted cart in place, so the next read sees
//! a consistent state. A failed read aborts the operation before anything is
//! written. Two tabs writing concurrently resolve as last write wins.

use rrd_api_types::{CartLine, Currency, PersistedCart};
use rrd_catalog::Catalog;
use rrd_events::{Notifier, SubscriptionId};
use rrd_storage::{CART_KEY, KeyValueStore, StorageError, save_json, try_load_json};
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_QUANTITY: u32 = 10;
pub const GIFT_MESSAGE_LIMIT: usize = 180;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("product id is required")]
    MissingProductId,
    #[error("unknown product '{0}'")]
    UnknownProduct(String),
    #[error("failed to save cart: {0}")]
    Persist(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartSettings {
    pub max_quantity: u32,
    pub gift_wrap_fee: Decimal,
    pub gift_message_limit: usize,
    /// Initial currency snapshot for freshly created carts. Informational only.
    pub currency: Currency,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            max_quantity: MAX_QUANTITY,
            gift_wrap_fee: Decimal::from(10),
            gift_message_limit: GIFT_MESSAGE_LIMIT,
            currency: Currency::Aed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    LineAdded { id: String, requested: u32, qty: u32 },
    LineRemoved { id: String },
    QuantitySet { id: String, qty: u32 },
    GiftWrap(bool),
    GiftMessage,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
    pub change: CartChange,
}

pub struct CartStore {
    catalog: Rc<Catalog>,
    storage: Rc<dyn KeyValueStore>,
    settings: CartSettings,
    currency: Cell<Currency>,
    notifier: Notifier<CartEvent>,
}

impl CartStore {
    pub fn new(catalog: Rc<Catalog>, storage: Rc<dyn KeyValueStore>, mut settings: CartSettings) -> Self {
        settings.max_quantity = settings.max_quantity.max(1);
        Self {
            catalog,
            storage,
            currency: Cell::new(settings.currency),
            settings,
            notifier: Notifier::new(),
        }
    }

    pub fn settings(&self) -> &CartSettings {
        &self.settings
    }

    /// Currency recorded in carts created from now on.
    pub fn set_currency_snapshot(&self, currency: Currency) {
        self.currency.set(currency);
    }

    /// Current persisted cart, normalised, for display. An absent, corrupt or
    /// unreadable entry shows as an empty cart.
    pub fn snapshot(&self) -> PersistedCart {
        self.load().unwrap_or_else(|err| {
            warn!("cart unreadable, showing it empty: {}", err);
            PersistedCart::empty(self.currency.get())
        })
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.snapshot().items
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Add `qty` of a product, merging into an existing line.
    ///
    /// Returns the line's resulting quantity.
    pub fn add_line(&self, product_id: &str, qty: u32) -> Result<u32, CartError> {
        let id = self.resolve(product_id)?;
        let requested = qty.max(1);
        let max = self.settings.max_quantity;

        let mut cart = self.load_for_write()?;
        let resulting = match cart.items.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                line.qty = line.qty.saturating_add(requested).min(max);
                line.qty
            }
            None => {
                let qty = requested.min(max);
                cart.items.push(CartLine { id: id.clone(), qty });
                qty
            }
        };

        self.commit(
            &cart,
            CartChange::LineAdded {
                id,
                requested,
                qty: resulting,
            },
        )?;
        Ok(resulting)
    }

    /// Drop the line for `product_id`. Persists and notifies even when no
    /// such line existed.
    pub fn remove_line(&self, product_id: &str) -> Result<(), CartError> {
        let id = product_id.trim();
        if id.is_empty() {
            warn!("remove_line called without product id");
            return Err(CartError::MissingProductId);
        }

        let mut cart = self.load_for_write()?;
        cart.items.retain(|line| line.id != id);
        self.commit(&cart, CartChange::LineRemoved { id: id.to_owned() })
    }

    /// Clamp `qty` into `[1, max]` and store it. Returns `false` without
    /// touching storage when the cart has no line for the product.
    pub fn set_quantity(&self, product_id: &str, qty: i64) -> Result<bool, CartError> {
        let id = product_id.trim();
        if id.is_empty() {
            warn!("set_quantity called without product id");
            return Err(CartError::MissingProductId);
        }

        let qty = self.clamp_quantity(qty);
        let mut cart = self.load_for_write()?;
        let Some(line) = cart.items.iter_mut().find(|line| line.id == id) else {
            debug!("set_quantity ignored for '{}': not in cart", id);
            return Ok(false);
        };
        line.qty = qty;

        self.commit(
            &cart,
            CartChange::QuantitySet {
                id: id.to_owned(),
                qty,
            },
        )?;
        Ok(true)
    }

    pub fn set_gift_wrap(&self, enabled: bool) -> Result<(), CartError> {
        let mut cart = self.load_for_write()?;
        cart.gift_wrap = enabled;
        self.commit(&cart, CartChange::GiftWrap(enabled))
    }

    /// Store the gift message, cut to the configured character limit.
    pub fn set_gift_message(&self, message: &str) -> Result<(), CartError> {
        let mut cart = self.load_for_write()?;
        cart.gift_message = truncate_chars(message, self.settings.gift_message_limit);
        self.commit(&cart, CartChange::GiftMessage)
    }

    pub fn clear(&self) -> Result<(), CartError> {
        let cart = PersistedCart::empty(self.currency.get());
        self.commit(&cart, CartChange::Cleared)
    }

    /// Σ price × qty, plus the gift-wrap fee once when enabled. Lines whose
    /// product no longer resolves contribute nothing.
    pub fn total(&self) -> Decimal {
        self.total_of(&self.snapshot())
    }

    pub fn total_of(&self, cart: &PersistedCart) -> Decimal {
        let items: Decimal = cart
            .items
            .iter()
            .map(|line| {
                self.catalog
                    .price_of(&line.id)
                    .map(|price| price * Decimal::from(line.qty))
                    .unwrap_or(Decimal::ZERO)
            })
            .sum();

        if cart.gift_wrap {
            items + self.settings.gift_wrap_fee
        } else {
            items
        }
    }

    pub fn count(&self) -> u32 {
        self.snapshot().items.iter().map(|line| line.qty).sum()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn resolve(&self, product_id: &str) -> Result<String, CartError> {
        let id = product_id.trim();
        if id.is_empty() {
            warn!("add_line called without product id");
            return Err(CartError::MissingProductId);
        }
        if self.catalog.product(id).is_none() {
            warn!("add_line called with unknown product '{}'", id);
            return Err(CartError::UnknownProduct(id.to_owned()));
        }
        Ok(id.to_owned())
    }

    fn clamp_quantity(&self, qty: i64) -> u32 {
        let max = i64::from(self.settings.max_quantity);
        // in range after the clamp, so the cast is lossless
        qty.clamp(1, max) as u32
    }

    fn load(&self) -> Result<PersistedCart, StorageError> {
        let mut cart = try_load_json::<PersistedCart, _>(self.storage.as_ref(), CART_KEY)?
            .unwrap_or_else(|| PersistedCart::empty(self.currency.get()));
        self.normalise(&mut cart);
        Ok(cart)
    }

    /// Read before a mutation. A failed read aborts it, so nothing is written
    /// over an entry that could not be seen.
    fn load_for_write(&self) -> Result<PersistedCart, CartError> {
        self.load().map_err(|err| {
            warn!("cart not read, leaving it untouched: {}", err);
            CartError::Persist(err)
        })
    }

    fn commit(&self, cart: &PersistedCart, change: CartChange) -> Result<(), CartError> {
        if let Err(err) = save_json(self.storage.as_ref(), CART_KEY, cart) {
            warn!("cart not saved, keeping previous state: {}", err);
            return Err(CartError::Persist(err));
        }
        debug!(?change, "cart updated");
        self.notifier.emit(&CartEvent { change });
        Ok(())
    }

    fn normalise(&self, cart: &mut PersistedCart) {
        let max = self.settings.max_quantity;
        let mut seen: Vec<String> = Vec::with_capacity(cart.items.len());
        cart.items.retain_mut(|line| {
            if seen.contains(&line.id) {
                return false;
            }
            seen.push(line.id.clone());
            line.qty = line.qty.clamp(1, max);
            true
        });
        if cart.gift_message.chars().count() > self.settings.gift_message_limit {
            cart.gift_message = truncate_chars(&cart.gift_message, self.settings.gift_message_limit);
        }
    }
}

fn truncate_chars(input: &str, limit: usize) -> String {
    input.chars().take(limit).collect()
}

#[cfg(test)]
mod tests;
