//! # Local cart store
//!
//! [`CartStore`] keeps the shopping cart in client storage under
//! [`CART_KEY`]. The backend never sees the cart until checkout, and there
//! is no cross-device sync.
//!
//! Every mutation is a read-modify-write of the whole list. Carts are small
//! and the active tab is the only writer, so there is no locking; two tabs
//! writing at once resolve as last-writer-wins.
//!
//! Storage faults never escape: reads degrade to an empty cart and failed
//! writes are logged. Mutations return the list the caller should now
//! display. A stored cart that could not be read is never overwritten; only
//! an absent or corrupt value is replaced.

use thiserror::Error;

use crate::kv::{KeyValueStore, StorageError, CART_KEY};
use crate::models::{CartItem, ProductSnapshot};
use crate::versioned;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

#[derive(Clone, Debug)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The persisted cart, or empty if nothing usable is stored.
    pub fn get_cart(&self) -> Vec<CartItem> {
        match versioned::load::<Vec<CartItem>, _>(&self.storage, CART_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "cart unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    /// The base list for a mutation, and whether it may be written back.
    ///
    /// A cart that could not be read (storage unavailable, or written by a
    /// newer schema) still exists; writing over it would destroy it.
    fn load_for_update(&self) -> (Vec<CartItem>, bool) {
        match versioned::load::<Vec<CartItem>, _>(&self.storage, CART_KEY) {
            Ok(items) => (items.unwrap_or_default(), true),
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "replacing corrupt cart");
                (Vec::new(), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart unreadable; change will not be saved");
                (Vec::new(), false)
            }
        }
    }

    fn persist(&self, items: &[CartItem], writable: bool) {
        if !writable {
            return;
        }
        if let Err(e) = versioned::save(&self.storage, CART_KEY, &items) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    pub fn add_to_cart(
        &self,
        product: &ProductSnapshot,
        quantity: u32,
    ) -> Result<Vec<CartItem>, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let (mut items, writable) = self.load_for_update();
        match items.iter_mut().find(|item| item.product_id == product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => items.push(CartItem {
                id: uuid::Uuid::now_v7().to_string(),
                product_id: product.id.clone(),
                quantity,
                product: product.clone(),
            }),
        }

        self.persist(&items, writable);
        Ok(items)
    }

    /// Set the quantity of a line. Zero removes the line; unknown ids are a no-op.
    pub fn update_quantity(&self, product_id: &str, quantity: u32) -> Vec<CartItem> {
        if quantity == 0 {
            return self.remove_from_cart(product_id);
        }

        let (mut items, writable) = self.load_for_update();
        let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) else {
            return items;
        };
        item.quantity = quantity;

        self.persist(&items, writable);
        items
    }

    /// Drop the line for `product_id`; unknown ids are a no-op.
    pub fn remove_from_cart(&self, product_id: &str) -> Vec<CartItem> {
        let (mut items, writable) = self.load_for_update();
        let before = items.len();
        items.retain(|item| item.product_id != product_id);

        if items.len() != before {
            self.persist(&items, writable);
        }
        items
    }

    pub fn clear_cart(&self) {
        if let Err(e) = self.storage.remove(CART_KEY) {
            tracing::warn!(error = %e, "failed to clear cart");
        }
    }
}
