//! Cart context and hooks for the UI.

use dioxus::prelude::*;
use store::{cart_count, cart_total, CartError, CartItem, CartStore, ProductSnapshot};

use crate::storage::{make_storage, AppStorage};

/// Handle to the local cart, obtained with [`use_cart`].
#[derive(Clone)]
pub struct CartHandle {
    store: CartStore<AppStorage>,
    items: Signal<Vec<CartItem>>,
}

impl CartHandle {
    pub fn items(&self) -> Vec<CartItem> {
        (self.items)()
    }

    pub fn count(&self) -> u32 {
        cart_count(&self.items.read())
    }

    pub fn total(&self) -> f64 {
        cart_total(&self.items.read())
    }

    pub fn add(&mut self, product: &ProductSnapshot, quantity: u32) -> Result<(), CartError> {
        let items = self.store.add_to_cart(product, quantity)?;
        self.items.set(items);
        Ok(())
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        self.items.set(self.store.update_quantity(product_id, quantity));
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.set(self.store.remove_from_cart(product_id));
    }

    pub fn clear(&mut self) {
        self.store.clear_cart();
        self.items.set(Vec::new());
    }
}

pub fn use_cart() -> CartHandle {
    use_context::<CartHandle>()
}

/// Provider component for the local cart. Independent of the session.
#[component]
pub fn CartProvider(children: Element) -> Element {
    let store = use_hook(|| CartStore::new(make_storage()));
    let mut items = use_signal(Vec::new);

    let loading = store.clone();
    use_effect(move || {
        items.set(loading.get_cart());
    });

    use_context_provider(|| CartHandle { store, items });

    rsx! {
        {children}
    }
}
