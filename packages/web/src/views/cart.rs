use dioxus::prelude::*;
use store::CartItem;
use ui::use_cart;

use crate::Route;

/// The local cart. Lives entirely in browser storage, so it works signed out.
#[component]
pub fn Cart() -> Element {
    let mut cart = use_cart();
    let items = cart.items();
    let total = format!("{:.2}", cart.total());

    if items.is_empty() {
        return rsx! {
            section {
                class: "cart",
                h1 { "Your cart" }
                p { "Your cart is empty. " Link { to: Route::Shop {}, "Visit the shop" } }
            }
        };
    }

    rsx! {
        section {
            class: "cart",
            h1 { "Your cart" }
            ul {
                class: "cart__lines",
                for item in items {
                    CartLine { key: "{item.id}", item }
                }
            }
            div {
                class: "cart__summary",
                span { "Total: ${total}" }
                button {
                    class: "btn",
                    onclick: move |_| cart.clear(),
                    "Clear cart"
                }
            }
        }
    }
}

#[component]
fn CartLine(item: CartItem) -> Element {
    let mut cart = use_cart();
    let subtotal = format!("{:.2}", item.subtotal());
    let quantity = item.quantity;
    let product_id = item.product_id.clone();

    let decrement = {
        let mut cart = cart.clone();
        let product_id = product_id.clone();
        move |_: MouseEvent| cart.update_quantity(&product_id, quantity.saturating_sub(1))
    };
    let increment = {
        let mut cart = cart.clone();
        let product_id = product_id.clone();
        move |_: MouseEvent| cart.update_quantity(&product_id, quantity.saturating_add(1))
    };

    rsx! {
        li {
            class: "cart-line",
            span { class: "cart-line__title", "{item.product.title}" }
            div {
                class: "cart-line__quantity",
                button { onclick: decrement, "-" }
                span { "{quantity}" }
                button { onclick: increment, "+" }
            }
            span { class: "cart-line__subtotal", "${subtotal}" }
            button {
                class: "btn btn-link",
                onclick: move |_| cart.remove(&product_id),
                "Remove"
            }
        }
    }
}
