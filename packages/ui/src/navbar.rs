use dioxus::prelude::*;

use crate::cart::use_cart;
use crate::icons::FaCartShopping;
use crate::Icon;

#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        div {
            class: "navbar",
            {children}
        }
    }
}

/// Cart icon with the number of units currently in the local cart.
#[component]
pub fn CartBadge() -> Element {
    let cart = use_cart();
    let count = cart.count();

    rsx! {
        span {
            class: "cart-badge",
            title: "Cart",
            Icon { icon: FaCartShopping, width: 16, height: 16 }
            if count > 0 {
                span { class: "cart-badge__count", "{count}" }
            }
        }
    }
}
