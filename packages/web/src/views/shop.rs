//! Product catalogue with add-to-cart.

use api::Product;
use dioxus::prelude::*;
use ui::{use_anonymous_api, use_cart};

#[component]
pub fn Shop() -> Element {
    let api = use_anonymous_api();

    let products = use_resource(move || {
        let api = api.clone();
        async move {
            let result = match api {
                Ok(client) => client.list_products().await,
                Err(e) => Err(e),
            };
            if let Err(err) = &result {
                tracing::warn!(error = %err, "loading products failed");
            }
            result
        }
    });

    let body = match &*products.read() {
        None => rsx! { p { class: "muted", "Loading products..." } },
        Some(Err(_)) => rsx! {
            p { class: "form-error", "The shop is unavailable right now. Please try again later." }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "muted", "No products yet." }
        },
        Some(Ok(list)) => rsx! {
            div {
                class: "product-grid",
                for product in list.iter().cloned() {
                    ProductCard { key: "{product.id}", product }
                }
            }
        },
    };

    rsx! {
        section {
            class: "shop",
            h1 { "Shop" }
            {body}
        }
    }
}

#[component]
fn ProductCard(product: Product) -> Element {
    let mut cart = use_cart();
    let mut feedback = use_signal(|| Option::<String>::None);

    let in_stock = product.in_stock();
    let price = format!("{:.2}", product.price);
    let thumbnail = product.thumbnail.clone().unwrap_or_default();
    let snapshot = product.snapshot();

    rsx! {
        div {
            class: "product-card",
            if !thumbnail.is_empty() {
                img { src: "{thumbnail}", alt: "{product.title}" }
            }
            h3 { "{product.title}" }
            if let Some(description) = product.description.clone() {
                p { class: "muted", "{description}" }
            }
            p { class: "product-card__price", "${price}" }
            button {
                class: "btn btn-primary",
                disabled: !in_stock,
                onclick: move |_| {
                    let message = match cart.add(&snapshot, 1) {
                        Ok(()) => "Added to cart".to_string(),
                        Err(err) => err.to_string(),
                    };
                    feedback.set(Some(message));
                },
                if in_stock { "Add to cart" } else { "Out of stock" }
            }
            if let Some(message) = feedback() {
                span { class: "product-card__feedback", "{message}" }
            }
        }
    }
}
