//! Backend client context.

use api::{ApiClient, ApiConfig, ApiError};
use dioxus::prelude::*;

use crate::session::use_session;

#[derive(Clone)]
struct ApiContext(Result<ApiClient, ApiError>);

/// Provider that builds the shared [`ApiClient`] from `config`.
#[component]
pub fn ApiProvider(config: ApiConfig, children: Element) -> Element {
    use_context_provider(|| {
        let client = ApiClient::new(&config);
        match &client {
            Ok(c) => tracing::debug!(base_url = c.base_url(), "api client ready"),
            Err(e) => tracing::error!(error = %e, "failed to create api client"),
        }
        ApiContext(client)
    });

    rsx! {
        {children}
    }
}

/// The shared client without credentials.
pub fn use_anonymous_api() -> Result<ApiClient, ApiError> {
    use_context::<ApiContext>().0
}

/// Get a client carrying the current session's bearer token, if any.
pub fn use_api() -> Result<ApiClient, ApiError> {
    let client = use_anonymous_api();
    let token = use_session().token();
    client.map(|c| authorize(c, token))
}

pub(crate) fn authorize(client: ApiClient, token: Option<String>) -> ApiClient {
    match token {
        Some(token) => client.with_token(token),
        None => client,
    }
}
