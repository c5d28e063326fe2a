//! The remote precondition the access guard checks for patients.

use std::future::Future;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Answers "does the logged-in patient have a pregnancy profile?".
///
/// `Ok(false)` is a confirmed absence; `Err` means the question could not
/// be answered.
pub trait ProfileCheck {
    fn has_profile(&self) -> impl Future<Output = Result<bool, ApiError>>;
}

impl ProfileCheck for ApiClient {
    async fn has_profile(&self) -> Result<bool, ApiError> {
        match self.pregnancy_profile().await {
            Ok(profile) => Ok(profile.is_some()),
            Err(e) => {
                tracing::error!(error = %e, "pregnancy profile check failed");
                Err(e)
            }
        }
    }
}

/// A client that could not be built answers every check with its build error.
impl<P: ProfileCheck> ProfileCheck for Result<P, ApiError> {
    async fn has_profile(&self) -> Result<bool, ApiError> {
        match self {
            Ok(checker) => checker.has_profile().await,
            Err(e) => Err(e.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[tokio::test]
    async fn test_unbuilt_client_reports_its_error() {
        let unbuilt: Result<ApiClient, ApiError> = Err(ApiError::Network("no tls".into()));
        assert_eq!(unbuilt.has_profile().await, Err(ApiError::Network("no tls".into())));
    }

    #[tokio::test]
    async fn test_built_client_asks_the_backend() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pregnancy/profile")
            .with_status(404)
            .create_async()
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.url()));
        assert_eq!(client.has_profile().await, Ok(false));
        mock.assert_async().await;
    }
}
