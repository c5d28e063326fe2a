//! # HTTP client for the backend
//!
//! [`ApiClient`] is a thin wrapper over [`reqwest::Client`]: it joins paths onto
//! the configured base URL, attaches the bearer token when one is set, and
//! turns non-success responses into typed errors. It holds no state beyond
//! the token, so it is cheap to clone per call site.
//!
//! | Method | Endpoint | Errors |
//! |--------|----------|--------|
//! | [`login`](ApiClient::login) | `POST /auth/login` | [`AuthError`] |
//! | [`register`](ApiClient::register) | `POST /auth/register` | [`AuthError`] |
//! | [`register_doctor`](ApiClient::register_doctor) | `POST /auth/register-doctor` (multipart) | [`AuthError`] |
//! | [`pregnancy_profile`](ApiClient::pregnancy_profile) | `GET /pregnancy/profile` | [`ApiError`] |
//! | [`create_pregnancy_profile`](ApiClient::create_pregnancy_profile) | `POST /pregnancy/profile` | [`ApiError`] |
//! | [`list_products`](ApiClient::list_products) | `GET /products` | [`ApiError`] |

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{classify_login_failure, classify_registration_failure, ApiError, AuthError};
use crate::models::{
    AuthResponse, DoctorRegistration, FileUpload, LoginRequest, NewPregnancyProfile,
    PregnancyProfile, Product, ProductList, ProfileEnvelope, RegisterRequest,
};

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder =
            builder.timeout(std::time::Duration::from_secs(config.request_timeout_secs));
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest {
                email: email.trim(),
                password,
            })
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            tracing::debug!(status, "login rejected");
            return Err(classify_login_failure(status, message));
        }
        Ok(decode::<AuthResponse>(response).await?)
    }

    /// Register a patient account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(request)
            .send()
            .await
            .map_err(ApiError::from)?;
        registration_result(response).await
    }

    /// Register a doctor account with its license document.
    pub async fn register_doctor(
        &self,
        registration: DoctorRegistration,
    ) -> Result<AuthResponse, AuthError> {
        let mut form = Form::new()
            .text("name", registration.name)
            .text("email", registration.email)
            .text("password", registration.password)
            .text("specialization", registration.specialization)
            .text("licenseNumber", registration.license_number)
            .part("licenseDocument", file_part(registration.license_document)?);
        if let Some(photo) = registration.photo {
            form = form.part("photo", file_part(photo)?);
        }

        let response = self
            .request(Method::POST, "/auth/register-doctor")
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;
        registration_result(response).await
    }

    /// Fetch the current patient's pregnancy profile.
    ///
    /// `Ok(None)` means the backend confirmed there is no profile (404, or an
    /// empty `profile` field). Any other failure is an error, so callers can
    /// tell real absence from an outage.
    pub async fn pregnancy_profile(&self) -> Result<Option<PregnancyProfile>, ApiError> {
        let response = self.request(Method::GET, "/pregnancy/profile").send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            return Err(ApiError::Status { status, message });
        }

        let envelope: ProfileEnvelope = decode(response).await?;
        match envelope.profile {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ApiError::Decode(e.to_string())),
        }
    }

    pub async fn create_pregnancy_profile(
        &self,
        profile: &NewPregnancyProfile,
    ) -> Result<PregnancyProfile, ApiError> {
        let response = self
            .request(Method::POST, "/pregnancy/profile")
            .json(profile)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let envelope: ProfileEnvelope = decode(response).await?;
        let value = envelope
            .profile
            .ok_or_else(|| ApiError::Decode("response has no profile".to_string()))?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.request(Method::GET, "/products").send().await?;
        let response = ensure_success(response).await?;
        Ok(decode::<ProductList>(response).await?.into_vec())
    }
}

async fn registration_result(response: Response) -> Result<AuthResponse, AuthError> {
    if !response.status().is_success() {
        let (status, message) = failure_parts(response).await;
        tracing::debug!(status, %message, "registration rejected");
        return Err(classify_registration_failure(status, message));
    }
    Ok(decode::<AuthResponse>(response).await?)
}

fn file_part(file: FileUpload) -> Result<Part, ApiError> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)
        .map_err(|e| ApiError::Decode(format!("invalid mime type: {e}")))
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let (status, message) = failure_parts(response).await;
    Err(ApiError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Status code plus the most useful message the error body offers.
async fn failure_parts(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, error_message(&body))
}

fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "error", "msg"]
                .iter()
                .find_map(|field| json.get(field).and_then(|v| v.as_str()).map(str::to_string))
        });
    from_json.unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use store::Role;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&ApiConfig::new(server.url())).unwrap()
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"Email already exists"}"#), "Email already exists");
        assert_eq!(error_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(error_message("  plain text  "), "plain text");
        assert_eq!(error_message(""), "");
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "email": "admin@example.com",
                "password": "pw"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"t1","user":{"id":"u1","email":"admin@example.com","role":"ADMIN"}}"#)
            .create_async()
            .await;

        let resp = client_for(&server)
            .login(" admin@example.com ", "pw")
            .await
            .unwrap();
        assert_eq!(resp.token, "t1");
        assert_eq!(resp.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let err = client_for(&server).login("a@b.c", "bad").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/register")
            .with_status(400)
            .with_body(r#"{"message":"Email already exists"}"#)
            .create_async()
            .await;

        let request = RegisterRequest {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            password: "secret123".into(),
            phone: None,
        };
        let err = client_for(&server).register(&request).await.unwrap_err();
        assert_eq!(err, AuthError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_register_doctor_sends_multipart() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/register-doctor")
            .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
            .match_body(Matcher::Regex("licenseDocument".into()))
            .with_status(201)
            .with_body(r#"{"token":"t2","user":{"id":"d1","email":"doc@example.com","role":"DOCTOR"}}"#)
            .create_async()
            .await;

        let registration = DoctorRegistration {
            name: "Dr. Okafor".into(),
            email: "doc@example.com".into(),
            password: "secret123".into(),
            specialization: "Obstetrics".into(),
            license_number: "MD-42".into(),
            license_document: FileUpload {
                file_name: "license.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            },
            photo: None,
        };
        let resp = client_for(&server).register_doctor(registration).await.unwrap();
        assert_eq!(resp.user.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_profile_present_sends_bearer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pregnancy/profile")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"profile":{"_id":"pp1","dueDate":"2026-12-01","currentWeek":20}}"#)
            .create_async()
            .await;

        let profile = client_for(&server)
            .with_token("tok")
            .pregnancy_profile()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.id.as_deref(), Some("pp1"));
        assert_eq!(profile.current_week, Some(20));
    }

    #[tokio::test]
    async fn test_profile_absent() {
        let mut server = mockito::Server::new_async().await;
        let _not_found = server
            .mock("GET", "/pregnancy/profile")
            .with_status(404)
            .create_async()
            .await;
        assert_eq!(client_for(&server).pregnancy_profile().await, Ok(None));

        let mut server = mockito::Server::new_async().await;
        let _empty = server
            .mock("GET", "/pregnancy/profile")
            .with_status(200)
            .with_body(r#"{"profile":null}"#)
            .create_async()
            .await;
        assert_eq!(client_for(&server).pregnancy_profile().await, Ok(None));
    }

    #[tokio::test]
    async fn test_profile_server_error_is_not_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pregnancy/profile")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client_for(&server).pregnancy_profile().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 503,
                message: "maintenance".into()
            }
        );
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_list_products() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/products")
            .with_status(200)
            .with_body(r#"{"products":[{"_id":"p1","title":"Maternity pillow","price":39.99}]}"#)
            .create_async()
            .await;

        let products = client_for(&server).list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].snapshot().title, "Maternity pillow");
    }
}
