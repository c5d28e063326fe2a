//! # API crate: REST client for the Materna backend
//!
//! Everything the client asks of the backend goes through this crate. The
//! backend itself is external; this crate only knows the shapes of its
//! endpoints.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`]: auth, registration, pregnancy profile and catalog calls |
//! | [`config`] | [`ApiConfig`]: base URL and timeout, from defaults, TOML or the environment |
//! | [`error`] | [`ApiError`] for data calls, [`AuthError`] for login/registration |
//! | [`models`] | Request and response bodies |
//! | [`profile`] | [`ProfileCheck`], the seam the access guard depends on |
//! | [`validation`] | Client-side form checks |

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod profile;
pub mod validation;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, AuthError};
pub use models::{
    AuthResponse, DoctorRegistration, FileUpload, NewPregnancyProfile, PregnancyProfile, Product,
    RegisterRequest,
};
pub use profile::ProfileCheck;
