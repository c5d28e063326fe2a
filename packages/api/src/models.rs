//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use store::{ProductSnapshot, SessionUser};

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Patient self-registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A file attached to a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Doctor registration; sent as multipart because it carries documents.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub license_number: String,
    pub license_document: FileUpload,
    pub photo: Option<FileUpload>,
}

/// A patient's pregnancy profile. Only the fields the client reads are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyProfile {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub last_period_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub current_week: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    #[serde(default)]
    pub profile: Option<serde_json::Value>,
}

/// Body of `POST /pregnancy/profile`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPregnancyProfile {
    pub last_period_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

/// Catalog product as listed by `GET /products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl Product {
    /// The fields a cart line keeps.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            description: self.description.clone(),
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |s| s > 0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductList {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl ProductList {
    pub fn into_vec(self) -> Vec<Product> {
        match self {
            ProductList::Bare(products) | ProductList::Wrapped { products } => products,
        }
    }
}
