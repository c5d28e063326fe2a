//! # Domain models for the session and the cart
//!
//! These types are persisted by the stores and also cross the wire to and from
//! the backend, so they are `Serialize + Deserialize` with the backend's
//! camelCase field names.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Role`] | The fixed role enumeration attached to every account. `User` is the patient role. |
//! | [`SessionUser`] | The logged-in account as returned by the auth endpoints. |
//! | [`Session`] | A bearer token paired with its user. |
//! | [`ProductSnapshot`] | Catalog fields captured when a product is added to the cart. |
//! | [`CartItem`] | One cart line: a local id, the product id, a quantity and the snapshot. |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role.
///
/// Written as `"USER"`, `"DOCTOR"` or `"ADMIN"`; read case-insensitively, since
/// older backend builds sent lowercase roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Role {
    /// An expecting mother; the patient role.
    User,
    Doctor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Doctor, Role::Admin];

    /// Patients must have a pregnancy profile before seeing gated pages.
    pub fn is_patient(self) -> bool {
        matches!(self, Role::User)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Nested profile data as sent by the backend; opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            name: None,
            profile: None,
        }
    }

    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// A bearer token and the user it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Product fields denormalized into a cart line at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One line of the local cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Locally generated, time-ordered id; not the product id.
    pub id: String,
    pub product_id: String,
    pub quantity: u32,
    pub product: ProductSnapshot,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Sum of all line subtotals.
pub fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::subtotal).sum()
}

/// Total number of units across all lines.
pub fn cart_count(items: &[CartItem]) -> u32 {
    items.iter().fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}
