//! Wire DTOs for the `/api` contract.
//!
//! These types intentionally mirror the backend's serializer output so serde
//! round-trips stay lossless. The backend emits `price` as a decimal string
//! (`"5.00"`) but has historically accepted numeric payloads too, so `price`
//! rides on [`Decimal`], whose serde support reads either form.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable inventory item as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form category label (e.g. `"Chocolate"`).
    pub category: String,
    /// Unit price; serialized as a decimal string.
    pub price: Decimal,
    /// Units in stock; never negative.
    pub quantity: u32,
}

/// Fields accepted by the create and full-update endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweetInput {
    /// Display name.
    pub name: String,
    /// Free-form category label.
    pub category: String,
    /// Unit price; serialized as a decimal string.
    pub price: Decimal,
    /// Units in stock.
    pub quantity: u32,
}

/// Successful response from `POST /api/auth/login/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access: String,
    /// Refresh token, when the backend issues one.
    #[serde(default)]
    pub refresh: Option<String>,
    /// Whether the account may manage inventory.
    #[serde(default)]
    pub is_admin: bool,
}

/// Body for `POST /api/auth/register/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Confirmation copy; the backend rejects mismatches too.
    pub password2: String,
}

/// Response from `POST /api/auth/register/`. The backend issues a token on
/// success; older deployments returned an empty body, so the field is lenient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct RegisterResponse {
    #[serde(default)]
    pub access: Option<String>,
}

/// Response from `POST /api/auth/refresh/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

/// Query parameters for `GET /api/sweets/`.
///
/// `search` matches substrings across name, category, and price; the
/// remaining fields are the backend's specific filters and compose with it.
/// An empty query lists everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweetQuery {
    /// Substring search across name/category/price.
    pub search: Option<String>,
    /// Case-insensitive name substring filter.
    pub name: Option<String>,
    /// Exact (case-insensitive) category filter.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl SweetQuery {
    /// Query matching everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Substring search across name, category, and price.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// True when no parameter is set and the request needs no query string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Render the set parameters as URL query pairs, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min_price) = &self.min_price {
            pairs.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = &self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        pairs
    }
}
