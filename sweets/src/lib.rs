//! Typed client for the sweet-shop inventory REST API.
//!
//! This crate owns the wire contract shared with the backend: DTOs, the
//! bearer session, error-body normalization, and the request wrappers for
//! the auth and inventory endpoints. The `cli` crate is a thin command
//! surface over [`ShopClient`].
//!
//! All business logic (credential checks, persistence, search, stock
//! arithmetic) lives server-side; the client validates form input, attaches
//! the bearer token, and flattens every failure into one message.

mod client;
mod error;
mod form;
mod session;
mod types;

pub use client::ShopClient;
pub use error::ApiError;
pub use form::{FormError, RegisterForm, SweetForm, parse_restock_amount};
pub use session::Session;
pub use types::{LoginResponse, RegisterRequest, Sweet, SweetInput, SweetQuery};
