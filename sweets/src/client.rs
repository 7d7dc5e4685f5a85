//! REST wrappers for the auth and inventory endpoints.
//!
//! Request construction is centralized: one helper joins the base URL and
//! path, one attaches the bearer token (failing before any I/O when no
//! session is present), one flattens a non-success response through the
//! error normalizer. Every endpoint method is a thin wrapper over those.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{ApiError, rejection};
use crate::session::Session;
use crate::types::{
    LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, Sweet, SweetInput,
    SweetQuery,
};

const LOGIN_PATH: &str = "/api/auth/login/";
const REGISTER_PATH: &str = "/api/auth/register/";
const REFRESH_PATH: &str = "/api/auth/refresh/";
const SWEETS_PATH: &str = "/api/sweets/";

const LOGIN_FALLBACK: &str = "login failed; check credentials";
const REGISTER_FALLBACK: &str = "registration failed";
const REFRESH_FALLBACK: &str = "token refresh failed";
const LIST_FALLBACK: &str = "failed to fetch sweets";
const SHOW_FALLBACK: &str = "failed to fetch sweet";
const CREATE_FALLBACK: &str = "failed to create sweet";
const UPDATE_FALLBACK: &str = "failed to update sweet";
const DELETE_FALLBACK: &str = "failed to delete sweet";
const PURCHASE_FALLBACK: &str = "purchase failed; the sweet may be out of stock";
const RESTOCK_FALLBACK: &str = "restock failed";

fn sweet_path(id: i64) -> String {
    format!("/api/sweets/{id}/")
}

fn purchase_path(id: i64) -> String {
    format!("/api/sweets/{id}/purchase/")
}

fn restock_path(id: i64) -> String {
    format!("/api/sweets/{id}/restock/")
}

/// Client for the sweet-shop REST API.
///
/// Holds the HTTP connection pool, the base URL, and the current session.
/// One instance per logical user; methods take `&self` except the ones that
/// change the session.
#[derive(Clone, Debug)]
pub struct ShopClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ShopClient {
    /// Client pointed at `base_url` (e.g. `http://127.0.0.1:8000`), not yet
    /// logged in.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: None,
        }
    }

    /// Attach a session carried over from a previous run.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The current session, if logged in.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Drop the in-memory session. There is no server-side call to make.
    pub fn logout(&mut self) {
        self.session = None;
        tracing::debug!("session cleared");
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Request builder with the bearer token attached.
    ///
    /// Failing here is the client-side fatal precondition for authorized
    /// calls: without a session no request is issued at all.
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::MissingToken)?;
        Ok(self
            .http
            .request(method, self.endpoint(path))
            .bearer_auth(&session.access))
    }

    /// Authenticate and store the resulting session.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] with the backend's `detail` (e.g.
    /// `"Invalid credentials"`) or transport/body errors.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, ApiError> {
        let request = self
            .http
            .post(self.endpoint(LOGIN_PATH))
            .json(&json!({ "username": username, "password": password }));
        let body = accept(LOGIN_PATH, request, LOGIN_FALLBACK).await?;
        let response: LoginResponse = decode(&body)?;
        let session = Session::from(response);
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Create an account. Returns the access token when the backend issues
    /// one with the 201.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] carrying the first field-validation message
    /// (`username`/`password`/`email`) when registration is refused.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let request = self.http.post(self.endpoint(REGISTER_PATH)).json(request);
        let body = accept(REGISTER_PATH, request, REGISTER_FALLBACK).await?;
        // Success is all the original client cared about; keep the token if
        // the body carries one and ignore anything else.
        Ok(serde_json::from_str::<RegisterResponse>(&body)
            .ok()
            .and_then(|response| response.access))
    }

    /// Exchange a refresh token for a fresh access token, updating the
    /// stored session in place when one exists.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] when the refresh token is expired or invalid.
    pub async fn refresh(&mut self, refresh_token: &str) -> Result<String, ApiError> {
        let request = self
            .http
            .post(self.endpoint(REFRESH_PATH))
            .json(&json!({ "refresh": refresh_token }));
        let body = accept(REFRESH_PATH, request, REFRESH_FALLBACK).await?;
        let response: RefreshResponse = decode(&body)?;
        if let Some(session) = self.session.as_mut() {
            session.access = response.access.clone();
        }
        Ok(response.access)
    }

    /// List inventory, optionally narrowed by search term and filters.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingToken`] without a session; otherwise normalized
    /// backend rejections.
    pub async fn sweets(&self, query: &SweetQuery) -> Result<Vec<Sweet>, ApiError> {
        let mut request = self.authorized(Method::GET, SWEETS_PATH)?;
        if !query.is_empty() {
            request = request.query(&query.to_pairs());
        }
        let body = accept(SWEETS_PATH, request, LIST_FALLBACK).await?;
        decode(&body)
    }

    /// Fetch a single item by id.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingToken`] without a session; `"Not found"` for an
    /// unknown id.
    pub async fn sweet(&self, id: i64) -> Result<Sweet, ApiError> {
        let path = sweet_path(id);
        let request = self.authorized(Method::GET, &path)?;
        let body = accept(&path, request, SHOW_FALLBACK).await?;
        decode(&body)
    }

    /// Create an item; returns the record with its server-assigned id.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingToken`] without a session; otherwise normalized
    /// backend rejections.
    pub async fn create_sweet(&self, input: &SweetInput) -> Result<Sweet, ApiError> {
        let request = self.authorized(Method::POST, SWEETS_PATH)?.json(input);
        let body = accept(SWEETS_PATH, request, CREATE_FALLBACK).await?;
        decode(&body)
    }

    /// Replace an item with a full body (PUT).
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingToken`] without a session; otherwise normalized
    /// backend rejections.
    pub async fn update_sweet(&self, id: i64, input: &SweetInput) -> Result<Sweet, ApiError> {
        let path = sweet_path(id);
        let request = self.authorized(Method::PUT, &path)?.json(input);
        let body = accept(&path, request, UPDATE_FALLBACK).await?;
        decode(&body)
    }

    /// Delete an item. The backend answers 204 with no body.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingToken`] without a session; otherwise normalized
    /// backend rejections.
    pub async fn delete_sweet(&self, id: i64) -> Result<(), ApiError> {
        let path = sweet_path(id);
        let request = self.authorized(Method::DELETE, &path)?;
        accept(&path, request, DELETE_FALLBACK).await?;
        Ok(())
    }

    /// Buy one unit, decrementing stock by one. Returns the updated record.
    ///
    /// # Errors
    ///
    /// `"Out of stock"` (400) when quantity is already zero; `"Not found"`
    /// for an unknown id.
    pub async fn purchase_sweet(&self, id: i64) -> Result<Sweet, ApiError> {
        let path = purchase_path(id);
        // No body and no content type: the backend rejects an empty JSON
        // payload on this action.
        let request = self.authorized(Method::POST, &path)?;
        let body = accept(&path, request, PURCHASE_FALLBACK).await?;
        decode(&body)
    }

    /// Add `amount` units of stock. Admin-only on the backend (403 for
    /// everyone else). Returns the updated record.
    ///
    /// # Errors
    ///
    /// `"Invalid amount"` (400) for a non-positive amount, permission
    /// rejections, or transport/body errors.
    pub async fn restock_sweet(&self, id: i64, amount: u32) -> Result<Sweet, ApiError> {
        let path = restock_path(id);
        let request = self
            .authorized(Method::POST, &path)?
            .json(&json!({ "amount": amount }));
        let body = accept(&path, request, RESTOCK_FALLBACK).await?;
        decode(&body)
    }
}

/// Send the request and hand back the raw body of a successful response.
///
/// Non-success responses are flattened through the normalizer with the
/// per-action fallback message.
async fn accept(path: &str, request: RequestBuilder, fallback: &str) -> Result<String, ApiError> {
    tracing::debug!(path, "issuing request");
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::warn!(path, status = status.as_u16(), "request rejected");
        return Err(rejection(status.as_u16(), &body, fallback));
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}
