//! Form-style validation applied before any request is issued.
//!
//! The only invariants enforced client-side: required fields, numeric
//! parsing, and the register password-confirmation check. Everything else
//! (uniqueness, stock arithmetic, password strength) is the backend's call.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use rust_decimal::Decimal;

use crate::types::{RegisterRequest, SweetInput};

/// A rejected form field, carrying the one message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("price must be a non-negative number, got {0:?}")]
    InvalidPrice(String),
    #[error("quantity must be a non-negative whole number, got {0:?}")]
    InvalidQuantity(String),
    #[error("restock amount must be a positive number")]
    InvalidAmount,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Raw inventory-item fields as entered, before numeric parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweetForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
}

impl SweetForm {
    /// Validate and convert into the create/update request body.
    ///
    /// # Errors
    ///
    /// [`FormError`] for the first blank field, an unparseable or negative
    /// price, or an unparseable quantity.
    pub fn parse(&self) -> Result<SweetInput, FormError> {
        let name = required("name", &self.name)?;
        let category = required("category", &self.category)?;
        let price_raw = required("price", &self.price)?;
        let quantity_raw = required("quantity", &self.quantity)?;

        let price: Decimal = price_raw
            .parse()
            .map_err(|_| FormError::InvalidPrice(price_raw.clone()))?;
        if price.is_sign_negative() {
            return Err(FormError::InvalidPrice(price_raw));
        }
        let quantity: u32 = quantity_raw
            .parse()
            .map_err(|_| FormError::InvalidQuantity(quantity_raw.clone()))?;

        Ok(SweetInput {
            name,
            category,
            price,
            quantity,
        })
    }
}

/// Raw registration fields as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

impl RegisterForm {
    /// Validate and convert into the register request body.
    ///
    /// The password-confirmation check runs locally so a mismatch never
    /// reaches the backend.
    ///
    /// # Errors
    ///
    /// [`FormError`] for the first blank field or a password mismatch.
    pub fn parse(&self) -> Result<RegisterRequest, FormError> {
        let username = required("username", &self.username)?;
        let email = required("email", &self.email)?;
        let password = required("password", &self.password)?;
        let password2 = required("password confirmation", &self.password2)?;

        if password != password2 {
            return Err(FormError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            username,
            email,
            password,
            password2,
        })
    }
}

/// Parse a restock amount: a strictly positive integer.
///
/// # Errors
///
/// [`FormError::InvalidAmount`] for zero, negative, or non-numeric input.
pub fn parse_restock_amount(raw: &str) -> Result<u32, FormError> {
    let amount: u32 = raw.trim().parse().map_err(|_| FormError::InvalidAmount)?;
    if amount == 0 {
        return Err(FormError::InvalidAmount);
    }
    Ok(amount)
}

fn required(field: &'static str, raw: &str) -> Result<String, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(trimmed.to_owned())
}
