//! Account error types.

use std::fmt;

use thiserror::Error;

use crate::shopify::ShopifyError;

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Email,
    Password,
    Address,
}

impl Field {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Password => "password",
            Self::Address => "address",
        }
    }
}

/// Every validation failure of a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, String)>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// The message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, m)| m.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Errors from login, signup and account queries.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The form failed validation; nothing was sent.
    #[error("{0}")]
    Validation(FieldErrors),

    /// Shopify rejected the request or could not be reached.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// The stored token no longer identifies a customer.
    #[error("Customer details unavailable. Please log in again.")]
    SessionExpired,
}

impl From<FieldErrors> for AccountError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
