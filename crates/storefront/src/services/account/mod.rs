//! Customer account flows: login, signup, logout, profile and orders.
//!
//! Forms are validated locally first and report every failing field at
//! once; nothing is sent to Shopify until the whole form is valid.

mod error;

pub use error::{AccountError, Field, FieldErrors};

use std::sync::LazyLock;

use kiosk_core::{AddressId, CustomerId, Email};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::orders::{OrderSummary, map_orders};
use crate::session::SessionStore;
use crate::shopify::{
    Customer, CustomerAccessToken, CustomerCreateInput, MailingAddressInput, ShopifyError,
    StorefrontClient,
};
use crate::storage::KeyValueStore;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Signup only asks for a street address; the rest is filled in.
pub const DEFAULT_CITY: &str = "Bangalore";
pub const DEFAULT_PROVINCE: &str = "Karnataka";
pub const DEFAULT_COUNTRY: &str = "India";
pub const DEFAULT_ZIP: &str = "560001";

static NON_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("Invalid regex"));

/// Result of an operation that needs a signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authenticated<T> {
    LoggedIn(T),
    /// No session token is stored.
    NotLoggedIn,
}

impl<T> Authenticated<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::LoggedIn(value) => Some(value),
            Self::NotLoggedIn => None,
        }
    }
}

/// Sign-in form.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Account creation form.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: SecretString,
    pub address: String,
}

/// A signup form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub email: Email,
    pub customer: CustomerCreateInput,
    pub address: MailingAddressInput,
}

fn check_email(raw: &str, errors: &mut FieldErrors) -> Option<Email> {
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(Field::Email, e.to_string());
            None
        }
    }
}

/// Validate a sign-in form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_login(form: &LoginForm) -> Result<Email, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = check_email(&form.email, &mut errors);
    if form.password.expose_secret().is_empty() {
        errors.push(Field::Password, "Password is required");
    }
    match email {
        Some(email) => errors.into_result(email),
        None => Err(errors),
    }
}

/// Validate a signup form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_signup(form: &SignupForm) -> Result<ValidSignup, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = form.first_name.trim();
    if first_name.is_empty() {
        errors.push(Field::FirstName, "First Name is required");
    }
    let last_name = form.last_name.trim();
    if last_name.is_empty() {
        errors.push(Field::LastName, "Last Name is required");
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        errors.push(Field::Phone, "Phone number is required");
    } else if NON_DIGIT_RE.replace_all(phone, "").len() != 10 {
        errors.push(Field::Phone, "Enter a valid 10-digit phone number");
    }

    let email = check_email(&form.email, &mut errors);

    let password = form.password.expose_secret();
    if password.is_empty() {
        errors.push(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(
            Field::Password,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    let address = form.address.trim();
    if address.is_empty() {
        errors.push(Field::Address, "Address is required");
    }

    let Some(email) = email else {
        return Err(errors);
    };
    errors.into_result(ValidSignup {
        customer: CustomerCreateInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.as_str().to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        },
        address: default_mailing_address(address),
        email,
    })
}

/// A mailing address with the default locality filled in.
#[must_use]
pub fn default_mailing_address(address1: &str) -> MailingAddressInput {
    MailingAddressInput {
        address1: address1.to_string(),
        city: DEFAULT_CITY.to_string(),
        province: DEFAULT_PROVINCE.to_string(),
        country: DEFAULT_COUNTRY.to_string(),
        zip: DEFAULT_ZIP.to_string(),
    }
}

/// The customer calls account flows make against Shopify.
pub trait CustomerApi {
    /// Exchange credentials for an access token.
    fn create_access_token(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<CustomerAccessToken, ShopifyError>> + Send;

    /// Register a new customer.
    fn create_customer(
        &self,
        input: &CustomerCreateInput,
    ) -> impl Future<Output = Result<CustomerId, ShopifyError>> + Send;

    /// Add an address to the signed-in customer's address book.
    fn create_customer_address(
        &self,
        access_token: &SecretString,
        address: &MailingAddressInput,
    ) -> impl Future<Output = Result<AddressId, ShopifyError>> + Send;

    /// The customer a token belongs to.
    fn get_customer(
        &self,
        access_token: &SecretString,
    ) -> impl Future<Output = Result<Customer, ShopifyError>> + Send;
}

impl CustomerApi for StorefrontClient {
    fn create_access_token(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<CustomerAccessToken, ShopifyError>> + Send {
        Self::create_access_token(self, email, password)
    }

    fn create_customer(
        &self,
        input: &CustomerCreateInput,
    ) -> impl Future<Output = Result<CustomerId, ShopifyError>> + Send {
        Self::create_customer(self, input)
    }

    fn create_customer_address(
        &self,
        access_token: &SecretString,
        address: &MailingAddressInput,
    ) -> impl Future<Output = Result<AddressId, ShopifyError>> + Send {
        Self::create_customer_address(self, access_token, address)
    }

    fn get_customer(
        &self,
        access_token: &SecretString,
    ) -> impl Future<Output = Result<Customer, ShopifyError>> + Send {
        Self::get_customer(self, access_token)
    }
}

/// Account operations bound to a client and a session.
pub struct AccountService<'a, S, C = StorefrontClient> {
    client: &'a C,
    session: &'a SessionStore<S>,
}

impl<'a, S: KeyValueStore, C: CustomerApi> AccountService<'a, S, C> {
    #[must_use]
    pub const fn new(client: &'a C, session: &'a SessionStore<S>) -> Self {
        Self { client, session }
    }

    /// Sign in and remember the session.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for a bad form, or
    /// `AccountError::Shopify` carrying Shopify's message.
    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<CustomerAccessToken, AccountError> {
        let email = validate_login(form)?;
        let token = self
            .client
            .create_access_token(&email, &form.password)
            .await?;
        self.session.save(&token.access_token);
        info!("Customer logged in");
        Ok(token)
    }

    /// Create an account, sign in, and add the address.
    ///
    /// The address is best effort: once the account exists and the session
    /// is stored, an address failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for a bad form, or
    /// `AccountError::Shopify` if account creation or sign-in fails.
    #[instrument(skip_all)]
    pub async fn signup(&self, form: &SignupForm) -> Result<CustomerAccessToken, AccountError> {
        let valid = validate_signup(form)?;

        let customer_id = self.client.create_customer(&valid.customer).await?;
        info!(customer_id = %customer_id, "Customer created");

        let token = self
            .client
            .create_access_token(&valid.email, &form.password)
            .await?;
        self.session.save(&token.access_token);

        if let Err(e) = self
            .client
            .create_customer_address(&token.access_token, &valid.address)
            .await
        {
            warn!(error = %e, "Failed to save signup address");
        }

        Ok(token)
    }

    /// Forget the session.
    pub fn logout(&self) {
        self.session.clear();
        info!("Customer logged out");
    }

    /// The signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::SessionExpired` (and clears the session) when
    /// Shopify no longer recognises the token, or `AccountError::Shopify` if
    /// the request fails.
    #[instrument(skip_all)]
    pub async fn profile(&self) -> Result<Authenticated<Customer>, AccountError> {
        let Some(token) = self.session.load() else {
            return Ok(Authenticated::NotLoggedIn);
        };

        match self.client.get_customer(&token).await {
            Ok(customer) => Ok(Authenticated::LoggedIn(customer)),
            Err(ShopifyError::NotFound(_)) => {
                warn!("Stored session token was rejected");
                self.session.clear();
                Err(AccountError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The signed-in customer's recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`AccountService::profile`].
    pub async fn orders(&self) -> Result<Authenticated<Vec<OrderSummary>>, AccountError> {
        Ok(match self.profile().await? {
            Authenticated::LoggedIn(customer) => {
                Authenticated::LoggedIn(map_orders(&customer.orders))
            }
            Authenticated::NotLoggedIn => Authenticated::NotLoggedIn,
        })
    }
}
