//! Customer account operations on the Storefront API.
//!
//! Classic Storefront customer accounts: email/password sign-in yields a
//! customer access token, which authorizes the customer query and address
//! mutations.
//!
//! # Example
//!
//! ```rust,ignore
//! let token = client.create_access_token(&email, &password).await?;
//! let customer = client.get_customer(&token.access_token).await?;
//! ```

mod types;

pub use types::*;

use graphql_client::QueryBody;
use kiosk_core::{AddressId, CustomerId, Email};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ShopifyError;
use super::StorefrontClient;

/// Orders fetched with the customer, newest first.
pub const CUSTOMER_ORDER_LIMIT: i64 = 10;
/// Line summaries fetched per order.
pub const ORDER_LINE_ITEM_LIMIT: i64 = 3;

fn first_user_error(errors: &[CustomerUserError]) -> Option<ShopifyError> {
    errors
        .first()
        .map(|e| ShopifyError::UserError(e.message.clone()))
}

impl StorefrontClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange email and password for a customer access token.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` with Shopify's message when the
    /// credentials are rejected, or an error if the API request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn create_access_token(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        #[derive(Serialize)]
        struct Variables<'a> {
            input: Input<'a>,
        }

        #[derive(Serialize)]
        struct Input<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            customer_access_token_create: Payload,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            customer_access_token: Option<RawAccessToken>,
            #[serde(default)]
            customer_user_errors: Vec<CustomerUserError>,
        }

        const QUERY: &str = r"
            mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
                customerAccessTokenCreate(input: $input) {
                    customerAccessToken {
                        accessToken
                        expiresAt
                    }
                    customerUserErrors {
                        code
                        field
                        message
                    }
                }
            }
        ";

        let body = QueryBody {
            variables: Variables {
                input: Input {
                    email: email.as_str(),
                    password: password.expose_secret(),
                },
            },
            query: QUERY,
            operation_name: "customerAccessTokenCreate",
        };
        let response: Response = self.execute(&body).await?;
        let payload = response.customer_access_token_create;

        if let Some(err) = first_user_error(&payload.customer_user_errors) {
            return Err(err);
        }

        payload
            .customer_access_token
            .map(CustomerAccessToken::from)
            .ok_or_else(|| ShopifyError::UserError("No access token returned".to_string()))
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` with Shopify's message (e.g. email
    /// already taken), or an error if the API request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_customer(
        &self,
        input: &CustomerCreateInput,
    ) -> Result<CustomerId, ShopifyError> {
        #[derive(Serialize)]
        struct Variables<'a> {
            input: &'a CustomerCreateInput,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            customer_create: Payload,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            customer: Option<CreatedCustomer>,
            #[serde(default)]
            customer_user_errors: Vec<CustomerUserError>,
        }

        #[derive(Deserialize)]
        struct CreatedCustomer {
            id: CustomerId,
        }

        const QUERY: &str = r"
            mutation customerCreate($input: CustomerCreateInput!) {
                customerCreate(input: $input) {
                    customer {
                        id
                        email
                        firstName
                        lastName
                    }
                    customerUserErrors {
                        code
                        field
                        message
                    }
                }
            }
        ";

        let body = QueryBody {
            variables: Variables { input },
            query: QUERY,
            operation_name: "customerCreate",
        };
        let response: Response = self.execute(&body).await?;
        let payload = response.customer_create;

        if let Some(err) = first_user_error(&payload.customer_user_errors) {
            return Err(err);
        }

        payload
            .customer
            .map(|c| c.id)
            .ok_or_else(|| ShopifyError::UserError("No customer returned".to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Address Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an address to the customer's address book.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the address, or an
    /// error if the API request fails.
    #[instrument(skip(self, access_token, address))]
    pub async fn create_customer_address(
        &self,
        access_token: &SecretString,
        address: &MailingAddressInput,
    ) -> Result<AddressId, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            customer_access_token: &'a str,
            address: &'a MailingAddressInput,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            customer_address_create: Payload,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            customer_address: Option<CreatedAddress>,
            #[serde(default)]
            customer_user_errors: Vec<CustomerUserError>,
        }

        #[derive(Deserialize)]
        struct CreatedAddress {
            id: AddressId,
        }

        const QUERY: &str = r"
            mutation customerAddressCreate($customerAccessToken: String!, $address: MailingAddressInput!) {
                customerAddressCreate(customerAccessToken: $customerAccessToken, address: $address) {
                    customerAddress {
                        id
                    }
                    customerUserErrors {
                        code
                        field
                        message
                    }
                }
            }
        ";

        let body = QueryBody {
            variables: Variables {
                customer_access_token: access_token.expose_secret(),
                address,
            },
            query: QUERY,
            operation_name: "customerAddressCreate",
        };
        let response: Response = self.execute(&body).await?;
        let payload = response.customer_address_create;

        if let Some(err) = first_user_error(&payload.customer_user_errors) {
            return Err(err);
        }

        payload
            .customer_address
            .map(|a| a.id)
            .ok_or_else(|| ShopifyError::UserError("No address returned".to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Customer Query
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the signed-in customer with recent orders and addresses.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the token no longer identifies a
    /// customer, or an error if the API request fails.
    #[instrument(skip(self, access_token))]
    pub async fn get_customer(&self, access_token: &SecretString) -> Result<Customer, ShopifyError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            customer_access_token: &'a str,
            order_count: i64,
            line_item_count: i64,
        }

        #[derive(Deserialize)]
        struct Response {
            customer: Option<Customer>,
        }

        const QUERY: &str = r"
            query getCustomer($customerAccessToken: String!, $orderCount: Int!, $lineItemCount: Int!) {
                customer(customerAccessToken: $customerAccessToken) {
                    id
                    firstName
                    lastName
                    email
                    phone
                    orders(first: $orderCount, reverse: true) {
                        edges {
                            node {
                                id
                                orderNumber
                                processedAt
                                financialStatus
                                fulfillmentStatus
                                totalPrice {
                                    amount
                                    currencyCode
                                }
                                lineItems(first: $lineItemCount) {
                                    edges {
                                        node {
                                            title
                                            quantity
                                        }
                                    }
                                }
                            }
                        }
                    }
                    defaultAddress {
                        address1
                        city
                        province
                        country
                        zip
                    }
                    addresses(first: 1) {
                        edges {
                            node {
                                address1
                                city
                                province
                                country
                                zip
                            }
                        }
                    }
                }
            }
        ";

        let body = QueryBody {
            variables: Variables {
                customer_access_token: access_token.expose_secret(),
                order_count: CUSTOMER_ORDER_LIMIT,
                line_item_count: ORDER_LINE_ITEM_LIMIT,
            },
            query: QUERY,
            operation_name: "getCustomer",
        };
        let response: Response = self.execute(&body).await?;

        response
            .customer
            .ok_or_else(|| ShopifyError::NotFound("customer for access token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_user_error_wins() {
        let errors = vec![
            CustomerUserError {
                code: Some("UNIDENTIFIED_CUSTOMER".to_string()),
                field: None,
                message: "Unidentified customer".to_string(),
            },
            CustomerUserError {
                code: None,
                field: None,
                message: "Second".to_string(),
            },
        ];
        let err = first_user_error(&errors);
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("Unidentified customer")
        );
        assert!(first_user_error(&[]).is_none());
    }

    #[test]
    fn test_customer_create_input_serializes_camel_case() {
        let input = CustomerCreateInput {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "hunter22".to_string(),
        };
        let value = serde_json::to_value(&input).unwrap_or_default();
        assert_eq!(value["firstName"], "Asha");
        assert_eq!(value["lastName"], "Rao");
    }
}
