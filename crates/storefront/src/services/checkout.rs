//! Checkout form validation and order placement.
//!
//! There is no payment integration: placing an order validates the form,
//! computes the grand total, and clears the cart.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use kiosk_core::{CurrencyCode, Price};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::cart::CartStore;
use crate::storage::KeyValueStore;

/// Minimum trimmed length of a delivery address.
pub const MIN_ADDRESS_LENGTH: usize = 8;

/// Charge for express delivery, in the cart's currency.
pub const EXPRESS_DELIVERY_CHARGE: Decimal = Decimal::from_parts(49, 0, 0, false, 0);

static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5,6}$").expect("Invalid regex"));
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid regex"));

/// Checkout validation failures, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Name required")]
    NameRequired,
    #[error("Please enter a valid address")]
    InvalidAddress,
    #[error("Enter valid pincode")]
    InvalidPincode,
    #[error("Enter valid 10-digit mobile number")]
    InvalidMobile,
    #[error("Cart is empty")]
    EmptyCart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryOption {
    #[default]
    Standard,
    Express,
}

impl DeliveryOption {
    #[must_use]
    pub const fn charge(self) -> Decimal {
        match self {
            Self::Standard => Decimal::ZERO,
            Self::Express => EXPRESS_DELIVERY_CHARGE,
        }
    }
}

impl FromStr for DeliveryOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(format!("invalid delivery option: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Online => "Online Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::CashOnDelivery),
            "online" => Ok(Self::Online),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Delivery and payment details.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub address: String,
    pub pincode: String,
    pub mobile: String,
    pub delivery: DeliveryOption,
    pub payment: PaymentMethod,
}

impl CheckoutForm {
    /// Check the form fields; the first failing rule wins.
    ///
    /// # Errors
    ///
    /// Returns the first rule the form breaks.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.name.trim().is_empty() {
            return Err(CheckoutError::NameRequired);
        }
        if self.address.trim().chars().count() < MIN_ADDRESS_LENGTH {
            return Err(CheckoutError::InvalidAddress);
        }
        if !PINCODE_RE.is_match(self.pincode.trim()) {
            return Err(CheckoutError::InvalidPincode);
        }
        if !MOBILE_RE.is_match(self.mobile.trim()) {
            return Err(CheckoutError::InvalidMobile);
        }
        Ok(())
    }
}

/// Amounts shown on the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub currency_code: CurrencyCode,
    pub subtotal: Decimal,
    pub delivery_charge: Decimal,
    pub grand_total: Decimal,
}

impl CheckoutTotals {
    #[must_use]
    pub fn compute<S: KeyValueStore>(cart: &CartStore<S>, delivery: DeliveryOption) -> Self {
        let subtotal = cart.total_price();
        let delivery_charge = delivery.charge();
        Self {
            currency_code: cart.currency_code(),
            subtotal,
            delivery_charge,
            grand_total: subtotal.saturating_add(delivery_charge),
        }
    }

    #[must_use]
    pub fn grand_total_price(&self) -> Price {
        Price::new(self.grand_total, self.currency_code.clone())
    }
}

/// Confirmation of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub totals: CheckoutTotals,
    pub payment: PaymentMethod,
    pub item_count: u64,
}

impl fmt::Display for OrderReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {}",
            self.totals.grand_total_price().display(),
            self.payment
        )
    }
}

/// Validate the form against the cart, then clear the cart.
///
/// # Errors
///
/// Returns the first failing rule; the cart is untouched on error.
pub fn place_order<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    form: &CheckoutForm,
) -> Result<OrderReceipt, CheckoutError> {
    form.validate()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let receipt = OrderReceipt {
        totals: CheckoutTotals::compute(cart, form.delivery),
        payment: form.payment,
        item_count: cart.cart_count(),
    };
    cart.clear_cart();

    info!(
        grand_total = %receipt.totals.grand_total,
        payment = receipt.payment.label(),
        "Order placed"
    );
    Ok(receipt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::Product;
    use crate::storage::MemoryStore;
    use kiosk_core::ProductId;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Aman Kumar".to_string(),
            address: "12 MG Road, Indiranagar".to_string(),
            pincode: "560001".to_string(),
            mobile: "9876543210".to_string(),
            delivery: DeliveryOption::Standard,
            payment: PaymentMethod::CashOnDelivery,
        }
    }

    fn cart_with(amount: i64, quantity: i64) -> CartStore<MemoryStore> {
        let mut cart = CartStore::restore(MemoryStore::new());
        let product = Product {
            id: ProductId::new("p1"),
            handle: "p1".to_string(),
            title: "Protein Bar".to_string(),
            description: String::new(),
            image: None,
            price: Price::new(Decimal::from(amount), CurrencyCode::INR),
            available_for_sale: true,
            collections: vec![],
        };
        cart.add_to_cart(&product);
        cart.update_quantity(&product.id, quantity);
        cart
    }

    #[test]
    fn test_validation_order() {
        let form = CheckoutForm {
            name: " ".to_string(),
            address: "short".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(CheckoutError::NameRequired));

        let form = CheckoutForm {
            address: "  short  ".to_string(),
            pincode: "x".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(CheckoutError::InvalidAddress));

        let form = CheckoutForm {
            pincode: "1234".to_string(),
            mobile: "1".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(CheckoutError::InvalidPincode));

        let form = CheckoutForm {
            mobile: "98765 43210".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(CheckoutError::InvalidMobile));

        assert_eq!(valid_form().validate(), Ok(()));
    }

    #[test]
    fn test_five_digit_pincode_is_valid() {
        let form = CheckoutForm {
            pincode: "56001".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_empty_cart_is_rejected_last() {
        let mut cart = CartStore::restore(MemoryStore::new());
        assert_eq!(
            place_order(&mut cart, &valid_form()),
            Err(CheckoutError::EmptyCart)
        );
        let bad_form = CheckoutForm {
            name: String::new(),
            ..valid_form()
        };
        assert_eq!(
            place_order(&mut cart, &bad_form),
            Err(CheckoutError::NameRequired)
        );
    }

    #[test]
    fn test_express_adds_delivery_charge() {
        let cart = cart_with(100, 2);
        let standard = CheckoutTotals::compute(&cart, DeliveryOption::Standard);
        let express = CheckoutTotals::compute(&cart, DeliveryOption::Express);
        assert_eq!(standard.grand_total, Decimal::from(200));
        assert_eq!(express.delivery_charge, Decimal::from(49));
        assert_eq!(express.grand_total, Decimal::from(249));
    }

    #[test]
    fn test_grand_total_saturates_at_max() {
        use crate::storage::CART_KEY;

        let storage = MemoryStore::new();
        storage
            .set(
                CART_KEY,
                r#"[{"id": "a", "title": "A", "price": {"amount": "79228162514264337593543950335"}}]"#,
            )
            .unwrap();
        let cart = CartStore::restore(storage);

        let express = CheckoutTotals::compute(&cart, DeliveryOption::Express);
        assert_eq!(express.subtotal, Decimal::MAX);
        assert_eq!(express.grand_total, Decimal::MAX);
    }

    #[test]
    fn test_place_order_clears_cart() {
        let mut cart = cart_with(100, 2);
        let form = CheckoutForm {
            delivery: DeliveryOption::Express,
            payment: PaymentMethod::Online,
            ..valid_form()
        };

        let receipt = place_order(&mut cart, &form).unwrap();
        assert!(cart.is_empty());
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.to_string(), "₹249.00 via Online Payment");
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("express".parse(), Ok(DeliveryOption::Express));
        assert_eq!("COD".parse(), Ok(PaymentMethod::CashOnDelivery));
        assert!("pigeon".parse::<DeliveryOption>().is_err());
    }
}
