//! Checkout command.

use kiosk_core::Price;
use kiosk_storefront::error::{Result, add_breadcrumb};
use kiosk_storefront::services::checkout::{CheckoutForm, CheckoutTotals};
use kiosk_storefront::state::AppState;

/// Show the totals and place the order, which empties the cart.
///
/// # Errors
///
/// Returns the first checkout rule the form or cart breaks.
pub fn place(state: &mut AppState, form: &CheckoutForm) -> Result<()> {
    let totals = CheckoutTotals::compute(state.cart(), form.delivery);
    let currency = totals.currency_code.clone();

    let receipt = state.place_order(form)?;
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("payment", receipt.payment.label())]),
    );

    println!(
        "Subtotal  {:>12}",
        Price::new(totals.subtotal, currency.clone()).display()
    );
    println!(
        "Delivery  {:>12}",
        Price::new(totals.delivery_charge, currency).display()
    );
    println!("Total     {:>12}", totals.grand_total_price().display());
    println!("Order placed: {receipt}");
    Ok(())
}
