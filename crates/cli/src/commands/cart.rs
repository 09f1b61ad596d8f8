//! Cart commands.

use kiosk_core::{Price, ProductId};
use kiosk_storefront::error::{AppError, Result, add_breadcrumb};
use kiosk_storefront::state::AppState;

use super::catalog;

/// Print cart lines, unit count and total.
pub fn show(state: &AppState) {
    let cart = state.cart();
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in cart.items() {
        let total = line.line_total().map_or_else(
            || "-".to_string(),
            |amount| Price::new(amount, line.currency_code.clone()).display(),
        );
        println!(
            "{:>3} x {:<36} {:>12} {:>12}  [{}]",
            line.quantity,
            line.title,
            line.unit_price().display(),
            total,
            line.id
        );
    }

    let total = Price::new(cart.total_price(), cart.currency_code());
    println!("{} items, total {}", cart.cart_count(), total.display());
}

/// Add one unit of a catalog product, found by ID or handle.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has no such product.
pub async fn add(state: &mut AppState, retries: u32, id_or_handle: &str) -> Result<()> {
    catalog::ensure_loaded(state, retries).await?;

    let product = state
        .catalog()
        .catalog()
        .product(id_or_handle)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id_or_handle}")))?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );
    state.cart_mut().add_to_cart(&product);
    println!(
        "Added {} ({} in cart)",
        product.title,
        state.cart().cart_count()
    );
    Ok(())
}

pub fn remove(state: &mut AppState, id: &str) {
    let id = ProductId::new(id);
    state.cart_mut().remove_from_cart(&id);
    println!("Removed {id}");
}

pub fn set_quantity(state: &mut AppState, id: &str, quantity: i64) {
    let id = ProductId::new(id);
    state.cart_mut().update_quantity(&id, quantity);
    match state.cart().get(&id) {
        Some(line) => println!("{} x {}", line.quantity, line.title),
        None => println!("{id} is not in the cart"),
    }
}

pub fn clear(state: &mut AppState) {
    state.cart_mut().clear_cart();
    println!("Cart cleared");
}
