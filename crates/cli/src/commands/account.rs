//! Account commands: login, signup, logout, profile and orders.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Password;
use kiosk_storefront::error::{Result, clear_sentry_user, set_sentry_user};
use kiosk_storefront::services::account::{Authenticated, LoginForm, SignupForm};
use kiosk_storefront::state::AppState;
use secrecy::SecretString;

const LOGIN_PROMPT: &str = "Please log in first: kiosk login -e <email>";

/// Ask for a password without echoing it.
///
/// When stdin is not a terminal the first line is read instead, so
/// passwords can be piped in. With `confirm`, an interactive prompt asks
/// twice.
///
/// # Errors
///
/// Returns an error if the terminal or stdin cannot be read.
pub fn read_password(confirm: bool) -> Result<SecretString> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        return Ok(password_from_line(&line));
    }

    let mut prompt = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true);
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    let password = prompt.interact().map_err(io::Error::other)?;
    Ok(SecretString::from(password))
}

fn password_from_line(line: &str) -> SecretString {
    SecretString::from(line.trim_end_matches(['\r', '\n']))
}

/// Sign in and remember the session.
///
/// # Errors
///
/// Returns field errors or Shopify's rejection message.
pub async fn login(state: &AppState, form: &LoginForm) -> Result<()> {
    state.accounts().login(form).await?;
    set_sentry_user(form.email.trim());
    println!("Welcome back!");
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns field errors or Shopify's rejection message.
pub async fn signup(state: &AppState, form: &SignupForm) -> Result<()> {
    state.accounts().signup(form).await?;
    set_sentry_user(form.email.trim());
    println!("Account created, you are now logged in");
    Ok(())
}

pub fn logout(state: &AppState) {
    state.accounts().logout();
    clear_sentry_user();
    println!("Logged out");
}

/// Print the signed-in customer's details.
///
/// # Errors
///
/// Returns an error if the session has expired or the request fails.
pub async fn profile(state: &AppState) -> Result<()> {
    let Authenticated::LoggedIn(customer) = state.accounts().profile().await? else {
        println!("{LOGIN_PROMPT}");
        return Ok(());
    };

    println!("{}", customer.full_name());
    if let Some(email) = &customer.email {
        println!("Email: {email}");
    }
    if let Some(phone) = &customer.phone {
        println!("Phone: {phone}");
    }
    match customer.primary_address() {
        Some(address) => {
            println!("Address:");
            for line in address.format_lines() {
                println!("  {line}");
            }
        }
        None => println!("No address on file"),
    }
    Ok(())
}

/// Print the signed-in customer's recent orders.
///
/// # Errors
///
/// Returns an error if the session has expired or the request fails.
pub async fn orders(state: &AppState) -> Result<()> {
    let Authenticated::LoggedIn(orders) = state.accounts().orders().await? else {
        println!("{LOGIN_PROMPT}");
        return Ok(());
    };

    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        println!(
            "#{:<8} {:<16} {:<11} {:>12}",
            order.order_number,
            order.date_display(),
            order.status.label(),
            order.total_display()
        );
        println!("          {}", order.items_summary());
    }
    Ok(())
}
