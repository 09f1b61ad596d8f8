//! Interactive shop session.
//!
//! Reads one instruction per line. Search terms are debounced: typing
//! several `/term` lines in quick succession only applies the last one.

use kiosk_storefront::error::{Result, add_breadcrumb};
use kiosk_storefront::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{cart, catalog};

const HELP: &str = "\
  c <category>   select a category
  /<term>        search product titles (empty clears)
  m              show more
  a <product>    add a product to the cart
  cart           show the cart
  r              reload the catalog
  q              quit";

/// One line of shopper input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Category(String),
    Search(String),
    More,
    Add(String),
    Cart,
    Reload,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        if let Some(term) = line.trim_start().strip_prefix('/') {
            return Self::Search(term.to_string());
        }
        let line = line.trim();

        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, a)| (c, a.trim()));
        match (command, arg) {
            ("c", title) if !title.is_empty() => Self::Category(title.to_string()),
            ("a", product) if !product.is_empty() => Self::Add(product.to_string()),
            ("m", "") => Self::More,
            ("cart", "") => Self::Cart,
            ("r", "") => Self::Reload,
            ("q" | "quit", "") => Self::Quit,
            ("?" | "help" | "", "") => Self::Help,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Run the session until `q` or end of input.
///
/// # Errors
///
/// Returns an error if the initial catalog load fails or stdin breaks.
pub async fn run(state: &mut AppState, retries: u32) -> Result<()> {
    catalog::ensure_loaded(state, retries).await?;

    let mut browse = state.browse();
    let mut debouncer = state.search_debouncer();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    catalog::print_view(&browse, state.catalog().catalog());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::Category(title) => {
                        browse.select_category(title);
                        catalog::print_view(&browse, state.catalog().catalog());
                    }
                    Input::Search(term) => debouncer.schedule(term),
                    Input::More => {
                        let current = state.catalog().catalog();
                        browse.show_more(current);
                        catalog::print_view(&browse, current);
                    }
                    Input::Add(product) => {
                        let found = state.catalog().catalog().product(&product).cloned();
                        match found {
                            Some(product) => {
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
                            }
                            None => println!("No product '{product}'"),
                        }
                    }
                    Input::Cart => cart::show(state),
                    Input::Reload => {
                        state.storefront().invalidate_all().await;
                        if let Err(e) = catalog::ensure_loaded(state, 0).await {
                            println!("{}", e.report());
                        }
                        catalog::print_view(&browse, state.catalog().catalog());
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(line) => {
                        println!("Unknown command '{line}', type ? for help");
                    }
                }
            }
            Some(term) = debouncer.settled() => {
                browse.apply_search(term);
                catalog::print_view(&browse, state.catalog().catalog());
            }
        }
    }

    Ok(())
}
