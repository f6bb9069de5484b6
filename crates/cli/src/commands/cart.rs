//! Cart commands: show, add, remove, update.
//!
//! Each command hydrates the store from the configured slot, runs one
//! operation, and prints the resulting cart. A rejected operation prints its
//! notice and fails the command.

use std::fmt::Write as _;

use rocket_shoes_cart::{CartConfig, CartStore, Notice, UpdateProductAmount};
use rocket_shoes_core::{Cart, ProductId};

/// Print the current cart.
///
/// # Errors
///
/// Returns an error if the configuration or slot cannot be loaded.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let store = open().await?;
    print_cart(&store.cart());
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns the operation's notice if it was rejected.
pub async fn add(product_id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let store = open().await?;
    let cart = store.add_product(product_id).await.map_err(rejected)?;
    print_cart(&cart);
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns the operation's notice if it was rejected.
pub async fn remove(product_id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let store = open().await?;
    let cart = store.remove_product(product_id).await.map_err(rejected)?;
    print_cart(&cart);
    Ok(())
}

/// Set the amount of a product already in the cart.
///
/// # Errors
///
/// Returns the operation's notice if it was rejected.
pub async fn update(product_id: ProductId, amount: u32) -> Result<(), Box<dyn std::error::Error>> {
    let store = open().await?;
    let cart = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await
        .map_err(rejected)?;
    print_cart(&cart);
    Ok(())
}

async fn open() -> Result<CartStore, Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    Ok(CartStore::from_config(&config).await?)
}

fn rejected(notice: Notice) -> Box<dyn std::error::Error> {
    Box::new(notice)
}

fn print_cart(cart: &Cart) {
    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(cart));
    }
}

/// Render the cart as a text table with line subtotals and the total.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let summary = cart.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>4}  {:>10}  {:>10}  TITLE",
        "ID", "QTY", "UNIT", "SUBTOTAL"
    );
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:>4}  {:>4}  {:>10}  {:>10}  {}",
            line.id,
            line.amount,
            line.unit_price.display(),
            line.subtotal.display(),
            line.title
        );
    }
    let _ = writeln!(
        out,
        "Items: {}  Total: {}",
        summary.item_count,
        summary.total.display()
    );
    out
}
