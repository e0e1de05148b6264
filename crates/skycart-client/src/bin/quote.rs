//! # skycart-quote
//!
//! Prints the catalogue with final prices for one currency and customer type.
//!
//! ```text
//! skycart-quote [CURRENCY] [CUSTOMER TYPE...]
//!
//! skycart-quote EUR Happy hour
//! ```
//!
//! Missing arguments fall back to `storefront.toml` / `SKYCART_*` settings.

use skycart_client::{Storefront, StorefrontConfig};
use skycart_core::{Currency, CustomerType};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skycart=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = StorefrontConfig::load_or_default(None);

    let mut args = std::env::args().skip(1);
    if let Some(code) = args.next() {
        config.session.currency = code.parse::<Currency>()?;
    }
    let label = args.collect::<Vec<_>>().join(" ");
    if !label.is_empty() {
        config.session.customer_type = CustomerType::from_label(&label);
    }

    info!(
        currency = %config.session.currency,
        customer_type = %config.session.customer_type,
        "Quoting catalogue"
    );

    let storefront = Storefront::from_config(&config)?;
    let mut session = storefront.open(&config.session).await;
    let engine = session.engine();

    println!(
        "{} prices in {} (rates {}, {:?})",
        session.customer_type,
        session.currency,
        session.rates.date_label(),
        session.rates.origin
    );
    for product in &session.products {
        println!(
            "  #{:<4} {:<32} {:>12}  stock {}",
            product.id,
            product.name,
            engine.quote(product).to_string(),
            product.stock
        );
    }

    // One of each item still in stock.
    let ids: Vec<_> = session
        .products
        .iter()
        .filter(|p| !p.is_sold_out())
        .map(|p| p.id)
        .collect();
    for id in ids {
        session.add(id)?;
    }

    let summary = session.summary();
    println!("One of each ({} items):", summary.item_count);
    for (currency, total) in session.totals_in_all_currencies() {
        println!("  {:.2} {}", total, currency.symbol());
    }

    Ok(())
}
