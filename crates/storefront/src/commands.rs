//! Subcommands of the `storefront` binary. Each one renders a JSON document.

use std::fs;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use storefront_cart::{AddItem, Cart, CartCommand, CartLine, CartTotals};
use storefront_catalog::{
    Catalog, ListingController, ListingQuery, Product, RELATED_LIMIT, TRENDING_LIMIT, related_products,
    trending_products,
};
use storefront_core::{Aggregate, CartId, ProductId};

use crate::config::StorefrontConfig;

/// `storefront` command line.
#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront catalog queries rendered as JSON", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Listing page for an optional query
    Listing {
        /// JSON query, e.g. '{"criteria":{"categories":["audio"]},"sort":"rating","page":1}'
        query: Option<String>,
    },

    /// Product detail page with related products
    Product {
        /// Product slug, e.g. nike-air-max-270
        slug: String,
    },

    /// Home-page trending products
    Trending,

    /// Quote for the demo cart
    Cart,
}

/// Decode a listing query argument; no argument means the default listing.
pub fn listing_query(raw: Option<&str>) -> anyhow::Result<ListingQuery> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("failed to parse listing query JSON"),
        None => Ok(ListingQuery::default()),
    }
}

/// Load the configured catalog, or the bundled demo catalog.
pub fn load_catalog(config: &StorefrontConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            Catalog::from_json(&json).with_context(|| format!("failed to load catalog {}", path.display()))
        }
        None => Catalog::demo().context("failed to load bundled catalog"),
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetail<'a> {
    pub product: &'a Product,
    pub related: Vec<&'a Product>,
}

#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

/// Execute a command and return its JSON output.
pub fn run(command: &Command, config: &StorefrontConfig, catalog: &Catalog) -> anyhow::Result<serde_json::Value> {
    let output = match command {
        Command::Listing { query } => {
            let query = listing_query(query.as_deref())?;
            let mut listing = ListingController::new(catalog).with_page_size(config.page_size)?;
            listing.apply_query(query)?;
            serde_json::to_value(listing.view())?
        }
        Command::Product { slug } => {
            let product = catalog
                .find_by_slug(slug)
                .with_context(|| format!("product {slug:?} not found"))?;
            serde_json::to_value(ProductDetail {
                product,
                related: related_products(catalog, product, RELATED_LIMIT),
            })?
        }
        Command::Trending => serde_json::to_value(trending_products(catalog, TRENDING_LIMIT))?,
        Command::Cart => {
            let cart = demo_cart(catalog)?;
            serde_json::to_value(CartSummary {
                lines: cart.lines().to_vec(),
                totals: cart.quote(),
            })?
        }
    };
    Ok(output)
}

/// Cart line for `quantity` units of a catalog product.
pub fn cart_line(product: &Product, variant: Option<&str>, quantity: u32) -> CartLine {
    CartLine {
        product_id: product.id_typed().clone(),
        name: product.name().to_string(),
        variant: variant.map(str::to_string),
        unit_price: product.price(),
        original_price: product.original_price(),
        quantity,
        in_stock: true,
    }
}

const DEMO_CART: [(&str, Option<&str>, u32); 3] = [
    ("1", Some("256GB, Natural Titanium"), 1),
    ("7", Some("Size 10, Black/White"), 2),
    ("5", Some("Black"), 1),
];

/// The demo cart: three catalog products, no promo code.
pub fn demo_cart(catalog: &Catalog) -> anyhow::Result<Cart> {
    let mut cart = Cart::empty(CartId::new());
    for (id, variant, quantity) in DEMO_CART {
        let id = ProductId::new(id)?;
        let product = catalog
            .get(&id)
            .with_context(|| format!("demo cart product {id} is not in the catalog"))?;
        cart.execute(&CartCommand::AddItem(AddItem {
            line: cart_line(product, variant, quantity),
        }))?;
    }
    tracing::debug!(lines = cart.lines().len(), "demo cart built");
    Ok(cart)
}
