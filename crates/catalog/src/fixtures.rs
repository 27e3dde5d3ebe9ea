//! Test-only product builders.

use proptest::prelude::*;

use crate::catalog::Catalog;
use crate::product::{Product, ProductRecord};

pub(crate) fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub(crate) fn product(
    id: &str,
    name: &str,
    category: &str,
    price_units: u64,
    rating: f64,
    is_new: bool,
) -> Product {
    Product::try_from(ProductRecord {
        id: id.to_string(),
        slug: format!("{}-{id}", slugify(name)),
        name: name.to_string(),
        category: category.to_string(),
        price_cents: price_units * 100,
        rating,
        is_new,
        ..ProductRecord::default()
    })
    .expect("fixture product is valid")
}

/// The bundled 14-product demo catalog.
pub(crate) fn demo_products() -> Vec<Product> {
    Catalog::demo().expect("bundled catalog is valid").products().to_vec()
}

/// Products with deliberately colliding prices, ratings and names so that
/// stability of the sort is observable.
pub(crate) fn arb_products(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Product>> {
    let row = (
        prop::sample::select(vec!["Sony", "Nike", "Apple", "Dell", "Zara", "Éclair", "adidas"]),
        prop::sample::select(vec!["Audio", "Footwear", "Men's Fashion", "Mens Fashion", "Laptops"]),
        0u64..30,
        0u8..=10,
        any::<bool>(),
    );
    proptest::collection::vec(row, len).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (brand, category, price_tier, half_stars, is_new))| {
                product(
                    &i.to_string(),
                    &format!("{brand} Item"),
                    category,
                    price_tier * 50,
                    f64::from(half_stars) / 2.0,
                    is_new,
                )
            })
            .collect()
    })
}
