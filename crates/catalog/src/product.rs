use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, ProductId};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Raw product record as supplied by the catalog source.
///
/// Prices are in cents. Everything is validated when converted into a
/// [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub price_cents: u64,
    #[serde(default)]
    pub original_price_cents: Option<u64>,
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub discount: Option<u8>,
}

/// Catalog product. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    slug: String,
    name: String,
    category: String,
    #[serde(rename = "price_cents")]
    price: Money,
    #[serde(rename = "original_price_cents")]
    original_price: Option<Money>,
    rating: f64,
    review_count: u32,
    image: String,
    is_new: bool,
    discount: Option<u8>,
}

impl Product {
    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Pre-discount price, when the product is on sale.
    pub fn original_price(&self) -> Option<Money> {
        self.original_price
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Advertised discount in percent.
    pub fn discount(&self) -> Option<u8> {
        self.discount
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = ProductId::new(record.id)?;

        if record.name.trim().is_empty() {
            return Err(DomainError::validation(format!("product {id}: name cannot be empty")));
        }
        if record.slug.trim().is_empty() {
            return Err(DomainError::validation(format!("product {id}: slug cannot be empty")));
        }
        if !record.rating.is_finite() || !(0.0..=MAX_RATING).contains(&record.rating) {
            return Err(DomainError::validation(format!(
                "product {id}: rating {} outside 0-{MAX_RATING}",
                record.rating
            )));
        }
        if record.discount.is_some_and(|d| d > 100) {
            return Err(DomainError::validation(format!("product {id}: discount above 100%")));
        }

        Ok(Self {
            id,
            slug: record.slug,
            name: record.name,
            category: record.category,
            price: Money::from_cents(record.price_cents),
            original_price: record.original_price_cents.map(Money::from_cents),
            rating: record.rating,
            review_count: record.review_count,
            image: record.image,
            is_new: record.is_new,
            discount: record.discount,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.as_str().to_string(),
            slug: p.slug,
            name: p.name,
            category: p.category,
            price_cents: p.price.cents(),
            original_price_cents: p.original_price.map(Money::cents),
            rating: p.rating,
            review_count: p.review_count,
            image: p.image,
            is_new: p.is_new,
            discount: p.discount,
        }
    }
}
