//! Read-only product catalog and the lookups built on it.

use std::collections::HashSet;

use thiserror::Error;

use storefront_core::{DomainError, Entity, ProductId};

use crate::product::{Product, ProductRecord};

/// Bundled demo catalog (JSON array of [`ProductRecord`]s).
pub const DEMO_CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Default number of related products shown on a detail page.
pub const RELATED_LIMIT: usize = 4;

/// Default number of trending products on the home page.
pub const TRENDING_LIMIT: usize = 8;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to decode catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid product at index {index}: {source}")]
    InvalidProduct {
        index: usize,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Ordered, immutable set of products with unique ids and slugs.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids or slugs.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut ids = HashSet::with_capacity(products.len());
        let mut slugs = HashSet::with_capacity(products.len());
        for product in &products {
            if !ids.insert(product.id()) {
                return Err(DomainError::conflict(format!("duplicate product id {}", product.id())));
            }
            if !slugs.insert(product.slug()) {
                return Err(DomainError::conflict(format!(
                    "duplicate product slug {}",
                    product.slug()
                )));
            }
        }
        Ok(Self { products })
    }

    /// Decode and validate a JSON array of product records.
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        let products = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Product::try_from(record).map_err(|source| CatalogLoadError::InvalidProduct { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::new(products)?;
        tracing::debug!(products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// The bundled demo catalog.
    pub fn demo() -> Result<Self, CatalogLoadError> {
        Self::from_json(DEMO_CATALOG_JSON)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// Detail-page lookup. `None` means "not found".
    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug() == slug)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Other products of exactly the same category, in catalog order.
pub fn related_products<'a>(catalog: &'a Catalog, product: &Product, limit: usize) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| p.id() != product.id() && p.category() == product.category())
        .take(limit)
        .collect()
}

/// Leading catalog entries.
pub fn trending_products(catalog: &Catalog, limit: usize) -> Vec<&Product> {
    catalog.iter().take(limit).collect()
}
