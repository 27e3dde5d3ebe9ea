//! Product catalog and listing pipeline.
//!
//! The catalog is a read-only, ordered set of products. Listing pages are
//! derived from it by three pure stages (filter → sort → paginate) driven by a
//! [`ListingController`] that owns the page-level state.

pub mod catalog;
pub mod criteria;
pub mod filter;
pub mod listing;
pub mod paginate;
pub mod product;
pub mod sort;

pub use catalog::{
    Catalog, CatalogLoadError, RELATED_LIMIT, TRENDING_LIMIT, related_products, trending_products,
};
pub use criteria::{FilterCriteria, PriceRange};
pub use filter::filter;
pub use listing::{DEFAULT_PAGE_SIZE, ListingController, ListingError, ListingQuery, ListingView};
pub use paginate::{Page, paginate};
pub use product::{Product, ProductRecord};
pub use sort::{SortKey, sort};

#[cfg(test)]
pub(crate) mod fixtures;
