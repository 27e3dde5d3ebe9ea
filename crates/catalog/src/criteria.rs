//! Listing filter criteria and the filter-panel edits that produce them.

use serde::{Deserialize, Serialize};

use storefront_core::{Money, ValueObject};

/// Upper bound of the default price range (currency units).
pub const DEFAULT_PRICE_CEILING: u64 = 1000;

/// Inclusive price bounds.
///
/// `min > max` is allowed and simply matches nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Money::ZERO, Money::from_units(DEFAULT_PRICE_CEILING))
    }
}

impl ValueObject for PriceRange {}

/// Active filter constraints of a listing.
///
/// Each dimension is an OR over its own tokens (or a no-op when empty/absent);
/// dimensions combine with AND. `FilterCriteria::default()` is the
/// "clear all" state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Category tokens, e.g. `"smartphones"`, `"mens-fashion"`.
    pub categories: Vec<String>,
    /// Brand tokens, matched against the product name.
    pub brands: Vec<String>,
    pub price_range: PriceRange,
    /// Minimum rating.
    pub rating: Option<f64>,
}

impl FilterCriteria {
    /// Select the category if unselected, otherwise deselect it.
    pub fn toggle_category(&mut self, token: impl Into<String>) {
        toggle(&mut self.categories, token.into());
    }

    /// Select the brand if unselected, otherwise deselect it.
    pub fn toggle_brand(&mut self, token: impl Into<String>) {
        toggle(&mut self.brands, token.into());
    }

    /// Picking the threshold that is already selected clears the rating filter.
    pub fn toggle_rating(&mut self, threshold: f64) {
        self.rating = match self.rating {
            Some(current) if current == threshold => None,
            _ => Some(threshold),
        };
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
    }

    /// Number of selected category/brand/rating filters (the price range is
    /// always applied and is not counted).
    pub fn active_filter_count(&self) -> usize {
        let rating = usize::from(self.rating.is_some_and(|r| r > 0.0));
        self.categories.len() + self.brands.len() + rating
    }
}

fn toggle(tokens: &mut Vec<String>, token: String) {
    if let Some(pos) = tokens.iter().position(|t| *t == token) {
        tokens.remove(pos);
    } else {
        tokens.push(token);
    }
}
