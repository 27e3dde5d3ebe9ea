//! Filter stage: narrows a product sequence by the active criteria.

use crate::criteria::{FilterCriteria, PriceRange};
use crate::product::Product;

/// Return the products matching every active dimension of `criteria`, in
/// input order.
///
/// - category: the lowercased product category contains a token (with its
///   first `-` replaced by a space);
/// - brand: the lowercased product name contains a lowercased token;
/// - price: inside the inclusive range (always applied);
/// - rating: at least the threshold, when one is set.
///
/// Contradictory bounds produce an empty result, never an error.
pub fn filter<'a, I>(products: I, criteria: &FilterCriteria) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let matcher = Matcher::new(criteria);
    products.into_iter().filter(|p| matcher.matches(p)).collect()
}

/// Criteria with tokens normalised once per pass.
struct Matcher {
    categories: Vec<String>,
    brands: Vec<String>,
    price_range: PriceRange,
    rating: Option<f64>,
}

impl Matcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            categories: criteria
                .categories
                .iter()
                .map(|t| t.replacen('-', " ", 1))
                .collect(),
            brands: criteria.brands.iter().map(|b| b.to_lowercase()).collect(),
            price_range: criteria.price_range,
            rating: criteria.rating,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() {
            let category = product.category().to_lowercase();
            if !self.categories.iter().any(|t| category.contains(t.as_str())) {
                return false;
            }
        }

        if !self.brands.is_empty() {
            let name = product.name().to_lowercase();
            if !self.brands.iter().any(|b| name.contains(b.as_str())) {
                return false;
            }
        }

        if !self.price_range.contains(product.price()) {
            return false;
        }

        match self.rating {
            Some(min) => product.rating() >= min,
            None => true,
        }
    }
}
