//! Order pricing: subtotal, savings, promo discount, shipping and tax.
//!
//! Integer cents throughout; every percentage rounds half-up.

use serde::{Deserialize, Serialize};

use storefront_core::Money;

use crate::cart::CartLine;

/// Sales tax applied to the discounted subtotal.
pub const TAX_PERCENT: u64 = 8;

/// Recognised promotion codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    /// 10% off the subtotal.
    #[serde(rename = "SAVE10")]
    Save10,
}

impl PromoCode {
    /// Case-insensitive exact lookup. Surrounding whitespace is not
    /// stripped, so `" SAVE10"` is unknown.
    pub fn parse(raw: &str) -> Option<PromoCode> {
        match raw.to_ascii_uppercase().as_str() {
            "SAVE10" => Some(PromoCode::Save10),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromoCode::Save10 => "SAVE10",
        }
    }

    pub fn discount_percent(self) -> u64 {
        match self {
            PromoCode::Save10 => 10,
        }
    }
}

impl core::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ShippingPolicy {
    /// No shipping charge.
    Free,
    /// Free when the subtotal is strictly above `threshold`, otherwise `fee`.
    FreeOver { threshold: Money, fee: Money },
}

impl ShippingPolicy {
    /// Cart page policy: free over $50, otherwise $9.99.
    pub const STANDARD: ShippingPolicy = ShippingPolicy::FreeOver {
        threshold: Money::from_units(50),
        fee: Money::from_cents(999),
    };

    fn charge(self, subtotal: Money) -> Money {
        match self {
            ShippingPolicy::Free => Money::ZERO,
            ShippingPolicy::FreeOver { threshold, fee } => {
                if subtotal > threshold {
                    Money::ZERO
                } else {
                    fee
                }
            }
        }
    }
}

/// Priced summary of a set of cart lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Money,
    /// Sum at pre-sale prices.
    pub original_total: Money,
    pub savings: Money,
    pub promo_discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    /// Amount still needed to qualify for free shipping, when a fee applies.
    pub free_shipping_remaining: Option<Money>,
}

/// Price `lines`. An empty set of lines costs nothing, shipping included.
pub fn quote(lines: &[CartLine], promo: Option<PromoCode>, policy: ShippingPolicy) -> CartTotals {
    let item_count = lines.iter().map(|l| l.quantity).sum();
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
    let original_total: Money = lines.iter().map(CartLine::original_line_total).sum();
    let savings = original_total.saturating_sub(subtotal);

    let promo_discount = promo.map_or(Money::ZERO, |p| subtotal.percent(p.discount_percent()));
    let shipping = if lines.is_empty() { Money::ZERO } else { policy.charge(subtotal) };
    let taxable = subtotal.saturating_sub(promo_discount);
    let tax = taxable.percent(TAX_PERCENT);
    let total = taxable + shipping + tax;

    let free_shipping_remaining = match policy {
        ShippingPolicy::FreeOver { threshold, .. } if !shipping.is_zero() => {
            Some(threshold.saturating_sub(subtotal))
        }
        _ => None,
    };

    CartTotals {
        item_count,
        subtotal,
        original_total,
        savings,
        promo_discount,
        shipping,
        tax,
        total,
        free_shipping_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ProductId;

    fn line(id: &str, price_cents: u64, original: Option<u64>, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id).unwrap(),
            name: format!("Product {id}"),
            variant: None,
            unit_price: Money::from_cents(price_cents),
            original_price: original.map(Money::from_cents),
            quantity,
            in_stock: true,
        }
    }

    #[test]
    fn demo_cart_totals() {
        // iPhone 1199 (was 1299) x1, Nike 129 (was 159) x2, Sony 349 x1
        let lines = vec![
            line("1", 119_900, Some(129_900), 1),
            line("2", 12_900, Some(15_900), 2),
            line("3", 34_900, None, 1),
        ];
        let totals = quote(&lines, None, ShippingPolicy::STANDARD);

        assert_eq!(totals.item_count, 4);
        assert_eq!(totals.subtotal, Money::from_units(1806));
        assert_eq!(totals.original_total, Money::from_units(1966));
        assert_eq!(totals.savings, Money::from_units(160));
        assert_eq!(totals.shipping, Money::ZERO);
        assert_eq!(totals.tax, Money::from_cents(14_448));
        assert_eq!(totals.total, Money::from_cents(195_048));
        assert_eq!(totals.free_shipping_remaining, None);
    }

    #[test]
    fn promo_discount_reduces_taxable_amount() {
        let lines = vec![line("1", 10_000, None, 1)];
        let totals = quote(&lines, Some(PromoCode::Save10), ShippingPolicy::STANDARD);

        assert_eq!(totals.promo_discount, Money::from_units(10));
        assert_eq!(totals.tax, Money::from_cents(720));
        assert_eq!(totals.total, Money::from_cents(9_720));
    }

    #[test]
    fn small_orders_pay_shipping() {
        let lines = vec![line("1", 2_000, None, 1)];
        let totals = quote(&lines, None, ShippingPolicy::STANDARD);

        assert_eq!(totals.shipping, Money::from_cents(999));
        assert_eq!(totals.free_shipping_remaining, Some(Money::from_units(30)));
        assert_eq!(totals.total, Money::from_cents(2_000 + 999 + 160));
    }

    #[test]
    fn exactly_at_threshold_still_pays_shipping() {
        let lines = vec![line("1", 5_000, None, 1)];
        let totals = quote(&lines, None, ShippingPolicy::STANDARD);
        assert_eq!(totals.shipping, Money::from_cents(999));
        assert_eq!(totals.free_shipping_remaining, Some(Money::ZERO));
    }

    #[test]
    fn empty_cart_costs_nothing() {
        let totals = quote(&[], Some(PromoCode::Save10), ShippingPolicy::STANDARD);
        assert_eq!(totals.total, Money::ZERO);
        assert_eq!(totals.shipping, Money::ZERO);
        assert_eq!(totals.free_shipping_remaining, None);
    }

    #[test]
    fn free_policy_never_charges() {
        let lines = vec![line("1", 100, None, 1)];
        let totals = quote(&lines, None, ShippingPolicy::Free);
        assert_eq!(totals.shipping, Money::ZERO);
        assert_eq!(totals.free_shipping_remaining, None);
    }

    #[test]
    fn promo_parsing_is_case_insensitive() {
        assert_eq!(PromoCode::parse("save10"), Some(PromoCode::Save10));
        assert_eq!(PromoCode::parse("Save10"), Some(PromoCode::Save10));
        assert_eq!(PromoCode::parse(" SAVE10 "), None);
        assert_eq!(PromoCode::parse("SAVE20"), None);
        assert_eq!(serde_json::to_string(&PromoCode::Save10).unwrap(), r#""SAVE10""#);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the total is the sum of its parts and never below the
            /// discounted subtotal.
            #[test]
            fn total_is_sum_of_parts(
                rows in proptest::collection::vec((1u64..200_000, 0u64..50_000, 1u32..10), 0..8),
                promo in any::<bool>(),
            ) {
                let lines: Vec<CartLine> = rows
                    .iter()
                    .enumerate()
                    .map(|(i, (price, markup, qty))| line(&i.to_string(), *price, Some(price + markup), *qty))
                    .collect();
                let promo = promo.then_some(PromoCode::Save10);
                let t = quote(&lines, promo, ShippingPolicy::STANDARD);

                prop_assert_eq!(t.total, t.subtotal.saturating_sub(t.promo_discount) + t.shipping + t.tax);
                prop_assert!(t.promo_discount <= t.subtotal);
                prop_assert_eq!(t.savings, t.original_total.saturating_sub(t.subtotal));
                prop_assert!(t.original_total >= t.subtotal);
            }
        }
    }
}
