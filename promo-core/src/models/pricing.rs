use super::HydratedItem;

/// The pricing summary of a bundle: totals and savings across its items.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BundleSummary {
    /// Sum of the items' undiscounted base prices
    pub regular_total: f64,
    /// Sum of the items' promotional prices
    pub promo_total: f64,
    /// `regular_total - promo_total`
    pub total_savings: f64,
    /// Savings as a percentage of the regular total; 0 when that total is 0
    pub avg_discount_percent: f64,
}

impl BundleSummary {
    /// Compute the summary over a bundle's hydrated items.
    ///
    /// A bundle of zero-priced products has a zero regular total; the average
    /// discount is defined as 0 in that case rather than dividing by zero.
    pub fn of<ProductId>(items: &[HydratedItem<ProductId>]) -> Self {
        let regular_total: f64 = items.iter().map(|item| item.product.data.base_price).sum();
        let promo_total: f64 = items
            .iter()
            .map(|item| item.rule.final_price(item.product.data.base_price))
            .sum();
        let total_savings = regular_total - promo_total;
        let avg_discount_percent = if regular_total > 0.0 {
            total_savings / regular_total * 100.0
        } else {
            0.0
        };
        Self {
            regular_total,
            promo_total,
            total_savings,
            avg_discount_percent,
        }
    }
}
