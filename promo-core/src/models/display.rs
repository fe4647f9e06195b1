use super::{BundleStatus, BundleSummary, ProductRecord, PromotionRule};

/// A bundle item with its product reference resolved against the catalog.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HydratedItem<ProductId> {
    /// The resolved catalog product
    pub product: ProductRecord<ProductId>,
    /// The discount applied to it
    pub rule: PromotionRule,
}

/// A persisted bundle with its product references resolved.
///
/// This is what repositories return on read: everything needed to derive the
/// display form at the edge without further catalog lookups.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HydratedBundle<BundleId, ProductId, DateTime> {
    /// Unique identifier for the bundle
    pub id: BundleId,
    /// Display name of the bundle
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// The resolved items, in stored order
    pub items: Vec<HydratedItem<ProductId>>,
    /// The starting time of the promotion window
    pub start: DateTime,
    /// The ending time of the promotion window
    pub end: DateTime,
    /// When the bundle was first persisted
    pub created_at: DateTime,
    /// When the bundle was last modified
    pub updated_at: DateTime,
}

impl<BundleId, ProductId, DateTime: PartialOrd> HydratedBundle<BundleId, ProductId, DateTime> {
    /// Derive the read-side view at the given instant: per-item promotional
    /// prices, the pricing summary, and the clock-derived status.
    pub fn into_display(self, now: &DateTime) -> BundleDisplay<BundleId, ProductId, DateTime> {
        let status = BundleStatus::derive(now, &self.start, &self.end);
        let summary = BundleSummary::of(&self.items);
        BundleDisplay {
            id: self.id,
            name: self.name,
            description: self.description,
            items: self
                .items
                .into_iter()
                .map(|item| {
                    let final_price = item.rule.final_price(item.product.data.base_price);
                    ItemDisplay {
                        product: item.product,
                        rule: item.rule,
                        final_price,
                    }
                })
                .collect(),
            start: self.start,
            end: self.end,
            status,
            summary,
        }
    }
}

/// The read-side view of one bundle item, with its promotional price.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDisplay<ProductId> {
    /// The resolved catalog product
    pub product: ProductRecord<ProductId>,
    /// The discount applied to it
    pub rule: PromotionRule,
    /// The price after applying the rule to the product's base price
    pub final_price: f64,
}

/// The read-side view of a bundle, enriched for the admin panel.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BundleDisplay<BundleId, ProductId, DateTime> {
    /// Unique identifier for the bundle
    pub id: BundleId,
    /// Display name of the bundle
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// The items with their promotional prices
    pub items: Vec<ItemDisplay<ProductId>>,
    /// The starting time of the promotion window
    pub start: DateTime,
    /// The ending time of the promotion window
    pub end: DateTime,
    /// The clock-derived lifecycle phase, never persisted
    pub status: BundleStatus,
    /// Totals and savings across the items
    pub summary: BundleSummary,
}
