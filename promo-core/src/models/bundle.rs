use super::PromotionRule;
use thiserror::Error;

/// One entry of a bundle: a product reference paired with its discount rule.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BundleItem<ProductId> {
    /// The promoted product
    pub product_id: ProductId,
    /// The discount applied to that product while the bundle is active
    pub rule: PromotionRule,
}

/// The caller-supplied definition of a promotional bundle ("separata").
///
/// A bundle promotes a set of products, each with its own rule, during a
/// single time window. Item order is preserved for display but carries no
/// semantics. The window is half-open for overlap purposes: `[start, end)`.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BundleData<ProductId, DateTime> {
    /// Display name of the bundle
    pub name: String,
    /// Optional free-form description
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// The promoted products and their rules; non-empty, product refs unique
    pub items: Vec<BundleItem<ProductId>>,
    /// The starting time of the promotion window
    pub start: DateTime,
    /// The ending time of the promotion window; strictly after `start`
    pub end: DateTime,
}

impl<ProductId: PartialEq, DateTime: PartialOrd> BundleData<ProductId, DateTime> {
    /// Check the structural invariants of a bundle definition.
    ///
    /// This runs before any overlap check: an invalid bundle is rejected
    /// without ever consulting the timeline.
    pub fn validate(&self) -> Result<(), InvalidBundle> {
        if self.items.is_empty() {
            return Err(InvalidBundle::EmptyItems);
        }
        if !(self.start < self.end) {
            return Err(InvalidBundle::EmptyWindow);
        }
        // Bundles are small, so the quadratic scan is fine and avoids a
        // Hash bound on the id type.
        for (index, item) in self.items.iter().enumerate() {
            if self.items[..index]
                .iter()
                .any(|prior| prior.product_id == item.product_id)
            {
                return Err(InvalidBundle::DuplicateProduct);
            }
            match item.rule {
                PromotionRule::Fixed { amount } if amount < 0.0 => {
                    return Err(InvalidBundle::NegativeDiscount);
                }
                PromotionRule::Percentage { percent } if !(0.0..=100.0).contains(&percent) => {
                    return Err(InvalidBundle::PercentOutOfRange);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The products referenced by this bundle, in item order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter().map(|item| &item.product_id)
    }
}

/// A persisted bundle: its definition plus system-assigned timestamps.
///
/// `created_at` and `updated_at` are assigned from the application clock and
/// are not settable by callers.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BundleRecord<BundleId, ProductId, DateTime> {
    /// Unique identifier for the bundle
    pub id: BundleId,
    /// The bundle definition
    pub data: BundleData<ProductId, DateTime>,
    /// When the bundle was first persisted
    pub created_at: DateTime,
    /// When the bundle was last modified
    pub updated_at: DateTime,
}

/// The ways in which a bundle definition may be structurally invalid.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidBundle {
    /// The bundle promoted no products at all
    #[error("a bundle must contain at least one product")]
    EmptyItems,
    /// The window was empty or inverted (`end <= start`)
    #[error("a bundle must end strictly after it starts")]
    EmptyWindow,
    /// The same product appeared twice within one bundle
    #[error("a product may appear at most once per bundle")]
    DuplicateProduct,
    /// A fixed discount carried a negative amount
    #[error("a fixed discount must be non-negative")]
    NegativeDiscount,
    /// A percentage discount fell outside `[0, 100]`
    #[error("a percentage discount must be between 0 and 100")]
    PercentOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, rule: PromotionRule) -> BundleItem<String> {
        BundleItem {
            product_id: product_id.to_owned(),
            rule,
        }
    }

    fn bundle(items: Vec<BundleItem<String>>, start: i64, end: i64) -> BundleData<String, i64> {
        BundleData {
            name: "spring sale".into(),
            description: None,
            items,
            start,
            end,
        }
    }

    #[test]
    fn test_valid_bundle() {
        let data = bundle(
            vec![
                item("p1", PromotionRule::Fixed { amount: 5.0 }),
                item("p2", PromotionRule::Percentage { percent: 20.0 }),
            ],
            10,
            20,
        );
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let data = bundle(vec![], 10, 20);
        assert_eq!(data.validate(), Err(InvalidBundle::EmptyItems));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let items = vec![item("p1", PromotionRule::Fixed { amount: 5.0 })];
        let data = bundle(items.clone(), 20, 10);
        assert_eq!(data.validate(), Err(InvalidBundle::EmptyWindow));

        // A zero-length window is empty too.
        let data = bundle(items, 10, 10);
        assert_eq!(data.validate(), Err(InvalidBundle::EmptyWindow));
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let data = bundle(
            vec![
                item("p1", PromotionRule::Fixed { amount: 5.0 }),
                item("p1", PromotionRule::Percentage { percent: 20.0 }),
            ],
            10,
            20,
        );
        assert_eq!(data.validate(), Err(InvalidBundle::DuplicateProduct));
    }

    #[test]
    fn test_rule_ranges_checked() {
        let data = bundle(
            vec![item("p1", PromotionRule::Fixed { amount: -1.0 })],
            10,
            20,
        );
        assert_eq!(data.validate(), Err(InvalidBundle::NegativeDiscount));

        let data = bundle(
            vec![item("p1", PromotionRule::Percentage { percent: 101.0 })],
            10,
            20,
        );
        assert_eq!(data.validate(), Err(InvalidBundle::PercentOutOfRange));
    }
}
