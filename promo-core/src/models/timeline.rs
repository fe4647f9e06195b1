//! The product-promotion timeline and its overlap rule.
//!
//! A product may not belong to two bundles whose active windows intersect.
//! Windows are half-open intervals `[start, end)`: two windows overlap iff
//! `a.start < b.end && b.start < a.end`, so a bundle that starts exactly when
//! another ends does NOT conflict with it.
//!
//! The rule lives here, independent of any storage engine, so it can be
//! tested in isolation. Adapters narrow their scan however they like (the
//! reference adapter filters by product membership in SQL) but the decision
//! of whether a candidate conflicts is always made by this module, for both
//! the create flow (no exclusion) and the update flow (self excluded).

use super::BundleData;
use std::fmt;

/// Test whether two half-open time windows intersect.
///
/// Touching endpoints (`a_end == b_start`) do not count as overlap.
pub fn windows_overlap<DateTime: PartialOrd>(
    a_start: &DateTime,
    a_end: &DateTime,
    b_start: &DateTime,
    b_end: &DateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// An existing bundle's footprint on the product-promotion timeline.
///
/// This is the minimal view of a persisted bundle the overlap rule needs:
/// its window and the products it promotes, with display names so a conflict
/// can be reported in human-readable terms.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry<BundleId, ProductId, DateTime> {
    /// The persisted bundle's identifier
    pub bundle_id: BundleId,
    /// The persisted bundle's display name
    pub bundle_name: String,
    /// The starting time of the persisted bundle's window
    pub start: DateTime,
    /// The ending time of the persisted bundle's window
    pub end: DateTime,
    /// The products promoted by the persisted bundle, as (id, display name)
    pub products: Vec<(ProductId, String)>,
}

impl<BundleId, ProductId: PartialEq, DateTime: PartialOrd>
    TimelineEntry<BundleId, ProductId, DateTime>
{
    /// Does this entry promote any of `products` during a window
    /// intersecting `[start, end)`?
    pub fn conflicts_with(&self, products: &[ProductId], start: &DateTime, end: &DateTime) -> bool {
        windows_overlap(start, end, &self.start, &self.end)
            && self.products.iter().any(|(id, _)| products.contains(id))
    }
}

/// A reported violation of the overlap rule.
///
/// Carries the name of the conflicting bundle and the display names of the
/// products promoted by both it and the candidate. The `Display` rendering
/// is the user-facing message.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapConflict {
    /// Name of the existing bundle the candidate collides with
    pub bundle_name: String,
    /// Names of the products promoted by both bundles in the overlap
    pub product_names: Vec<String>,
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict with existing bundle '{}': these products already have promotions in those dates: {}",
            self.bundle_name,
            self.product_names.join(", ")
        )
    }
}

impl std::error::Error for OverlapConflict {}

/// Find the first timeline entry that promotes any of `products` during a
/// window intersecting `[start, end)`, skipping the excluded bundle.
///
/// "First" is the order of `timeline`; when several entries conflict, which
/// one is found depends on that order and is explicitly non-deterministic
/// across ties. Callers must not rely on it.
///
/// `exclude` names the bundle being updated, so a bundle never conflicts
/// with itself. The create flow passes `None`; there are no other
/// differences between the two flows.
pub fn find_conflicting_entry<'t, BundleId, ProductId, DateTime>(
    products: &[ProductId],
    start: &DateTime,
    end: &DateTime,
    exclude: Option<&BundleId>,
    timeline: &'t [TimelineEntry<BundleId, ProductId, DateTime>],
) -> Option<&'t TimelineEntry<BundleId, ProductId, DateTime>>
where
    BundleId: PartialEq,
    ProductId: PartialEq,
    DateTime: PartialOrd,
{
    timeline.iter().find(|entry| {
        !exclude.is_some_and(|id| *id == entry.bundle_id)
            && entry.conflicts_with(products, start, end)
    })
}

/// Check a candidate bundle against the timeline and report the first
/// conflict in user terms.
///
/// The reported product names are those of the shared products, taken from
/// the timeline entry (i.e. the catalog names resolved when the entry was
/// hydrated), in the entry's order.
pub fn find_conflict<BundleId, ProductId, DateTime>(
    candidate: &BundleData<ProductId, DateTime>,
    exclude: Option<&BundleId>,
    timeline: &[TimelineEntry<BundleId, ProductId, DateTime>],
) -> Option<OverlapConflict>
where
    BundleId: PartialEq,
    ProductId: PartialEq + Clone,
    DateTime: PartialOrd,
{
    let products: Vec<ProductId> = candidate.product_ids().cloned().collect();
    find_conflicting_entry(&products, &candidate.start, &candidate.end, exclude, timeline).map(
        |entry| OverlapConflict {
            bundle_name: entry.bundle_name.clone(),
            product_names: entry
                .products
                .iter()
                .filter(|(id, _)| products.contains(id))
                .map(|(_, name)| name.clone())
                .collect(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BundleItem, PromotionRule};

    fn candidate(products: &[&str], start: i64, end: i64) -> BundleData<String, i64> {
        BundleData {
            name: "candidate".into(),
            description: None,
            items: products
                .iter()
                .map(|id| BundleItem {
                    product_id: (*id).to_owned(),
                    rule: PromotionRule::Percentage { percent: 10.0 },
                })
                .collect(),
            start,
            end,
        }
    }

    fn entry(
        bundle_id: &str,
        products: &[&str],
        start: i64,
        end: i64,
    ) -> TimelineEntry<String, String, i64> {
        TimelineEntry {
            bundle_id: bundle_id.to_owned(),
            bundle_name: format!("bundle {bundle_id}"),
            start,
            end,
            products: products
                .iter()
                .map(|id| ((*id).to_owned(), format!("product {id}")))
                .collect(),
        }
    }

    #[test]
    fn test_overlap_predicate() {
        // Proper intersection, containment, identity.
        assert!(windows_overlap(&5, &15, &10, &20));
        assert!(windows_overlap(&0, &100, &10, &20));
        assert!(windows_overlap(&10, &20, &10, &20));
        // Disjoint and touching.
        assert!(!windows_overlap(&0, &10, &20, &30));
        assert!(!windows_overlap(&0, &10, &10, &20));
        assert!(!windows_overlap(&10, &20, &0, &10));
    }

    #[test]
    fn test_conflict_requires_shared_product() {
        let timeline = vec![entry("a", &["p1"], 10, 20)];
        // Same window, different product: no conflict.
        assert_eq!(find_conflict(&candidate(&["p2"], 10, 20), None, &timeline), None);
        // Shared product, overlapping window: conflict.
        let conflict = find_conflict(&candidate(&["p1"], 15, 25), None, &timeline).unwrap();
        assert_eq!(conflict.bundle_name, "bundle a");
        assert_eq!(conflict.product_names, vec!["product p1".to_owned()]);
    }

    #[test]
    fn test_touching_windows_do_not_conflict() {
        let timeline = vec![entry("a", &["p1"], 10, 20)];
        assert_eq!(find_conflict(&candidate(&["p1"], 20, 30), None, &timeline), None);
        assert_eq!(find_conflict(&candidate(&["p1"], 0, 10), None, &timeline), None);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        // If A conflicts with candidate B, then B-as-persisted conflicts with
        // A-as-candidate for the same shared product.
        let a = entry("a", &["p1"], 10, 20);
        let b = candidate(&["p1"], 15, 25);
        assert!(find_conflict(&b, None, std::slice::from_ref(&a)).is_some());

        let b_persisted = entry("b", &["p1"], 15, 25);
        let a_candidate = candidate(&["p1"], 10, 20);
        assert!(find_conflict(&a_candidate, None, &[b_persisted]).is_some());
    }

    #[test]
    fn test_self_exclusion() {
        // Updating a bundle's own window never reports a conflict against itself.
        let timeline = vec![entry("x", &["p1"], 10, 20)];
        let update = candidate(&["p1"], 12, 25);
        assert!(find_conflict(&update, Some(&"x".to_owned()), &timeline).is_none());
        // ...but other bundles still count.
        assert!(find_conflict(&update, Some(&"y".to_owned()), &timeline).is_some());
    }

    #[test]
    fn test_reports_only_shared_products() {
        let timeline = vec![entry("a", &["p1", "p2", "p3"], 10, 20)];
        let conflict = find_conflict(&candidate(&["p2", "p4"], 15, 25), None, &timeline).unwrap();
        assert_eq!(conflict.product_names, vec!["product p2".to_owned()]);
    }

    #[test]
    fn test_first_entry_wins() {
        let timeline = vec![entry("a", &["p1"], 10, 20), entry("b", &["p1"], 12, 22)];
        let conflict = find_conflict(&candidate(&["p1"], 15, 25), None, &timeline).unwrap();
        assert_eq!(conflict.bundle_name, "bundle a");
    }

    #[test]
    fn test_conflict_message() {
        let conflict = OverlapConflict {
            bundle_name: "Black Friday".into(),
            product_names: vec!["Laptop".into(), "Monitor".into()],
        };
        assert_eq!(
            conflict.to_string(),
            "conflict with existing bundle 'Black Friday': these products already have \
             promotions in those dates: Laptop, Monitor"
        );
    }
}
