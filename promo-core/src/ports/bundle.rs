use crate::models::{
    BundleData, BundleRecord, HydratedBundle, InvalidBundle, OverlapConflict, TimelineEntry,
    find_conflict,
};
use thiserror::Error;

/// The ways in which a bundle write may fail for domain reasons.
///
/// These are ordinary outcomes, not transport errors: they travel inside the
/// `Ok` side of the repository result so the caller can translate them into
/// user-facing messages.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BundleFailure {
    /// The candidate violated a structural invariant
    #[error(transparent)]
    Invalid(#[from] InvalidBundle),
    /// The candidate collided with an existing bundle on the timeline
    #[error(transparent)]
    Conflict(#[from] OverlapConflict),
}

/// Validate a candidate bundle against a slice of the timeline.
///
/// This is the single validation path shared by the create flow
/// (`exclude = None`) and the update flow (`exclude = Some(self)`); the two
/// flows must never diverge. Structural validation runs first, so an invalid
/// candidate is rejected before any overlap reasoning.
///
/// Adapters call this with whatever timeline slice their storage narrowed to
/// (at minimum, every persisted bundle sharing a product with the candidate
/// must be present; extra entries are harmless).
pub fn validate_candidate<BundleId, ProductId, DateTime>(
    candidate: &BundleData<ProductId, DateTime>,
    exclude: Option<&BundleId>,
    timeline: &[TimelineEntry<BundleId, ProductId, DateTime>],
) -> Result<(), BundleFailure>
where
    BundleId: PartialEq,
    ProductId: PartialEq + Clone,
    DateTime: PartialOrd,
{
    candidate.validate()?;
    match find_conflict(candidate, exclude, timeline) {
        Some(conflict) => Err(conflict.into()),
        None => Ok(()),
    }
}

/// Repository interface for promotional bundles and their timeline.
///
/// Writes enforce the overlap invariant: for any two distinct persisted
/// bundles and any product referenced by both, the half-open time windows
/// must not intersect. Implementations MUST run validate-then-persist
/// atomically (a write transaction, or an equivalent storage-level
/// constraint), so that two concurrent candidates for the same product and
/// window cannot both pass validation and then both persist.
pub trait BundleRepository: super::Repository {
    /// Validate and persist a new bundle.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(record)) if the bundle passed validation and was persisted
    /// - Ok(Err(failure)) if validation rejected it; nothing was persisted
    /// - Err(repository_error) on transport failure
    fn create_bundle(
        &self,
        bundle_id: Self::BundleId,
        data: BundleData<Self::ProductId, Self::DateTime>,
        as_of: Self::DateTime,
    ) -> impl Future<
        Output = Result<
            Result<BundleRecord<Self::BundleId, Self::ProductId, Self::DateTime>, BundleFailure>,
            Self::Error,
        >,
    > + Send;

    /// Re-validate and replace an existing bundle's definition.
    ///
    /// Runs the same validation as [`create_bundle`](Self::create_bundle)
    /// with the targeted bundle excluded from the overlap check, so a bundle
    /// never conflicts with itself. `created_at` is preserved; `updated_at`
    /// becomes `as_of`.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(Some(record))) on success
    /// - Ok(Ok(None)) if no bundle with that id exists
    /// - Ok(Err(failure)) if validation rejected the new definition
    /// - Err(repository_error) on transport failure
    fn update_bundle(
        &self,
        bundle_id: Self::BundleId,
        data: BundleData<Self::ProductId, Self::DateTime>,
        as_of: Self::DateTime,
    ) -> impl Future<
        Output = Result<
            Result<
                Option<BundleRecord<Self::BundleId, Self::ProductId, Self::DateTime>>,
                BundleFailure,
            >,
            Self::Error,
        >,
    > + Send;

    /// Read-only probe of the timeline for a prospective window.
    ///
    /// Returns the first persisted bundle (excluding `exclude`, if given)
    /// that promotes any of `product_ids` during a window intersecting
    /// `[start, end)`. Useful for UI-side validation before submitting;
    /// which of several conflicting bundles is returned is not specified.
    fn find_overlapping(
        &self,
        product_ids: &[Self::ProductId],
        start: &Self::DateTime,
        end: &Self::DateTime,
        exclude: Option<&Self::BundleId>,
    ) -> impl Future<
        Output = Result<
            Option<TimelineEntry<Self::BundleId, Self::ProductId, Self::DateTime>>,
            Self::Error,
        >,
    > + Send;

    /// Retrieve a single bundle with its product references resolved.
    fn get_bundle(
        &self,
        bundle_id: Self::BundleId,
    ) -> impl Future<
        Output = Result<
            Option<HydratedBundle<Self::BundleId, Self::ProductId, Self::DateTime>>,
            Self::Error,
        >,
    > + Send;

    /// Retrieve every bundle with product references resolved, ordered by
    /// window start.
    fn list_bundles(
        &self,
    ) -> impl Future<
        Output = Result<
            Vec<HydratedBundle<Self::BundleId, Self::ProductId, Self::DateTime>>,
            Self::Error,
        >,
    > + Send;
}
