use super::{BundleRepository, CatalogRepository, Repository};
use crate::models::{BundleData, ProductData};

/// The application-level wiring of the promotional bundle service.
///
/// An implementation ties together a repository, a clock, identifier
/// generation and an authorization scheme over some bearer context. The API
/// layer is generic over this trait, so the same routes serve any backend.
pub trait Application: Clone + Send + Sync + 'static {
    /// The authorization context extracted from a request
    type Context: Send + Sync;

    /// The repository backing the catalog and the bundle timeline
    type Repository: CatalogRepository + BundleRepository;

    /// Access the repository.
    fn database(&self) -> &Self::Repository;

    /// The current instant, used for system-assigned timestamps and for
    /// deriving bundle statuses on read.
    fn now(&self) -> <Self::Repository as Repository>::DateTime;

    /// Generate an identifier for a new catalog product.
    fn generate_product_id(
        &self,
        data: &ProductData,
    ) -> <Self::Repository as Repository>::ProductId;

    /// Generate an identifier for a new bundle.
    fn generate_bundle_id(
        &self,
        data: &BundleData<
            <Self::Repository as Repository>::ProductId,
            <Self::Repository as Repository>::DateTime,
        >,
    ) -> <Self::Repository as Repository>::BundleId;

    /// May the context read the product catalog?
    fn can_view_catalog(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;

    /// May the context add products to the catalog?
    fn can_manage_catalog(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;

    /// May the context read bundles and probe the timeline?
    fn can_view_bundles(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;

    /// May the context create and update bundles?
    fn can_manage_bundles(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;
}
