use crate::models::{ProductData, ProductRecord};

/// Repository interface for the product catalog.
///
/// The catalog is an external, read-mostly collaborator: products are
/// created by an administrator and are immutable afterwards. The promotional
/// machinery only ever resolves and lists them.
pub trait CatalogRepository: super::Repository {
    /// Persist a new catalog product.
    ///
    /// Callers are expected to have validated the data ([`ProductData::validate`])
    /// before persisting; the adapter stores what it is given.
    fn create_product(
        &self,
        product_id: Self::ProductId,
        data: ProductData,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<ProductRecord<Self::ProductId>, Self::Error>> + Send;

    /// Resolve a single product.
    ///
    /// # Returns
    ///
    /// The product record if it exists, None otherwise.
    fn get_product(
        &self,
        product_id: Self::ProductId,
    ) -> impl Future<Output = Result<Option<ProductRecord<Self::ProductId>>, Self::Error>> + Send;

    /// List the whole catalog.
    fn list_products(
        &self,
    ) -> impl Future<Output = Result<Vec<ProductRecord<Self::ProductId>>, Self::Error>> + Send;
}
