use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{domain::entities::product::Catalog, errors::IapError};

/// The external product catalog query service.
#[async_trait]
pub trait ProductCatalog: Send + Sync + 'static {
    /// Queries metadata for the given product identifiers.
    ///
    /// Identifiers the service does not recognize are returned in
    /// [`Catalog::invalid_product_ids`] rather than failing the query.
    /// Errors are transport failures only.
    async fn query(&self, product_ids: BTreeSet<String>) -> Result<Catalog, IapError>;
}
