/// Metadata for a single purchasable product, as returned by the catalog
/// query service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: String,
    pub localized_title: String,
    pub localized_description: String,
    /// Price in millionths of the currency unit.
    pub price_micros: i64,
    /// Currency in ISO 4217 format.
    pub currency_iso_4217: String,
}

/// Result of one catalog query.
///
/// `invalid_product_ids` lists identifiers the catalog service explicitly
/// reported as unknown. They are diagnostic only, never an error.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub invalid_product_ids: Vec<String>,
}
