/// Reference entity for a tracked product. Created once at seed time,
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub msrp: f64,
}

/// Seed form of a product, before the store has assigned an id.
#[derive(Debug, Clone)]
pub struct ProductSeed {
    pub sku: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub brand: &'static str,
    pub msrp: f64,
}
