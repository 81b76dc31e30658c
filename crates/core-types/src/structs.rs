use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
///
/// The serde renames reproduce the column labels the dashboard frontend was
/// built against, so the JSON contract survives the port unchanged.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Price")]
    pub price: Decimal,
    #[serde(rename = "CategoryID")]
    pub category_id: i64,
    #[serde(rename = "SupplierID")]
    pub supplier_id: i64,
}

/// A fully validated set of fields for inserting a new product.
///
/// Construct via [`NewProduct::from_parts`], which rejects missing fields
/// before any storage is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub price: Decimal,
    pub category_id: i64,
    pub supplier_id: i64,
}

/// A partial update for a product. `None` fields are left untouched by the
/// update statement, never nulled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

/// The outcome of a successful product delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductDeletion {
    /// Whether referencing order item rows were removed as part of the delete.
    pub cascaded: bool,
    /// How many order item rows the cascade removed.
    pub removed_order_items: u64,
}
