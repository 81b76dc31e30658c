use crate::error::CoreError;
use crate::structs::{NewProduct, ProductPatch};
use rust_decimal::Decimal;

/// The limit applied to product listings when the caller supplies none, or
/// supplies something unusable.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// The largest limit a caller may request for a product listing.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Resolves the raw `?limit=` query value into the limit actually used.
///
/// Missing, non-numeric, non-positive, or oversized values all fall back to
/// [`DEFAULT_LIST_LIMIT`]; a bad limit is never an error.
pub fn effective_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 && n <= MAX_LIST_LIMIT => n,
        _ => DEFAULT_LIST_LIMIT,
    }
}

impl NewProduct {
    /// Builds a validated insert payload from optional request fields.
    ///
    /// Every field is required; the first missing one is reported by name so
    /// the client knows exactly what to fix.
    pub fn from_parts(
        product_name: Option<String>,
        price: Option<Decimal>,
        category_id: Option<i64>,
        supplier_id: Option<i64>,
    ) -> Result<Self, CoreError> {
        let product_name = product_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| required("ProductName"))?;
        let price = price.ok_or_else(|| required("Price"))?;
        let category_id = category_id.ok_or_else(|| required("CategoryID"))?;
        let supplier_id = supplier_id.ok_or_else(|| required("SupplierID"))?;

        Ok(Self {
            product_name,
            price,
            category_id,
            supplier_id,
        })
    }
}

impl ProductPatch {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
            && self.supplier_id.is_none()
    }

    /// An update with nothing to change is a client mistake, not a no-op.
    pub fn ensure_any_field(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::InvalidInput(
                "update".to_string(),
                "at least one of ProductName, Price, CategoryID, SupplierID must be supplied"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn required(field: &str) -> CoreError {
    CoreError::InvalidInput(field.to_string(), "field is required and must not be null".to_string())
}
