use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_types::{
    effective_limit, CustomerDiscount, CustomerMembership, MethodRevenue, MonthlySales,
    NewProduct, OrderSummary, Product, ProductPatch, RoutineInfo, TopProduct, TriggerInfo,
};
use database::{forbidden_keyword, ExecuteOutcome};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub query: Option<String>,
}

/// The raw `?limit=` value. Kept as a string so unusable values fall back to
/// the default instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProductParams {
    pub cascade: Option<String>,
}

/// Product fields as the dashboard sends them. Everything is optional here;
/// create and update enforce their own requirements on top.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    #[serde(rename = "ProductName")]
    pub product_name: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<Decimal>,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i64>,
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<i64>,
}

/// # GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # GET /api/revenue
pub async fn get_revenue_by_method(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MethodRevenue>>, AppError> {
    let rows = state.db_repo.revenue_by_method().await?;
    Ok(Json(rows))
}

/// # GET /api/top-products
pub async fn get_top_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopProduct>>, AppError> {
    let rows = state.db_repo.top_products().await?;
    Ok(Json(rows))
}

/// # GET /api/monthly-sales
pub async fn get_monthly_sales(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlySales>>, AppError> {
    let rows = state.db_repo.monthly_sales().await?;
    Ok(Json(rows))
}

/// # GET /api/customers
pub async fn get_customers_with_membership(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerMembership>>, AppError> {
    let rows = state.db_repo.customers_with_membership().await?;
    Ok(Json(rows))
}

/// # GET /api/orders
/// The ten most recent orders, newest first.
pub async fn get_recent_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let rows = state.db_repo.recent_orders().await?;
    Ok(Json(rows))
}

/// # GET /api/products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let limit = effective_limit(params.limit.as_deref());
    let products = state.db_repo.list_products(limit).await?;
    Ok(Json(products))
}

/// # GET /api/products/:id
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Product>, AppError> {
    let product_id = parse_product_id(&id)?;
    let product = state
        .db_repo
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// # POST /api/products
/// Validates the payload before touching storage, inserts, then reads the
/// row back so the response echoes what was stored.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_product = NewProduct::from_parts(
        body.product_name,
        body.price,
        body.category_id,
        body.supplier_id,
    )?;
    let product_id = state.db_repo.create_product(&new_product).await?;

    // The insert already succeeded; a failed read-back only omits the echo.
    let product = state.db_repo.get_product(product_id).await.ok().flatten();

    let mut response = json!({
        "message": "Product created successfully",
        "productId": product_id,
    });
    if let Some(product) = product {
        if let Ok(value) = serde_json::to_value(product) {
            response["product"] = value;
        }
    }
    Ok((StatusCode::CREATED, Json(response)))
}

/// # PUT /api/products/:id
/// Partial update; fields left out of the body keep their stored values.
pub async fn update_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Value>, AppError> {
    let product_id = parse_product_id(&id)?;
    let patch = ProductPatch {
        product_name: body.product_name,
        price: body.price,
        category_id: body.category_id,
        supplier_id: body.supplier_id,
    };
    patch.ensure_any_field()?;

    let affected = state.db_repo.update_product(product_id, &patch).await?;
    if affected == 0 {
        // MySQL reports zero both for an unknown id and for a patch equal to
        // the stored values; the signal stays merged on purpose.
        return Err(AppError::NotFound(
            "Product not found or no changes made".to_string(),
        ));
    }
    Ok(Json(json!({ "message": "Product updated successfully" })))
}

/// # DELETE /api/products/:id
/// Transactional delete; `?cascade=true` removes referencing order items in
/// the same transaction, otherwise references make it a 409.
pub async fn delete_product(
    Path(id): Path<String>,
    Query(params): Query<DeleteProductParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let product_id = parse_product_id(&id)?;
    let cascade = cascade_requested(params.cascade.as_deref());
    let deletion = state.db_repo.delete_product(product_id, cascade).await?;
    Ok(Json(json!({
        "message": "Product deleted successfully",
        "cascaded": deletion.cascaded,
    })))
}

/// # POST /api/execute
/// Runs one ad-hoc SQL statement after the denylist check and shapes the
/// response by statement kind.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExecuteRequest>,
) -> Result<Json<Value>, AppError> {
    let statement = body.query.as_deref().map(str::trim).unwrap_or_default();
    if statement.is_empty() {
        return Err(AppError::Validation("No query provided".to_string()));
    }
    if forbidden_keyword(statement).is_some() {
        return Err(AppError::Validation(
            "This operation is not allowed for safety reasons".to_string(),
        ));
    }

    let results = match state.db_repo.execute_statement(statement).await? {
        ExecuteOutcome::Rows(rows) => Value::Array(rows.into_iter().map(Value::Object).collect()),
        ExecuteOutcome::Mutation {
            affected_rows,
            insert_id,
        } => json!({
            "message": format!("Operation successful. Affected {affected_rows} row(s)"),
            "affectedRows": affected_rows,
            "insertId": insert_id,
        }),
        ExecuteOutcome::Definition => json!({ "message": "Operation completed successfully" }),
    };
    Ok(Json(json!({ "results": results })))
}

/// # POST /api/setup-triggers
/// (Re)installs the order-total trigger and the discount procedure.
pub async fn setup_triggers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.install_order_automation().await?;
    Ok(Json(json!({
        "message": "Trigger and procedure created successfully"
    })))
}

/// # GET /api/triggers
pub async fn list_triggers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TriggerInfo>>, AppError> {
    let rows = state.db_repo.list_triggers().await?;
    Ok(Json(rows))
}

/// # GET /api/procedures
pub async fn list_procedures(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoutineInfo>>, AppError> {
    let rows = state.db_repo.list_routines().await?;
    Ok(Json(rows))
}

/// # GET /api/discount/:name
/// Invokes the stored procedure; an unknown name yields an empty array.
pub async fn get_customer_discount(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerDiscount>>, AppError> {
    let rows = state.db_repo.customer_discount(&name).await?;
    Ok(Json(rows))
}

/// Path ids must be positive integers; everything else is a client error
/// reported before any query runs.
fn parse_product_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Validation("Invalid product id".to_string())),
    }
}

/// The cascade flag is opt-in and exact: only the literal `true` enables it.
fn cascade_requested(raw: Option<&str>) -> bool {
    matches!(raw, Some("true"))
}
