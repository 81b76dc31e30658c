//! Read-model rows for the dashboard queries and schema introspection.
//!
//! Field names match the snake_case column aliases the queries produce, so
//! `FromRow` maps them directly; the serde renames reproduce the JSON keys
//! the dashboard frontend was built against.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Revenue collected per payment method.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MethodRevenue {
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "TotalRevenue")]
    pub total_revenue: Decimal,
}

/// One of the best-selling products, ranked by units sold.
///
/// `total_sold` is a `Decimal` because MySQL widens `SUM()` over an integer
/// column to `DECIMAL`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopProduct {
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "TotalSold")]
    pub total_sold: Decimal,
}

/// Sales total for one calendar month; `month` is formatted `YYYY-MM`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlySales {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "MonthlySales")]
    pub monthly_sales: Decimal,
}

/// A customer joined with their membership tier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerMembership {
    #[serde(rename = "CustomerID")]
    pub customer_id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MembershipType")]
    pub membership_type: String,
    #[serde(rename = "DiscountRate")]
    pub discount_rate: Decimal,
}

/// One of the most recent orders, with customer and (optional) employee names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderSummary {
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "EmployeeName")]
    pub employee_name: Option<String>,
    #[serde(rename = "TotalAmount")]
    pub total_amount: Decimal,
}

/// A row produced by the `get_customer_discount` stored procedure.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerDiscount {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MembershipType")]
    pub membership_type: String,
    #[serde(rename = "DiscountRate")]
    pub discount_rate: Decimal,
}

/// A trigger as reported by `information_schema.TRIGGERS`.
///
/// JSON keys keep the uppercase `information_schema` column names, which is
/// what the admin console renders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TriggerInfo {
    #[serde(rename = "TRIGGER_NAME")]
    pub trigger_name: String,
    #[serde(rename = "EVENT_MANIPULATION")]
    pub event_manipulation: String,
    #[serde(rename = "EVENT_OBJECT_TABLE")]
    pub event_object_table: String,
    #[serde(rename = "ACTION_TIMING")]
    pub action_timing: String,
    #[serde(rename = "CREATED")]
    pub created: Option<NaiveDateTime>,
}

/// A stored routine as reported by `information_schema.ROUTINES`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoutineInfo {
    #[serde(rename = "ROUTINE_NAME")]
    pub routine_name: String,
    #[serde(rename = "ROUTINE_TYPE")]
    pub routine_type: String,
    #[serde(rename = "CREATED")]
    pub created: Option<NaiveDateTime>,
    #[serde(rename = "LAST_ALTERED")]
    pub last_altered: Option<NaiveDateTime>,
}
