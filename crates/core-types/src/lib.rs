pub mod error;
pub mod reports;
pub mod structs;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use reports::{
    CustomerDiscount, CustomerMembership, MethodRevenue, MonthlySales, OrderSummary, RoutineInfo,
    TopProduct, TriggerInfo,
};
pub use structs::{NewProduct, Product, ProductDeletion, ProductPatch};
pub use validation::{effective_limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
