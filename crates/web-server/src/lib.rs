use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Configures the router and serves it until shutdown.
///
/// Tracing and the database pool are set up by the calling binary; this
/// function only wires the routes and listens.
pub async fn run_server(addr: SocketAddr, db_repo: DbRepository) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState { db_repo });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/revenue", get(handlers::get_revenue_by_method))
        .route("/api/top-products", get(handlers::get_top_products))
        .route("/api/monthly-sales", get(handlers::get_monthly_sales))
        .route("/api/customers", get(handlers::get_customers_with_membership))
        .route("/api/orders", get(handlers::get_recent_orders))
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/api/execute", post(handlers::execute))
        .route("/api/setup-triggers", post(handlers::setup_triggers))
        .route("/api/triggers", get(handlers::list_triggers))
        .route("/api/procedures", get(handlers::list_procedures))
        .route("/api/discount/:name", get(handlers::get_customer_discount))
        .with_state(app_state)
        .layer(cors)
        // Logs method, path, status, and latency for every request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 2)); // 2MB is plenty for JSON payloads

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
