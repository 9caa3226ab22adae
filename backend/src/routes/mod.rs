//! Route definitions for the Stock Tracker API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes; everything except health and the public auth
/// endpoints requires a bearer token
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .nest("/users", user_routes())
        .nest("/items", item_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/customers", customer_routes())
        .nest("/inward", inward_routes())
        .nest("/outward", outward_routes())
        .nest("/reports", report_routes())
        .nest("/dashboard", dashboard_routes())
        .route("/activity-logs", get(handlers::dashboard::list_activity))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        .merge(protected)
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
}

/// User administration routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/:user_id", put(handlers::users::update_user))
}

/// Item routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route("/categories", get(handlers::items::list_categories))
        .route("/low-stock", get(handlers::items::list_low_stock))
        .route(
            "/:item_id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::parties::list_suppliers).post(handlers::parties::create_supplier),
        )
        .route(
            "/:id",
            get(handlers::parties::get_supplier)
                .put(handlers::parties::update_supplier)
                .delete(handlers::parties::delete_supplier),
        )
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::parties::list_customers).post(handlers::parties::create_customer),
        )
        .route(
            "/:id",
            get(handlers::parties::get_customer)
                .put(handlers::parties::update_customer)
                .delete(handlers::parties::delete_customer),
        )
}

/// Inward stock routes
fn inward_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::stock::list_inward).post(handlers::stock::create_inward),
        )
        .route(
            "/:id",
            get(handlers::stock::get_inward).delete(handlers::stock::delete_inward),
        )
}

/// Outward stock routes
fn outward_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::stock::list_outward).post(handlers::stock::create_outward),
        )
        .route(
            "/:id",
            get(handlers::stock::get_outward).delete(handlers::stock::delete_outward),
        )
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/stock-statement", get(handlers::reports::stock_statement))
        .route("/monthly", get(handlers::reports::monthly))
        .route("/item-history", get(handlers::reports::item_history))
        .route(
            "/supplier-performance",
            get(handlers::reports::supplier_performance),
        )
        .route(
            "/customer-performance",
            get(handlers::reports::customer_performance),
        )
        .route("/export/excel", get(handlers::reports::export_excel))
        .route("/export/pdf", get(handlers::reports::export_pdf))
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard::overview))
        .route("/overview", get(handlers::dashboard::overview))
}
