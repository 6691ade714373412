use axum::{
    routing::{get, post},
    Router,
};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::handlers::middleware::{auth_middleware, role_middleware, RoleGuard};
use crate::models::{AppState, Role};

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    let doctor_routes = Router::new()
        .route("/doctor_dashboard", get(handlers::dashboard::doctor_dashboard))
        .route(
            "/patients",
            get(handlers::patients::patients_list).post(handlers::patients::patients_create),
        )
        .route("/patients/:id/edit", get(handlers::patients::patient_edit_get))
        .route("/patients/:id/update", post(handlers::patients::patient_update))
        .route("/patients/:id/delete", post(handlers::patients::patient_delete))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleGuard::new(&state, Role::Doctor),
            role_middleware,
        ));

    let patient_routes = Router::new()
        .route("/patient_dashboard", get(handlers::dashboard::patient_dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleGuard::new(&state, Role::Patient),
            role_middleware,
        ));

    let staff_routes = Router::new()
        .route("/staff_dashboard", get(handlers::dashboard::staff_dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleGuard::new(&state, Role::Staff),
            role_middleware,
        ));

    let admin_routes = Router::new()
        .route("/admin_dashboard", get(handlers::dashboard::admin_dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleGuard::new(&state, Role::Admin),
            role_middleware,
        ));

    // Anything in here requires a live session; the per-role routers
    // above additionally pin the session's role.
    let protected_routes = Router::new()
        .merge(doctor_routes)
        .merge(patient_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        .route("/logout", get(handlers::auth::logout_get))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/about", get(handlers::auth::about_get))
        .route(
            "/register",
            get(handlers::auth::register_get).post(handlers::auth::register_post),
        )
        .route(
            "/login",
            get(handlers::auth::login_get).post(handlers::auth::login_post),
        )
        .route(
            "/static/styles.css",
            get(|| async { ([(CONTENT_TYPE, "text/css")], DEFAULT_STYLESHEET) }),
        )
        .merge(protected_routes)
        // Serve any remaining static files with a long-lived cache header
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=31536000, immutable"),
                ))
                .service(ServeDir::new("static")),
        )
        .fallback(handlers::errors::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
