use axum::{
    middleware::from_fn,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::auth::rbac::{COORDINADOR_ONLY, TECNICO_ONLY};
use crate::handlers::{account_handlers, auth_handlers, case_handlers, evidence_handlers};
use crate::{handlers, middleware, AppState};

/// Builds the full application: public and protected routes, per-route role
/// gates, and the global logging/CORS layers.
pub fn create_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/auth/login", post(auth_handlers::login));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth_handlers::get_me))
        .route("/api/auth/refresh", post(auth_handlers::refresh))
        // Accounts
        .route(
            "/api/usuarios",
            get(account_handlers::list_accounts)
                .post(account_handlers::create_account)
                .route_layer(from_fn_with_state(
                    COORDINADOR_ONLY,
                    middleware::role_gate_middleware,
                )),
        )
        // Cases
        .route("/api/expedientes", get(case_handlers::list_cases))
        .route(
            "/api/expedientes",
            post(case_handlers::create_case).route_layer(from_fn_with_state(
                TECNICO_ONLY,
                middleware::role_gate_middleware,
            )),
        )
        .route(
            "/api/expedientes/:id",
            get(case_handlers::get_case).put(case_handlers::update_case),
        )
        .route(
            "/api/expedientes/:id/estado",
            patch(case_handlers::change_case_status).route_layer(from_fn_with_state(
                COORDINADOR_ONLY,
                middleware::role_gate_middleware,
            )),
        )
        .route("/api/expedientes/:id/activo", patch(case_handlers::set_case_active))
        // Evidence
        .route(
            "/api/expedientes/:id/indicios",
            get(evidence_handlers::list_case_evidence),
        )
        .route(
            "/api/expedientes/:id/indicios",
            post(evidence_handlers::create_evidence).route_layer(from_fn_with_state(
                TECNICO_ONLY,
                middleware::role_gate_middleware,
            )),
        )
        .route("/api/indicios/:id", put(evidence_handlers::update_evidence))
        .route("/api/indicios/:id/activo", patch(evidence_handlers::set_evidence_active))
        .route_layer(from_fn_with_state(app_state.clone(), middleware::auth_middleware));

    let cors_layer = middleware::create_cors_layer(&app_state.config.cors_allow_origins);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
        .layer(from_fn(middleware::request_logging_middleware))
        .layer(middleware::create_logging_layer())
        .layer(cors_layer)
}
