//! API route definitions

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use civicops_config::Environment;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{auth, health, work_items},
    middleware::logging_middleware,
    state::AppState,
};

/// Routes under `/api`
///
/// The dev token endpoints are only mounted in the development environment.
pub fn api_routes(environment: Environment) -> Router<AppState> {
    let mut api = Router::new()
        .route("/me", get(auth::me))
        .route(
            "/work-items",
            get(work_items::list_work_items).post(work_items::create_work_item),
        )
        .route(
            "/work-items/:id",
            get(work_items::get_work_item)
                .patch(work_items::update_work_item)
                .delete(work_items::delete_work_item),
        );

    if environment.is_development() {
        api = api
            .route("/dev/token", post(auth::issue_dev_token))
            .route("/dev/claims", get(auth::dev_claims));
    }

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .nest("/api", api)
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Combined routes with middleware, bound to `state`
pub fn all_routes(state: AppState) -> Router {
    let environment = state.config.server.environment;

    api_routes(environment)
        .merge(swagger_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::issue_dev_token,
        auth::dev_claims,
        auth::me,
        work_items::create_work_item,
        work_items::list_work_items,
        work_items::get_work_item,
        work_items::update_work_item,
        work_items::delete_work_item,
    ),
    components(schemas(
        crate::models::CreateWorkItemRequest,
        crate::models::UpdateWorkItemRequest,
        crate::models::WorkItemResponse,
        crate::models::TokenResponse,
        crate::models::MeResponse,
        crate::models::ClaimEntry,
        crate::models::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    info(
        title = "CivicOps API",
        version = "1.0.0",
        description = "Work item tracking for civic operations teams"
    )
)]
/// OpenAPI document for the CivicOps API
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
