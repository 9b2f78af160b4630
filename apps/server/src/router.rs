use axum::Router;
use axum::middleware::from_fn;
use lms::kernel::prelude::ApiState;
use lms::kernel::server::request_context;
use lms::server::router::{course_experience_router, instructor_task_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "LMS course experience API"))]
struct ApiDoc;

/// Builds the application router: every slice router, the request context middleware and the
/// Scalar UI at `/api`.
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(system_router())
        .merge(course_experience_router())
        .merge(instructor_task_router())
        .layer(from_fn(request_context))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
