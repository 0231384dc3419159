use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::HealthResponse)
    ),
    info(
        title = "Telemetry API",
        version = "0.1.0",
        description = "Ingests analytics events grouped by session and serves them back by session or category"
    )
)]
struct ServiceDoc;

/// Service metadata plus the events domain paths, which are mounted at the root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceDoc::openapi().merge_from(domain_events::ApiDoc::openapi())
    }
}
