//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use super::error::ErrorResponse;
use super::handlers::{
    ConvertRequest, ConvertResponse, EndpointsInfo, HealthResponse, RootResponse,
};
use crate::currency::Currency;

/// OpenAPI document served at `/openapi.json` and rendered by Swagger UI at `/docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Engine Service",
        description = "Core engine service: health checks and fixed-rate currency conversion."
    ),
    paths(
        super::handlers::root,
        super::handlers::health,
        super::handlers::convert,
    ),
    components(schemas(
        ConvertRequest,
        ConvertResponse,
        Currency,
        ErrorResponse,
        HealthResponse,
        RootResponse,
        EndpointsInfo,
    )),
    tags(
        (name = "currency", description = "Currency conversion through a USD pivot"),
        (name = "health", description = "Liveness probe"),
        (name = "info", description = "Service information")
    )
)]
pub struct ApiDoc;
