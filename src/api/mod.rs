//! HTTP API module for health, conversion, docs, and metrics endpoints.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use handlers::{AppState, ConvertRequest, ConvertResponse};
pub use routes::create_router;
