//! HTTP API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

use super::error::{ApiError, ErrorResponse};
use crate::currency::{Currency, RateTable};
use crate::error::{AmountError, ConversionError};
use crate::metrics;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "engine-service";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rate table used for every conversion.
    pub rates: &'static RateTable,
    /// Prometheus handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state over `rates`, without metrics.
    pub fn new(rates: &'static RateTable) -> Self {
        Self {
            rates,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service health status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Response timestamp (RFC 3339, UTC).
    pub timestamp: String,
}

/// Endpoint directory in the root response.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointsInfo {
    /// Health check path.
    pub health: &'static str,
    /// Conversion path.
    pub convert: &'static str,
    /// Interactive docs path.
    pub docs: &'static str,
}

/// Root response with API information.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    /// Service banner.
    pub message: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Available endpoints.
    pub endpoints: EndpointsInfo,
}

/// Request to convert currency.
///
/// The amount stays a JSON number until the codes and its sign have been
/// checked; only cross-currency requests are carried into `Decimal`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertRequest {
    /// Amount to convert, must not be negative.
    #[schema(example = 100.0)]
    pub amount: f64,
    /// Source currency code (USD, EUR, GBP, etc.), any case.
    #[schema(example = "USD")]
    pub from_currency: String,
    /// Target currency code (USD, EUR, GBP, etc.), any case.
    #[schema(example = "EUR")]
    pub to_currency: String,
}

/// Response with converted currency amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    /// Converted amount. Same-currency requests echo the amount as sent.
    #[schema(example = 85.0)]
    pub converted_amount: f64,
    /// Source currency.
    pub from_currency: Currency,
    /// Target currency.
    pub to_currency: Currency,
    /// Exchange rate used.
    #[schema(example = 0.85)]
    pub exchange_rate: f64,
}

impl ConvertRequest {
    /// Resolve codes, then check the amount, then convert against `rates`.
    ///
    /// The sign is read off the JSON number so any negative is an
    /// `InvalidAmount`, whatever its magnitude. Equal currencies return the
    /// number untouched; other pairs go through `Decimal` and reject amounts
    /// outside its range.
    pub fn execute(&self, rates: &RateTable) -> Result<ConvertResponse, ConversionError> {
        let from = Currency::parse_code(&self.from_currency)?;
        let to = Currency::parse_code(&self.to_currency)?;

        if self.amount < 0.0 {
            return Err(AmountError::Negative.into());
        }

        let converted_amount = if from == to {
            self.amount
        } else {
            let amount = Decimal::from_f64(self.amount).ok_or(AmountError::OutOfRange)?;
            json_number(rates.convert(amount, from, to)?)
        };

        Ok(ConvertResponse {
            converted_amount,
            from_currency: from,
            to_currency: to,
            exchange_rate: json_number(rates.exchange_rate(from, to)),
        })
    }
}

// Every finite Decimal has an f64 neighbour; the fallback is unreachable.
fn json_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Root handler - API information.
#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses((status = 200, description = "API information", body = RootResponse))
)]
pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Engine Service API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointsInfo {
            health: "/health",
            convert: "/convert",
            docs: "/docs",
        },
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: now_rfc3339(),
    })
}

/// Convert an amount between two supported currencies.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "currency",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Converted amount", body = ConvertResponse),
        (status = 400, description = "Negative or out-of-range amount, or unsupported currency", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected conversion body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let _timer = metrics::timer_conversion();

    let response = payload.execute(state.rates).map_err(|e| {
        warn!(
            from = %payload.from_currency,
            to = %payload.to_currency,
            amount = payload.amount,
            "Rejected conversion: {}",
            e
        );
        metrics::inc_conversion_errors(&e);
        ApiError::from(e)
    })?;

    metrics::inc_conversions(response.from_currency.code(), response.to_currency.code());
    debug!(
        from = %response.from_currency,
        to = %response.to_currency,
        amount = payload.amount,
        converted = response.converted_amount,
        rate = response.exchange_rate,
        "Converted"
    );

    Ok(Json(response))
}

/// Prometheus exposition handler - 404 when metrics are disabled.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => ApiError::not_found("metrics are disabled").into_response(),
    }
}
