//! Integration tests for the engine service.
//!
//! These drive the public library API and the full router in-process.
//! Run with: cargo test --test integration

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use engine_service::api::{create_router, AppState, ConvertResponse};
use engine_service::currency::{ConversionRequest, Currency, RateTable};
use engine_service::{convert, exchange_rate, AmountError, ConversionError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use strum::IntoEnumIterator;
use tower::ServiceExt;

fn fixed() -> &'static RateTable {
    RateTable::fixed().unwrap()
}

async fn post_convert(body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    post_convert_raw(body.to_string()).await
}

async fn post_convert_raw(body: String) -> (StatusCode, Vec<u8>) {
    let app = create_router(AppState::new(fixed()));
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Published scenarios through the code-level entry point.
#[test]
fn test_documented_scenarios() {
    assert_eq!(convert(fixed(), dec!(100), "USD", "EUR"), Ok(dec!(85.0)));
    assert_eq!(exchange_rate(fixed(), "USD", "EUR"), Ok(dec!(0.85)));

    assert_eq!(convert(fixed(), dec!(100), "EUR", "USD"), Ok(dec!(117.65)));
    assert_eq!(exchange_rate(fixed(), "EUR", "USD"), Ok(dec!(1.1765)));

    assert_eq!(convert(fixed(), dec!(0), "JPY", "GBP"), Ok(dec!(0.0)));

    assert_eq!(convert(fixed(), dec!(50), "USD", "USD"), Ok(dec!(50)));
    assert_eq!(exchange_rate(fixed(), "USD", "USD"), Ok(dec!(1.0)));
}

/// Failures are total and typed.
#[test]
fn test_documented_failures() {
    assert_eq!(
        convert(fixed(), dec!(-1), "USD", "EUR"),
        Err(ConversionError::InvalidAmount(AmountError::Negative))
    );
    assert!(matches!(
        convert(fixed(), dec!(100), "XXX", "USD"),
        Err(ConversionError::UnsupportedCurrency { code }) if code == "XXX"
    ));
}

/// Same-currency conversion never rounds, for every supported code.
#[test]
fn test_identity_for_every_currency() {
    let amount = dec!(1234.56789);
    for currency in Currency::iter() {
        let code = currency.code().to_lowercase();
        assert_eq!(convert(fixed(), amount, &code, currency.code()), Ok(amount));
    }
}

/// Every pair converts and its displayed rate matches the table ratio.
#[test]
fn test_every_pair_is_consistent() {
    let table = fixed();
    for from in Currency::iter() {
        for to in Currency::iter() {
            let result = ConversionRequest::new(dec!(1000), from.code(), to.code())
                .execute(table)
                .unwrap();
            let expected_rate = (table.rate(to) / table.rate(from)).round_dp(4);
            assert_eq!(result.exchange_rate, expected_rate, "{from}->{to}");
            assert!(result.converted_amount >= Decimal::ZERO);
        }
    }
}

/// The HTTP boundary canonicalises codes and returns JSON numbers.
#[tokio::test]
async fn test_http_convert_round_trip() {
    let (status, bytes) = post_convert(json!({
        "amount": 250,
        "from_currency": "gbp",
        "to_currency": "Jpy"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: ConvertResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(response.from_currency, Currency::Gbp);
    assert_eq!(response.to_currency, Currency::Jpy);
    assert_eq!(
        response.converted_amount.to_string(),
        convert(fixed(), dec!(250), "GBP", "JPY").unwrap().to_string()
    );

    let (status, bytes) = post_convert(json!({
        "amount": response.converted_amount,
        "from_currency": "JPY",
        "to_currency": "GBP"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    let back: ConvertResponse = serde_json::from_slice(&bytes).unwrap();
    assert!((back.converted_amount - 250.0).abs() <= 0.01);
}

/// Both validation failures share a status and differ only by message.
#[tokio::test]
async fn test_http_errors_share_status() {
    let (amount_status, amount_body) = post_convert(json!({
        "amount": -5,
        "from_currency": "USD",
        "to_currency": "EUR"
    }))
    .await;
    let (currency_status, currency_body) = post_convert(json!({
        "amount": 5,
        "from_currency": "USD",
        "to_currency": "DOGE"
    }))
    .await;

    assert_eq!(amount_status, StatusCode::BAD_REQUEST);
    assert_eq!(currency_status, StatusCode::BAD_REQUEST);

    let amount_body: serde_json::Value = serde_json::from_slice(&amount_body).unwrap();
    let currency_body: serde_json::Value = serde_json::from_slice(&currency_body).unwrap();
    assert_eq!(amount_body["detail"], "Amount cannot be negative");
    assert_eq!(currency_body["detail"], "Invalid currency code: DOGE");
}

/// Same-currency requests echo the amount unrounded over HTTP too.
#[tokio::test]
async fn test_http_same_currency_is_unrounded() {
    let (status, bytes) = post_convert(json!({
        "amount": 10.999,
        "from_currency": "usd",
        "to_currency": "USD"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["converted_amount"], json!(10.999));
    assert_eq!(body["exchange_rate"], json!(1.0));
}

/// Amounts with more significant digits than a Decimal built from a float
/// keeps still come back unchanged when no conversion happens.
#[tokio::test]
async fn test_http_same_currency_keeps_full_float_precision() {
    let (status, bytes) = post_convert_raw(
        r#"{"amount": 123456789.123456789, "from_currency": "USD", "to_currency": "USD"}"#
            .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: ConvertResponse = serde_json::from_slice(&bytes).unwrap();
    let sent: f64 = "123456789.123456789".parse().unwrap();
    assert_eq!(response.converted_amount.to_bits(), sent.to_bits());
    assert_eq!(response.converted_amount.to_string(), "123456789.12345679");

    let (status, bytes) = post_convert(json!({
        "amount": 1e-30,
        "from_currency": "eur",
        "to_currency": "EUR"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: ConvertResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(response.converted_amount, 1e-30);
}

/// A negative amount is an invalid amount however large it is, and positive
/// amounts past the decimal range are client errors, not decode failures.
#[tokio::test]
async fn test_http_amount_range_errors_are_bad_requests() {
    let (status, bytes) = post_convert(json!({
        "amount": -1e30,
        "from_currency": "USD",
        "to_currency": "EUR"
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "Amount cannot be negative");

    let (status, bytes) = post_convert(json!({
        "amount": 1e30,
        "from_currency": "USD",
        "to_currency": "USD"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: ConvertResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(response.converted_amount, 1e30);

    for to in ["EUR", "JPY"] {
        let amount = if to == "JPY" { 1e28 } else { 1e30 };
        let (status, bytes) = post_convert(json!({
            "amount": amount,
            "from_currency": "USD",
            "to_currency": to
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount} USD->{to}");
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Amount is out of range");
    }
}

/// The fixed table passes the same validation as any other table.
#[test]
fn test_fixed_table_is_validated() {
    let entries: Vec<_> = fixed().iter().collect();
    assert_eq!(RateTable::new(entries).as_ref(), Ok(fixed()));
}
