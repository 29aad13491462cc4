use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{DiscountMode, PricingResult, RawInputs, fraction_to_percent, quote};
use crate::locale::{Labels, Language, labels};

const DEFAULT_CURRENCY: &str = "RM";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliDiscountMode {
    Percentage,
    Amount,
}

impl From<CliDiscountMode> for DiscountMode {
    fn from(value: CliDiscountMode) -> Self {
        match value {
            CliDiscountMode::Percentage => DiscountMode::Percentage,
            CliDiscountMode::Amount => DiscountMode::Amount,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDiscountMode {
    #[serde(alias = "percent", alias = "pct")]
    Percentage,
    #[serde(alias = "absolute", alias = "flat")]
    Amount,
}

impl From<ApiDiscountMode> for DiscountMode {
    fn from(value: ApiDiscountMode) -> Self {
        match value {
            ApiDiscountMode::Percentage => DiscountMode::Percentage,
            ApiDiscountMode::Amount => DiscountMode::Amount,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuotePayload {
    list_price: Option<f64>,
    unit_cost: Option<f64>,
    discount_mode: Option<ApiDiscountMode>,
    discount_value: Option<f64>,
    #[serde(alias = "targetMargin")]
    target_margin_pct: Option<f64>,
    currency: Option<String>,
    language: Option<Language>,
}

#[derive(Parser, Debug)]
#[command(
    name = "margincheck",
    about = "Unit pricing and margin calculator (net price, profit, margin, markup, target-margin price)"
)]
struct Cli {
    #[arg(long, help = "List price before discount; blank counts as 0")]
    list_price: Option<f64>,
    #[arg(long, help = "Cost per unit; blank counts as 0")]
    unit_cost: Option<f64>,
    #[arg(long, value_enum, default_value_t = CliDiscountMode::Percentage)]
    discount_mode: CliDiscountMode,
    #[arg(
        long,
        help = "Discount as a percent of list price or as a currency amount, per --discount-mode"
    )]
    discount_value: Option<f64>,
    #[arg(
        long,
        help = "Desired margin in percent; back-solves the list price needed to reach it"
    )]
    target_margin: Option<f64>,
    #[arg(
        long,
        default_value = DEFAULT_CURRENCY,
        help = "Currency symbol prefixed to money values (display only)"
    )]
    currency: String,
    #[arg(long, value_enum, default_value_t = Language::En)]
    language: Language,
}

#[derive(Debug)]
struct QuoteRequest {
    raw: RawInputs,
    currency: String,
    language: Language,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    language: Language,
    currency: String,
    net_price: f64,
    gross_profit_per_unit: f64,
    margin_pct: f64,
    markup_pct: f64,
    /// `None` when no finite price satisfies the requested margin.
    price_for_target_margin: Option<f64>,
    display: QuoteDisplay,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteDisplay {
    net_price: String,
    gross_profit_per_unit: String,
    margin: String,
    markup: String,
    price_for_target_margin: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LabelsQuery {
    language: Option<Language>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelsResponse {
    language: Language,
    labels: &'static Labels,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn quote_request_from_payload(payload: QuotePayload) -> QuoteRequest {
    QuoteRequest {
        raw: RawInputs {
            list_price: payload.list_price,
            unit_cost: payload.unit_cost,
            discount_mode: payload
                .discount_mode
                .map(DiscountMode::from)
                .unwrap_or_default(),
            discount_value: payload.discount_value,
            target_margin_pct: payload.target_margin_pct,
        },
        currency: payload
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        language: payload.language.unwrap_or_default(),
    }
}

fn format_money(symbol: &str, value: f64, not_applicable: &str) -> String {
    if value.is_finite() {
        format!("{symbol}{value:.2}")
    } else {
        not_applicable.to_string()
    }
}

/// At least 2 and at most 4 fractional digits, so round percentages read as
/// "50.00%" while repeating divisions keep their extra precision.
fn format_percent(fraction: f64) -> String {
    let text = format!("{:.4}", fraction_to_percent(fraction));
    let text = text
        .strip_suffix("00")
        .or_else(|| text.strip_suffix('0'))
        .unwrap_or(&text);
    format!("{text}%")
}

fn build_quote_display(result: &PricingResult, currency: &str, language: Language) -> QuoteDisplay {
    let table = labels(language);
    QuoteDisplay {
        net_price: format_money(currency, result.net_price, table.not_applicable),
        gross_profit_per_unit: format_money(
            currency,
            result.gross_profit_per_unit,
            table.not_applicable,
        ),
        margin: format_percent(result.margin),
        markup: format_percent(result.markup),
        price_for_target_margin: format_money(
            currency,
            result.price_for_target_margin,
            table.not_applicable,
        ),
    }
}

fn build_quote_response(request: QuoteRequest) -> QuoteResponse {
    let result = quote(&request.raw);
    let display = build_quote_display(&result, &request.currency, request.language);
    QuoteResponse {
        language: request.language,
        currency: request.currency,
        net_price: result.net_price,
        gross_profit_per_unit: result.gross_profit_per_unit,
        margin_pct: fraction_to_percent(result.margin),
        markup_pct: fraction_to_percent(result.markup),
        price_for_target_margin: result
            .price_for_target_margin
            .is_finite()
            .then_some(result.price_for_target_margin),
        display,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/quote", get(quote_get_handler).post(quote_post_handler))
        .route("/api/labels", get(labels_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("margincheck HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/quote");

    axum::serve(listener, app).await
}

async fn quote_get_handler(Query(payload): Query<QuotePayload>) -> Response {
    quote_handler_impl(payload)
}

async fn quote_post_handler(Json(payload): Json<QuotePayload>) -> Response {
    quote_handler_impl(payload)
}

fn quote_handler_impl(payload: QuotePayload) -> Response {
    let response = build_quote_response(quote_request_from_payload(payload));
    json_response(StatusCode::OK, response)
}

async fn labels_handler(Query(query): Query<LabelsQuery>) -> Response {
    let language = query.language.unwrap_or_default();
    json_response(
        StatusCode::OK,
        LabelsResponse {
            language,
            labels: labels(language),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

/// One-shot quote on stdout; every flag is optional, matching the engine's
/// treatment of blank form fields.
pub fn run_quote_cli() {
    let cli = Cli::parse();
    let request = QuoteRequest {
        raw: RawInputs {
            list_price: cli.list_price,
            unit_cost: cli.unit_cost,
            discount_mode: cli.discount_mode.into(),
            discount_value: cli.discount_value,
            target_margin_pct: cli.target_margin,
        },
        currency: cli.currency,
        language: cli.language,
    };

    let table = labels(request.language);
    let response = build_quote_response(request);

    println!("{}", table.title);
    println!("{}: {}", table.net_price, response.display.net_price);
    println!(
        "{}: {}",
        table.gross_profit_per_unit, response.display.gross_profit_per_unit
    );
    println!("{}: {}", table.margin, response.display.margin);
    println!("{}: {}", table.markup, response.display.markup);
    println!(
        "{}: {}",
        table.price_for_target_margin, response.display.price_for_target_margin
    );
}

#[cfg(test)]
fn quote_request_from_json(json: &str) -> Result<QuoteRequest, String> {
    let payload = serde_json::from_str::<QuotePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(quote_request_from_payload(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn payload_maps_onto_raw_inputs() {
        let request = quote_request_from_json(
            r#"{
                "listPrice": 100,
                "unitCost": 60,
                "discountMode": "amount",
                "discountValue": 5,
                "targetMarginPct": 30,
                "currency": "$",
                "language": "ms"
            }"#,
        )
        .expect("valid payload");

        assert_eq!(request.raw.list_price, Some(100.0));
        assert_eq!(request.raw.unit_cost, Some(60.0));
        assert_eq!(request.raw.discount_mode, DiscountMode::Amount);
        assert_eq!(request.raw.discount_value, Some(5.0));
        assert_eq!(request.raw.target_margin_pct, Some(30.0));
        assert_eq!(request.currency, "$");
        assert_eq!(request.language, Language::Ms);
    }

    #[test]
    fn payload_defaults_mirror_a_blank_form() {
        let request = quote_request_from_json("{}").expect("valid payload");
        assert_eq!(request.raw, RawInputs::default());
        assert_eq!(request.currency, DEFAULT_CURRENCY);
        assert_eq!(request.language, Language::En);
    }

    #[test]
    fn discount_mode_aliases_deserialize() {
        for json in [
            r#"{"discountMode": "percentage"}"#,
            r#"{"discountMode": "percent"}"#,
            r#"{"discountMode": "pct"}"#,
        ] {
            let request = quote_request_from_json(json).expect("valid payload");
            assert_eq!(request.raw.discount_mode, DiscountMode::Percentage);
        }
        for json in [
            r#"{"discountMode": "amount"}"#,
            r#"{"discountMode": "flat"}"#,
            r#"{"discountMode": "absolute"}"#,
        ] {
            let request = quote_request_from_json(json).expect("valid payload");
            assert_eq!(request.raw.discount_mode, DiscountMode::Amount);
        }
    }

    #[test]
    fn unknown_discount_mode_is_rejected() {
        assert!(quote_request_from_json(r#"{"discountMode": "bogus"}"#).is_err());
    }

    #[test]
    fn money_formatting_uses_two_digits_and_the_symbol() {
        assert_eq!(format_money("RM", 90.0, "N/A"), "RM90.00");
        assert_eq!(format_money("RM", 85.714285, "N/A"), "RM85.71");
        assert_eq!(format_money("$", 0.0, "N/A"), "$0.00");
    }

    #[test]
    fn non_finite_money_renders_the_sentinel() {
        assert_eq!(format_money("RM", f64::INFINITY, "N/A"), "N/A");
        assert_eq!(format_money("RM", f64::INFINITY, "T/B"), "T/B");
    }

    #[test]
    fn percent_formatting_keeps_two_to_four_digits() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(30.0 / 90.0), "33.3333%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.5), "150.00%");
        assert_eq!(format_percent(0.12345), "12.345%");
        assert_eq!(format_percent(0.123456), "12.3456%");
    }

    #[test]
    fn full_quote_response_for_the_reference_scenario() {
        let request = quote_request_from_json(
            r#"{
                "listPrice": 100,
                "unitCost": 60,
                "discountMode": "percentage",
                "discountValue": 10,
                "targetMarginPct": 30
            }"#,
        )
        .expect("valid payload");
        let response = build_quote_response(request);

        assert_approx(response.net_price, 90.0);
        assert_approx(response.gross_profit_per_unit, 30.0);
        assert_approx(response.margin_pct, 100.0 * 30.0 / 90.0);
        assert_approx(response.markup_pct, 50.0);
        assert_approx(
            response.price_for_target_margin.expect("finite price"),
            60.0 / 0.7,
        );

        assert_eq!(response.display.net_price, "RM90.00");
        assert_eq!(response.display.gross_profit_per_unit, "RM30.00");
        assert_eq!(response.display.margin, "33.3333%");
        assert_eq!(response.display.markup, "50.00%");
        assert_eq!(response.display.price_for_target_margin, "RM85.71");
    }

    #[test]
    fn impossible_target_serializes_as_null_and_localized_sentinel() {
        let request = quote_request_from_json(
            r#"{"listPrice": 100, "unitCost": 0, "targetMarginPct": 50, "language": "ms"}"#,
        )
        .expect("valid payload");
        let response = build_quote_response(request);

        assert!(response.price_for_target_margin.is_none());
        assert_eq!(response.display.price_for_target_margin, "T/B");

        let json = serde_json::to_value(&response).expect("serializable");
        assert!(json["priceForTargetMargin"].is_null());
    }
}
