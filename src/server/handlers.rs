use super::AppState;
use crate::core::format::{format_rate, round_to};
use crate::core::storefront::{Cart, CartQuote, FormattedQuote, StorefrontState, parse_quantities};
use crate::core::{ConversionRequest, RateSnapshot, convert};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Message for a payload the provider marked as failed.
fn provider_failure(snapshot: &RateSnapshot) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        snapshot.error_info().unwrap_or("Failed to fetch rates"),
    )
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /api/rates`: the provider's latest payload, passed through.
pub async fn get_rates(State(state): State<Arc<AppState>>) -> Response {
    match state.provider.fetch_rates().await {
        Ok(snapshot) if snapshot.success => Json(snapshot).into_response(),
        Ok(snapshot) => provider_failure(&snapshot),
        Err(e) => {
            error!(error = %e, "Error fetching currency data");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch exchange rates",
            )
        }
    }
}

/// Amounts are accepted as JSON numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct ConvertBody {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<AmountInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPayload {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted_amount: f64,
    pub rate: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub result: ConversionPayload,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `POST /api/convert`: converts with freshly fetched rates.
///
/// A body that is missing, not JSON, or of the wrong shape is treated the same
/// as one with missing fields.
pub async fn convert_currency(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable convert body");
            return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
        }
    };
    let (Some(from), Some(to), Some(amount)) =
        (non_empty(body.from), non_empty(body.to), body.amount)
    else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
    };

    let amount = match amount {
        AmountInput::Number(n) => n,
        AmountInput::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) if text.trim().is_empty() => {
                return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
            }
            Err(_) => {
                return error_response(StatusCode::BAD_REQUEST, format!("Invalid amount: {text}"));
            }
        },
    };
    if amount == 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
    }

    let snapshot = match state.provider.fetch_rates().await {
        Ok(snapshot) if snapshot.success => snapshot,
        Ok(snapshot) => return provider_failure(&snapshot),
        Err(e) => {
            error!(error = %e, "Error converting currency");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to convert currency");
        }
    };
    let table = match snapshot.to_table() {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "Provider returned an unusable rate table");
            return error_response(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    let request = ConversionRequest::new(&from, &to, amount);
    match convert(&request, &table) {
        Ok(result) => {
            debug!(from = %request.from, to = %request.to, amount, "Converted");
            Json(ConvertResponse {
                success: true,
                result: ConversionPayload {
                    from: request.from,
                    to: request.to,
                    amount: request.amount,
                    converted_amount: round_to(result.converted, 2),
                    rate: format_rate(result.rate),
                    date: snapshot.date,
                },
            })
            .into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub currency: Option<String>,
    /// Comma-separated `ID:QTY` pairs.
    pub qty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub quote: CartQuote,
    pub formatted: FormattedQuote,
}

/// `GET /api/cart?currency=XXX&qty=4:2`: the demo cart priced in the chosen
/// currency, falling back to catalogue prices when rates are unavailable.
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CartQuery>,
) -> Response {
    let currency = non_empty(query.currency).unwrap_or_else(|| state.default_currency.clone());

    let mut cart = Cart::from_catalogue();
    if let Some(list) = query.qty {
        if let Err(e) = parse_quantities(&list).and_then(|updates| cart.apply(&updates)) {
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    }

    let rates = match state.provider.fetch_rates().await {
        Ok(snapshot) => snapshot
            .to_table()
            .inspect_err(|e| warn!(error = %e, "Rate table unavailable for cart"))
            .ok(),
        Err(e) => {
            warn!(error = %e, "Error fetching rates for cart");
            None
        }
    };

    let quote = StorefrontState::new(&currency).with_rates(rates).quote(&cart);
    let formatted = quote.formatted();
    Json(CartResponse { quote, formatted }).into_response()
}
