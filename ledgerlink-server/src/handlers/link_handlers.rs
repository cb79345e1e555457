use axum::{Extension, Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerlink_core::{
    provider::LinkTokenPayload,
    transactions::{DateRange, TransactionRecord},
};

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
    middleware::Subject,
};

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub public_token: String,
}

#[derive(Debug, Serialize)]
pub struct ExchangeResponse {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionsRequest {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

pub async fn create_link_token(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
) -> AppResult<Json<LinkTokenPayload>> {
    let payload = state.linking.create_link_token(subject).await?;
    Ok(Json(payload))
}

pub async fn exchange_public_token(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
    Json(request): Json<ExchangeRequest>,
) -> AppResult<Json<ExchangeResponse>> {
    let credential = state
        .linking
        .exchange_public_token(subject, &request.public_token)
        .await?;

    Ok(Json(ExchangeResponse {
        access_token: credential.access_token,
        item_id: credential.item_id,
    }))
}

/// Sync transactions for the authenticated user. The stored access credential
/// is used; the client no longer submits one. An omitted date range falls back
/// to the configured trailing window.
pub async fn sync_transactions(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
    Json(request): Json<TransactionsRequest>,
) -> AppResult<Json<Vec<TransactionRecord>>> {
    let range = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) if start <= end => Some(DateRange { start, end }),
        (Some(_), Some(_)) => {
            return Err(AppError::bad_request("start_date must not be after end_date"));
        }
        (None, None) => None,
        _ => {
            return Err(AppError::bad_request(
                "start_date and end_date must be provided together",
            ));
        }
    };

    let records = state.ingest.fetch_and_store(subject, range).await?;
    Ok(Json(records))
}
