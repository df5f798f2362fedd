use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Bill, BillPayload},
    records::build_bill,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/bills", get(list_bills).post(create_bill))
}

pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<Bill>>, ApiError> {
    Ok(Json(state.bills.load_or_empty().await?))
}

pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<BillPayload>,
) -> Result<(StatusCode, Json<Bill>), ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let mut records = state.bills.load_or_empty().await?;

    let bill = build_bill(&patients, &payload)?;

    records.push(bill.clone());
    state.bills.save(&records).await?;

    tracing::info!("generated bill {}", bill.id);
    Ok((StatusCode::CREATED, Json(bill)))
}
