use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Overview},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(overview))
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let appointments = state.appointments.load_or_empty().await?;
    let bills = state.bills.load_or_empty().await?;

    Ok(Json(Overview::tally(&patients, &appointments, &bills)))
}
