use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Patient, PatientPayload},
    records::build_patient,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/patients", get(list_patients).post(create_patient))
}

pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.patients.load_or_empty().await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(payload): Json<PatientPayload>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let mut records = state.patients.load_or_empty().await?;
    let patient = build_patient(&payload)?;

    records.push(patient.clone());
    state.patients.save(&records).await?;

    tracing::info!("created patient {}", patient.id);
    Ok((StatusCode::CREATED, Json(patient)))
}
