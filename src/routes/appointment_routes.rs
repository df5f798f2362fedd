use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Appointment, AppointmentPayload},
    records::build_appointment,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/appointments",
        get(list_appointments).post(create_appointment),
    )
}

pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(state.appointments.load_or_empty().await?))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let mut records = state.appointments.load_or_empty().await?;

    let appointment = build_appointment(&patients, &records, &payload)?;

    records.push(appointment.clone());
    state.appointments.save(&records).await?;

    tracing::info!(
        "booked appointment {} for {} at {}",
        appointment.id,
        appointment.date,
        appointment.time
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}
