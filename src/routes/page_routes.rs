//! Server-rendered front-desk pages. Same builders as the JSON API; form
//! posts redirect back to the page with the outcome carried as a flash
//! message in the query string (there is no session layer).

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
};
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::{
        Appointment, AppointmentPayload, AppState, Bill, BillPayload, Overview, Patient,
        PatientPayload,
    },
    records::{build_appointment, build_bill, build_patient},
    slots::APPOINTMENT_SLOTS,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/patients", get(patients_page).post(submit_patient))
        .route("/appointments", get(appointments_page).post(submit_appointment))
        .route("/billing", get(billing_page).post(submit_bill))
}

/* ============================================================
   Flash messages
   ============================================================ */

#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub flash: Option<String>,
    pub kind: Option<String>,
}

fn redirect_with_flash(path: &str, message: &str, kind: &str) -> Redirect {
    Redirect::to(&format!(
        "{path}?flash={}&kind={kind}",
        urlencoding::encode(message)
    ))
}

fn flash_banner(query: &FlashQuery) -> String {
    match query.flash.as_deref() {
        Some(message) if !message.is_empty() => {
            let class = match query.kind.as_deref() {
                Some("success") => "flash success",
                _ => "flash error",
            };
            format!("<p class=\"{class}\">{}</p>", escape_html(message))
        }
        _ => String::new(),
    }
}

/* ============================================================
   Rendering helpers
   ============================================================ */

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, flash: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Clinic Front Desk</title>
<style>
body {{ font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}
th, td {{ border: 1px solid #ccc; padding: .4rem .6rem; text-align: left; }}
form label {{ display: block; margin: .5rem 0; }}
.flash.success {{ color: #155724; background: #d4edda; padding: .5rem; }}
.flash.error {{ color: #721c24; background: #f8d7da; padding: .5rem; }}
</style>
</head>
<body>
<nav>
<a href="/">Overview</a>
<a href="/patients">Patients</a>
<a href="/appointments">Appointments</a>
<a href="/billing">Billing</a>
</nav>
{flash}
<h1>{title}</h1>
{body}
</body>
</html>
"#
    ))
}

fn patient_options(patients: &[Patient]) -> String {
    patients
        .iter()
        .map(|p| {
            format!(
                "<option value=\"{}\">{} ({})</option>",
                escape_html(&p.id),
                escape_html(&p.name),
                escape_html(&p.id)
            )
        })
        .collect()
}

/* ============================================================
   GET /
   ============================================================ */

pub async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let appointments = state.appointments.load_or_empty().await?;
    let bills = state.bills.load_or_empty().await?;
    let totals = Overview::tally(&patients, &appointments, &bills);

    let body = format!(
        r#"<table>
<tr><th>Patients</th><th>Appointments</th><th>Bills</th><th>Unpaid bills</th></tr>
<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>
</table>"#,
        totals.patients, totals.appointments, totals.bills, totals.unpaid
    );
    Ok(layout("Overview", &flash_banner(&query), &body))
}

/* ============================================================
   GET/POST /patients
   ============================================================ */

fn patient_rows(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return "<tr><td colspan=\"6\">No patients yet.</td></tr>".to_string();
    }
    patients
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&p.id),
                escape_html(&p.name),
                p.age,
                escape_html(&p.gender),
                escape_html(&p.contact),
                escape_html(&p.created_at),
            )
        })
        .collect()
}

pub async fn patients_page(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>, ApiError> {
    let patients = state.patients.load_or_empty().await?;

    let body = format!(
        r#"<table>
<tr><th>ID</th><th>Name</th><th>Age</th><th>Gender</th><th>Contact</th><th>Created</th></tr>
{}
</table>
<h2>Register patient</h2>
<form method="post" action="/patients">
<label>Name <input name="name"></label>
<label>Age <input name="age"></label>
<label>Gender <input name="gender"></label>
<label>Contact <input name="contact"></label>
<button type="submit">Create</button>
</form>"#,
        patient_rows(&patients)
    );
    Ok(layout("Patients", &flash_banner(&query), &body))
}

pub async fn submit_patient(
    State(state): State<AppState>,
    Form(payload): Form<PatientPayload>,
) -> Result<Redirect, ApiError> {
    let mut records = state.patients.load_or_empty().await?;
    match build_patient(&payload) {
        Ok(patient) => {
            let message = format!("Patient created: {}", patient.id);
            records.push(patient);
            state.patients.save(&records).await?;
            Ok(redirect_with_flash("/patients", &message, "success"))
        }
        Err(err) => Ok(redirect_with_flash("/patients", &err.to_string(), "error")),
    }
}

/* ============================================================
   GET/POST /appointments
   ============================================================ */

fn appointment_rows(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "<tr><td colspan=\"7\">No appointments yet.</td></tr>".to_string();
    }
    appointments
        .iter()
        .map(|a| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&a.id),
                escape_html(&a.patient_name),
                escape_html(&a.date),
                escape_html(&a.time),
                escape_html(&a.reason),
                escape_html(&a.status),
                escape_html(&a.created_at),
            )
        })
        .collect()
}

pub async fn appointments_page(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let appointments = state.appointments.load_or_empty().await?;

    let slots = APPOINTMENT_SLOTS.join(", ");
    let body = format!(
        r#"<table>
<tr><th>ID</th><th>Patient</th><th>Date</th><th>Time</th><th>Reason</th><th>Status</th><th>Created</th></tr>
{}
</table>
<p>Daily slots: {slots}</p>
<h2>Book appointment</h2>
<form method="post" action="/appointments">
<label>Patient <select name="patient_id">{}</select></label>
<label>Preferred date <input name="preferred_date" placeholder="YYYY-MM-DD"></label>
<label>Reason <input name="reason"></label>
<button type="submit">Book</button>
</form>"#,
        appointment_rows(&appointments),
        patient_options(&patients),
    );
    Ok(layout("Appointments", &flash_banner(&query), &body))
}

pub async fn submit_appointment(
    State(state): State<AppState>,
    Form(payload): Form<AppointmentPayload>,
) -> Result<Redirect, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let mut records = state.appointments.load_or_empty().await?;
    match build_appointment(&patients, &records, &payload) {
        Ok(appointment) => {
            let message = format!(
                "Appointment booked for {} at {}.",
                appointment.date, appointment.time
            );
            records.push(appointment);
            state.appointments.save(&records).await?;
            Ok(redirect_with_flash("/appointments", &message, "success"))
        }
        Err(err) => Ok(redirect_with_flash(
            "/appointments",
            &err.to_string(),
            "error",
        )),
    }
}

/* ============================================================
   GET/POST /billing
   ============================================================ */

fn bill_rows(bills: &[Bill]) -> String {
    if bills.is_empty() {
        return "<tr><td colspan=\"6\">No bills yet.</td></tr>".to_string();
    }
    bills
        .iter()
        .map(|b| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&b.id),
                escape_html(&b.patient_name),
                escape_html(&b.description),
                escape_html(&b.amount),
                escape_html(&b.status),
                escape_html(&b.created_at),
            )
        })
        .collect()
}

pub async fn billing_page(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let bills = state.bills.load_or_empty().await?;

    let body = format!(
        r#"<table>
<tr><th>ID</th><th>Patient</th><th>Description</th><th>Amount</th><th>Status</th><th>Created</th></tr>
{}
</table>
<h2>Generate bill</h2>
<form method="post" action="/billing">
<label>Patient <select name="patient_id">{}</select></label>
<label>Description <input name="description"></label>
<label>Amount <input name="amount"></label>
<button type="submit">Generate</button>
</form>"#,
        bill_rows(&bills),
        patient_options(&patients),
    );
    Ok(layout("Billing", &flash_banner(&query), &body))
}

pub async fn submit_bill(
    State(state): State<AppState>,
    Form(payload): Form<BillPayload>,
) -> Result<Redirect, ApiError> {
    let patients = state.patients.load_or_empty().await?;
    let mut records = state.bills.load_or_empty().await?;
    match build_bill(&patients, &payload) {
        Ok(bill) => {
            let message = format!("Bill generated: {}", bill.id);
            records.push(bill);
            state.bills.save(&records).await?;
            Ok(redirect_with_flash("/billing", &message, "success"))
        }
        Err(err) => Ok(redirect_with_flash("/billing", &err.to_string(), "error")),
    }
}
