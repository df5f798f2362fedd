use chrono::Local;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentPayload, Bill, BillPayload, Patient, PatientPayload};
use crate::slots::find_next_available_slot;

/// A single human-readable reason a record could not be built. Builders never
/// touch storage; the caller appends only on success, so a failed validation
/// never leaves a partial record behind.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: &str) -> Self {
        Self(message.to_string())
    }
}

fn new_id(prefix: char) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..8])
}

fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn find_patient<'a>(patients: &'a [Patient], patient_id: &str) -> Option<&'a Patient> {
    patients.iter().find(|p| p.id == patient_id)
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

pub fn build_patient(payload: &PatientPayload) -> Result<Patient, ValidationError> {
    let name = payload.name.trim();
    let age_raw = payload.age.trim();

    if name.is_empty() || age_raw.is_empty() {
        return Err(ValidationError::new("Name and age are required."));
    }
    let age: i64 = age_raw
        .parse()
        .map_err(|_| ValidationError::new("Age must be a number."))?;

    Ok(Patient {
        id: new_id('P'),
        name: name.to_string(),
        age,
        gender: or_default(payload.gender.trim(), "unspecified"),
        contact: payload.contact.trim().to_string(),
        created_at: timestamp_now(),
    })
}

pub fn build_appointment(
    patients: &[Patient],
    appointments: &[Appointment],
    payload: &AppointmentPayload,
) -> Result<Appointment, ValidationError> {
    let patient_id = payload.patient_id.trim();
    let preferred_date = payload.preferred_date.trim();

    if patient_id.is_empty() || preferred_date.is_empty() {
        return Err(ValidationError::new(
            "Patient ID and preferred date are required.",
        ));
    }
    let patient = find_patient(patients, patient_id)
        .ok_or_else(|| ValidationError::new("Patient not found."))?;
    let (date, time) = find_next_available_slot(appointments, preferred_date)
        .ok_or_else(|| ValidationError::new("Preferred date must be in YYYY-MM-DD format."))?;

    Ok(Appointment {
        id: new_id('A'),
        patient_id: patient_id.to_string(),
        patient_name: patient.name.clone(),
        date,
        time,
        reason: or_default(payload.reason.trim(), "general"),
        status: "scheduled".to_string(),
        created_at: timestamp_now(),
    })
}

pub fn build_bill(patients: &[Patient], payload: &BillPayload) -> Result<Bill, ValidationError> {
    let patient_id = payload.patient_id.trim();
    let amount_raw = payload.amount.trim();

    if patient_id.is_empty() || amount_raw.is_empty() {
        return Err(ValidationError::new("Patient ID and amount are required."));
    }
    let patient = find_patient(patients, patient_id)
        .ok_or_else(|| ValidationError::new("Patient not found."))?;
    let amount = format_amount(amount_raw)
        .ok_or_else(|| ValidationError::new("Amount must be a valid number."))?;

    Ok(Bill {
        id: new_id('B'),
        patient_id: patient_id.to_string(),
        patient_name: patient.name.clone(),
        description: or_default(payload.description.trim(), "services"),
        amount,
        status: "unpaid".to_string(),
        created_at: timestamp_now(),
    })
}

/// Normalizes an amount to a two-decimal string, e.g. "12.5" -> "12.50".
fn format_amount(raw: &str) -> Option<String> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patient() -> Patient {
        Patient {
            id: "P-12345678".into(),
            name: "Ada Lovelace".into(),
            age: 36,
            gender: "female".into(),
            contact: "555-0100".into(),
            created_at: "2024-01-01T09:00:00".into(),
        }
    }

    fn patient_payload(name: &str, age: &str) -> PatientPayload {
        PatientPayload {
            name: name.into(),
            age: age.into(),
            ..Default::default()
        }
    }

    #[test]
    fn patient_requires_name_and_age() {
        let err = build_patient(&patient_payload("", "34")).unwrap_err();
        assert_eq!(err.to_string(), "Name and age are required.");

        let err = build_patient(&patient_payload("Ada", "   ")).unwrap_err();
        assert_eq!(err.to_string(), "Name and age are required.");
    }

    #[test]
    fn patient_age_must_be_an_integer() {
        for age in ["abc", "12.5", "12 years"] {
            let err = build_patient(&patient_payload("Ada", age)).unwrap_err();
            assert_eq!(err.to_string(), "Age must be a number.");
        }
    }

    #[test]
    fn patient_gets_prefixed_id_and_defaults() {
        let patient = build_patient(&patient_payload("  Ada  ", " 34 ")).unwrap();
        assert!(patient.id.starts_with("P-"));
        assert_eq!(patient.id.len(), 10);
        assert_eq!(patient.name, "Ada");
        assert_eq!(patient.age, 34);
        assert_eq!(patient.gender, "unspecified");
        assert_eq!(patient.contact, "");
    }

    #[test]
    fn appointment_requires_patient_id_and_date() {
        let err = build_appointment(&[], &[], &AppointmentPayload::default()).unwrap_err();
        assert_eq!(err.to_string(), "Patient ID and preferred date are required.");
    }

    #[test]
    fn appointment_rejects_unknown_patient() {
        let payload = AppointmentPayload {
            patient_id: "P-00000000".into(),
            preferred_date: "2024-01-01".into(),
            ..Default::default()
        };
        let err = build_appointment(&[sample_patient()], &[], &payload).unwrap_err();
        assert_eq!(err.to_string(), "Patient not found.");
    }

    #[test]
    fn appointment_rejects_malformed_date() {
        let payload = AppointmentPayload {
            patient_id: "P-12345678".into(),
            preferred_date: "01-01-2024".into(),
            ..Default::default()
        };
        let err = build_appointment(&[sample_patient()], &[], &payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Preferred date must be in YYYY-MM-DD format."
        );
    }

    #[test]
    fn appointment_books_the_allocated_slot_with_defaults() {
        let payload = AppointmentPayload {
            patient_id: "P-12345678".into(),
            preferred_date: "2024-01-01".into(),
            reason: "".into(),
        };
        let appointment = build_appointment(&[sample_patient()], &[], &payload).unwrap();
        assert!(appointment.id.starts_with("A-"));
        assert_eq!(appointment.patient_name, "Ada Lovelace");
        assert_eq!(appointment.date, "2024-01-01");
        assert_eq!(appointment.time, "09:00");
        assert_eq!(appointment.reason, "general");
        assert_eq!(appointment.status, "scheduled");
    }

    #[test]
    fn bill_requires_patient_id_and_amount() {
        let payload = BillPayload {
            patient_id: "P-12345678".into(),
            ..Default::default()
        };
        let err = build_bill(&[sample_patient()], &payload).unwrap_err();
        assert_eq!(err.to_string(), "Patient ID and amount are required.");
    }

    #[test]
    fn bill_rejects_non_numeric_amount() {
        let payload = BillPayload {
            patient_id: "P-12345678".into(),
            amount: "twelve".into(),
            ..Default::default()
        };
        let err = build_bill(&[sample_patient()], &payload).unwrap_err();
        assert_eq!(err.to_string(), "Amount must be a valid number.");
    }

    #[test]
    fn bill_amount_is_normalized_to_two_decimals() {
        for (raw, formatted) in [("12.5", "12.50"), ("7", "7.00"), ("0.125", "0.12")] {
            let payload = BillPayload {
                patient_id: "P-12345678".into(),
                amount: raw.into(),
                ..Default::default()
            };
            let bill = build_bill(&[sample_patient()], &payload).unwrap();
            assert_eq!(bill.amount, formatted, "amount {raw}");
        }
    }

    #[test]
    fn bill_gets_prefixed_id_and_defaults() {
        let payload = BillPayload {
            patient_id: "P-12345678".into(),
            amount: "99.9".into(),
            ..Default::default()
        };
        let bill = build_bill(&[sample_patient()], &payload).unwrap();
        assert!(bill.id.starts_with("B-"));
        assert_eq!(bill.patient_name, "Ada Lovelace");
        assert_eq!(bill.description, "services");
        assert_eq!(bill.status, "unpaid");
    }
}
