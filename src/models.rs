use std::sync::Arc;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::{APPOINTMENTS, BILLS, PATIENTS, Repository, StorageBackend};

#[derive(Clone)]
pub struct AppState {
    pub patients: Repository<Patient>,
    pub appointments: Repository<Appointment>,
    pub bills: Repository<Bill>,
}

impl AppState {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            patients: Repository::new(Arc::clone(&backend), PATIENTS),
            appointments: Repository::new(Arc::clone(&backend), APPOINTMENTS),
            bills: Repository::new(backend, BILLS),
        }
    }
}

/* -------------------------
   Persisted records
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub contact: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub description: String,
    /// Always formatted with two decimals, e.g. "12.50".
    pub amount: String,
    pub status: String,
    pub created_at: String,
}

/* -------------------------
   Request payloads
--------------------------*/

/// Field values arrive as strings from HTML forms and as strings or numbers
/// from JSON clients; both normalize to strings here. Absent fields read as
/// empty so the presence checks own the error message.
fn stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringlyVisitor;

    impl<'de> Visitor<'de> for StringlyVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<String, D2::Error> {
            d.deserialize_any(StringlyVisitor)
        }
    }

    deserializer.deserialize_any(StringlyVisitor)
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientPayload {
    #[serde(default, deserialize_with = "stringly")]
    pub name: String,
    #[serde(default, deserialize_with = "stringly")]
    pub age: String,
    #[serde(default, deserialize_with = "stringly")]
    pub gender: String,
    #[serde(default, deserialize_with = "stringly")]
    pub contact: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentPayload {
    #[serde(default, deserialize_with = "stringly")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "stringly")]
    pub preferred_date: String,
    #[serde(default, deserialize_with = "stringly")]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BillPayload {
    #[serde(default, deserialize_with = "stringly")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "stringly")]
    pub description: String,
    #[serde(default, deserialize_with = "stringly")]
    pub amount: String,
}

/* -------------------------
   Overview
--------------------------*/

#[derive(Debug, Serialize)]
pub struct Overview {
    pub patients: usize,
    pub appointments: usize,
    pub bills: usize,
    pub unpaid: usize,
}

impl Overview {
    pub fn tally(patients: &[Patient], appointments: &[Appointment], bills: &[Bill]) -> Self {
        Self {
            patients: patients.len(),
            appointments: appointments.len(),
            bills: bills.len(),
            unpaid: bills.iter().filter(|b| b.status == "unpaid").count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payload_accepts_numbers_where_forms_send_strings() {
        let from_number: PatientPayload =
            serde_json::from_str(r#"{"name":"Ada","age":34}"#).unwrap();
        assert_eq!(from_number.age, "34");

        let from_string: PatientPayload =
            serde_json::from_str(r#"{"name":"Ada","age":"34"}"#).unwrap();
        assert_eq!(from_string.age, "34");
    }

    #[test]
    fn absent_and_null_fields_read_as_empty() {
        let payload: BillPayload =
            serde_json::from_str(r#"{"patient_id":"P-12345678","description":null}"#).unwrap();
        assert_eq!(payload.patient_id, "P-12345678");
        assert_eq!(payload.description, "");
        assert_eq!(payload.amount, "");
    }
}
