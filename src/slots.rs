use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::models::Appointment;

/// The front desk's bookable half-hour slots, in booking order.
pub const APPOINTMENT_SLOTS: [&str; 16] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30",
];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Walks forward from the preferred date and returns the first unbooked
/// `(date, time)` pair, trying each day's slots in list order. Returns `None`
/// only when the date is malformed; bookings are finite, so some day ahead
/// always has a free slot.
pub fn find_next_available_slot(
    appointments: &[Appointment],
    preferred_date: &str,
) -> Option<(String, String)> {
    let mut date = parse_date(preferred_date)?;
    loop {
        let day = date.to_string();
        let booked: HashSet<&str> = appointments
            .iter()
            .filter(|a| a.date == day)
            .map(|a| a.time.as_str())
            .collect();
        if let Some(slot) = APPOINTMENT_SLOTS.iter().find(|slot| !booked.contains(**slot)) {
            return Some((day, slot.to_string()));
        }
        date += Duration::days(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booked(date: &str, time: &str) -> Appointment {
        Appointment {
            id: "A-00000000".into(),
            patient_id: "P-00000000".into(),
            patient_name: "Test Patient".into(),
            date: date.into(),
            time: time.into(),
            reason: "general".into(),
            status: "scheduled".into(),
            created_at: "2024-01-01T09:00:00".into(),
        }
    }

    #[test]
    fn first_slot_on_an_empty_day() {
        assert_eq!(
            find_next_available_slot(&[], "2024-01-01"),
            Some(("2024-01-01".into(), "09:00".into()))
        );
    }

    #[test]
    fn skips_booked_slots_in_order() {
        let existing = vec![booked("2024-01-01", "09:00"), booked("2024-01-01", "09:30")];
        assert_eq!(
            find_next_available_slot(&existing, "2024-01-01"),
            Some(("2024-01-01".into(), "10:00".into()))
        );
    }

    #[test]
    fn stays_on_the_preferred_day_while_it_has_room() {
        let existing: Vec<Appointment> = APPOINTMENT_SLOTS[..15]
            .iter()
            .map(|t| booked("2024-01-01", t))
            .collect();
        assert_eq!(
            find_next_available_slot(&existing, "2024-01-01"),
            Some(("2024-01-01".into(), "16:30".into()))
        );
    }

    #[test]
    fn rolls_over_to_the_next_day_when_full() {
        let existing: Vec<Appointment> = APPOINTMENT_SLOTS
            .iter()
            .map(|t| booked("2024-01-01", t))
            .collect();
        assert_eq!(
            find_next_available_slot(&existing, "2024-01-01"),
            Some(("2024-01-02".into(), "09:00".into()))
        );
    }

    #[test]
    fn rolls_over_month_boundaries() {
        let existing: Vec<Appointment> = APPOINTMENT_SLOTS
            .iter()
            .map(|t| booked("2024-01-31", t))
            .collect();
        assert_eq!(
            find_next_available_slot(&existing, "2024-01-31"),
            Some(("2024-02-01".into(), "09:00".into()))
        );
    }

    #[test]
    fn bookings_on_other_days_do_not_block() {
        let existing = vec![booked("2024-01-02", "09:00")];
        assert_eq!(
            find_next_available_slot(&existing, "2024-01-01"),
            Some(("2024-01-01".into(), "09:00".into()))
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(find_next_available_slot(&[], "01/02/2024"), None);
        assert_eq!(find_next_available_slot(&[], "2024-13-01"), None);
        assert_eq!(find_next_available_slot(&[], "not-a-date"), None);
        assert_eq!(find_next_available_slot(&[], ""), None);
    }
}
