//! Built-in users and certificates loaded when the service starts seeded.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Certificate, Transfer, User};

fn seed_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2009, 11, 17)
        .and_then(|d| d.and_hms_nano_opt(20, 34, 58, 651_387_237))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

/// Seed users paired with their clear-text secrets.
pub fn users() -> Vec<(User, String)> {
    vec![
        (
            User {
                id: "rr01".into(),
                email: "reshawnramjattan@gmail.com".into(),
                name: "Reshawn".into(),
            },
            "rrejh3294".into(),
        ),
        (
            User {
                id: "vvg01".into(),
                email: "vvg@gmail.com".into(),
                name: "Vincent Van Golang".into(),
            },
            "vwh39043f".into(),
        ),
    ]
}

pub fn certificates() -> Vec<Certificate> {
    vec![
        Certificate {
            id: "c001".into(),
            title: "The Starry Night".into(),
            created_at: seed_timestamp(),
            owner_id: "rr01".into(),
            year: 1889,
            note: String::new(),
            transfer: Transfer::default(),
        },
        Certificate {
            id: "c002".into(),
            title: "Café Terrace at Night".into(),
            created_at: seed_timestamp(),
            owner_id: "vvg01".into(),
            year: 1888,
            note: String::new(),
            transfer: Transfer::default(),
        },
    ]
}
