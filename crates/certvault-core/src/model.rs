//! Data model for certvault.
//!
//! Field names on the wire follow the service's established JSON shape
//! (`ID`, `OwnerID`, `CreatedAt`, ...), so existing clients keep working.
//! Incoming keys are also accepted in their common lower/camel/snake casings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. Credentials live in the [`UserDirectory`](crate::UserDirectory)
/// and are never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Transfer state embedded in every certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Recipient email.
    #[serde(rename = "To", alias = "to", default)]
    pub to: String,
    /// Free-form status label; `"Accepted"` once resolved.
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
}

impl Transfer {
    /// Status marker written when the recipient accepts.
    pub const ACCEPTED: &'static str = "Accepted";

    pub fn new(to: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            status: status.into(),
        }
    }

    /// A transfer names a recipient and has not been accepted yet.
    pub fn is_unresolved(&self) -> bool {
        !self.to.is_empty() && self.status != Self::ACCEPTED
    }
}

/// A titled, timestamped record with a single current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "ID", alias = "id", alias = "Id")]
    pub id: String,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(
        rename = "CreatedAt",
        alias = "createdAt",
        alias = "created_at",
        alias = "createdat",
        default = "zero_time"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "OwnerID",
        alias = "ownerID",
        alias = "ownerId",
        alias = "OwnerId",
        alias = "owner_id",
        alias = "ownerid",
        default
    )]
    pub owner_id: String,
    #[serde(rename = "Year", alias = "year", default)]
    pub year: i32,
    #[serde(rename = "Note", alias = "note", default)]
    pub note: String,
    #[serde(rename = "Transfer", alias = "transfer", default)]
    pub transfer: Transfer,
}

/// Timestamp used when a payload omits `CreatedAt`: `0001-01-01T00:00:00Z`.
pub fn zero_time() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}
