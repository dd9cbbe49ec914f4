use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactRequestRecord {
    pub id: i32,
    pub name: String,
    pub nationality: String,
    pub phone_number: String,
    pub destination_country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) const CONTACT_REQUEST_COLUMNS: &str =
    "id, name, nationality, phone_number, destination_country, created_at, updated_at";

/// Columns the free-text `search` parameter matches against
pub(crate) const CONTACT_REQUEST_SEARCH_COLUMNS: &[&str] =
    &["name", "phone_number", "nationality", "destination_country"];

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_PHONE_NUMBER_LENGTH: usize = 50;
