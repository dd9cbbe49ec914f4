use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Positioned;

/// Entry of the world country catalogue a country points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryWorld {
    pub id: i32,
    pub name_en: String,
    pub name_ar: String,
    pub image_url: String,
}

/// Attribute value attached to a country, with the attribute's names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CountryAttributeValue {
    pub id: i32,
    pub attribute_id: i32,
    pub attribute_name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name_ar: Option<String>,
    pub value_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_ar: Option<String>,
}

/// Country as listed: position plus its world catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryListItem {
    pub id: i32,
    pub order: i32,
    pub country_world: CountryWorld,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Positioned for CountryListItem {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

/// Country with its attribute values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub country: CountryListItem,
    pub attributes: Vec<CountryAttributeValue>,
}

/// Flat join row of `countries` and `countries_world`
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CountryRow {
    pub id: i32,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub country_world_id: i32,
    pub world_name_en: String,
    pub world_name_ar: String,
    pub world_image_url: String,
}

impl From<CountryRow> for CountryListItem {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            order: row.order,
            country_world: CountryWorld {
                id: row.country_world_id,
                name_en: row.world_name_en,
                name_ar: row.world_name_ar,
                image_url: row.world_image_url,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const COUNTRY_SELECT: &str = r#"
    SELECT c.id, c."order", c.created_at, c.updated_at,
           w.id AS country_world_id, w.name_en AS world_name_en,
           w.name_ar AS world_name_ar, w.image_url AS world_image_url
    FROM countries c
    JOIN countries_world w ON w.id = c.country_world_id
"#;

/// Columns the country search matches against
pub(crate) const COUNTRY_SEARCH_COLUMNS: &[&str] = &["w.name_en", "w.name_ar"];

pub const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1000;
