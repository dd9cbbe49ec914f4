use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Positioned;

/// Attribute row as returned by every attribute endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeRecord {
    pub id: i32,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Positioned for AttributeRecord {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

/// Maximum length of an attribute name, either language
pub const MAX_ATTRIBUTE_NAME_LENGTH: usize = 100;

pub(crate) const ATTRIBUTE_COLUMNS: &str =
    r#"id, name_en, name_ar, "order", created_at, updated_at"#;
