use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

/// A pilot's top-level record container, owned by one user
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::logbooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Logbook {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-editable logbook fields. Used for both create and full update.
#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::logbooks, treat_none_as_null = true)]
pub struct LogbookRequest {
    pub title: String,
    pub remarks: Option<String>,
}

impl Validate for LogbookRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required("title", &self.title)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::logbooks)]
pub struct NewLogbook {
    pub user_id: String,
    #[diesel(embed)]
    pub fields: LogbookRequest,
}

impl NewLogbook {
    pub fn new(user_id: &str, fields: LogbookRequest) -> Self {
        Self {
            user_id: user_id.to_string(),
            fields,
        }
    }
}
