use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

pub const MAX_RATING_TYPE_LEN: usize = 50;

/// A rating attached to a certificate, e.g. "Instrument Airplane"
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rating {
    pub id: i32,
    pub certificate_id: i32,
    pub user_id: Option<String>,
    pub rating_type: String,
    pub rating_date: NaiveDate,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::ratings, treat_none_as_null = true)]
pub struct RatingRequest {
    pub rating_type: String,
    pub rating_date: NaiveDate,
    pub remarks: Option<String>,
}

impl Validate for RatingRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required_max_length("rating_type", &self.rating_type, MAX_RATING_TYPE_LEN)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::ratings)]
pub struct NewRating {
    pub certificate_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: RatingRequest,
}

impl NewRating {
    pub fn new(user_id: &str, certificate_id: i32, fields: RatingRequest) -> Self {
        Self {
            certificate_id,
            user_id: Some(user_id.to_string()),
            fields,
        }
    }
}
