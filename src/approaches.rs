use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

/// An instrument approach flown during a flight
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::approaches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Approach {
    pub id: i32,
    pub flight_id: i32,
    pub user_id: Option<String>,
    pub airport_code: String,
    pub approach_type: String,
    pub runway: String,
    pub is_circle_to_land: bool,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::approaches, treat_none_as_null = true)]
pub struct ApproachRequest {
    pub airport_code: String,
    pub approach_type: String,
    pub runway: String,
    #[serde(default)]
    pub is_circle_to_land: bool,
    pub remarks: Option<String>,
}

impl Validate for ApproachRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required("airport_code", &self.airport_code)?;
        validation::required("approach_type", &self.approach_type)?;
        validation::required("runway", &self.runway)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::approaches)]
pub struct NewApproach {
    pub flight_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: ApproachRequest,
}

impl NewApproach {
    pub fn new(user_id: &str, flight_id: i32, fields: ApproachRequest) -> Self {
        Self {
            flight_id,
            user_id: Some(user_id.to_string()),
            fields,
        }
    }
}
