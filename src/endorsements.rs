use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

/// An instructor endorsement, usually filled in from an endorsement type template
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::endorsements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Endorsement {
    pub id: i32,
    pub logbook_id: i32,
    pub user_id: Option<String>,
    pub endorsement_date: NaiveDate,
    pub title: String,
    pub text: String,
    pub cfi_name: Option<String>,
    pub cfi_number: Option<String>,
    pub cfi_expiration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::endorsements, treat_none_as_null = true)]
pub struct EndorsementRequest {
    pub endorsement_date: NaiveDate,
    pub title: String,
    pub text: String,
    pub cfi_name: Option<String>,
    pub cfi_number: Option<String>,
    pub cfi_expiration: Option<String>,
}

impl Validate for EndorsementRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required("title", &self.title)?;
        validation::required("text", &self.text)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::endorsements)]
pub struct NewEndorsement {
    pub logbook_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: EndorsementRequest,
}

impl NewEndorsement {
    pub fn new(user_id: &str, logbook_id: i32, fields: EndorsementRequest) -> Self {
        Self {
            logbook_id,
            user_id: Some(user_id.to_string()),
            fields,
        }
    }
}
