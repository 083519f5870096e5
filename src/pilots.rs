use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

/// Personal details of the logbook's pilot. Exactly zero or one per logbook.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::pilots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Pilot {
    pub id: i32,
    pub logbook_id: i32,
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_or_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub email_address: Option<String>,
    pub home_phone_number: Option<String>,
    pub cell_phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::pilots, treat_none_as_null = true)]
pub struct PilotRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_or_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub email_address: Option<String>,
    pub home_phone_number: Option<String>,
    pub cell_phone_number: Option<String>,
}

impl Validate for PilotRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(email) = &self.email_address {
            validation::required("email_address", email)?;
            if !email.contains('@') {
                return Err("email_address must be an email address".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pilots)]
pub struct NewPilot {
    pub logbook_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: PilotRequest,
}

impl NewPilot {
    pub fn new(user_id: &str, logbook_id: i32, fields: PilotRequest) -> Self {
        Self {
            logbook_id,
            user_id: Some(user_id.to_string()),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_must_look_like_an_address() {
        let mut request = PilotRequest {
            email_address: Some("pilot@example.com".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        request.email_address = Some("not-an-email".to_string());
        assert!(request.validate().is_err());

        request.email_address = None;
        assert!(request.validate().is_ok());
    }
}
