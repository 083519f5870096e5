use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

pub const MAX_CERTIFICATE_TYPE_LEN: usize = 50;
pub const MAX_CERTIFICATE_NUMBER_LEN: usize = 20;

/// A pilot or medical certificate held by the logbook's pilot
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::certificates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Certificate {
    pub id: i32,
    pub logbook_id: i32,
    pub user_id: Option<String>,
    pub certificate_type: String,
    pub certificate_number: String,
    pub certificate_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::certificates, treat_none_as_null = true)]
pub struct CertificateRequest {
    pub certificate_type: String,
    pub certificate_number: String,
    pub certificate_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

impl Validate for CertificateRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required_max_length(
            "certificate_type",
            &self.certificate_type,
            MAX_CERTIFICATE_TYPE_LEN,
        )?;
        validation::required_max_length(
            "certificate_number",
            &self.certificate_number,
            MAX_CERTIFICATE_NUMBER_LEN,
        )?;
        if let Some(expiration) = self.expiration_date
            && expiration < self.certificate_date
        {
            return Err("expiration_date must not be before certificate_date".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::certificates)]
pub struct NewCertificate {
    pub logbook_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: CertificateRequest,
}

impl NewCertificate {
    pub fn new(user_id: &str, logbook_id: i32, fields: CertificateRequest) -> Self {
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> CertificateRequest {
        CertificateRequest {
            certificate_type: "Private Pilot".to_string(),
            certificate_number: "3456789".to_string(),
            certificate_date: date(2015, 6, 1),
            expiration_date: None,
            remarks: None,
        }
    }

    #[test]
    fn test_certificate_validation() {
        assert!(request().validate().is_ok());

        let mut long_number = request();
        long_number.certificate_number = "1".repeat(21);
        assert!(long_number.validate().is_err());

        let mut backwards = request();
        backwards.expiration_date = Some(date(2014, 1, 1));
        assert!(backwards.validate().is_err());
    }
}
