use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate};

pub const MAX_IDENTIFIER_LEN: usize = 10;
pub const MAX_TYPE_LEN: usize = 10;

/// An aircraft the pilot has logged time in
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::aircraft)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Aircraft {
    pub id: i32,
    pub logbook_id: i32,
    pub user_id: Option<String>,
    /// Registration / tail number, e.g. "N12345"
    pub aircraft_identifier: String,
    /// ICAO type designator, e.g. "C172"
    pub aircraft_type: String,
    pub aircraft_make: Option<String>,
    pub aircraft_model: Option<String>,
    pub aircraft_year: i32,
    pub aircraft_category: Option<String>,
    pub aircraft_class: Option<String>,
    pub engine_type: Option<String>,
    pub gear_type: Option<String>,
    pub is_complex: bool,
    pub is_high_performance: bool,
    pub is_pressurized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether the gear type is a conventional (tailwheel) configuration.
/// Accepts both gear type labels and their abbreviations ("FC", "RC").
pub fn is_tailwheel_gear(gear_type: &str) -> bool {
    let gear = gear_type.trim().to_ascii_lowercase();
    gear == "fc" || gear == "rc" || gear.contains("tailwheel") || gear.contains("conventional")
}

#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::aircraft, treat_none_as_null = true)]
pub struct AircraftRequest {
    pub aircraft_identifier: String,
    pub aircraft_type: String,
    pub aircraft_make: Option<String>,
    pub aircraft_model: Option<String>,
    pub aircraft_year: i32,
    pub aircraft_category: Option<String>,
    pub aircraft_class: Option<String>,
    pub engine_type: Option<String>,
    pub gear_type: Option<String>,
    #[serde(default)]
    pub is_complex: bool,
    #[serde(default)]
    pub is_high_performance: bool,
    #[serde(default)]
    pub is_pressurized: bool,
}

impl Validate for AircraftRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required_max_length(
            "aircraft_identifier",
            &self.aircraft_identifier,
            MAX_IDENTIFIER_LEN,
        )?;
        validation::required_max_length("aircraft_type", &self.aircraft_type, MAX_TYPE_LEN)?;
        validation::non_negative("aircraft_year", self.aircraft_year)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::aircraft)]
pub struct NewAircraft {
    pub logbook_id: i32,
    pub user_id: Option<String>,
    #[diesel(embed)]
    pub fields: AircraftRequest,
}

impl NewAircraft {
    pub fn new(user_id: &str, logbook_id: i32, fields: AircraftRequest) -> Self {
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

    fn request() -> AircraftRequest {
        AircraftRequest {
            aircraft_identifier: "N12345".to_string(),
            aircraft_type: "C172".to_string(),
            aircraft_make: Some("Cessna".to_string()),
            aircraft_model: Some("172S".to_string()),
            aircraft_year: 2004,
            aircraft_category: Some("Airplane".to_string()),
            aircraft_class: Some("Single-Engine Land".to_string()),
            engine_type: Some("Reciprocating".to_string()),
            gear_type: Some("Fixed Tricycle".to_string()),
            is_complex: false,
            is_high_performance: false,
            is_pressurized: false,
        }
    }

    #[test]
    fn test_tailwheel_detection() {
        assert!(is_tailwheel_gear("Fixed Tailwheel"));
        assert!(is_tailwheel_gear("RC"));
        assert!(is_tailwheel_gear("conventional"));
        assert!(!is_tailwheel_gear("Fixed Tricycle"));
        assert!(!is_tailwheel_gear("FT"));
    }

    #[test]
    fn test_identifier_length_is_enforced() {
        assert!(request().validate().is_ok());

        let mut long = request();
        long.aircraft_identifier = "N123456789X".to_string();
        assert!(long.validate().is_err());

        let mut missing = request();
        missing.aircraft_type = String::new();
        assert!(missing.validate().is_err());
    }
}
