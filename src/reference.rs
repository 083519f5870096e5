//! Read-only lookup tables. Rows are inserted by the seeder and never changed
//! through the API.

use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::approach_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApproachType {
    pub id: i32,
    pub label: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::certificate_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CertificateType {
    pub id: i32,
    pub label: String,
    pub sort_order: i32,
}

/// A kind of currency the pilot can track, and how it is calculated
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::currency_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CurrencyType {
    pub id: i32,
    pub label: String,
    pub abbreviation: Option<String>,
    pub category: String,
    /// Restricts qualifying flights to this aircraft category; `None` matches any
    pub aircraft_category: Option<String>,
    /// Restricts qualifying flights to this aircraft class; `None` matches any
    pub aircraft_class: Option<String>,
    /// See [`crate::currencies::CurrencyCalculation`]
    pub calculation_type: i32,
    pub requires_tailwheel: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::endorsement_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EndorsementType {
    pub id: i32,
    pub category: String,
    pub label: String,
    pub template: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::engine_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EngineType {
    pub id: i32,
    pub label: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::gear_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GearType {
    pub id: i32,
    pub label: String,
    pub abbreviation: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::rating_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RatingType {
    pub id: i32,
    pub label: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::categories_and_classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryAndClass {
    pub id: i32,
    pub aircraft_category: String,
    pub aircraft_class: String,
    pub label: String,
    pub abbreviation: Option<String>,
}
