pub mod actions;
pub mod aircraft;
pub mod aircraft_repo;
pub mod approaches;
pub mod approaches_repo;
pub mod auth;
pub mod certificates;
pub mod certificates_repo;
pub mod currencies;
pub mod currencies_repo;
pub mod endorsements;
pub mod endorsements_repo;
pub mod flights;
pub mod flights_repo;
pub mod log_format;
pub mod logbooks;
pub mod logbooks_repo;
pub mod metrics;
pub mod migrations;
pub mod pilots;
pub mod pilots_repo;
pub mod ratings;
pub mod ratings_repo;
pub mod reference;
pub mod reference_repo;
pub mod schema;
pub mod seed;
pub mod settings;
pub mod validation;
pub mod web;
