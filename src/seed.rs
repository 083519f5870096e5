//! Reference data inserted at startup.
//!
//! Every lookup table has a unique `label`; rows are inserted with
//! `ON CONFLICT (label) DO NOTHING`, so seeding is idempotent and never touches
//! rows an operator has edited.

use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::prelude::*;
use tracing::info;

use crate::currencies::CurrencyCalculation;
use crate::web::PgPool;

pub const APPROACH_TYPES: &[&str] = &[
    "ILS",
    "ILS PRM",
    "LOC",
    "LOC BC",
    "LDA",
    "SDF",
    "VOR",
    "VOR/DME",
    "NDB",
    "RNAV (GPS)",
    "RNAV (RNP)",
    "GLS",
    "GCA",
    "PAR",
    "ASR",
    "Contact",
    "Visual",
];

pub const CERTIFICATE_TYPES: &[&str] = &[
    "Student Pilot",
    "Sport Pilot",
    "Recreational Pilot",
    "Private Pilot",
    "Commercial Pilot",
    "Airline Transport Pilot",
    "Flight Instructor",
    "Ground Instructor",
    "Remote Pilot",
    "First Class Medical",
    "Second Class Medical",
    "Third Class Medical",
    "BasicMed",
];

pub const ENGINE_TYPES: &[&str] = &[
    "Reciprocating",
    "Turbo-prop",
    "Turbo-shaft",
    "Turbo-jet",
    "Turbo-fan",
    "Electric",
    "None",
];

/// (label, abbreviation)
pub const GEAR_TYPES: &[(&str, &str)] = &[
    ("Fixed Tricycle", "FT"),
    ("Fixed Tailwheel", "FC"),
    ("Retractable Tricycle", "RT"),
    ("Retractable Tailwheel", "RC"),
    ("Amphibian", "AM"),
    ("Floats", "FL"),
    ("Skids", "SK"),
    ("Skis", "SS"),
];

pub const RATING_TYPES: &[&str] = &[
    "Airplane Single-Engine Land",
    "Airplane Single-Engine Sea",
    "Airplane Multi-Engine Land",
    "Airplane Multi-Engine Sea",
    "Rotorcraft Helicopter",
    "Rotorcraft Gyroplane",
    "Glider",
    "Lighter-Than-Air Airship",
    "Lighter-Than-Air Balloon",
    "Powered Lift",
    "Instrument Airplane",
    "Instrument Helicopter",
    "Instrument Powered Lift",
    "Type Rating",
];

/// (category, class, label, abbreviation)
pub const CATEGORIES_AND_CLASSES: &[(&str, &str, &str, &str)] = &[
    ("Airplane", "Single-Engine Land", "Airplane Single-Engine Land", "ASEL"),
    ("Airplane", "Multi-Engine Land", "Airplane Multi-Engine Land", "AMEL"),
    ("Airplane", "Single-Engine Sea", "Airplane Single-Engine Sea", "ASES"),
    ("Airplane", "Multi-Engine Sea", "Airplane Multi-Engine Sea", "AMES"),
    ("Rotorcraft", "Helicopter", "Rotorcraft Helicopter", "RH"),
    ("Rotorcraft", "Gyroplane", "Rotorcraft Gyroplane", "RG"),
    ("Glider", "Glider", "Glider", "GL"),
    ("Lighter-Than-Air", "Airship", "Lighter-Than-Air Airship", "LA"),
    ("Lighter-Than-Air", "Balloon", "Lighter-Than-Air Balloon", "LB"),
    ("Powered Lift", "Powered Lift", "Powered Lift", "PL"),
];

pub struct CurrencyTypeSeed {
    pub label: &'static str,
    pub abbreviation: &'static str,
    pub category: &'static str,
    pub aircraft_category: Option<&'static str>,
    pub aircraft_class: Option<&'static str>,
    pub calculation: CurrencyCalculation,
    pub requires_tailwheel: bool,
}

pub const CURRENCY_TYPES: &[CurrencyTypeSeed] = &[
    CurrencyTypeSeed {
        label: "Passenger Carrying (Airplane Single-Engine Land)",
        abbreviation: "ASEL",
        category: "Passenger Carrying",
        aircraft_category: Some("Airplane"),
        aircraft_class: Some("Single-Engine Land"),
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Passenger Carrying (Airplane Single-Engine Land, Tailwheel)",
        abbreviation: "ASEL-TW",
        category: "Passenger Carrying",
        aircraft_category: Some("Airplane"),
        aircraft_class: Some("Single-Engine Land"),
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: true,
    },
    CurrencyTypeSeed {
        label: "Passenger Carrying (Airplane Multi-Engine Land)",
        abbreviation: "AMEL",
        category: "Passenger Carrying",
        aircraft_category: Some("Airplane"),
        aircraft_class: Some("Multi-Engine Land"),
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Passenger Carrying (Airplane Single-Engine Sea)",
        abbreviation: "ASES",
        category: "Passenger Carrying",
        aircraft_category: Some("Airplane"),
        aircraft_class: Some("Single-Engine Sea"),
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Passenger Carrying (Rotorcraft Helicopter)",
        abbreviation: "RH",
        category: "Passenger Carrying",
        aircraft_category: Some("Rotorcraft"),
        aircraft_class: Some("Helicopter"),
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Passenger Carrying (Glider)",
        abbreviation: "GL",
        category: "Passenger Carrying",
        aircraft_category: Some("Glider"),
        aircraft_class: None,
        calculation: CurrencyCalculation::Passenger,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Instrument (Airplane)",
        abbreviation: "IFR-A",
        category: "Instrument",
        aircraft_category: Some("Airplane"),
        aircraft_class: None,
        calculation: CurrencyCalculation::Instrument,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Instrument (Helicopter)",
        abbreviation: "IFR-H",
        category: "Instrument",
        aircraft_category: Some("Rotorcraft"),
        aircraft_class: Some("Helicopter"),
        calculation: CurrencyCalculation::Instrument,
        requires_tailwheel: false,
    },
    CurrencyTypeSeed {
        label: "Flight Review",
        abbreviation: "BFR",
        category: "Flight Review",
        aircraft_category: None,
        aircraft_class: None,
        calculation: CurrencyCalculation::FlightReview,
        requires_tailwheel: false,
    },
];

/// (category, label, template)
pub const ENDORSEMENT_TYPES: &[(&str, &str, &str)] = &[
    (
        "Student Pilot",
        "Pre-solo aeronautical knowledge",
        "I certify that [First name, MI, Last name] has satisfactorily completed the pre-solo knowledge test of § 61.87(b) for the [make and model] aircraft.",
    ),
    (
        "Student Pilot",
        "Pre-solo flight training",
        "I certify that [First name, MI, Last name] has received and logged pre-solo flight training for the maneuvers and procedures that are appropriate to the [make and model] aircraft. I have determined he or she has demonstrated satisfactory proficiency and safety on the maneuvers and procedures required by § 61.87 in this or similar make and model of aircraft to be flown.",
    ),
    (
        "Student Pilot",
        "Solo flight (first 90-day period)",
        "I certify that [First name, MI, Last name] has received the required training to qualify for solo flying. I have determined he or she meets the applicable requirements of § 61.87(n) and is proficient to make solo flights in [make and model].",
    ),
    (
        "Student Pilot",
        "Solo cross-country flight",
        "I certify that [First name, MI, Last name] has received the required solo cross-country training. I find he or she has met the applicable requirements of § 61.93, and is proficient to make solo cross-country flights in a [make and model] aircraft, [aircraft category].",
    ),
    (
        "Knowledge Test",
        "Private pilot aeronautical knowledge test",
        "I certify that [First name, MI, Last name] has received the required training in accordance with § 61.105. I have determined he or she is prepared for the [name of] knowledge test.",
    ),
    (
        "Practical Test",
        "Flight proficiency / practical test",
        "I certify that [First name, MI, Last name] has received the required training in accordance with §§ 61.107 and 61.109. I have determined he or she is prepared for the [name of] practical test.",
    ),
    (
        "Additional Endorsements",
        "Complex airplane",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has received the required training of § 61.31(e) in a [make and model of complex airplane]. I have determined that he or she is proficient in the operation and systems of a complex airplane.",
    ),
    (
        "Additional Endorsements",
        "High-performance airplane",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has received the required training of § 61.31(f) in a [make and model of high-performance airplane]. I have determined that he or she is proficient in the operation and systems of a high-performance airplane.",
    ),
    (
        "Additional Endorsements",
        "Pressurized aircraft",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has received the required training of § 61.31(g) in a [make and model of pressurized aircraft]. I have determined that he or she is proficient in the operation and systems of a pressurized aircraft.",
    ),
    (
        "Additional Endorsements",
        "Tailwheel airplane",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has received the required training of § 61.31(i) in a [make and model of tailwheel airplane]. I have determined that he or she is proficient in the operation of a tailwheel airplane.",
    ),
    (
        "Recurrent",
        "Flight review",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has satisfactorily completed a flight review of § 61.56(a) on [date].",
    ),
    (
        "Recurrent",
        "Instrument proficiency check",
        "I certify that [First name, MI, Last name], [grade of pilot certificate], [certificate number], has satisfactorily completed the instrument proficiency check of § 61.57(d) in a [list make and model of aircraft] on [date].",
    ),
];

fn position(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

/// Insert any missing reference rows. Returns the number of rows inserted.
pub fn seed_reference_data(conn: &mut PgConnection) -> Result<usize> {
    conn.transaction::<usize, anyhow::Error, _>(|conn| {
        let mut inserted = 0;

        {
            use crate::schema::approach_types::dsl::*;
            let rows: Vec<_> = APPROACH_TYPES
                .iter()
                .enumerate()
                .map(|(i, name)| (label.eq(*name), sort_order.eq(position(i))))
                .collect();
            inserted += diesel::insert_into(approach_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed approach types")?;
        }

        {
            use crate::schema::certificate_types::dsl::*;
            let rows: Vec<_> = CERTIFICATE_TYPES
                .iter()
                .enumerate()
                .map(|(i, name)| (label.eq(*name), sort_order.eq(position(i))))
                .collect();
            inserted += diesel::insert_into(certificate_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed certificate types")?;
        }

        {
            use crate::schema::engine_types::dsl::*;
            let rows: Vec<_> = ENGINE_TYPES
                .iter()
                .enumerate()
                .map(|(i, name)| (label.eq(*name), sort_order.eq(position(i))))
                .collect();
            inserted += diesel::insert_into(engine_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed engine types")?;
        }

        {
            use crate::schema::gear_types::dsl::*;
            let rows: Vec<_> = GEAR_TYPES
                .iter()
                .enumerate()
                .map(|(i, (name, abbrev))| {
                    (
                        label.eq(*name),
                        abbreviation.eq(Some(*abbrev)),
                        sort_order.eq(position(i)),
                    )
                })
                .collect();
            inserted += diesel::insert_into(gear_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed gear types")?;
        }

        {
            use crate::schema::rating_types::dsl::*;
            let rows: Vec<_> = RATING_TYPES
                .iter()
                .enumerate()
                .map(|(i, name)| (label.eq(*name), sort_order.eq(position(i))))
                .collect();
            inserted += diesel::insert_into(rating_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed rating types")?;
        }

        {
            use crate::schema::categories_and_classes::dsl::*;
            let rows: Vec<_> = CATEGORIES_AND_CLASSES
                .iter()
                .map(|(category, class, name, abbrev)| {
                    (
                        aircraft_category.eq(*category),
                        aircraft_class.eq(*class),
                        label.eq(*name),
                        abbreviation.eq(Some(*abbrev)),
                    )
                })
                .collect();
            inserted += diesel::insert_into(categories_and_classes)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed categories and classes")?;
        }

        {
            use crate::schema::currency_types::dsl::*;
            let rows: Vec<_> = CURRENCY_TYPES
                .iter()
                .enumerate()
                .map(|(i, seed)| {
                    (
                        label.eq(seed.label),
                        abbreviation.eq(Some(seed.abbreviation)),
                        category.eq(seed.category),
                        aircraft_category.eq(seed.aircraft_category),
                        aircraft_class.eq(seed.aircraft_class),
                        calculation_type.eq(i32::from(seed.calculation)),
                        requires_tailwheel.eq(seed.requires_tailwheel),
                        sort_order.eq(position(i)),
                    )
                })
                .collect();
            inserted += diesel::insert_into(currency_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed currency types")?;
        }

        {
            use crate::schema::endorsement_types::dsl::*;
            let rows: Vec<_> = ENDORSEMENT_TYPES
                .iter()
                .enumerate()
                .map(|(i, (group, name, text))| {
                    (
                        category.eq(*group),
                        label.eq(*name),
                        template.eq(*text),
                        sort_order.eq(position(i)),
                    )
                })
                .collect();
            inserted += diesel::insert_into(endorsement_types)
                .values(rows)
                .on_conflict(label)
                .do_nothing()
                .execute(conn)
                .context("Failed to seed endorsement types")?;
        }

        Ok(inserted)
    })
}

/// Seed reference data using a pooled connection on the blocking thread pool
pub async fn ensure_seed_data(pool: &PgPool) -> Result<usize> {
    let pool = pool.clone();

    let inserted = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .context("Failed to get database connection for seeding")?;
        seed_reference_data(&mut conn)
    })
    .await??;

    if inserted > 0 {
        info!("Seeded {} reference rows", inserted);
    } else {
        info!("Reference data already present");
    }

    Ok(inserted)
}
