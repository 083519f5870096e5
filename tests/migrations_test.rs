mod common;

use common::TestDatabase;
use flightbook::migrations;
use flightbook::reference_repo::ReferenceRepository;
use flightbook::seed;

#[tokio::test]
async fn test_migrated_database_is_complete() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let pool = test_db.pool();

    // Already migrated by TestDatabase, so nothing is left to apply
    let applied = migrations::run_pending_migrations(&pool).await.unwrap();
    assert!(applied.is_empty());
    migrations::verify_migrations(&pool).await.unwrap();

    let mut conn = pool.get().unwrap();
    assert!(migrations::all_migrations_applied(&mut conn).unwrap());
    assert!(migrations::pending_versions(&mut conn).unwrap().is_empty());

    let mut applied = migrations::applied_versions(&mut conn).unwrap();
    applied.sort();
    assert_eq!(applied, migrations::known_versions().unwrap());
}

#[tokio::test]
async fn test_removed_migration_record_makes_schema_incomplete() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let pool = test_db.pool();

    {
        use diesel::RunQueryDsl;
        let mut conn = pool.get().unwrap();
        diesel::sql_query(
            "DELETE FROM __diesel_schema_migrations WHERE version = '20160702014946'",
        )
        .execute(&mut conn)
        .unwrap();

        assert!(!migrations::all_migrations_applied(&mut conn).unwrap());
        assert_eq!(
            migrations::pending_versions(&mut conn).unwrap(),
            vec!["20160702014946".to_string()]
        );
    }

    assert!(migrations::verify_migrations(&pool).await.is_err());
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let pool = test_db.pool();

    let first = seed::ensure_seed_data(&pool).await.unwrap();
    assert!(first > 0);
    let second = seed::ensure_seed_data(&pool).await.unwrap();
    assert_eq!(second, 0);

    let reference = ReferenceRepository::new(pool.clone());
    let gear_types = reference.gear_types().await.unwrap();
    assert_eq!(gear_types.len(), seed::GEAR_TYPES.len());
    assert!(
        gear_types
            .windows(2)
            .all(|pair| pair[0].sort_order <= pair[1].sort_order)
    );
    assert_eq!(
        reference.currency_types().await.unwrap().len(),
        seed::CURRENCY_TYPES.len()
    );
}
