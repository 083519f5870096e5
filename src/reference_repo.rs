use anyhow::Result;
use diesel::PgConnection;
use diesel::prelude::*;

use crate::reference::{
    ApproachType, CategoryAndClass, CertificateType, CurrencyType, EndorsementType, EngineType,
    GearType, RatingType,
};
use crate::web::PgPool;

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: PgPool,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            Ok::<T, anyhow::Error>(query(&mut conn)?)
        })
        .await??;

        Ok(result)
    }

    pub async fn approach_types(&self) -> Result<Vec<ApproachType>> {
        use crate::schema::approach_types::dsl::*;

        self.load(|conn| {
            approach_types
                .order((sort_order.asc(), label.asc()))
                .select(ApproachType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn certificate_types(&self) -> Result<Vec<CertificateType>> {
        use crate::schema::certificate_types::dsl::*;

        self.load(|conn| {
            certificate_types
                .order((sort_order.asc(), label.asc()))
                .select(CertificateType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn currency_types(&self) -> Result<Vec<CurrencyType>> {
        use crate::schema::currency_types::dsl::*;

        self.load(|conn| {
            currency_types
                .order((sort_order.asc(), label.asc()))
                .select(CurrencyType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn get_currency_type(&self, currency_type_id: i32) -> Result<Option<CurrencyType>> {
        use crate::schema::currency_types::dsl::*;

        self.load(move |conn| {
            currency_types
                .filter(id.eq(currency_type_id))
                .select(CurrencyType::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    pub async fn endorsement_types(&self) -> Result<Vec<EndorsementType>> {
        use crate::schema::endorsement_types::dsl::*;

        self.load(|conn| {
            endorsement_types
                .order((sort_order.asc(), label.asc()))
                .select(EndorsementType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn engine_types(&self) -> Result<Vec<EngineType>> {
        use crate::schema::engine_types::dsl::*;

        self.load(|conn| {
            engine_types
                .order((sort_order.asc(), label.asc()))
                .select(EngineType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn gear_types(&self) -> Result<Vec<GearType>> {
        use crate::schema::gear_types::dsl::*;

        self.load(|conn| {
            gear_types
                .order((sort_order.asc(), label.asc()))
                .select(GearType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn rating_types(&self) -> Result<Vec<RatingType>> {
        use crate::schema::rating_types::dsl::*;

        self.load(|conn| {
            rating_types
                .order((sort_order.asc(), label.asc()))
                .select(RatingType::as_select())
                .load(conn)
        })
        .await
    }

    pub async fn categories_and_classes(&self) -> Result<Vec<CategoryAndClass>> {
        use crate::schema::categories_and_classes::dsl::*;

        self.load(|conn| {
            categories_and_classes
                .order(id.asc())
                .select(CategoryAndClass::as_select())
                .load(conn)
        })
        .await
    }
}
