use anyhow::Result;
use diesel::prelude::*;

use crate::currencies::{Currency, CurrencyStatus, NewCurrency};
use crate::reference::CurrencyType;
use crate::web::PgPool;

#[derive(Clone)]
pub struct CurrenciesRepository {
    pool: PgPool,
}

impl CurrenciesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Currencies tracked in a logbook together with their types, in type order
    pub async fn list_with_types(
        &self,
        owner: &str,
        logbook_id: i32,
    ) -> Result<Vec<(Currency, CurrencyType)>> {
        use crate::schema::{currencies, currency_types};

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<(Currency, CurrencyType)> = currencies::table
                .inner_join(currency_types::table)
                .filter(currencies::logbook_id.eq(logbook_id))
                .filter(currencies::user_id.eq(owner))
                .order((currency_types::sort_order.asc(), currencies::id.asc()))
                .select((Currency::as_select(), CurrencyType::as_select()))
                .load(&mut conn)?;

            Ok::<Vec<(Currency, CurrencyType)>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn create(&self, new_currency: NewCurrency) -> Result<Currency> {
        use crate::schema::currencies;

        let pool = self.pool.clone();

        let created = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::insert_into(currencies::table)
                .values(&new_currency)
                .returning(Currency::as_returning())
                .get_result(&mut conn)?;

            Ok::<Currency, anyhow::Error>(row)
        })
        .await??;

        Ok(created)
    }

    /// Persist a recomputed status. Only writes when something changed.
    pub async fn update_status(&self, currency: &Currency, status: CurrencyStatus) -> Result<Currency> {
        use crate::schema::currencies;

        if currency.days_remaining == status.days_remaining && currency.is_current == status.is_current {
            return Ok(currency.clone());
        }

        let pool = self.pool.clone();
        let currency_id = currency.id;

        let updated = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let row = diesel::update(currencies::table.filter(currencies::id.eq(currency_id)))
                .set((
                    currencies::days_remaining.eq(status.days_remaining),
                    currencies::is_current.eq(status.is_current),
                ))
                .returning(Currency::as_returning())
                .get_result(&mut conn)?;

            Ok::<Currency, anyhow::Error>(row)
        })
        .await??;

        Ok(updated)
    }

    pub async fn delete(&self, owner: &str, logbook_id: i32, currency_id: i32) -> Result<bool> {
        use crate::schema::currencies;

        let pool = self.pool.clone();
        let owner = owner.to_string();

        let rows_affected = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                currencies::table
                    .filter(currencies::id.eq(currency_id))
                    .filter(currencies::logbook_id.eq(logbook_id))
                    .filter(currencies::user_id.eq(owner)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows_affected > 0)
    }
}
