use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use super::repo_types::{Meal, NewMeal};

/// Persistence for synced meals.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Insert or overwrite the row sharing `meal`'s `(date, type, name)`.
    /// Stamps `updated_at` with the current time.
    async fn upsert(&self, meal: &NewMeal) -> anyhow::Result<()>;

    /// All meals ordered by date, newest first. `from` keeps dates on or after it.
    async fn list(&self, from: Option<Date>) -> anyhow::Result<Vec<Meal>>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn upsert(&self, meal: &NewMeal) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meals (date, type, name, price, database_source,
                               order_end_time, is_ordered, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6::timestamp, $7, now())
            ON CONFLICT (date, type, name) DO UPDATE
               SET price           = EXCLUDED.price,
                   database_source = EXCLUDED.database_source,
                   order_end_time  = EXCLUDED.order_end_time,
                   is_ordered      = EXCLUDED.is_ordered,
                   updated_at      = EXCLUDED.updated_at
            "#,
        )
        .bind(meal.date)
        .bind(&meal.meal_type)
        .bind(&meal.name)
        .bind(meal.price)
        .bind(&meal.database_source)
        .bind(meal.order_end_time.as_deref())
        .bind(meal.is_ordered)
        .execute(&self.db)
        .await
        .with_context(|| format!("upsert meal {} ({}, {})", meal.name, meal.date, meal.meal_type))?;
        Ok(())
    }

    async fn list(&self, from: Option<Date>) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, date, type, name, price, database_source,
                   to_char(order_end_time, 'YYYY-MM-DD"T"HH24:MI:SS') AS order_end_time,
                   is_ordered, updated_at
              FROM meals
             WHERE $1::date IS NULL OR date >= $1
             ORDER BY date DESC, type ASC, name ASC
            "#,
        )
        .bind(from)
        .fetch_all(&self.db)
        .await
        .context("list meals")?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) use memory::InMemoryMealStore;
