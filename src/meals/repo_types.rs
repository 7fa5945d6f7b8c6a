use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Meal {
    pub id: i64,
    pub date: Date,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub meal_type: String,                  // slot code, "P" is soup
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub database_source: String,
    pub order_end_time: Option<String>,     // vendor format, no offset
    pub is_ordered: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated meal ready for upsert. `(date, meal_type, name)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub date: Date,
    pub meal_type: String,
    pub name: String,
    pub price: Decimal,
    pub database_source: String,
    pub order_end_time: Option<String>,
    pub is_ordered: bool,
}
