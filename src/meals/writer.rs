use serde::Serialize;
use tracing::{error, warn};

use super::repo::MealStore;
use super::repo_types::NewMeal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub written: usize,
    pub total: usize,
    pub failed: usize,
}

/// Write meals one row at a time, in order. A failed row is logged and
/// counted and the remaining rows are still written.
pub async fn upsert_all(store: &dyn MealStore, meals: &[NewMeal]) -> SyncSummary {
    let mut summary = SyncSummary {
        total: meals.len(),
        ..SyncSummary::default()
    };

    for meal in meals {
        match store.upsert(meal).await {
            Ok(()) => summary.written += 1,
            Err(e) => {
                summary.failed += 1;
                error!(
                    error = %format!("{e:#}"),
                    name = %meal.name,
                    date = %meal.date,
                    meal_type = %meal.meal_type,
                    "failed to upsert meal"
                );
            }
        }
    }

    if summary.failed > 0 {
        warn!(failed = summary.failed, total = summary.total, "some meals failed to save");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo::InMemoryMealStore;
    use rust_decimal::Decimal;
    use time::macros::date;

    fn meal(name: &str) -> NewMeal {
        NewMeal {
            date: date!(2025 - 03 - 25),
            meal_type: "1".into(),
            name: name.into(),
            price: Decimal::new(5400, 2),
            database_source: "S4".into(),
            order_end_time: None,
            is_ordered: false,
        }
    }

    #[tokio::test]
    async fn one_failing_row_does_not_stop_the_rest() {
        let store = InMemoryMealStore::failing_on(&["Řízek"]);
        let meals = [meal("Guláš"), meal("Řízek"), meal("Rizoto")];

        let summary = upsert_all(&store, &meals).await;

        assert_eq!(summary, SyncSummary { written: 2, total: 3, failed: 1 });
        let mut stored: Vec<String> = store.rows().into_iter().map(|m| m.name).collect();
        stored.sort();
        assert_eq!(stored, ["Guláš", "Rizoto"]);
    }

    #[tokio::test]
    async fn same_natural_key_overwrites_in_place() {
        let store = InMemoryMealStore::default();
        let first = meal("Guláš");
        let second = NewMeal {
            price: Decimal::new(6000, 2),
            is_ordered: true,
            ..meal("Guláš")
        };

        upsert_all(&store, &[first]).await;
        let summary = upsert_all(&store, &[second]).await;

        assert_eq!(summary, SyncSummary { written: 1, total: 1, failed: 0 });
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, Decimal::new(6000, 2));
        assert!(rows[0].is_ordered);
    }

    #[tokio::test]
    async fn nothing_to_write_is_an_empty_summary() {
        let store = InMemoryMealStore::default();
        assert_eq!(upsert_all(&store, &[]).await, SyncSummary::default());
    }
}
