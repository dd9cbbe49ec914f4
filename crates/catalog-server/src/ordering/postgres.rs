//! PostgreSQL [`OrderStore`]

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;

use super::{Collection, OrderAssignment, OrderStore, OrderedItem, OrderingError};

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn max_order(&self, collection: Collection) -> Result<i32, OrderingError> {
        let sql = format!(
            r#"SELECT COALESCE(MAX("order"), 0) FROM {}"#,
            collection.table()
        );
        let max = sqlx::query_scalar::<_, i32>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    async fn existing_ids(
        &self,
        collection: Collection,
        ids: &[i32],
    ) -> Result<Vec<i32>, OrderingError> {
        let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", collection.table());
        let existing = sqlx::query_scalar::<_, i32>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(existing)
    }

    #[tracing::instrument(skip(self, batch), fields(collection = %collection, batch_len = batch.len()))]
    async fn apply_reorder(
        &self,
        collection: Collection,
        batch: &[OrderAssignment],
    ) -> Result<(), OrderingError> {
        let table = collection.table();
        let ids: Vec<i32> = batch.iter().map(|item| item.id).collect();
        let orders: Vec<i32> = batch.iter().map(|item| item.order).collect();

        let mut tx = self.pool.begin().await.map_err(OrderingError::from_reorder)?;

        // Serializes reorders of this collection across service instances
        // until commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(collection.lock_key())
            .execute(&mut *tx)
            .await
            .map_err(OrderingError::from_reorder)?;

        // A row may have been deleted between validation and the lock.
        let locked: Vec<i32> = sqlx::query_scalar::<_, i32>(&format!(
            "SELECT id FROM {} WHERE id = ANY($1) FOR UPDATE",
            table
        ))
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(OrderingError::from_reorder)?;

        if locked.len() != ids.len() {
            let locked: HashSet<i32> = locked.into_iter().collect();
            let mut missing: Vec<i32> = ids.iter().copied().filter(|id| !locked.contains(id)).collect();
            missing.sort_unstable();
            return Err(OrderingError::UnknownIds(missing));
        }

        // Phase 1: park every referenced row in negative space.
        sqlx::query(&format!(
            r#"UPDATE {} SET "order" = -"order" WHERE id = ANY($1)"#,
            table
        ))
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(OrderingError::from_reorder)?;

        // Phase 2: one id-keyed bulk update to the targets.
        let updated = sqlx::query(&format!(
            r#"
            UPDATE {table} AS t
            SET "order" = b.new_order, updated_at = NOW()
            FROM UNNEST($1::INT4[], $2::INT4[]) AS b(id, new_order)
            WHERE t.id = b.id
            "#
        ))
        .bind(&ids)
        .bind(&orders)
        .execute(&mut *tx)
        .await
        .map_err(OrderingError::from_reorder)?
        .rows_affected();

        if updated != batch.len() as u64 {
            return Err(OrderingError::Transaction(format!(
                "expected to update {} rows, updated {}",
                batch.len(),
                updated
            )));
        }

        tx.commit().await.map_err(OrderingError::from_reorder)?;
        Ok(())
    }

    async fn list_ordered(&self, collection: Collection) -> Result<Vec<OrderedItem>, OrderingError> {
        let sql = format!(
            r#"SELECT id, "order" FROM {} ORDER BY "order" ASC"#,
            collection.table()
        );
        let items = sqlx::query_as::<_, OrderedItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::OrderingEngine;

    async fn insert_attributes(pool: &PgPool, count: i32) -> sqlx::Result<Vec<i32>> {
        let mut ids = Vec::new();
        for order in 1..=count {
            let id = sqlx::query_scalar::<_, i32>(
                r#"INSERT INTO attributes (name_en, "order") VALUES ($1, $2) RETURNING id"#,
            )
            .bind(format!("Attribute {}", order))
            .bind(order)
            .fetch_one(pool)
            .await?;
            ids.push(id);
        }
        Ok(ids)
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_max_order_empty_table(pool: PgPool) -> sqlx::Result<()> {
        let store = PgOrderStore::new(pool);
        assert_eq!(store.max_order(Collection::Attributes).await.unwrap(), 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_swap_persists(pool: PgPool) -> sqlx::Result<()> {
        let ids = insert_attributes(&pool, 4).await?;
        let engine = OrderingEngine::new(PgOrderStore::new(pool.clone()));

        let result = engine
            .reorder(
                Collection::Attributes,
                &[OrderAssignment::new(ids[0], 4), OrderAssignment::new(ids[3], 1)],
            )
            .await
            .unwrap();

        let listed: Vec<i32> = result.iter().map(|item| item.id).collect();
        assert_eq!(listed, vec![ids[3], ids[1], ids[2], ids[0]]);

        let negatives = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM attributes WHERE "order" < 0"#,
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(negatives, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_collision_rolls_back_phase_one(pool: PgPool) -> sqlx::Result<()> {
        let ids = insert_attributes(&pool, 3).await?;
        let store = PgOrderStore::new(pool.clone());

        let result = store
            .apply_reorder(Collection::Attributes, &[OrderAssignment::new(ids[0], 2)])
            .await;
        assert!(matches!(result, Err(OrderingError::Transaction(_))));

        let orders = store.list_ordered(Collection::Attributes).await.unwrap();
        let orders: Vec<i32> = orders.iter().map(|item| item.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_duplicate_order_insert_is_conflict(pool: PgPool) -> sqlx::Result<()> {
        insert_attributes(&pool, 1).await?;

        let err = sqlx::query(r#"INSERT INTO attributes (name_en, "order") VALUES ('Dup', 1)"#)
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(
            OrderingError::from_insert(err, Collection::Attributes),
            OrderingError::Conflict(_)
        ));
        Ok(())
    }
}
