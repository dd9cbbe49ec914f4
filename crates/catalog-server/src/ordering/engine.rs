use std::collections::HashSet;
use tokio::sync::Mutex;

use super::{Collection, OrderAssignment, OrderStore, OrderedItem, OrderingError};

/// Default upper bound on the number of entries in one reorder batch
pub const DEFAULT_MAX_BATCH: usize = 1000;

/// Check a reorder batch before anything touches storage
///
/// Rejects batches that are too large, non-positive targets, a target used
/// twice and an id listed twice. Existence of ids is checked separately
/// against the store.
pub fn validate_batch(batch: &[OrderAssignment], max_batch: usize) -> Result<(), OrderingError> {
    if batch.len() > max_batch {
        return Err(OrderingError::BatchTooLarge {
            len: batch.len(),
            max: max_batch,
        });
    }

    let mut seen_orders = HashSet::with_capacity(batch.len());
    let mut seen_ids = HashSet::with_capacity(batch.len());

    for item in batch {
        if item.order < 1 {
            return Err(OrderingError::InvalidOrder(item.order));
        }
        if !seen_orders.insert(item.order) {
            return Err(OrderingError::DuplicateOrder(item.order));
        }
        if !seen_ids.insert(item.id) {
            return Err(OrderingError::DuplicateId(item.id));
        }
    }

    Ok(())
}

/// One mutex per collection; reorders of the same collection run one at a time
#[derive(Debug, Default)]
struct CollectionLocks {
    attributes: Mutex<()>,
    countries: Mutex<()>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Attributes => &self.attributes,
            Collection::Countries => &self.countries,
        }
    }
}

/// Assigns and rewrites the `order` of rows in ordered collections
///
/// Shared across requests behind an `Arc`. Reorders are serialized per
/// collection in-process; [`super::PgOrderStore`] additionally takes an
/// advisory lock so separate service instances serialize too.
#[derive(Debug)]
pub struct OrderingEngine<S> {
    store: S,
    locks: CollectionLocks,
    max_batch: usize,
}

impl<S: OrderStore> OrderingEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: CollectionLocks::default(),
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Order for a row about to be inserted: one past the current maximum
    ///
    /// Not locked. Two concurrent creators can get the same value; the
    /// unique constraint rejects the second insert, which callers report
    /// via [`OrderingError::from_insert`].
    #[tracing::instrument(skip(self), fields(collection = %collection))]
    pub async fn assign_next_order(&self, collection: Collection) -> Result<i32, OrderingError> {
        let max = self.store.max_order(collection).await?;
        let next = max
            .checked_add(1)
            .ok_or(OrderingError::InvalidOrder(max))?;
        tracing::debug!(next, "Assigned next order");
        Ok(next)
    }

    /// Every row of the collection, ascending by `order`
    #[tracing::instrument(skip(self), fields(collection = %collection))]
    pub async fn list(&self, collection: Collection) -> Result<Vec<OrderedItem>, OrderingError> {
        self.store.list_ordered(collection).await
    }

    /// Atomically move each row in `batch` to its target order
    ///
    /// Rows not in the batch keep their order. An empty batch changes
    /// nothing. Returns the whole collection, ascending by `order`.
    ///
    /// A retryable storage failure (deadlock, serialization failure) is
    /// retried once; a second one is returned as
    /// [`OrderingError::Retryable`].
    #[tracing::instrument(skip(self, batch), fields(collection = %collection, batch_len = batch.len()))]
    pub async fn reorder(
        &self,
        collection: Collection,
        batch: &[OrderAssignment],
    ) -> Result<Vec<OrderedItem>, OrderingError> {
        validate_batch(batch, self.max_batch)?;

        if batch.is_empty() {
            tracing::debug!("Empty reorder batch, nothing to do");
            return self.store.list_ordered(collection).await;
        }

        let _guard = self.locks.get(collection).lock().await;

        let ids: Vec<i32> = batch.iter().map(|item| item.id).collect();
        let existing: HashSet<i32> = self
            .store
            .existing_ids(collection, &ids)
            .await?
            .into_iter()
            .collect();
        let mut unknown: Vec<i32> = ids.into_iter().filter(|id| !existing.contains(id)).collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            tracing::warn!(?unknown, "Reorder rejected: unknown ids");
            return Err(OrderingError::UnknownIds(unknown));
        }

        match self.store.apply_reorder(collection, batch).await {
            Ok(()) => {},
            Err(err) if err.is_retryable() => {
                tracing::warn!(attempt = 2, error = %err, "Reorder transaction failed, retrying once");
                self.store.apply_reorder(collection, batch).await?;
            },
            Err(err) => return Err(err),
        }

        tracing::info!("Collection reordered");
        self.store.list_ordered(collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::MemoryOrderStore;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn batch(pairs: &[(i32, i32)]) -> Vec<OrderAssignment> {
        pairs
            .iter()
            .map(|&(id, order)| OrderAssignment::new(id, order))
            .collect()
    }

    async fn seeded(orders: &[i32]) -> (OrderingEngine<MemoryOrderStore>, Vec<i32>) {
        let store = MemoryOrderStore::new();
        let mut ids = Vec::new();
        for &order in orders {
            ids.push(store.insert(Collection::Attributes, order).await.unwrap());
        }
        (OrderingEngine::new(store), ids)
    }

    fn orders_by_id(items: &[OrderedItem]) -> Vec<(i32, i32)> {
        let mut pairs: Vec<(i32, i32)> = items.iter().map(|i| (i.id, i.order)).collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_validate_batch_accepts_permutation() {
        assert!(validate_batch(&batch(&[(1, 2), (2, 1)]), 10).is_ok());
        assert!(validate_batch(&[], 10).is_ok());
    }

    #[test]
    fn test_validate_batch_rejects_duplicate_order() {
        let result = validate_batch(&batch(&[(1, 2), (2, 2)]), 10);
        assert!(matches!(result, Err(OrderingError::DuplicateOrder(2))));
    }

    #[test]
    fn test_validate_batch_rejects_duplicate_id() {
        let result = validate_batch(&batch(&[(1, 2), (1, 3)]), 10);
        assert!(matches!(result, Err(OrderingError::DuplicateId(1))));
    }

    #[test]
    fn test_validate_batch_rejects_non_positive_order() {
        assert!(matches!(
            validate_batch(&batch(&[(1, 0)]), 10),
            Err(OrderingError::InvalidOrder(0))
        ));
        assert!(matches!(
            validate_batch(&batch(&[(1, -3)]), 10),
            Err(OrderingError::InvalidOrder(-3))
        ));
    }

    #[test]
    fn test_validate_batch_rejects_oversized_batch() {
        let result = validate_batch(&batch(&[(1, 1), (2, 2), (3, 3)]), 2);
        assert!(matches!(
            result,
            Err(OrderingError::BatchTooLarge { len: 3, max: 2 })
        ));
    }

    #[tokio::test]
    async fn test_assign_next_order_on_empty_collection_is_one() {
        let engine = OrderingEngine::new(MemoryOrderStore::new());
        assert_eq!(engine.assign_next_order(Collection::Countries).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_assign_next_order_exceeds_every_existing_order() {
        let (engine, _) = seeded(&[3, 1, 7]).await;
        let next = engine.assign_next_order(Collection::Attributes).await.unwrap();
        assert_eq!(next, 8);

        let all = engine.list(Collection::Attributes).await.unwrap();
        assert!(all.iter().all(|item| next > item.order));
    }

    #[tokio::test]
    async fn test_assign_next_order_ignores_gaps() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        engine.store().remove(Collection::Attributes, ids[2]).await;
        assert_eq!(engine.assign_next_order(Collection::Attributes).await.unwrap(), 3);

        engine.store().remove(Collection::Attributes, ids[0]).await;
        assert_eq!(engine.assign_next_order(Collection::Attributes).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_race_surfaces_as_conflict() {
        let engine = OrderingEngine::new(MemoryOrderStore::new());
        let first = engine.assign_next_order(Collection::Attributes).await.unwrap();
        let second = engine.assign_next_order(Collection::Attributes).await.unwrap();
        assert_eq!(first, second);

        assert_ok!(engine.store().insert(Collection::Attributes, first).await);
        let lost = engine.store().insert(Collection::Attributes, second).await;
        assert!(matches!(lost, Err(OrderingError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_swap_first_and_last() {
        let (engine, ids) = seeded(&[1, 2, 3, 4]).await;
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(a, 4), (d, 1)]))
            .await
            .unwrap();

        let listed: Vec<i32> = result.iter().map(|item| item.id).collect();
        assert_eq!(listed, vec![d, b, c, a]);
        let orders: Vec<i32> = result.iter().map(|item| item.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_full_reversal() {
        let (engine, ids) = seeded(&[1, 2, 3, 4]).await;
        let reversal: Vec<(i32, i32)> =
            ids.iter().enumerate().map(|(i, &id)| (id, 4 - i as i32)).collect();

        let result = engine
            .reorder(Collection::Attributes, &batch(&reversal))
            .await
            .unwrap();

        let listed: Vec<i32> = result.iter().map(|item| item.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_cyclic_rotation_leaves_others_untouched() {
        let (engine, ids) = seeded(&[1, 2, 3, 4, 5]).await;
        // 1 -> 2 -> 3 -> 1, rows with order 4 and 5 are not in the batch
        let rotation = batch(&[(ids[0], 2), (ids[1], 3), (ids[2], 1)]);

        let result = engine.reorder(Collection::Attributes, &rotation).await.unwrap();

        assert_eq!(
            orders_by_id(&result),
            vec![
                (ids[0], 2),
                (ids[1], 3),
                (ids[2], 1),
                (ids[3], 4),
                (ids[4], 5)
            ]
        );
    }

    #[tokio::test]
    async fn test_reorder_into_gap() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 10)]))
            .await
            .unwrap();
        let listed: Vec<i32> = result.iter().map(|item| item.id).collect();
        assert_eq!(listed, vec![ids[1], ids[2], ids[0]]);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_current_ordering() {
        let (engine, _) = seeded(&[2, 1, 3]).await;
        let before = engine.list(Collection::Attributes).await.unwrap();
        let result = engine.reorder(Collection::Attributes, &[]).await.unwrap();
        assert_eq!(result, before);
    }

    #[tokio::test]
    async fn test_duplicate_target_changes_nothing() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        let before = engine.list(Collection::Attributes).await.unwrap();

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 3), (ids[1], 3)]))
            .await;

        assert!(matches!(result, Err(OrderingError::DuplicateOrder(3))));
        assert_eq!(engine.list(Collection::Attributes).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_id_changes_nothing() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        let before = engine.list(Collection::Attributes).await.unwrap();

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 2), (999, 1), (998, 4)]))
            .await;

        match result {
            Err(OrderingError::UnknownIds(unknown)) => assert_eq!(unknown, vec![998, 999]),
            other => panic!("expected UnknownIds, got {:?}", other),
        }
        assert_eq!(engine.list(Collection::Attributes).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_collision_with_row_outside_batch_rolls_back() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        let before = engine.list(Collection::Attributes).await.unwrap();

        // order 3 still belongs to ids[2], which is not in the batch
        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 3)]))
            .await;

        assert!(matches!(result, Err(OrderingError::Transaction(_))));
        let after = engine.list(Collection::Attributes).await.unwrap();
        assert_eq!(after, before);
        assert!(after.iter().all(|item| item.order > 0));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryOrderStore::new();
        let attribute = store.insert(Collection::Attributes, 1).await.unwrap();
        let country = store.insert(Collection::Countries, 1).await.unwrap();
        let engine = OrderingEngine::new(store);

        let result = engine
            .reorder(Collection::Countries, &batch(&[(attribute, 5)]))
            .await;
        assert!(matches!(result, Err(OrderingError::UnknownIds(_))));

        engine
            .reorder(Collection::Countries, &batch(&[(country, 5)]))
            .await
            .unwrap();
        assert_eq!(engine.assign_next_order(Collection::Attributes).await.unwrap(), 2);
        assert_eq!(engine.assign_next_order(Collection::Countries).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_single_retryable_failure_is_retried() {
        let (engine, ids) = seeded(&[1, 2]).await;
        engine.store().fail_next_applies(1);

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 2), (ids[1], 1)]))
            .await
            .unwrap();

        assert_eq!(orders_by_id(&result), vec![(ids[0], 2), (ids[1], 1)]);
    }

    #[tokio::test]
    async fn test_second_retryable_failure_is_surfaced() {
        let (engine, ids) = seeded(&[1, 2]).await;
        let before = engine.list(Collection::Attributes).await.unwrap();
        engine.store().fail_next_applies(2);

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 2), (ids[1], 1)]))
            .await;

        let err = assert_err!(result);
        assert!(err.is_retryable());
        assert_eq!(engine.list(Collection::Attributes).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_max_batch_is_configurable() {
        let (engine, ids) = seeded(&[1, 2]).await;
        let engine = engine.with_max_batch(1);
        assert_eq!(engine.max_batch(), 1);

        let result = engine
            .reorder(Collection::Attributes, &batch(&[(ids[0], 2), (ids[1], 1)]))
            .await;
        assert!(matches!(result, Err(OrderingError::BatchTooLarge { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reorders_leave_consistent_state() {
        let (engine, ids) = seeded(&[1, 2, 3, 4]).await;
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for round in 0..16 {
            let engine = Arc::clone(&engine);
            let ids = ids.clone();
            handles.push(tokio::spawn(async move {
                // rotate by `round` positions
                let pairs: Vec<OrderAssignment> = ids
                    .iter()
                    .enumerate()
                    .map(|(i, &id)| OrderAssignment::new(id, ((i + round) % 4) as i32 + 1))
                    .collect();
                engine.reorder(Collection::Attributes, &pairs).await
            }));
        }

        for joined in futures::future::join_all(handles).await {
            assert_ok!(joined.unwrap());
        }

        let finished = engine.list(Collection::Attributes).await.unwrap();
        let mut orders: Vec<i32> = finished.iter().map(|item| item.order).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert!(finished.iter().all(|item| item.order > 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_invalid_and_valid_reorders() {
        let (engine, ids) = seeded(&[1, 2, 3]).await;
        let engine = Arc::new(engine);

        let valid = {
            let engine = Arc::clone(&engine);
            let pairs = batch(&[(ids[0], 3), (ids[2], 1)]);
            tokio::spawn(async move { engine.reorder(Collection::Attributes, &pairs).await })
        };
        let invalid = {
            let engine = Arc::clone(&engine);
            let pairs = batch(&[(ids[1], 5), (12345, 6)]);
            tokio::spawn(async move { engine.reorder(Collection::Attributes, &pairs).await })
        };

        assert_ok!(valid.await.unwrap());
        assert!(matches!(
            invalid.await.unwrap(),
            Err(OrderingError::UnknownIds(_))
        ));

        let finished = engine.list(Collection::Attributes).await.unwrap();
        assert_eq!(
            orders_by_id(&finished),
            vec![(ids[0], 3), (ids[1], 2), (ids[2], 1)]
        );
    }
}
