//! In-process [`OrderStore`]
//!
//! Keeps the same rules as the database: `order` is unique per collection
//! and a reorder is all-or-nothing. Ids come from one shared sequence so an
//! id never exists in two collections at once.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
#[cfg(test)]
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

use super::{Collection, OrderAssignment, OrderStore, OrderedItem, OrderingError};

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    /// id -> order, per collection
    rows: HashMap<Collection, BTreeMap<i32, i32>>,
}

impl State {
    fn collection(&self, collection: Collection) -> Option<&BTreeMap<i32, i32>> {
        self.rows.get(&collection)
    }
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    state: RwLock<State>,
    #[cfg(test)]
    pending_failures: AtomicU32,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with the given order, enforcing uniqueness
    pub async fn insert(&self, collection: Collection, order: i32) -> Result<i32, OrderingError> {
        let mut state = self.state.write().await;
        let taken = state
            .collection(collection)
            .is_some_and(|rows| rows.values().any(|&o| o == order));
        if taken {
            return Err(OrderingError::Conflict(format!(
                "order {} already exists in {}",
                order, collection
            )));
        }

        state.last_id += 1;
        let id = state.last_id;
        state.rows.entry(collection).or_default().insert(id, order);
        Ok(id)
    }

    /// Delete a row; survivors keep their order
    pub async fn remove(&self, collection: Collection, id: i32) -> bool {
        let mut state = self.state.write().await;
        state
            .rows
            .get_mut(&collection)
            .is_some_and(|rows| rows.remove(&id).is_some())
    }

    pub async fn order_of(&self, collection: Collection, id: i32) -> Option<i32> {
        let state = self.state.read().await;
        state
            .collection(collection)
            .and_then(|rows| rows.get(&id).copied())
    }

    #[cfg(test)]
    /// Make the next `count` calls to `apply_reorder` fail as if the
    /// database reported a deadlock
    pub fn fail_next_applies(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn take_injected_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[cfg(not(test))]
    fn take_injected_failure(&self) -> bool {
        false
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn max_order(&self, collection: Collection) -> Result<i32, OrderingError> {
        let state = self.state.read().await;
        Ok(state
            .collection(collection)
            .and_then(|rows| rows.values().copied().max())
            .unwrap_or(0))
    }

    async fn existing_ids(
        &self,
        collection: Collection,
        ids: &[i32],
    ) -> Result<Vec<i32>, OrderingError> {
        let state = self.state.read().await;
        Ok(match state.collection(collection) {
            Some(rows) => ids.iter().copied().filter(|id| rows.contains_key(id)).collect(),
            None => Vec::new(),
        })
    }

    async fn apply_reorder(
        &self,
        collection: Collection,
        batch: &[OrderAssignment],
    ) -> Result<(), OrderingError> {
        if self.take_injected_failure() {
            return Err(OrderingError::Retryable("deadlock detected".to_string()));
        }

        let mut state = self.state.write().await;
        // work on a copy; it only replaces the live rows once both phases succeed
        let mut rows = state.collection(collection).cloned().unwrap_or_default();

        let mut missing = Vec::new();
        for item in batch {
            match rows.get_mut(&item.id) {
                Some(order) => *order = -*order,
                None => missing.push(item.id),
            }
        }
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(OrderingError::UnknownIds(missing));
        }

        for item in batch {
            let collides = rows
                .iter()
                .any(|(&id, &order)| id != item.id && order == item.order);
            if collides {
                return Err(OrderingError::Transaction(format!(
                    "order {} is already held by a row outside the batch",
                    item.order
                )));
            }
            rows.insert(item.id, item.order);
        }

        state.rows.insert(collection, rows);
        Ok(())
    }

    async fn list_ordered(&self, collection: Collection) -> Result<Vec<OrderedItem>, OrderingError> {
        let state = self.state.read().await;
        let mut items: Vec<OrderedItem> = state
            .collection(collection)
            .map(|rows| {
                rows.iter()
                    .map(|(&id, &order)| OrderedItem { id, order })
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by_key(|item| item.order);
        Ok(items)
    }
}
