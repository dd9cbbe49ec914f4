use async_trait::async_trait;

use super::{Collection, OrderAssignment, OrderedItem, OrderingError};

/// Storage operations the ordering engine is built on
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Highest `order` in the collection, 0 when it is empty
    async fn max_order(&self, collection: Collection) -> Result<i32, OrderingError>;

    /// The subset of `ids` that exist in the collection
    async fn existing_ids(
        &self,
        collection: Collection,
        ids: &[i32],
    ) -> Result<Vec<i32>, OrderingError>;

    /// Apply a validated batch atomically
    ///
    /// Implementations must negate the current order of every referenced row
    /// before writing any target, and must leave the collection unchanged
    /// if anything fails.
    async fn apply_reorder(
        &self,
        collection: Collection,
        batch: &[OrderAssignment],
    ) -> Result<(), OrderingError>;

    /// Every row of the collection, ascending by `order`
    async fn list_ordered(&self, collection: Collection) -> Result<Vec<OrderedItem>, OrderingError>;
}
