//! Ordered-collection engine
//!
//! Attributes and countries are displayed in an explicit, admin-controlled
//! sequence held in a UNIQUE `order` column. This module owns every write to
//! that column:
//!
//! - [`OrderingEngine::assign_next_order`] picks the order for a new row
//!   (`max + 1`, empty collection gives 1). Inserts are not locked; the
//!   unique constraint decides races and the loser gets a conflict.
//! - [`OrderingEngine::reorder`] applies a batch of `(id, order)` pairs
//!   atomically. The store moves every referenced row to `-order` first and
//!   then applies the targets with one id-keyed bulk update, all inside a
//!   single transaction.
//!
//! Storage is abstracted behind [`OrderStore`]; [`PgOrderStore`] is the
//! production implementation and [`MemoryOrderStore`] backs tests.

mod engine;
mod error;
pub mod memory;
pub mod postgres;
mod store;

pub use engine::{validate_batch, OrderingEngine, DEFAULT_MAX_BATCH};
pub use error::OrderingError;
pub use memory::MemoryOrderStore;
pub use postgres::PgOrderStore;
pub use store::OrderStore;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Collection whose rows carry a unique `order` value
///
/// Table names come from this enum only, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Attributes,
    Countries,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Attributes => "attributes",
            Collection::Countries => "countries",
        }
    }

    /// Key for `pg_advisory_xact_lock`, stable across processes
    pub fn lock_key(self) -> i64 {
        match self {
            Collection::Attributes => 0x6361_7461_6c67_0001,
            Collection::Countries => 0x6361_7461_6c67_0002,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// One entry of a reorder batch: move row `id` to position `order`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: i32,
    pub order: i32,
}

impl OrderAssignment {
    pub fn new(id: i32, order: i32) -> Self {
        Self { id, order }
    }
}

/// A row's identity and position, as listed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderedItem {
    pub id: i32,
    pub order: i32,
}

/// A full record that knows its id and can take a new position
pub trait Positioned {
    fn id(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

/// Lay `rows` out in the sequence of `listed`, taking positions from it
///
/// `listed` is what the engine returned from inside its lock, so it wins
/// over whatever `rows` carries. Rows it does not name are dropped.
pub fn arrange<T: Positioned>(listed: &[OrderedItem], rows: Vec<T>) -> Vec<T> {
    let mut by_id: HashMap<i32, T> = rows.into_iter().map(|row| (row.id(), row)).collect();
    listed
        .iter()
        .filter_map(|item| {
            let mut row = by_id.remove(&item.id)?;
            row.set_order(item.order);
            Some(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: i32,
        order: i32,
        name: &'static str,
    }

    impl Positioned for Row {
        fn id(&self) -> i32 {
            self.id
        }

        fn set_order(&mut self, order: i32) {
            self.order = order;
        }
    }

    #[test]
    fn test_arrange_follows_listed_sequence() {
        let listed = [
            OrderedItem { id: 4, order: 1 },
            OrderedItem { id: 2, order: 2 },
            OrderedItem { id: 1, order: 3 },
        ];
        // rows fetched later: 1 and 4 swapped again, 9 was inserted, 2 is gone
        let rows = vec![
            Row { id: 1, order: 1, name: "a" },
            Row { id: 4, order: 3, name: "d" },
            Row { id: 9, order: 4, name: "x" },
        ];

        let arranged = arrange(&listed, rows);
        assert_eq!(
            arranged,
            vec![Row { id: 4, order: 1, name: "d" }, Row { id: 1, order: 3, name: "a" }]
        );
    }

    #[test]
    fn test_collection_tables_are_fixed() {
        assert_eq!(Collection::Attributes.table(), "attributes");
        assert_eq!(Collection::Countries.table(), "countries");
        assert_eq!(Collection::Countries.to_string(), "countries");
    }

    #[test]
    fn test_lock_keys_are_distinct() {
        assert_ne!(
            Collection::Attributes.lock_key(),
            Collection::Countries.lock_key()
        );
    }

    #[test]
    fn test_assignment_deserializes_from_request_shape() {
        let batch: Vec<OrderAssignment> =
            serde_json::from_str(r#"[{"id": 3, "order": 1}, {"id": 1, "order": 3}]"#).unwrap();
        assert_eq!(batch, vec![OrderAssignment::new(3, 1), OrderAssignment::new(1, 3)]);
    }
}
