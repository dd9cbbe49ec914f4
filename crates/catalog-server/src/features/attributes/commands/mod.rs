pub mod create;
pub mod delete;
pub mod reorder;
pub mod update;

pub use create::{CreateAttributeCommand, CreateAttributeError, CreateAttributeResponse};
pub use delete::{DeleteAttributeCommand, DeleteAttributeError, DeleteAttributeResponse};
pub use reorder::{ReorderAttributesCommand, ReorderAttributesError, ReorderAttributesResponse};
pub use update::{UpdateAttributeCommand, UpdateAttributeError, UpdateAttributeResponse};
