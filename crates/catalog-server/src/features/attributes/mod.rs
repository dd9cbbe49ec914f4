pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateAttributeCommand, CreateAttributeError, DeleteAttributeCommand, DeleteAttributeError,
    ReorderAttributesCommand, ReorderAttributesError, UpdateAttributeCommand, UpdateAttributeError,
};
pub use queries::{GetAttributeError, GetAttributeQuery, ListAttributesError, ListAttributesQuery};
pub use routes::attributes_routes;
pub use types::AttributeRecord;
