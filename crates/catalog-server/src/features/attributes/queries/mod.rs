pub mod get;
pub mod list;

pub use get::{GetAttributeError, GetAttributeQuery, GetAttributeResponse};
pub use list::{ListAttributesError, ListAttributesQuery, ListAttributesResponse};
