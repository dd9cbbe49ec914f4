pub mod get;
pub mod list;

pub use get::{GetContactRequestError, GetContactRequestQuery, GetContactRequestResponse};
pub use list::{
    DateBound, ListContactRequestsError, ListContactRequestsQuery, ListContactRequestsResponse,
};
