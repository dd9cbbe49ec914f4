pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateContactRequestCommand, CreateContactRequestError, DeleteContactRequestCommand,
    DeleteContactRequestError,
};
pub use queries::{
    GetContactRequestError, GetContactRequestQuery, ListContactRequestsError,
    ListContactRequestsQuery,
};
pub use routes::contact_requests_routes;
pub use types::ContactRequestRecord;
