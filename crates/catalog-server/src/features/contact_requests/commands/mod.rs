pub mod create;
pub mod delete;

pub use create::{
    CreateContactRequestCommand, CreateContactRequestError, CreateContactRequestResponse,
};
pub use delete::{
    DeleteContactRequestCommand, DeleteContactRequestError, DeleteContactRequestResponse,
};
