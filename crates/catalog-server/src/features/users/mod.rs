pub mod queries;
pub mod routes;

pub use queries::{ListUsersError, ListUsersQuery, UserListItem, UserRole};
pub use routes::users_routes;
