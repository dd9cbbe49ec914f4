pub mod list;

pub use list::{ListUsersError, ListUsersQuery, ListUsersResponse, UserListItem, UserRole};
