pub mod get;
pub mod list;

pub use get::{GetCountryError, GetCountryQuery, GetCountryResponse};
pub use list::{ListCountriesError, ListCountriesQuery, ListCountriesResponse};
