pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CountryAttributeInput, CreateCountryCommand, CreateCountryError, DeleteCountryCommand,
    DeleteCountryError, ReorderCountriesCommand, ReorderCountriesError,
};
pub use queries::{GetCountryError, GetCountryQuery, ListCountriesError, ListCountriesQuery};
pub use routes::countries_routes;
pub use types::{CountryAttributeValue, CountryDetail, CountryListItem, CountryWorld};
