pub mod create;
pub mod delete;
pub mod reorder;

pub use create::{
    CountryAttributeInput, CreateCountryCommand, CreateCountryError, CreateCountryResponse,
};
pub use delete::{DeleteCountryCommand, DeleteCountryError, DeleteCountryResponse};
pub use reorder::{ReorderCountriesCommand, ReorderCountriesError, ReorderCountriesResponse};
