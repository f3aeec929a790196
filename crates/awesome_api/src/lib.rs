pub mod api;
pub mod error;

pub use api::{AwesomeAPI, CurrencyPair, FETCH_DEADLINE};
pub use error::FetchError;
