pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{QuoteStore, STORE_DEADLINE, SqliteQuoteStore};
