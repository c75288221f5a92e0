pub mod auth;
pub mod connection;
pub mod deals;
pub mod json_store;

pub use connection::{init_db, Database};
pub use deals::{DealStore, SqliteDealStore};
pub use json_store::JsonFileDealStore;
