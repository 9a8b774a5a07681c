//! Catalog, customers and orders on an embedded SQLite database.
//!
//! Every public operation opens what it needs from the connection it is
//! given and finishes before returning; the only state shared between calls
//! is the database itself.

pub mod catalog;
pub mod config;
pub mod customer;
pub mod entities;
pub mod error;
pub mod order;
pub mod storage;

mod validation;

pub use config::Config;
pub use error::{Result, StoreError};
