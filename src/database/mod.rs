pub mod catalog;
pub mod devices;
pub mod employees;
pub mod manager;
pub mod models;

pub use manager::{DatabaseError, DatabaseManager};
