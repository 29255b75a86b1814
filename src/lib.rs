#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "This crate contains the identity and ownership core of the todo backend: credential"]
#![doc = "and todo stores, password hashing, session tokens, the authentication and todo"]
#![doc = "services, routing configuration, and error handling. It is used by the main binary"]
#![doc = "(`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod todos;

// The App itself is assembled in main.rs (and inline in the integration tests);
// HttpServiceFactory bounds make a shared app factory in the library awkward.

pub use crate::error::AppError;
