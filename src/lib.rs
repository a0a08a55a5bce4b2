//! Schoolhub - authentication for the school management app
//!
//! Library interface: the HTTP API (register, login, protected user
//! listing), the credential stores behind it, and the client-side session
//! used by the command-line client.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::Error;
