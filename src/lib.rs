pub mod chat;
pub mod config;
pub mod dates;
pub mod error;
pub mod server;
pub mod store;
