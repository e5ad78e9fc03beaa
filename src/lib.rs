// Public API for integration tests and potential library usage

pub mod api;
pub mod auth;
pub mod code;
pub mod config;
pub mod error;
pub mod janitor;
pub mod protocol;
pub mod state;
pub mod store;
pub mod types;
pub mod ws;
