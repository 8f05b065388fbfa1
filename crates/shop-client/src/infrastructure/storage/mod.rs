//! Persistent storage: the TOML config file and the session credential.

pub mod config;
pub mod credentials;
