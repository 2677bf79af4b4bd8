/// Database configuration and connection management
pub mod database;

/// Staff roster from environment variables
pub mod staff;

/// Shop configuration loading from config.toml
pub mod store;
