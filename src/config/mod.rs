/// API endpoint configuration from environment variables
pub mod api;

/// Price-tier configuration loading from config.toml
pub mod tiers;
