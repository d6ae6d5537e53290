/// REST client over the back-office server endpoints
pub mod client;

/// Wire DTOs exchanged with the server
pub mod types;

pub use client::ApiClient;
