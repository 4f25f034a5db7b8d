pub mod client;
pub mod config;
pub mod error;

pub use client::SourceClient;
pub use config::SourceConfig;
pub use error::SourceError;
