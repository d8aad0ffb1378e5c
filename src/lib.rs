// Kakehashi Service Gateway Library

pub mod cache;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod services;
pub mod synth;
pub mod upstream;

pub use envelope::Envelope;
pub use error::{FetchError, GatewayError};
pub use gateway::ServiceGateway;
