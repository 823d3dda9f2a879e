//! HTTP boundary for the registry statistics collector.
//!
//! Receives notification envelopes POSTed by a docker-registry and hands
//! them to the intake. Status codes follow the registry's delivery
//! contract, not REST convention: requests the collector isn't interested
//! in are answered `200 OK` so the registry's retry queue drains, while
//! decode failures and rejected events answer `400` and store failures
//! `502`, naming the failing event's index.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{CollectorConfig, ServerConfig, TlsConfig};
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use router::build_router;
pub use server::CollectorServer;
