//! Registry metadata lookup.
//!
//! The registry is reached through a command-style client ([`RegistryClient`])
//! whose replies vary in shape depending on how the query was phrased.
//! [`RegistryQuery`] hides that behind three stable operations.

mod client;
mod npm;
mod query;

pub use client::{ProxyConfig, RegistryClient, RegistryConfig};
pub use npm::NpmClient;
pub use query::RegistryQuery;
