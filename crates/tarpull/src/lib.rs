pub mod downloader;
pub mod error;
pub mod http;
pub mod registry;

pub use downloader::Fetcher;
pub use error::{Result, TarpullError};
pub use http::{HttpClient, HttpClientConfig};
pub use registry::{NpmClient, ProxyConfig, RegistryClient, RegistryConfig, RegistryQuery};
