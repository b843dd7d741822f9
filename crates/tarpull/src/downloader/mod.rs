//! Fetching remote files to local disk.

mod fetcher;

pub use fetcher::Fetcher;
