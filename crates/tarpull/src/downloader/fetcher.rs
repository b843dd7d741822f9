//! Downloads a URL into a directory, named after the URL's last path segment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::error::{Result, TarpullError};
use crate::http::HttpClient;

/// Single-shot file fetcher.
///
/// One attempt per call: no retries, no resumption, no checksums. Concurrent
/// fetches of the same URL into the same directory race on the output file
/// (last writer wins).
pub struct Fetcher {
    http_client: Arc<HttpClient>,
}

impl Fetcher {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    /// Download `url` into `dest_dir`, returning the absolute path written.
    ///
    /// The file name is the URL's final non-empty path segment; the query
    /// string never contributes to it. `dest_dir` must already exist.
    pub async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        self.fetch_with_progress(url, dest_dir, None::<fn(u64, u64)>)
            .await
    }

    /// Same as [`fetch`](Self::fetch) with a `(downloaded, total)` callback;
    /// total is 0 when the server sends no Content-Length.
    pub async fn fetch_with_progress<F>(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: Option<F>,
    ) -> Result<PathBuf>
    where
        F: Fn(u64, u64),
    {
        let parsed = Url::parse(url).map_err(|e| TarpullError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let file_name = file_name_from_url(&parsed)
            .ok_or_else(|| TarpullError::Download {
                url: url.to_string(),
                reason: "URL has no file name segment".to_string(),
            })?
            .to_string();

        // Also rejects a missing destination directory up front
        let dest_dir = dest_dir
            .canonicalize()
            .map_err(|e| TarpullError::Download {
                url: url.to_string(),
                reason: format!("destination directory: {e}"),
            })?;
        let dest = dest_dir.join(&file_name);

        log::debug!("Fetching {} to {}", url, dest.display());

        self.http_client
            .download(url, &dest, progress)
            .await
            .map_err(|e| TarpullError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(dest)
    }
}

fn file_name_from_url(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(url: &str) -> Option<String> {
        let parsed = Url::parse(url).unwrap();
        file_name_from_url(&parsed).map(str::to_string)
    }

    #[test]
    fn test_file_name_is_last_segment() {
        assert_eq!(
            name_of("http://registry.example.org/bower/-/bower-1.7.7.tgz"),
            Some("bower-1.7.7.tgz".to_string())
        );
    }

    #[test]
    fn test_file_name_ignores_query_string() {
        assert_eq!(
            name_of("http://registry.example.org/bower-1.7.7.tgz?token=abc"),
            Some("bower-1.7.7.tgz".to_string())
        );
    }

    #[test]
    fn test_file_name_skips_trailing_slash() {
        assert_eq!(
            name_of("http://registry.example.org/downloads/bower-1.7.7.tgz/"),
            Some("bower-1.7.7.tgz".to_string())
        );
    }

    #[test]
    fn test_file_name_missing_for_bare_host() {
        assert_eq!(name_of("http://registry.example.org/"), None);
    }

    #[tokio::test]
    async fn test_fetch_rejects_unparsable_url() {
        let fetcher = Fetcher::new(Arc::new(HttpClient::new().unwrap()));

        let err = fetcher
            .fetch("not a url", Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, TarpullError::Download { .. }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_url_without_file_name() {
        let fetcher = Fetcher::new(Arc::new(HttpClient::new().unwrap()));

        let err = fetcher
            .fetch("http://registry.example.org/", Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, TarpullError::Download { .. }));
    }
}
