//! Destinations the compressed aggregate can be written to.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use reqwest::{
    header::{CONTENT_ENCODING, CONTENT_TYPE},
    Client,
};

use crate::error::{Result, SoundingError};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const ENCODING_GZIP: &str = "gzip";

pub trait ObjectStore {
    /// Writes a gzip-compressed JSON object under `key`.
    async fn put(&self, key: &str, body: &[u8]) -> Result<()>;
}

/// Writes objects as files beneath a root directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SoundingError::StoreIo {
                path: parent.into(),
                source,
            })?;
        }
        fs::write(&path, body).map_err(|source| SoundingError::StoreIo {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {}", path.display());

        Ok(())
    }
}

/// PUTs objects beneath a base URL, e.g. a bucket endpoint.
///
/// Requests are not signed. The target must accept anonymous writes (a bucket with a
/// public-write policy) or sit behind a proxy that adds credentials; the `x-amz-acl`
/// header only asks for the stored object to be publicly readable.
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SoundingError::HttpClient)?;

        Ok(HttpStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

impl ObjectStore for HttpStore {
    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        let response = self
            .client
            .put(self.url_for(key))
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(CONTENT_ENCODING, ENCODING_GZIP)
            .header("x-amz-acl", "public-read")
            .body(body.to_vec())
            .send()
            .await
            .map_err(|source| SoundingError::Store {
                key: key.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SoundingError::StoreStatus {
                key: key.to_string(),
                status: response.status(),
            });
        }

        Ok(())
    }
}

/// Where a run publishes to, chosen from a URL or a directory path.
pub enum Destination {
    Local(LocalStore),
    Http(HttpStore),
}

impl Destination {
    pub fn parse(target: &str, timeout: Duration) -> Result<Self> {
        if target.starts_with("http://") || target.starts_with("https://") {
            Ok(Destination::Http(HttpStore::new(target, timeout)?))
        } else {
            Ok(Destination::Local(LocalStore::new(Path::new(target))))
        }
    }
}

impl ObjectStore for Destination {
    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        match self {
            Destination::Local(store) => store.put(key, body).await,
            Destination::Http(store) => store.put(key, body).await,
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Local(store) => write!(f, "{}", store.root.display()),
            Destination::Http(store) => f.write_str(&store.base_url),
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn should_write_nested_key() {
        let tmp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(tmp_dir.path());

        store.put("201802/sounding-2018021800.json.gz", b"abc").await.unwrap();

        let written = fs::read(tmp_dir.path().join("201802/sounding-2018021800.json.gz")).unwrap();
        assert_eq!(written, b"abc");
    }

    #[tokio::test]
    async fn should_fail_when_root_is_a_file() {
        let tmp_dir = TempDir::new().unwrap();
        let file = tmp_dir.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();
        let store = LocalStore::new(&file);

        let err = store.put("sounding-current.json.gz", b"abc").await.unwrap_err();

        match err {
            SoundingError::StoreIo { path, .. } => assert_eq!(path, file),
            other => panic!("expected StoreIo, got {:?}", other),
        }
    }

    #[test]
    fn should_choose_destination_by_scheme() {
        let timeout = Duration::from_secs(5);

        let http = Destination::parse("https://example.com/soundings/", timeout).unwrap();
        match &http {
            Destination::Http(store) => assert_eq!(
                store.url_for("sounding-current.json.gz"),
                "https://example.com/soundings/sounding-current.json.gz"
            ),
            Destination::Local(_) => panic!("expected http destination"),
        }

        let local = Destination::parse("/tmp/soundings", timeout).unwrap();
        assert!(matches!(local, Destination::Local(_)));
        assert_eq!(local.to_string(), "/tmp/soundings");
    }

    #[tokio::test]
    async fn should_fail_on_unreachable_http_store() {
        let store = HttpStore::new("http://127.0.0.1:9/soundings", Duration::from_secs(2)).unwrap();

        let err = store.put("sounding-current.json.gz", b"abc").await.unwrap_err();

        assert!(matches!(err, SoundingError::Store { .. }));
    }
}
