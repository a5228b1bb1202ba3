//! Console configuration.

use std::path::PathBuf;

use url::Url;

/// Backend used when `PROPCALC_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://127.0.0.1:8000/";

/// Configuration shared by the API client and the session store.
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Backend base URL. Always ends with `/` so relative paths join below it.
    pub api_url: Url,
    /// Prefix of the persisted session keys.
    pub storage_namespace: String,
    /// JSON document backing the file session store.
    pub session_file: PathBuf,
}

impl ConsoleConfig {
    /// Configuration for `api_url` with the default namespace and session file.
    pub fn new(api_url: Url) -> Self {
        let storage_namespace = crate::session::DEFAULT_NAMESPACE.to_string();
        Self {
            api_url: normalize_base(api_url),
            session_file: default_session_file(&storage_namespace),
            storage_namespace,
        }
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                     | Default                                   |
    /// |------------------------------|-------------------------------------------|
    /// | `PROPCALC_API_URL`           | `https://127.0.0.1:8000/`                 |
    /// | `PROPCALC_STORAGE_NAMESPACE` | `admin`                                   |
    /// | `PROPCALC_SESSION_FILE`      | `<data dir>/propcalc/<namespace>_session.json` |
    pub fn from_env() -> Result<Self, url::ParseError> {
        let api_url = std::env::var("PROPCALC_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into());
        let storage_namespace = std::env::var("PROPCALC_STORAGE_NAMESPACE")
            .ok()
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or_else(|| crate::session::DEFAULT_NAMESPACE.into());
        let session_file = std::env::var_os("PROPCALC_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(&storage_namespace));

        Ok(Self {
            api_url: normalize_base(Url::parse(&api_url)?),
            storage_namespace,
            session_file,
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn default_session_file(namespace: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("propcalc")
        .join(format!("{namespace}_session.json"))
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = ConsoleConfig::new("http://localhost:8000/backend".parse().unwrap());
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/backend/");
        assert_eq!(
            config.api_url.join("api/v1/admin/profile").unwrap().as_str(),
            "http://localhost:8000/backend/api/v1/admin/profile"
        );
    }

    #[test]
    fn default_session_file_is_namespaced() {
        let config = ConsoleConfig::new(DEFAULT_API_URL.parse().unwrap());
        assert_eq!(config.storage_namespace, "admin");
        assert!(config.session_file.ends_with("propcalc/admin_session.json"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = ConsoleConfig::new(DEFAULT_API_URL.parse().unwrap())
            .with_namespace("office")
            .with_session_file("/tmp/s.json");
        assert_eq!(config.storage_namespace, "office");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }
}
