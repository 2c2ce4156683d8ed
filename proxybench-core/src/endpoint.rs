//! Proxy endpoint abstraction.
//!
//! A proxy endpoint is an HTTP base URL onto which a listener index is
//! appended as the last path segment: `http://host:8000/` + `42`.

use std::fmt;
use std::str::FromStr;
use url::Url;

/// Base URL of a DHT proxy (subscribe side or publish side).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    base: Url,
}

impl ProxyEndpoint {
    /// Parse an endpoint from a string.
    ///
    /// Supported schemes are `http` and `https`. A trailing slash is added to
    /// the path when missing so that [`ProxyEndpoint::url_for`] always appends
    /// a segment rather than replacing the last one.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxybench_core::endpoint::ProxyEndpoint;
    ///
    /// let endpoint = ProxyEndpoint::parse("http://127.0.0.1:8000").unwrap();
    /// assert_eq!(endpoint.url_for(42).as_str(), "http://127.0.0.1:8000/42");
    ///
    /// let endpoint = ProxyEndpoint::parse("http://proxy.local:8000/dht").unwrap();
    /// assert_eq!(endpoint.url_for(7).as_str(), "http://proxy.local:8000/dht/7");
    /// ```
    pub fn parse(s: &str) -> Result<Self, EndpointError> {
        s.parse()
    }

    /// Full request URL for listener `index`.
    #[must_use]
    pub fn url_for(&self, index: u64) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{index}", self.base.path());
        url.set_path(&path);
        url
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Returns true if the endpoint uses TLS.
    pub fn is_https(&self) -> bool {
        self.base.scheme() == "https"
    }
}

impl FromStr for ProxyEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut base = Url::parse(s.trim()).map_err(|e| EndpointError::InvalidUrl {
            url: s.to_string(),
            reason: e.to_string(),
        })?;

        match base.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::InvalidScheme(other.to_string())),
        }
        if base.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(s.to_string()));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(EndpointError::UnexpectedSuffix(s.to_string()));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }
}

impl Default for ProxyEndpoint {
    /// `http://127.0.0.1:8000/`
    fn default() -> Self {
        let base = Url::parse(crate::options::DEFAULT_PROXY_URL)
            .expect("DEFAULT_PROXY_URL is a valid URL literal");
        Self { base }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// Errors that can occur when parsing endpoints.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid scheme in endpoint: {0} (expected http:// or https://)")]
    InvalidScheme(String),

    #[error("Endpoint has no host: {0}")]
    MissingHost(String),

    #[error("Endpoint must not carry a query or fragment: {0}")]
    UnexpectedSuffix(String),
}
