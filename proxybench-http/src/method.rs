//! Proxy request verbs.

use std::fmt;

/// HTTP verbs understood by the DHT proxy.
///
/// `SUBSCRIBE` and `UNSUBSCRIBE` are extension methods; `POST` puts a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMethod {
    Subscribe,
    Unsubscribe,
    Post,
}

impl ProxyMethod {
    /// Wire name of the verb.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Post => "POST",
        }
    }

    /// Prefix of the per-request console line.
    #[must_use]
    pub const fn echo_label(&self) -> &'static str {
        match self {
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Post => "PUT ON",
        }
    }

    /// Console line printed before a request to listener `index`.
    #[must_use]
    pub fn echo_line(&self, index: u64) -> String {
        format!("{} /{index}", self.echo_label())
    }

    pub(crate) fn to_http(self) -> reqwest::Method {
        match self {
            Self::Post => reqwest::Method::POST,
            // Both names are valid RFC 9110 tokens.
            Self::Subscribe | Self::Unsubscribe => {
                reqwest::Method::from_bytes(self.as_str().as_bytes())
                    .unwrap_or(reqwest::Method::POST)
            }
        }
    }
}

impl fmt::Display for ProxyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
