//! Request bodies sent to the proxy.
//!
//! Bodies are JSON. Each is encoded once into [`Bytes`] so workers can clone
//! the buffer per request without re-serializing.

use crate::error::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Key sent on unsubscribe for listeners that should not reach a real device.
pub const PLACEHOLDER_KEY: &str = "not_a_key_to_avoid_to_crash_my_android";

/// Body of SUBSCRIBE and UNSUBSCRIBE requests: `{"key": "<device key>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeBody<'a> {
    pub key: &'a str,
}

impl<'a> SubscribeBody<'a> {
    #[must_use]
    pub const fn new(key: &'a str) -> Self {
        Self { key }
    }

    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

/// Body of POST requests: a DHT value.
///
/// The default is the single-byte value `a` (`YQ==` in base64) with id `"0"`
/// and type `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishBody {
    /// Base64 value data
    pub data: String,
    /// Value id, as a decimal string
    pub id: String,
    /// Value type
    #[serde(rename = "type")]
    pub value_type: u16,
    /// Ask the proxy to keep the value alive
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub permanent: bool,
}

impl Default for PublishBody {
    fn default() -> Self {
        Self {
            data: "YQ==".to_string(),
            id: "0".to_string(),
            value_type: 0,
            permanent: false,
        }
    }
}

impl PublishBody {
    #[must_use]
    pub fn with_permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}
