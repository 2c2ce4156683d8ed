//! Mode selection from positional arguments.
//!
//! | Arguments         | Mode        |
//! |-------------------|-------------|
//! | `c <device-key>`  | subscribe   |
//! | `d <device-key>`  | unsubscribe |
//! | `d` alone         | error       |
//! | anything else     | publish     |
//!
//! Only the exact two-argument shapes select a sweep. `d` without a usable
//! key is rejected instead of falling back to publish.

use proxybench_core::error::{ProxyBenchError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Sequential SUBSCRIBE over the range
    Subscribe { device_key: String },
    /// Sequential UNSUBSCRIBE over the range
    Unsubscribe { device_key: String },
    /// Concurrent POST workers
    Publish,
}

impl Mode {
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let key = |raw: &str| Some(raw.trim()).filter(|k| !k.is_empty()).map(str::to_string);

        match args.as_slice() {
            ["c" | "subscribe", raw] => Ok(key(*raw).map_or(Self::Publish, |device_key| {
                Self::Subscribe { device_key }
            })),
            ["d" | "unsubscribe", raw] => key(*raw)
                .map(|device_key| Self::Unsubscribe { device_key })
                .ok_or(ProxyBenchError::MissingDeviceKey {
                    mode: "unsubscribe",
                }),
            ["d" | "unsubscribe"] => Err(ProxyBenchError::MissingDeviceKey {
                mode: "unsubscribe",
            }),
            _ => Ok(Self::Publish),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Subscribe { .. } => "subscribe",
            Self::Unsubscribe { .. } => "unsubscribe",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
