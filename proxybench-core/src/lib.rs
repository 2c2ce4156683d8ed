//! Proxybench Core
//!
//! This crate contains the protocol-agnostic building blocks:
//! - Load generator configuration (`options`)
//! - Proxy base URL handling (`endpoint`)
//! - Listener identifier range and sampling (`range`)
//! - Pre-encoded request bodies (`payload`)
//! - Global request pacing (`pacing`)
//! - Per-worker failure backoff (`backoff`)
//! - Publish counters (`stats`)
//! - Error types (`error`)

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
pub mod backoff;
pub mod endpoint;
pub mod error;
pub mod options;
pub mod pacing;
pub mod payload;
pub mod range;
pub mod stats;

pub mod prelude {
    pub use crate::backoff::FailureBackoff;
    pub use crate::endpoint::{EndpointError, ProxyEndpoint};
    pub use crate::error::ProxyBenchError;
    pub use crate::options::{FailurePolicy, LoadOptions};
    pub use crate::pacing::{IntervalPacer, NoOpPacer, Pacer};
    pub use crate::payload::{PublishBody, SubscribeBody, PLACEHOLDER_KEY};
    pub use crate::range::ListenerRange;
    pub use crate::stats::{PublishStats, PublishSummary};
}
