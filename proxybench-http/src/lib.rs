//! # Proxybench HTTP
//!
//! Load generation against a DHT proxy over HTTP.
//!
//! ## Overview
//!
//! - **Sweeps**: sequential `SUBSCRIBE` / `UNSUBSCRIBE` over the listener range
//! - **Publish pool**: a fixed set of workers `POST`ing to random listeners
//! - **Transport**: the [`ProxyTransport`] seam, implemented by
//!   [`HttpTransport`] on top of `reqwest`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proxybench_core::options::LoadOptions;
//! use proxybench_http::{HttpTransport, SweepRunner};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Arc::new(LoadOptions::default().with_listeners(100));
//!     let transport = Arc::new(HttpTransport::new(&options)?);
//!
//!     let runner = SweepRunner::new(transport, options)?;
//!     let report = runner.subscribe("device-key", &CancellationToken::new()).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod method;
pub mod publisher;
pub mod sweep;
pub mod transport;

pub use method::ProxyMethod;
pub use publisher::PublishPool;
pub use sweep::{SweepFailure, SweepKind, SweepReport, SweepRunner};
pub use transport::{HttpTransport, ProxyRequest, ProxyTransport};
