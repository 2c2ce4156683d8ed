//! # Proxybench
//!
//! A load generator for the publish/subscribe fan-out path of a DHT proxy.
//!
//! ## Modes
//!
//! - **subscribe** (`proxybench c <KEY>`): `SUBSCRIBE` every listener in
//!   `[base_hash, base_hash + listeners)`, one request at a time
//! - **unsubscribe** (`proxybench d <KEY>`): `UNSUBSCRIBE` every listener; only
//!   every 100th carries the real key
//! - **publish** (`proxybench`): 240 workers `POST` a fixed value to random
//!   listeners until stopped
//!
//! ## Library use
//!
//! ```rust,no_run
//! use proxybench::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LoadOptions::default().with_listeners(100).with_echo(false);
//! let transport = Arc::new(HttpTransport::new(&options)?);
//! let mode = Mode::from_args(&["c", "device-key"])?;
//!
//! let report = run(mode, options, transport, CancellationToken::new()).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

#[allow(missing_docs)]
pub mod app;
#[allow(missing_docs)]
pub mod cli;
/// Tracing subscriber setup.
pub mod dev_tracing;
#[allow(missing_docs)]
pub mod mode;

pub use app::{run, RunReport};
pub use mode::Mode;

/// Commonly used types.
pub mod prelude {
    pub use crate::app::{run, RunReport};
    pub use crate::mode::Mode;
    pub use proxybench_core::prelude::*;
    pub use proxybench_http::{
        HttpTransport, ProxyMethod, ProxyRequest, ProxyTransport, PublishPool, SweepReport,
        SweepRunner,
    };
    pub use tokio_util::sync::CancellationToken;
}
