//! # orderdesk-client: Transport, Configuration and Bootstrap
//!
//! Everything OrderDesk needs to talk to a real backend: the HTTP
//! implementation of the core transport seams, layered configuration, and
//! the bootstrap that turns an order draft into a submitted order.
//!
//! ## Module Organization
//! - [`config`] - `OrderDeskConfig` (defaults → TOML → environment)
//! - [`http`] - `HttpOrderService` over reqwest
//! - [`app`] - `OrderDesk` and `OrderDraft`
//! - [`error`] - Client error types
//!
//! ## Startup Sequence
//! 1. Initialize tracing
//! 2. Load and validate configuration
//! 3. Fetch the catalog and build the menu
//! 4. Apply the order draft to a fresh cart
//! 5. Submit, then apply the post-submission policy

pub mod app;
pub mod config;
pub mod error;
pub mod http;

pub use app::{DraftItem, OrderDesk, OrderDraft};
pub use config::{ApiSettings, CheckoutSettings, OrderDeskConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpOrderService;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG` when set
/// - otherwise `info`, with `debug` for the OrderDesk crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orderdesk_core=debug,orderdesk_client=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
