//! API server configuration.

use coach_core::config::ChatKitConfig;

/// Default listener address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3100";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// Upstream ChatKit settings used by the relay.
    pub chatkit: ChatKitConfig,
}
