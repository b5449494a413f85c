//! Client configuration.

/// Configuration for the chat backend endpoints.
///
/// Use the builder methods to customize:
///
/// ```
/// use sangam_chat::config::ChatConfig;
///
/// let config = ChatConfig::default()
///     .with_base_url("https://api.example.com")
///     .with_ws_host("api.example.com")
///     .with_use_tls(true);
/// ```
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL for HTTP endpoints (history, roster)
    pub base_url: String,
    /// Host (and optional port) for the WebSocket endpoint
    pub ws_host: String,
    /// Use wss:// instead of ws:// for the live channel
    pub use_tls: bool,
    /// Timeout for HTTP requests, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            ws_host: "127.0.0.1:8000".to_string(),
            use_tls: false,
            request_timeout_secs: 30,
        }
    }
}

impl ChatConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the WebSocket host.
    pub fn with_ws_host(mut self, host: impl Into<String>) -> Self {
        self.ws_host = host.into();
        self
    }

    /// Set whether to use TLS for the live channel.
    pub fn with_use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Set the HTTP request timeout in seconds.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}
