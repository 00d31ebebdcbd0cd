use clap::Parser;

/// Command-line / environment configuration for the demo server.
#[derive(Debug, Clone, Parser)]
#[command(name = "runtime-headers", version, about = "Per-request runtime headers demo server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "RUNTIME_HEADERS_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Also emit a W3C `Server-Timing` header
    #[arg(long, env = "RUNTIME_HEADERS_SERVER_TIMING")]
    pub server_timing: bool,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "RUNTIME_HEADERS_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn runtime_headers(&self) -> RuntimeHeadersConfig {
        RuntimeHeadersConfig {
            server_timing: self.server_timing,
        }
    }
}

/// Options for the runtime headers middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeHeadersConfig {
    /// Emit `Server-Timing` in addition to the `X-*` headers.
    pub server_timing: bool,
}
