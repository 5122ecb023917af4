use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener and request policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_ip")]
    pub bind_ip: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Serve URLs outside the built-in whitelist
    #[serde(default)]
    pub rest: bool,
    /// Honor the `jsonp` query parameter
    #[serde(default)]
    pub jsonp: bool,
    /// Register status sections that only make sense with the HTTP console on
    #[serde(default = "default_http_interface")]
    pub http_interface: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_ip: default_bind_ip(),
            port: default_port(),
            rest: false,
            jsonp: false,
            http_interface: default_http_interface(),
        }
    }
}

fn default_bind_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    28017
}

fn default_http_interface() -> bool {
    true
}

/// Digest authentication settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default)]
    pub users: Vec<AdminUserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            users: Vec::new(),
        }
    }
}

fn default_realm() -> String {
    "console".to_string()
}

/// One administrative user.
///
/// Either `password_digest` (hex `md5(name:realm:password)`) or `password`
/// must be set unless the user is external.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminUserConfig {
    pub name: String,
    pub password_digest: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub external: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Lines kept in memory for the log status section
    #[serde(default = "default_ram_log_lines")]
    pub ram_log_lines: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            ram_log_lines: default_ram_log_lines(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_ram_log_lines() -> usize {
    128
}
