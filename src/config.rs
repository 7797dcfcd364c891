//! Service configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default spreadsheet file name, relative to the install directory.
pub const DEFAULT_DATA_FILE: &str = "data.xlsx";

/// Default fallback document, relative to the install directory.
pub const DEFAULT_STATIC_FILE: &str = "single_app.html";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address to bind
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,

    /// Backing spreadsheet
    pub data_file: PathBuf,

    /// Document served for every path outside the API
    pub static_file: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let dir = install_dir();
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_file: dir.join(DEFAULT_DATA_FILE),
            static_file: dir.join(DEFAULT_STATIC_FILE),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the spreadsheet path.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Set the fallback document path.
    pub fn with_static_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_file = path.into();
        self
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Directory containing the running executable, or `.` if unknown.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 3001);
        assert!(config.data_file.ends_with("data.xlsx"));
        assert!(config.static_file.ends_with("single_app.html"));
        assert_eq!(config.data_file.parent(), Some(install_dir().as_path()));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3001");
    }

    #[test]
    fn test_builder() {
        let config = ServiceConfig::new()
            .with_host(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .with_port(8080)
            .with_data_file("/srv/optics.xlsx")
            .with_static_file("/srv/index.html");

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_file, PathBuf::from("/srv/optics.xlsx"));
        assert_eq!(config.static_file, PathBuf::from("/srv/index.html"));
    }
}
