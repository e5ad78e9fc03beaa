//! Server configuration from environment variables.

use std::net::SocketAddr;

/// 8468 is ascii for "TD"
const DEFAULT_PORT: u16 = 8468;
const DEFAULT_ROOM_TTL_HOURS: u64 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (BIND_ADDR).
    pub bind_addr: SocketAddr,
    /// Rooms older than this are swept by the janitor (ROOM_TTL_HOURS).
    pub room_ttl_hours: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("ignoring malformed BIND_ADDR: {}", s);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let room_ttl_hours = std::env::var("ROOM_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ROOM_TTL_HOURS);

        Self {
            bind_addr,
            room_ttl_hours,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            room_ttl_hours: DEFAULT_ROOM_TTL_HOURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        std::env::remove_var("BIND_ADDR");
        std::env::remove_var("ROOM_TTL_HOURS");
        let config = Config::from_env();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.room_ttl_hours, DEFAULT_ROOM_TTL_HOURS);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("BIND_ADDR", "127.0.0.1:9000");
        std::env::set_var("ROOM_TTL_HOURS", "2");
        let config = Config::from_env();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.room_ttl_hours, 2);
        std::env::remove_var("BIND_ADDR");
        std::env::remove_var("ROOM_TTL_HOURS");
    }

    #[test]
    #[serial]
    fn test_malformed_bind_addr_falls_back() {
        std::env::set_var("BIND_ADDR", "not-an-addr");
        let config = Config::from_env();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        std::env::remove_var("BIND_ADDR");
    }
}
