//! Gateway configuration
//!
//! Defaults suit a development host; each field can be overridden from the
//! environment:
//!
//! - `HFPAG_PORT`: serial device path. When set the host port is serial.
//! - `HFPAG_BAUD`: serial speed, default 115200
//! - `HFPAG_LISTEN`: TCP listen address, default `127.0.0.1:3333`
//! - `HFPAG_MAX_LINE`: longest accepted request line in bytes
//! - `HFPAG_REGISTRY_CAPACITY`: command registry size

use crate::command::DEFAULT_CAPACITY;
use crate::transport::DEFAULT_BAUD;
use anyhow::{bail, Context, Result};
use hfpag_shared::codec::DEFAULT_MAX_LINE_LEN;
use std::str::FromStr;

/// Default TCP listen address
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3333";

/// Upper bound for `HFPAG_MAX_LINE`
pub const MAX_LINE_LIMIT: usize = 64 * 1024;

/// Upper bound for `HFPAG_REGISTRY_CAPACITY`
pub const MAX_REGISTRY_CAPACITY: usize = 1024;

/// Where the AT host interface is exposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPortConfig {
    /// UART device (e.g., "/dev/ttyUSB0")
    Serial { path: String, baud: u32 },
    /// TCP listener, one client at a time
    Tcp { address: String },
}

impl Default for HostPortConfig {
    fn default() -> Self {
        Self::Tcp {
            address: DEFAULT_LISTEN.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: HostPortConfig,
    pub max_line_len: usize,
    pub registry_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: HostPortConfig::default(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            registry_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("HFPAG_PORT") {
            let baud = parse_var::<u32, _>(&lookup, "HFPAG_BAUD")?.unwrap_or(DEFAULT_BAUD);
            config.port = HostPortConfig::Serial { path, baud };
        } else if let Some(address) = lookup("HFPAG_LISTEN") {
            config.port = HostPortConfig::Tcp { address };
        }

        if let Some(len) = parse_var::<usize, _>(&lookup, "HFPAG_MAX_LINE")? {
            if !(1..=MAX_LINE_LIMIT).contains(&len) {
                bail!("HFPAG_MAX_LINE must be within 1..={}, got {}", MAX_LINE_LIMIT, len);
            }
            config.max_line_len = len;
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, "HFPAG_REGISTRY_CAPACITY")? {
            if !(1..=MAX_REGISTRY_CAPACITY).contains(&capacity) {
                bail!(
                    "HFPAG_REGISTRY_CAPACITY must be within 1..={}, got {}",
                    MAX_REGISTRY_CAPACITY,
                    capacity
                );
            }
            config.registry_capacity = capacity;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", key, value))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(
            config.port,
            HostPortConfig::Tcp {
                address: "127.0.0.1:3333".into()
            }
        );
        assert_eq!(config.max_line_len, 256);
    }

    #[test]
    fn test_serial_port_wins_over_listen() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HFPAG_PORT", "/dev/ttyUSB0"),
            ("HFPAG_BAUD", "921600"),
            ("HFPAG_LISTEN", "0.0.0.0:4000"),
        ]))
        .unwrap();
        assert_eq!(
            config.port,
            HostPortConfig::Serial {
                path: "/dev/ttyUSB0".into(),
                baud: 921_600
            }
        );
    }

    #[test]
    fn test_serial_default_baud() {
        let config = GatewayConfig::from_lookup(lookup(&[("HFPAG_PORT", "/dev/ttyS1")])).unwrap();
        assert!(matches!(config.port, HostPortConfig::Serial { baud: 115_200, .. }));
    }

    #[test]
    fn test_numeric_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HFPAG_LISTEN", "0.0.0.0:4000"),
            ("HFPAG_MAX_LINE", "512"),
            ("HFPAG_REGISTRY_CAPACITY", "8"),
        ]))
        .unwrap();
        assert_eq!(
            config.port,
            HostPortConfig::Tcp {
                address: "0.0.0.0:4000".into()
            }
        );
        assert_eq!(config.max_line_len, 512);
        assert_eq!(config.registry_capacity, 8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[("HFPAG_MAX_LINE", "big")])).unwrap_err();
        assert!(err.to_string().contains("HFPAG_MAX_LINE"));

        assert!(GatewayConfig::from_lookup(lookup(&[("HFPAG_MAX_LINE", "0")])).is_err());
        assert!(GatewayConfig::from_lookup(lookup(&[("HFPAG_REGISTRY_CAPACITY", "0")])).is_err());
        assert!(GatewayConfig::from_lookup(lookup(&[
            ("HFPAG_PORT", "/dev/ttyS1"),
            ("HFPAG_BAUD", "-9600"),
        ]))
        .is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let huge = usize::MAX.to_string();
        let err = GatewayConfig::from_lookup(lookup(&[("HFPAG_MAX_LINE", huge.as_str())])).unwrap_err();
        assert!(err.to_string().contains("HFPAG_MAX_LINE"));

        let err = GatewayConfig::from_lookup(lookup(&[(
            "HFPAG_REGISTRY_CAPACITY",
            "1000000000000000000",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("HFPAG_REGISTRY_CAPACITY"));

        let config = GatewayConfig::from_lookup(lookup(&[
            ("HFPAG_MAX_LINE", "65536"),
            ("HFPAG_REGISTRY_CAPACITY", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.max_line_len, MAX_LINE_LIMIT);
        assert_eq!(config.registry_capacity, MAX_REGISTRY_CAPACITY);
    }
}
