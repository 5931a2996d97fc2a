//! Bluetooth device address
//!
//! Textual form is six colon-separated hex groups: `XX:XX:XX:XX:XX:XX`.
//! Groups may be one or two hex digits in either case; anything else is
//! rejected rather than truncated.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of octets in a Bluetooth device address
pub const BD_ADDR_LEN: usize = 6;

/// Reasons an address string fails to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("expected {BD_ADDR_LEN} octets, found {0}")]
    WrongOctetCount(usize),

    #[error("octet {0} is empty")]
    EmptyOctet(usize),

    #[error("octet {index} is not hex: {text:?}")]
    NotHex { index: usize, text: String },

    #[error("octet {index} is longer than two digits: {text:?}")]
    OctetTooLong { index: usize, text: String },
}

/// A 6-byte hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BdAddr([u8; BD_ADDR_LEN]);

impl BdAddr {
    pub const fn new(bytes: [u8; BD_ADDR_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn octets(&self) -> [u8; BD_ADDR_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; BD_ADDR_LEN] {
        &self.0
    }
}

impl From<[u8; BD_ADDR_LEN]> for BdAddr {
    fn from(bytes: [u8; BD_ADDR_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for BdAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups: Vec<&str> = s.split(':').collect();
        if groups.len() != BD_ADDR_LEN {
            return Err(AddressError::WrongOctetCount(groups.len()));
        }

        let mut bytes = [0u8; BD_ADDR_LEN];
        for (index, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(AddressError::EmptyOctet(index));
            }
            if !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AddressError::NotHex {
                    index,
                    text: (*group).to_string(),
                });
            }
            if group.len() > 2 {
                return Err(AddressError::OctetTooLong {
                    index,
                    text: (*group).to_string(),
                });
            }
            // At most two hex digits, so this cannot overflow a u8
            bytes[index] = u8::from_str_radix(group, 16).map_err(|_| AddressError::NotHex {
                index,
                text: (*group).to_string(),
            })?;
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}
