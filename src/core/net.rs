//! Purpose: CIDR-notation network types for environment values.
//! Exports: `IpNet`, `IpPrefix`, `ParseNetError`.
//! Role: `IpNet` keeps the host address as written; `IpPrefix` is masked to the network base.
//! Invariants: `prefix_len` never exceeds the address family width (32 or 128).
//! Invariants: `Display` output parses back to an equal value.
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseNetError {
    MissingPrefix,
    InvalidAddress,
    InvalidPrefixLen,
}

impl fmt::Display for ParseNetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseNetError::MissingPrefix => "missing '/<prefix-len>'",
            ParseNetError::InvalidAddress => "invalid IP address",
            ParseNetError::InvalidPrefixLen => "invalid prefix length",
        };
        f.write_str(text)
    }
}

impl std::error::Error for ParseNetError {}

/// An address plus prefix length, e.g. `192.168.0.10/24`.
///
/// The host bits are kept as parsed; use [`IpNet::network`] for the base.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix_len: u8,
}

/// A network base plus prefix length, e.g. `192.168.0.0/24`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct IpPrefix {
    network: IpAddr,
    prefix_len: u8,
}

fn max_prefix_len(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX
                .checked_shl(128 - u32::from(prefix_len))
                .unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}

fn parse_cidr(input: &str) -> Result<(IpAddr, u8), ParseNetError> {
    let (addr, len) = input.split_once('/').ok_or(ParseNetError::MissingPrefix)?;
    let addr = IpAddr::from_str(addr).map_err(|_| ParseNetError::InvalidAddress)?;
    if len.is_empty() || len.len() > 3 || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseNetError::InvalidPrefixLen);
    }
    let prefix_len: u8 = len.parse().map_err(|_| ParseNetError::InvalidPrefixLen)?;
    if prefix_len > max_prefix_len(addr) {
        return Err(ParseNetError::InvalidPrefixLen);
    }
    Ok((addr, prefix_len))
}

impl IpNet {
    /// Returns `None` when `prefix_len` exceeds the address family width.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Option<Self> {
        (prefix_len <= max_prefix_len(addr)).then_some(Self { addr, prefix_len })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn network(&self) -> IpAddr {
        mask(self.addr, self.prefix_len)
    }

    pub fn prefix(&self) -> IpPrefix {
        IpPrefix {
            network: self.network(),
            prefix_len: self.prefix_len,
        }
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.prefix().contains(addr)
    }
}

impl IpPrefix {
    /// Masks `addr` down to the network base.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Option<Self> {
        (prefix_len <= max_prefix_len(addr)).then(|| Self {
            network: mask(addr, prefix_len),
            prefix_len,
        })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        let same_family = matches!(
            (self.network, addr),
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_))
        );
        same_family && mask(addr, self.prefix_len) == self.network
    }
}

impl Default for IpNet {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl Default for IpPrefix {
    fn default() -> Self {
        Self {
            network: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl FromStr for IpNet {
    type Err = ParseNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix_len) = parse_cidr(s)?;
        Ok(Self { addr, prefix_len })
    }
}

impl FromStr for IpPrefix {
    type Err = ParseNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let leading_zero = s
            .split_once('/')
            .is_some_and(|(_, len)| len.len() > 1 && len.starts_with('0'));
        if leading_zero {
            return Err(ParseNetError::InvalidPrefixLen);
        }
        let (addr, prefix_len) = parse_cidr(s)?;
        Ok(Self {
            network: mask(addr, prefix_len),
            prefix_len,
        })
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl Serialize for IpNet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpNet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for IpPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpPrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
