//! Purpose: Typed codec between raw environment strings and the closed set of value types.
//! Exports: `EnvValue`, `ValueKind`, `KindVisitor`, `canonicalize`, `encode_list`.
//! Role: Single dispatch point for decode/encode; read/write paths never parse on their own.
//! Invariants: Decoding never fails loudly; a rejected raw string leaves the target unchanged.
//! Invariants: `EnvValue` is sealed; the type set is closed and each type has one `ValueKind`.
//! Invariants: `encode` output decodes back to an equal value for every type.
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;
use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};
use time::format_description::well_known::Rfc3339;

use crate::core::duration::{format_duration, parse_duration};
use crate::core::error::{Error, ErrorKind};
use crate::core::net::{IpNet, IpPrefix};

mod private {
    pub trait Sealed {}
}

/// A type that can be read from and written to an environment variable.
///
/// Implemented for integers, floats, `bool`, `String`, [`Duration`],
/// [`OffsetDateTime`] (RFC 3339), IP addresses, socket addresses,
/// [`IpNet`] and [`IpPrefix`]. The trait is sealed.
pub trait EnvValue: Sized + private::Sealed {
    const KIND: ValueKind;

    /// The value `get` returns for an unset or unparsable variable.
    fn zero() -> Self;

    /// Parses an already-trimmed raw string.
    fn parse_raw(raw: &str) -> Option<Self>;

    fn encode(&self) -> String;

    /// Replaces `self` with the decoded value of `raw` (trimmed first).
    ///
    /// Returns `false` and leaves `self` untouched when `raw` does not parse.
    fn decode_into(&mut self, raw: &str) -> bool {
        match Self::parse_raw(raw.trim()) {
            Some(value) => {
                *self = value;
                true
            }
            None => false,
        }
    }

    fn decode(raw: &str) -> Self {
        let mut value = Self::zero();
        value.decode_into(raw);
        value
    }
}

macro_rules! from_str_values {
    ($($ty:ty => $kind:ident, $zero:expr;)*) => {
        $(
            impl private::Sealed for $ty {}

            impl EnvValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn zero() -> Self {
                    $zero
                }

                fn parse_raw(raw: &str) -> Option<Self> {
                    <$ty>::from_str(raw).ok()
                }

                fn encode(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

from_str_values! {
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    isize => Isize, 0;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    usize => Usize, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    IpAddr => IpAddr, IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    Ipv4Addr => Ipv4Addr, Ipv4Addr::UNSPECIFIED;
    Ipv6Addr => Ipv6Addr, Ipv6Addr::UNSPECIFIED;
    IpNet => IpNet, IpNet::default();
    IpPrefix => IpPrefix, IpPrefix::default();
    SocketAddr => SocketAddr, SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    SocketAddrV4 => SocketAddrV4, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0);
    SocketAddrV6 => SocketAddrV6, SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0);
}

impl private::Sealed for bool {}

impl EnvValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn zero() -> Self {
        false
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

impl private::Sealed for String {}

impl EnvValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn zero() -> Self {
        String::new()
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn encode(&self) -> String {
        self.clone()
    }
}

impl private::Sealed for Duration {}

impl EnvValue for Duration {
    const KIND: ValueKind = ValueKind::Duration;

    fn zero() -> Self {
        Duration::ZERO
    }

    /// Unit-suffixed form first, then a bare integer count of milliseconds.
    fn parse_raw(raw: &str) -> Option<Self> {
        parse_duration(raw).or_else(|| raw.parse::<u64>().ok().map(Duration::from_millis))
    }

    fn encode(&self) -> String {
        format_duration(*self)
    }
}

impl private::Sealed for OffsetDateTime {}

impl EnvValue for OffsetDateTime {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn zero() -> Self {
        OffsetDateTime::UNIX_EPOCH
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        OffsetDateTime::parse(raw, &Rfc3339).ok()
    }

    fn encode(&self) -> String {
        // RFC 3339 cannot express sub-minute offsets; the same instant in UTC can.
        let as_utc = || self.checked_to_offset(UtcOffset::UTC)?.format(&Rfc3339).ok();
        self.format(&Rfc3339)
            .ok()
            .or_else(as_utc)
            // Years outside 0..=9999 have no RFC 3339 form at all.
            .unwrap_or_else(|| self.to_string())
    }
}

/// Encodes each value and joins them with `,`.
pub fn encode_list<T: EnvValue>(values: &[T]) -> String {
    values
        .iter()
        .map(EnvValue::encode)
        .collect::<Vec<_>>()
        .join(",")
}

/// Runtime tag for each [`EnvValue`] type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    String,
    Timestamp,
    Duration,
    IpAddr,
    Ipv4Addr,
    Ipv6Addr,
    IpNet,
    IpPrefix,
    SocketAddr,
    SocketAddrV4,
    SocketAddrV6,
}

/// Generic callback resolved against the concrete type behind a [`ValueKind`].
pub trait KindVisitor {
    type Output;

    fn visit<T: EnvValue>(self) -> Self::Output;
}

impl ValueKind {
    pub const ALL: [ValueKind; 24] = [
        ValueKind::I8,
        ValueKind::I16,
        ValueKind::I32,
        ValueKind::I64,
        ValueKind::Isize,
        ValueKind::U8,
        ValueKind::U16,
        ValueKind::U32,
        ValueKind::U64,
        ValueKind::Usize,
        ValueKind::F32,
        ValueKind::F64,
        ValueKind::Bool,
        ValueKind::String,
        ValueKind::Timestamp,
        ValueKind::Duration,
        ValueKind::IpAddr,
        ValueKind::Ipv4Addr,
        ValueKind::Ipv6Addr,
        ValueKind::IpNet,
        ValueKind::IpPrefix,
        ValueKind::SocketAddr,
        ValueKind::SocketAddrV4,
        ValueKind::SocketAddrV6,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::Isize => "isize",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::Usize => "usize",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Duration => "duration",
            ValueKind::IpAddr => "ip",
            ValueKind::Ipv4Addr => "ipv4",
            ValueKind::Ipv6Addr => "ipv6",
            ValueKind::IpNet => "ip-net",
            ValueKind::IpPrefix => "ip-prefix",
            ValueKind::SocketAddr => "socket-addr",
            ValueKind::SocketAddrV4 => "socket-addr-v4",
            ValueKind::SocketAddrV6 => "socket-addr-v6",
        }
    }

    pub fn visit<V: KindVisitor>(self, visitor: V) -> V::Output {
        match self {
            ValueKind::I8 => visitor.visit::<i8>(),
            ValueKind::I16 => visitor.visit::<i16>(),
            ValueKind::I32 => visitor.visit::<i32>(),
            ValueKind::I64 => visitor.visit::<i64>(),
            ValueKind::Isize => visitor.visit::<isize>(),
            ValueKind::U8 => visitor.visit::<u8>(),
            ValueKind::U16 => visitor.visit::<u16>(),
            ValueKind::U32 => visitor.visit::<u32>(),
            ValueKind::U64 => visitor.visit::<u64>(),
            ValueKind::Usize => visitor.visit::<usize>(),
            ValueKind::F32 => visitor.visit::<f32>(),
            ValueKind::F64 => visitor.visit::<f64>(),
            ValueKind::Bool => visitor.visit::<bool>(),
            ValueKind::String => visitor.visit::<String>(),
            ValueKind::Timestamp => visitor.visit::<OffsetDateTime>(),
            ValueKind::Duration => visitor.visit::<Duration>(),
            ValueKind::IpAddr => visitor.visit::<IpAddr>(),
            ValueKind::Ipv4Addr => visitor.visit::<Ipv4Addr>(),
            ValueKind::Ipv6Addr => visitor.visit::<Ipv6Addr>(),
            ValueKind::IpNet => visitor.visit::<IpNet>(),
            ValueKind::IpPrefix => visitor.visit::<IpPrefix>(),
            ValueKind::SocketAddr => visitor.visit::<SocketAddr>(),
            ValueKind::SocketAddrV4 => visitor.visit::<SocketAddrV4>(),
            ValueKind::SocketAddrV6 => visitor.visit::<SocketAddrV6>(),
        }
    }

    /// Canonical encoding of this kind's zero value.
    pub fn zero_text(self) -> String {
        struct Zero;

        impl KindVisitor for Zero {
            type Output = String;

            fn visit<T: EnvValue>(self) -> String {
                T::zero().encode()
            }
        }

        self.visit(Zero)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("unknown value kind '{s}'"))
                    .with_hint("Run `typenv kinds` to list supported kinds.")
            })
    }
}

/// Decodes `raw` as `kind` and re-encodes it; `None` when `raw` does not parse.
pub fn canonicalize(kind: ValueKind, raw: &str) -> Option<String> {
    struct Canonical<'a>(&'a str);

    impl KindVisitor for Canonical<'_> {
        type Output = Option<String>;

        fn visit<T: EnvValue>(self) -> Option<String> {
            T::parse_raw(self.0.trim()).map(|value| value.encode())
        }
    }

    kind.visit(Canonical(raw))
}

#[cfg(test)]
mod tests {
    use super::{EnvValue, ValueKind, canonicalize, encode_list};
    use crate::core::net::IpNet;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;
    use time::OffsetDateTime;
    use time::macros::datetime;

    #[test]
    fn bool_literals_are_case_insensitive() {
        for raw in ["true", "TRUE", "Yes", "on", "1", " On "] {
            assert_eq!(bool::parse_raw(raw.trim()), Some(true), "raw {raw:?}");
        }
        for raw in ["false", "No", "OFF", "0"] {
            assert_eq!(bool::parse_raw(raw), Some(false), "raw {raw:?}");
        }
        for raw in ["", "of", "2", "t", "enabled"] {
            assert_eq!(bool::parse_raw(raw), None, "raw {raw:?}");
        }
    }

    #[test]
    fn failed_decode_keeps_pre_seeded_value() {
        let mut flag = true;
        assert!(!flag.decode_into(""));
        assert!(flag);

        let mut port: u16 = 8080;
        assert!(!port.decode_into("70000"));
        assert_eq!(port, 8080);
        assert!(port.decode_into(" 9090 "));
        assert_eq!(port, 9090);

        let mut small: i8 = -3;
        assert!(!small.decode_into("128"));
        assert_eq!(small, -3);
    }

    #[test]
    fn strings_are_trimmed_verbatim() {
        assert_eq!(String::decode("  hello world \n"), "hello world");
        assert_eq!(String::decode(""), "");
    }

    #[test]
    fn floats_accept_scientific_notation() {
        assert_eq!(f64::decode("1.5e3"), 1500.0);
        assert_eq!(f32::decode("4.2"), 4.2f32);
        assert_eq!(f32::decode("4.2").encode(), "4.2");
        assert_eq!(f64::decode("abc"), 0.0);
    }

    #[test]
    fn duration_falls_back_to_milliseconds() {
        assert_eq!(Duration::decode("3600"), Duration::from_millis(3_600));
        assert_eq!(Duration::decode("1h"), Duration::from_secs(3_600));
        assert_eq!(Duration::decode("-5"), Duration::ZERO);
        assert_eq!(Duration::from_secs(3_600).encode(), "1h0m0s");
    }

    #[test]
    fn timestamp_uses_rfc3339() {
        let ts = OffsetDateTime::decode("2026-10-19T08:30:00+02:00");
        assert_eq!(ts, datetime!(2026-10-19 08:30:00 +02:00));
        assert_eq!(ts.encode(), "2026-10-19T08:30:00+02:00");
        assert_eq!(OffsetDateTime::decode("yesterday"), OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn sub_minute_offsets_encode_as_utc() {
        let ts = datetime!(2026-01-01 00:00:00 +01:00:30);
        assert_eq!(ts.encode(), "2025-12-31T22:59:30Z");
        let mut back = OffsetDateTime::UNIX_EPOCH;
        assert!(back.decode_into(&ts.encode()));
        assert_eq!(back, ts);
    }

    #[test]
    fn network_values_decode() {
        assert_eq!(
            IpAddr::decode(" 10.1.2.3 "),
            IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))
        );
        assert_eq!(IpNet::decode("192.168.0.10/24").encode(), "192.168.0.10/24");
        assert_eq!(
            SocketAddr::decode("[::1]:8443").encode(),
            "[::1]:8443"
        );
        assert_eq!(SocketAddr::decode("::1").encode(), "0.0.0.0:0");
    }

    #[test]
    fn encode_list_joins_with_commas() {
        assert_eq!(encode_list(&[true, false, true]), "true,false,true");
        assert_eq!(encode_list::<u8>(&[]), "");
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ValueKind::ALL {
            assert_eq!(kind.as_str().parse::<ValueKind>().expect("kind"), kind);
        }
        let err = "uuid".parse::<ValueKind>().unwrap_err();
        assert_eq!(err.message(), Some("unknown value kind 'uuid'"));
    }

    #[test]
    fn zero_text_decodes_to_zero() {
        for kind in ValueKind::ALL {
            let zero = kind.zero_text();
            assert_eq!(canonicalize(kind, &zero), Some(zero.clone()), "kind {kind}");
        }
        assert_eq!(ValueKind::Timestamp.zero_text(), "1970-01-01T00:00:00Z");
        assert_eq!(ValueKind::IpNet.zero_text(), "0.0.0.0/0");
    }

    #[test]
    fn canonicalize_dispatches_on_kind() {
        assert_eq!(canonicalize(ValueKind::Bool, "YES"), Some("true".to_string()));
        assert_eq!(canonicalize(ValueKind::Duration, "90s"), Some("1m30s".to_string()));
        assert_eq!(
            canonicalize(ValueKind::IpPrefix, "10.9.8.7/16"),
            Some("10.9.0.0/16".to_string())
        );
        assert_eq!(canonicalize(ValueKind::U8, "256"), None);
        assert_eq!(canonicalize(ValueKind::String, "  x  "), Some("x".to_string()));
    }
}
