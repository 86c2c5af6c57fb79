//! Owned sysrepo values.
//!
//! [`SrData`] is the typed payload of a native `sr_val_t`; [`SrVal`] is the
//! flattened form handlers work with, keeping the payload as text the way
//! `sr_val_to_str` renders it.

use std::fmt;

use crate::types::SrType;

/// Typed payload of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum SrData {
    /// A kind with no payload (containers, lists, empty leaves).
    Empty(SrType),
    Binary(String),
    Bits(String),
    Bool(bool),
    Decimal64(f64),
    Enum(String),
    IdentityRef(String),
    InstanceId(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    String(String),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    AnyXml(String),
    AnyData(String),
}

impl SrData {
    /// Returns the value kind of this payload.
    pub fn kind(&self) -> SrType {
        match self {
            SrData::Empty(kind) => *kind,
            SrData::Binary(_) => SrType::Binary,
            SrData::Bits(_) => SrType::Bits,
            SrData::Bool(_) => SrType::Bool,
            SrData::Decimal64(_) => SrType::Decimal64,
            SrData::Enum(_) => SrType::Enum,
            SrData::IdentityRef(_) => SrType::IdentityRef,
            SrData::InstanceId(_) => SrType::InstanceId,
            SrData::Int8(_) => SrType::Int8,
            SrData::Int16(_) => SrType::Int16,
            SrData::Int32(_) => SrType::Int32,
            SrData::Int64(_) => SrType::Int64,
            SrData::String(_) => SrType::String,
            SrData::Uint8(_) => SrType::Uint8,
            SrData::Uint16(_) => SrType::Uint16,
            SrData::Uint32(_) => SrType::Uint32,
            SrData::Uint64(_) => SrType::Uint64,
            SrData::AnyXml(_) => SrType::AnyXml,
            SrData::AnyData(_) => SrType::AnyData,
        }
    }
}

impl fmt::Display for SrData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SrData::Empty(_) => Ok(()),
            SrData::Binary(s)
            | SrData::Bits(s)
            | SrData::Enum(s)
            | SrData::IdentityRef(s)
            | SrData::InstanceId(s)
            | SrData::String(s)
            | SrData::AnyXml(s)
            | SrData::AnyData(s) => f.write_str(s),
            SrData::Bool(v) => write!(f, "{}", v),
            SrData::Decimal64(v) => write!(f, "{}", v),
            SrData::Int8(v) => write!(f, "{}", v),
            SrData::Int16(v) => write!(f, "{}", v),
            SrData::Int32(v) => write!(f, "{}", v),
            SrData::Int64(v) => write!(f, "{}", v),
            SrData::Uint8(v) => write!(f, "{}", v),
            SrData::Uint16(v) => write!(f, "{}", v),
            SrData::Uint32(v) => write!(f, "{}", v),
            SrData::Uint64(v) => write!(f, "{}", v),
        }
    }
}

/// A single value read from the datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrVal {
    /// Full xpath of the node.
    pub xpath: String,
    /// Value kind.
    pub val_type: SrType,
    /// True if the value is the schema default.
    pub default_flag: bool,
    /// Payload rendered as text.
    pub data: String,
}

impl SrVal {
    /// Creates a value from already rendered data.
    pub fn new(
        xpath: impl Into<String>,
        val_type: SrType,
        default_flag: bool,
        data: impl Into<String>,
    ) -> Self {
        Self {
            xpath: xpath.into(),
            val_type,
            default_flag,
            data: data.into(),
        }
    }

    /// Creates a value from a typed payload.
    pub fn from_data(xpath: impl Into<String>, default_flag: bool, data: &SrData) -> Self {
        Self::new(xpath, data.kind(), default_flag, data.to_string())
    }

    /// Renders the payload for display: string-like kinds quoted, binary
    /// bracketed.
    pub fn data_string(&self) -> String {
        if self.val_type.is_string_like() {
            format!("'{}'", self.data)
        } else if self.val_type == SrType::Binary {
            format!("[{}]", self.data)
        } else {
            self.data.clone()
        }
    }
}

impl fmt::Display for SrVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data_string();
        if data.is_empty() {
            write!(f, "{} {}", self.xpath, self.val_type)?;
        } else {
            write!(f, "{} = {} {}", self.xpath, data, self.val_type)?;
        }
        if self.default_flag {
            f.write_str(" default")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_data_kind() {
        assert_eq!(SrData::Bool(true).kind(), SrType::Bool);
        assert_eq!(SrData::Uint16(7).kind(), SrType::Uint16);
        assert_eq!(SrData::Empty(SrType::List).kind(), SrType::List);
    }

    #[test]
    fn test_data_display() {
        assert_eq!(SrData::Bool(false).to_string(), "false");
        assert_eq!(SrData::Int8(-5).to_string(), "-5");
        assert_eq!(SrData::Uint64(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(SrData::Decimal64(1.5).to_string(), "1.5");
        assert_eq!(SrData::Empty(SrType::Container).to_string(), "");
    }

    #[test]
    fn test_from_data() {
        let val = SrVal::from_data("/if:interfaces/interface[name='eth0']/mtu", false, &SrData::Uint16(1500));
        assert_eq!(val.val_type, SrType::Uint16);
        assert_eq!(val.data, "1500");
        assert!(!val.default_flag);
    }

    #[test]
    fn test_data_string_quoting() {
        let s = SrVal::new("/a:b", SrType::String, false, "eth0");
        assert_eq!(s.data_string(), "'eth0'");

        let b = SrVal::new("/a:c", SrType::Binary, false, "AQI=");
        assert_eq!(b.data_string(), "[AQI=]");

        let n = SrVal::new("/a:d", SrType::Int32, false, "42");
        assert_eq!(n.data_string(), "42");
    }

    #[test]
    fn test_display() {
        let val = SrVal::new("/a:b/name", SrType::String, false, "x");
        assert_eq!(val.to_string(), "/a:b/name = 'x' SR_STRING_T");

        let val = SrVal::new("/a:b/enabled", SrType::Bool, true, "true");
        assert_eq!(val.to_string(), "/a:b/enabled = true SR_BOOL_T default");

        let val = SrVal::new("/a:b", SrType::Container, false, "");
        assert_eq!(val.to_string(), "/a:b SR_CONTAINER_T");
    }
}
