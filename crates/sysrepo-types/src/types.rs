//! Rust views of the sysrepo C enums.
//!
//! The native library hands these values across the boundary as plain
//! integers. Each enum here offers `from_raw` (which rejects unknown
//! discriminants instead of transmuting them), `as_raw`, the C constant name
//! for display, and parsing back from that name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

macro_rules! define_c_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $value:literal => $cname:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// All values in header order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Creates a value from its raw C representation.
            pub fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns the raw C representation.
            pub const fn as_raw(self) -> i32 {
                self as i32
            }

            /// Returns the C constant name.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $cname,)+
                }
            }

            /// Renders a raw value, falling back to `Name(n)` when unknown.
            pub fn describe_raw(raw: i32) -> String {
                match Self::from_raw(raw) {
                    Some(v) => v.name().to_string(),
                    None => format!("{}({})", stringify!($name), raw),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| TypesError::unknown_name(stringify!($name), s))
            }
        }
    };
}

define_c_enum! {
    /// Value kinds (`sr_type_t`).
    SrType {
        Unknown = 0 => "SR_UNKNOWN_T",
        TreeIterator = 1 => "SR_TREE_ITERATOR_T",
        List = 2 => "SR_LIST_T",
        Container = 3 => "SR_CONTAINER_T",
        ContainerPresence = 4 => "SR_CONTAINER_PRESENCE_T",
        LeafEmpty = 5 => "SR_LEAF_EMPTY_T",
        Binary = 6 => "SR_BINARY_T",
        Bits = 7 => "SR_BITS_T",
        Bool = 8 => "SR_BOOL_T",
        Decimal64 = 9 => "SR_DECIMAL64_T",
        Enum = 10 => "SR_ENUM_T",
        IdentityRef = 11 => "SR_IDENTITYREF_T",
        InstanceId = 12 => "SR_INSTANCEID_T",
        Int8 = 13 => "SR_INT8_T",
        Int16 = 14 => "SR_INT16_T",
        Int32 = 15 => "SR_INT32_T",
        Int64 = 16 => "SR_INT64_T",
        String = 17 => "SR_STRING_T",
        Uint8 = 18 => "SR_UINT8_T",
        Uint16 = 19 => "SR_UINT16_T",
        Uint32 = 20 => "SR_UINT32_T",
        Uint64 = 21 => "SR_UINT64_T",
        AnyXml = 22 => "SR_ANYXML_T",
        AnyData = 23 => "SR_ANYDATA_T",
    }
}

impl SrType {
    /// Returns true for kinds whose payload is rendered quoted.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            SrType::Enum | SrType::IdentityRef | SrType::String | SrType::InstanceId
        )
    }

    /// Returns true for kinds that carry no payload of their own.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            SrType::Unknown
                | SrType::TreeIterator
                | SrType::List
                | SrType::Container
                | SrType::ContainerPresence
                | SrType::LeafEmpty
        )
    }
}

define_c_enum! {
    /// Phases of a change notification (`sr_notif_event_t`).
    SrNotifEvent {
        Verify = 0 => "SR_EV_VERIFY",
        Apply = 1 => "SR_EV_APPLY",
        Abort = 2 => "SR_EV_ABORT",
        Enabled = 3 => "SR_EV_ENABLED",
    }
}

define_c_enum! {
    /// Kind of a single datastore change (`sr_change_oper_t`).
    SrChangeOper {
        Created = 0 => "SR_OP_CREATED",
        Modified = 1 => "SR_OP_MODIFIED",
        Deleted = 2 => "SR_OP_DELETED",
        Moved = 3 => "SR_OP_MOVED",
    }
}

/// Log severity (`sr_log_level_t`).
///
/// Ordered by verbosity: `None < Err < Wrn < Inf < Dbg`. A threshold of
/// `Inf` therefore passes `Err`, `Wrn` and `Inf`.
#[repr(i32)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SrLogLevel {
    #[default]
    None = 0,
    Err = 1,
    Wrn = 2,
    Inf = 3,
    Dbg = 4,
}

impl SrLogLevel {
    /// All levels, least verbose first.
    pub const ALL: &'static [SrLogLevel] = &[
        SrLogLevel::None,
        SrLogLevel::Err,
        SrLogLevel::Wrn,
        SrLogLevel::Inf,
        SrLogLevel::Dbg,
    ];

    /// Creates a level from its raw C representation.
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    /// Returns the raw C representation.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns the short name used in logs and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            SrLogLevel::None => "NONE",
            SrLogLevel::Err => "ERR",
            SrLogLevel::Wrn => "WRN",
            SrLogLevel::Inf => "INF",
            SrLogLevel::Dbg => "DBG",
        }
    }

    /// Returns true if a message at `level` passes this threshold.
    pub fn admits(self, level: SrLogLevel) -> bool {
        level != SrLogLevel::None && level <= self
    }
}

impl fmt::Display for SrLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SrLogLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::unknown_name("SrLogLevel", s))
    }
}
