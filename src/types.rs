//! Wire type codes and the bound descriptor.
//!
//! A wire type is 16 bits wide: the low byte is the MySQL column type,
//! the high byte carries flags. Only the unsigned flag (`0x8000`) is used
//! for parameters. Written little-endian this gives the two-byte
//! `type, flags` pair the execute packet expects.

use std::fmt;

use serde::Serialize;

/// MySQL column type code, with the unsigned flag folded into bit 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WireType(u16);

impl WireType {
    pub const DECIMAL: WireType = WireType(0);
    pub const TINY: WireType = WireType(1);
    pub const SHORT: WireType = WireType(2);
    pub const LONG: WireType = WireType(3);
    pub const FLOAT: WireType = WireType(4);
    pub const DOUBLE: WireType = WireType(5);
    pub const NULL: WireType = WireType(6);
    pub const TIMESTAMP: WireType = WireType(7);
    pub const LONGLONG: WireType = WireType(8);
    pub const INT24: WireType = WireType(9);
    pub const DATE: WireType = WireType(10);
    pub const TIME: WireType = WireType(11);
    pub const DATETIME: WireType = WireType(12);
    pub const YEAR: WireType = WireType(13);
    pub const NEWDATE: WireType = WireType(14);
    pub const VARCHAR: WireType = WireType(15);
    pub const BIT: WireType = WireType(16);
    pub const NEWDECIMAL: WireType = WireType(246);
    pub const ENUM: WireType = WireType(247);
    pub const SET: WireType = WireType(248);
    pub const TINY_BLOB: WireType = WireType(249);
    pub const MEDIUM_BLOB: WireType = WireType(250);
    pub const LONG_BLOB: WireType = WireType(251);
    pub const BLOB: WireType = WireType(252);
    pub const VAR_STRING: WireType = WireType(253);
    pub const STRING: WireType = WireType(254);
    pub const GEOMETRY: WireType = WireType(255);

    /// Flag bit marking an unsigned integer type.
    pub const UNSIGNED_MASK: u16 = 0x8000;

    /// Every named type code, in code order.
    pub const ALL: [WireType; 27] = [
        Self::DECIMAL,
        Self::TINY,
        Self::SHORT,
        Self::LONG,
        Self::FLOAT,
        Self::DOUBLE,
        Self::NULL,
        Self::TIMESTAMP,
        Self::LONGLONG,
        Self::INT24,
        Self::DATE,
        Self::TIME,
        Self::DATETIME,
        Self::YEAR,
        Self::NEWDATE,
        Self::VARCHAR,
        Self::BIT,
        Self::NEWDECIMAL,
        Self::ENUM,
        Self::SET,
        Self::TINY_BLOB,
        Self::MEDIUM_BLOB,
        Self::LONG_BLOB,
        Self::BLOB,
        Self::VAR_STRING,
        Self::STRING,
        Self::GEOMETRY,
    ];

    /// Build from the raw 16-bit value (type byte plus flags).
    pub const fn from_bits(bits: u16) -> Self {
        WireType(bits)
    }

    /// The raw 16-bit value.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The column type byte, without flags.
    pub const fn code(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// The flag byte sent after the type byte.
    pub const fn flags(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn is_unsigned(self) -> bool {
        self.0 & Self::UNSIGNED_MASK != 0
    }

    /// Same type code with the unsigned flag set.
    pub const fn unsigned(self) -> Self {
        WireType(self.0 | Self::UNSIGNED_MASK)
    }

    /// Same type code with every flag cleared.
    pub const fn base(self) -> Self {
        WireType(self.0 & 0xff)
    }

    /// Wire width of a fixed-width numeric type, `None` for everything else.
    pub fn fixed_width(self) -> Option<usize> {
        match self.base() {
            Self::TINY => Some(1),
            Self::SHORT | Self::YEAR => Some(2),
            Self::LONG | Self::INT24 | Self::FLOAT => Some(4),
            Self::LONGLONG | Self::DOUBLE => Some(8),
            _ => None,
        }
    }

    /// Protocol name of the type code (flags ignored).
    pub fn name(self) -> &'static str {
        match self.base() {
            Self::DECIMAL => "DECIMAL",
            Self::TINY => "TINY",
            Self::SHORT => "SHORT",
            Self::LONG => "LONG",
            Self::FLOAT => "FLOAT",
            Self::DOUBLE => "DOUBLE",
            Self::NULL => "NULL",
            Self::TIMESTAMP => "TIMESTAMP",
            Self::LONGLONG => "LONGLONG",
            Self::INT24 => "INT24",
            Self::DATE => "DATE",
            Self::TIME => "TIME",
            Self::DATETIME => "DATETIME",
            Self::YEAR => "YEAR",
            Self::NEWDATE => "NEWDATE",
            Self::VARCHAR => "VARCHAR",
            Self::BIT => "BIT",
            Self::NEWDECIMAL => "NEWDECIMAL",
            Self::ENUM => "ENUM",
            Self::SET => "SET",
            Self::TINY_BLOB => "TINY_BLOB",
            Self::MEDIUM_BLOB => "MEDIUM_BLOB",
            Self::LONG_BLOB => "LONG_BLOB",
            Self::BLOB => "BLOB",
            Self::VAR_STRING => "VAR_STRING",
            Self::STRING => "STRING",
            Self::GEOMETRY => "GEOMETRY",
            _ => "UNKNOWN",
        }
    }

    /// Look up a type code by protocol name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if self.is_unsigned() {
            f.write_str(" UNSIGNED")?;
        }
        Ok(())
    }
}

/// Declared byte length of a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    /// Exact number of bytes the writer emits.
    Fixed(usize),
    /// Resolved by the writer (length prefix plus payload).
    Variable,
}

impl Length {
    pub fn fixed(self) -> Option<usize> {
        match self {
            Length::Fixed(n) => Some(n),
            Length::Variable => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Fixed(n) => write!(f, "{}", n),
            Length::Variable => f.write_str("var"),
        }
    }
}

/// Static category of a bindable value.
///
/// This is what the binder looks at; it never needs the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// Platform-width signed integer.
    ISize,
    /// Platform-width unsigned integer.
    USize,
    F32,
    F64,
    /// Float of unspecified width.
    Real,
    Bytes,
    Text,
    Blob,
    Datetime,
    Timestamp,
    /// Caller-tagged bytes sent under an explicit type code.
    Raw(WireType),
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::I8 => "i8",
            Kind::U8 => "u8",
            Kind::I16 => "i16",
            Kind::U16 => "u16",
            Kind::I32 => "i32",
            Kind::U32 => "u32",
            Kind::I64 => "i64",
            Kind::U64 => "u64",
            Kind::ISize => "isize",
            Kind::USize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Real => "real",
            Kind::Bytes => "bytes",
            Kind::Text => "text",
            Kind::Blob => "blob",
            Kind::Datetime => "datetime",
            Kind::Timestamp => "timestamp",
            Kind::Raw(_) => "raw",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of binding one value: wire type, indirection, declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundDescriptor {
    pub wire_type: WireType,
    /// The value was supplied through a reference, resolved or not.
    pub indirect: bool,
    pub length: Length,
}

impl BoundDescriptor {
    /// Descriptor for an absent value.
    pub const NULL: BoundDescriptor = BoundDescriptor {
        wire_type: WireType::NULL,
        indirect: false,
        length: Length::Fixed(0),
    };

    pub fn is_unsigned(&self) -> bool {
        self.wire_type.is_unsigned()
    }

    pub fn is_null(&self) -> bool {
        self.wire_type.base() == WireType::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_flag_folding() {
        let t = WireType::LONG.unsigned();
        assert_eq!(t.bits(), 0x8003);
        assert_eq!(t.code(), 3);
        assert_eq!(t.flags(), 0x80);
        assert!(t.is_unsigned());
        assert_eq!(t.base(), WireType::LONG);
        assert_eq!(t.to_string(), "LONG UNSIGNED");
    }

    #[test]
    fn test_fixed_widths() {
        assert_eq!(WireType::TINY.fixed_width(), Some(1));
        assert_eq!(WireType::SHORT.unsigned().fixed_width(), Some(2));
        assert_eq!(WireType::FLOAT.fixed_width(), Some(4));
        assert_eq!(WireType::DOUBLE.fixed_width(), Some(8));
        assert_eq!(WireType::BLOB.fixed_width(), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(WireType::from_name("int24"), Some(WireType::INT24));
        assert_eq!(WireType::from_name("VAR_STRING"), Some(WireType::VAR_STRING));
        assert_eq!(WireType::from_name("nope"), None);
    }

    #[test]
    fn test_all_names_resolve() {
        for t in WireType::ALL {
            assert_ne!(t.name(), "UNKNOWN");
            assert_eq!(WireType::from_name(t.name()), Some(t));
        }
    }
}
