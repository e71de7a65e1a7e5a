//! Type binder: maps a value's static kind to a [`BoundDescriptor`].
//!
//! Binding is total over [`Param`] and never looks at the value behind a
//! reference, so an unresolved reference binds exactly like a resolved one.

use serde::Deserialize;

use crate::param::{Param, ToParam};
use crate::types::{BoundDescriptor, Kind, Length, WireType};

/// How platform-width numbers (`isize`, `usize`, [`Real`](crate::Real)) are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthPolicy {
    /// Always 32-bit: LONG for integers, FLOAT for reals. Wider values are truncated.
    #[default]
    Narrow,
    /// Host width for integers (LONGLONG on 64-bit targets), DOUBLE for reals.
    Native,
}

impl std::str::FromStr for WidthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrow" => Ok(WidthPolicy::Narrow),
            "native" => Ok(WidthPolicy::Native),
            other => Err(format!("unknown width policy '{}'", other)),
        }
    }
}

/// Produces bound descriptors under a fixed [`WidthPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binder {
    policy: WidthPolicy,
}

impl Binder {
    pub fn new(policy: WidthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> WidthPolicy {
        self.policy
    }

    /// Bind a native value.
    pub fn bind_value<V: ToParam + ?Sized>(&self, value: &V) -> BoundDescriptor {
        self.bind(&value.to_param())
    }

    /// Bind a [`Param`].
    pub fn bind(&self, param: &Param<'_>) -> BoundDescriptor {
        let descriptor = match param.kind() {
            None => BoundDescriptor::NULL,
            Some(kind) => {
                let (wire_type, length) = self.describe(kind);
                BoundDescriptor {
                    wire_type,
                    indirect: param.is_indirect() || matches!(kind, Kind::Raw(_)),
                    length,
                }
            }
        };
        tracing::trace!(
            kind = ?param.kind(),
            wire_type = %descriptor.wire_type,
            indirect = descriptor.indirect,
            length = %descriptor.length,
            "bound value"
        );
        descriptor
    }

    /// Wire type and declared length for a static kind.
    pub fn describe(&self, kind: Kind) -> (WireType, Length) {
        let wire_type = match kind {
            Kind::I8 => WireType::TINY,
            Kind::U8 => WireType::TINY.unsigned(),
            Kind::I16 => WireType::SHORT,
            Kind::U16 => WireType::SHORT.unsigned(),
            Kind::I32 => WireType::LONG,
            Kind::U32 => WireType::LONG.unsigned(),
            Kind::I64 => WireType::LONGLONG,
            Kind::U64 => WireType::LONGLONG.unsigned(),
            Kind::ISize => self.generic_int(),
            Kind::USize => self.generic_int().unsigned(),
            Kind::F32 => WireType::FLOAT,
            Kind::F64 => WireType::DOUBLE,
            Kind::Real => match self.policy {
                WidthPolicy::Narrow => WireType::FLOAT,
                WidthPolicy::Native => WireType::DOUBLE,
            },
            Kind::Bytes => return (WireType::VAR_STRING, Length::Variable),
            Kind::Text => return (WireType::STRING, Length::Variable),
            Kind::Blob => return (WireType::BLOB, Length::Variable),
            Kind::Datetime => return (WireType::DATETIME, Length::Variable),
            Kind::Timestamp => return (WireType::TIMESTAMP, Length::Variable),
            Kind::Raw(code) => return (code, Length::Variable),
        };
        let width = wire_type
            .fixed_width()
            .unwrap_or_else(|| unreachable!("{} is not a fixed-width type", wire_type));
        (wire_type, Length::Fixed(width))
    }

    fn generic_int(&self) -> WireType {
        match self.policy {
            WidthPolicy::Narrow => WireType::LONG,
            WidthPolicy::Native if usize::BITS > 32 => WireType::LONGLONG,
            WidthPolicy::Native => WireType::LONG,
        }
    }
}
