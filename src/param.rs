//! Bindable values.
//!
//! [`Param`] is the closed set of everything the binder accepts. Native
//! Rust values reach it through [`ToParam`], which is resolved at compile
//! time; [`Param::from_any`] is the dynamic fallback and the only place an
//! unsupported type is reported at runtime.
//!
//! ```
//! use mybind::{Param, ToParam, Kind};
//!
//! let n = 6u32;
//! assert!(!n.to_param().is_indirect());
//! assert!(Param::by_ref(Some(&n)).is_indirect());
//!
//! let missing: Option<&u32> = None;
//! assert_eq!(missing.to_param(), Param::Ref { kind: Kind::U32, target: None });
//! ```

use std::any::Any;

use crate::error::{BindError, BindResult};
use crate::temporal::{Datetime, Timestamp};
use crate::types::{Kind, WireType};

/// Large binary object, bound as BLOB rather than VAR_STRING.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

/// Floating-point value whose wire width follows the binder's width policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Real(pub f64);

/// Caller-owned bytes sent verbatim under an explicit wire type.
///
/// Always binds as an indirection; a missing buffer writes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raw<'a> {
    pub wire_type: WireType,
    pub bytes: Option<&'a [u8]>,
}

impl<'a> Raw<'a> {
    pub fn new(wire_type: WireType, bytes: &'a [u8]) -> Self {
        Self {
            wire_type,
            bytes: Some(bytes),
        }
    }

    pub fn absent(wire_type: WireType) -> Self {
        Self {
            wire_type,
            bytes: None,
        }
    }
}

/// A concrete value of one bindable kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    ISize(isize),
    USize(usize),
    F32(f32),
    F64(f64),
    Real(f64),
    Bytes(&'a [u8]),
    Text(&'a str),
    Blob(&'a [u8]),
    Datetime(Datetime),
    Timestamp(Datetime),
    Raw(Raw<'a>),
}

impl<'a> Scalar<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::I8(_) => Kind::I8,
            Scalar::U8(_) => Kind::U8,
            Scalar::I16(_) => Kind::I16,
            Scalar::U16(_) => Kind::U16,
            Scalar::I32(_) => Kind::I32,
            Scalar::U32(_) => Kind::U32,
            Scalar::I64(_) => Kind::I64,
            Scalar::U64(_) => Kind::U64,
            Scalar::ISize(_) => Kind::ISize,
            Scalar::USize(_) => Kind::USize,
            Scalar::F32(_) => Kind::F32,
            Scalar::F64(_) => Kind::F64,
            Scalar::Real(_) => Kind::Real,
            Scalar::Bytes(_) => Kind::Bytes,
            Scalar::Text(_) => Kind::Text,
            Scalar::Blob(_) => Kind::Blob,
            Scalar::Datetime(_) => Kind::Datetime,
            Scalar::Timestamp(_) => Kind::Timestamp,
            Scalar::Raw(raw) => Kind::Raw(raw.wire_type),
        }
    }

    /// Two's-complement bit pattern of an integer value, sign-extended to 64 bits.
    pub fn int_bits(&self) -> Option<u64> {
        let bits = match *self {
            Scalar::I8(v) => v as u64,
            Scalar::U8(v) => v as u64,
            Scalar::I16(v) => v as u64,
            Scalar::U16(v) => v as u64,
            Scalar::I32(v) => v as u64,
            Scalar::U32(v) => v as u64,
            Scalar::I64(v) => v as u64,
            Scalar::U64(v) => v,
            Scalar::ISize(v) => v as u64,
            Scalar::USize(v) => v as u64,
            _ => return None,
        };
        Some(bits)
    }

    pub fn float(&self) -> Option<f64> {
        match *self {
            Scalar::F32(v) => Some(v as f64),
            Scalar::F64(v) | Scalar::Real(v) => Some(v),
            _ => None,
        }
    }

    /// Payload of a length-prefixed value; `None` inside means an absent raw buffer.
    pub fn payload(&self) -> Option<Option<&'a [u8]>> {
        match *self {
            Scalar::Bytes(b) | Scalar::Blob(b) => Some(Some(b)),
            Scalar::Text(s) => Some(Some(s.as_bytes())),
            Scalar::Raw(raw) => Some(raw.bytes),
            _ => None,
        }
    }

    pub fn moment(&self) -> Option<&Datetime> {
        match self {
            Scalar::Datetime(d) | Scalar::Timestamp(d) => Some(d),
            _ => None,
        }
    }
}

/// A value handed to the binder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param<'a> {
    /// No value at all.
    Null,
    /// Supplied by value.
    Value(Scalar<'a>),
    /// Supplied through one reference that may not resolve.
    ///
    /// `kind` is the referenced slot's static type; the binder reads only
    /// this and never looks at `target`.
    Ref {
        kind: Kind,
        target: Option<Scalar<'a>>,
    },
}

impl<'a> Param<'a> {
    /// One level of indirection to a value of type `T`.
    pub fn by_ref<T: ParamType + ?Sized>(target: Option<&'a T>) -> Self {
        Param::Ref {
            kind: T::KIND,
            target: target.map(ParamType::scalar),
        }
    }

    /// Static kind, `None` for [`Param::Null`].
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Param::Null => None,
            Param::Value(s) => Some(s.kind()),
            Param::Ref { kind, .. } => Some(*kind),
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self, Param::Ref { .. })
    }

    /// The concrete value, if there is one to write.
    pub fn resolved(&self) -> Option<&Scalar<'a>> {
        match self {
            Param::Null => None,
            Param::Value(s) => Some(s),
            Param::Ref { target, .. } => target.as_ref(),
        }
    }

    /// Nothing will be written for this value: NULL, an unresolved
    /// reference, or a raw override without a buffer.
    pub fn is_absent(&self) -> bool {
        match self.resolved() {
            None => true,
            Some(Scalar::Raw(raw)) => raw.bytes.is_none(),
            Some(_) => false,
        }
    }

    /// Dynamic conversion for values whose type is only known at runtime.
    ///
    /// Accepts the owned bindable types, `Box<T>` and `Option<Box<T>>` as a
    /// single indirection, `()` as NULL and `Raw<'static>`. Anything else,
    /// including a second level of indirection, is
    /// [`BindError::UnsupportedType`].
    pub fn from_any<T: Any>(value: &'a T) -> BindResult<Param<'a>> {
        let any = value as &dyn Any;

        macro_rules! downcast {
            ($($ty:ty),* $(,)?) => {$(
                if let Some(v) = any.downcast_ref::<$ty>() {
                    return Ok(v.to_param());
                }
                if let Some(v) = any.downcast_ref::<Box<$ty>>() {
                    return Ok(Param::by_ref(Some(&**v)));
                }
                if let Some(v) = any.downcast_ref::<Option<Box<$ty>>>() {
                    return Ok(Param::by_ref(v.as_deref()));
                }
            )*};
        }

        downcast!(
            i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64, Real,
            Vec<u8>, String, Blob, Datetime, Timestamp,
        );
        if any.is::<()>() {
            return Ok(Param::Null);
        }
        if let Some(raw) = any.downcast_ref::<Raw<'static>>() {
            return Ok(raw.to_param());
        }
        Err(BindError::unsupported::<T>())
    }
}

/// A native type with a fixed bindable kind.
pub trait ParamType {
    const KIND: Kind;

    fn scalar(&self) -> Scalar<'_>;
}

/// Conversion of a native value into a [`Param`].
///
/// Implemented for every [`ParamType`] by value, for `&T` and `Option<&T>`
/// as one level of indirection, for `()` as NULL, and for [`Raw`].
pub trait ToParam {
    fn to_param(&self) -> Param<'_>;
}

macro_rules! impl_copy_param {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl ParamType for $ty {
            const KIND: Kind = Kind::$variant;

            fn scalar(&self) -> Scalar<'_> {
                Scalar::$variant(*self)
            }
        }
    )*};
}

impl_copy_param!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    isize => ISize,
    usize => USize,
    f32 => F32,
    f64 => F64,
    Datetime => Datetime,
);

impl ParamType for Real {
    const KIND: Kind = Kind::Real;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Real(self.0)
    }
}

impl ParamType for Timestamp {
    const KIND: Kind = Kind::Timestamp;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Timestamp(self.0)
    }
}

impl ParamType for [u8] {
    const KIND: Kind = Kind::Bytes;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Bytes(self)
    }
}

impl ParamType for Vec<u8> {
    const KIND: Kind = Kind::Bytes;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Bytes(self.as_slice())
    }
}

impl ParamType for str {
    const KIND: Kind = Kind::Text;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Text(self)
    }
}

impl ParamType for String {
    const KIND: Kind = Kind::Text;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Text(self.as_str())
    }
}

impl ParamType for Blob {
    const KIND: Kind = Kind::Blob;

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Blob(&self.0)
    }
}

macro_rules! impl_to_param_by_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ToParam for $ty {
            fn to_param(&self) -> Param<'_> {
                Param::Value(self.scalar())
            }
        }
    )*};
}

impl_to_param_by_value!(
    i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64, Real,
    [u8], Vec<u8>, str, String, Blob, Datetime, Timestamp,
);

impl<T: ParamType + ?Sized> ToParam for &T {
    fn to_param(&self) -> Param<'_> {
        Param::by_ref(Some(*self))
    }
}

impl<T: ParamType + ?Sized> ToParam for Option<&T> {
    fn to_param(&self) -> Param<'_> {
        Param::by_ref(*self)
    }
}

impl ToParam for () {
    fn to_param(&self) -> Param<'_> {
        Param::Null
    }
}

impl ToParam for Raw<'_> {
    fn to_param(&self) -> Param<'_> {
        Param::Value(Scalar::Raw(*self))
    }
}

impl ToParam for Param<'_> {
    fn to_param(&self) -> Param<'_> {
        *self
    }
}
