//! Value writer: appends the binary encoding of a bound value.
//!
//! The descriptor picks the encoding, the value supplies the bytes:
//!
//! - NULL, or a reference that does not resolve: nothing
//! - fixed-width numbers: exactly `length` bytes, little-endian
//! - DATETIME / TIMESTAMP: length byte + minimal body
//! - everything else: length-encoded size + raw bytes
//!
//! Writing nothing for an unresolved reference is not an error. The row's
//! NULL bitmap, maintained by the caller, is what tells the server the slot
//! is empty.

use bytes::BufMut;

use crate::binder::Binder;
use crate::codec::{lenenc_len, put_lenenc_bytes, put_uint_le};
use crate::error::{BindError, BindResult};
use crate::param::{Param, Scalar, ToParam};
use crate::temporal::{Datetime, datetime_len, encode_datetime};
use crate::types::{BoundDescriptor, Length, WireType};

/// What the writer will emit for one value.
enum Plan<'a> {
    Skip,
    Int { bits: u64, width: usize },
    F32(f32),
    F64(f64),
    Prefixed(&'a [u8]),
    Moment(Datetime),
}

impl Plan<'_> {
    fn len(&self) -> usize {
        match self {
            Plan::Skip => 0,
            Plan::Int { width, .. } => *width,
            Plan::F32(_) => 4,
            Plan::F64(_) => 8,
            Plan::Prefixed(data) => lenenc_len(data.len() as u64) + data.len(),
            Plan::Moment(d) => datetime_len(d),
        }
    }

    fn emit<B: BufMut + ?Sized>(&self, dst: &mut B) -> usize {
        match self {
            Plan::Skip => 0,
            Plan::Int { bits, width } => {
                put_uint_le(dst, *bits, *width);
                *width
            }
            Plan::F32(v) => {
                put_uint_le(dst, v.to_bits() as u64, 4);
                4
            }
            Plan::F64(v) => {
                put_uint_le(dst, v.to_bits(), 8);
                8
            }
            Plan::Prefixed(data) => put_lenenc_bytes(dst, data),
            Plan::Moment(d) => encode_datetime(dst, d),
        }
    }
}

fn is_temporal(wire_type: WireType) -> bool {
    matches!(wire_type.base(), WireType::DATETIME | WireType::TIMESTAMP)
}

fn plan<'a>(descriptor: &BoundDescriptor, param: &Param<'a>) -> BindResult<Plan<'a>> {
    // Raw bytes are prefixed whatever code they carry, NULL included.
    if let Some(Scalar::Raw(raw)) = param.resolved() {
        return Ok(raw.bytes.map_or(Plan::Skip, Plan::Prefixed));
    }
    if descriptor.is_null() {
        return Ok(Plan::Skip);
    }
    let Some(scalar) = param.resolved() else {
        tracing::trace!(wire_type = %descriptor.wire_type, "unresolved reference, writing nothing");
        return Ok(Plan::Skip);
    };
    let mismatch = || BindError::Mismatch {
        wire_type: descriptor.wire_type,
        kind: scalar.kind(),
    };

    match descriptor.length {
        Length::Fixed(width) => match descriptor.wire_type.base() {
            WireType::FLOAT if width == 4 => {
                scalar.float().map(|v| Plan::F32(v as f32)).ok_or_else(mismatch)
            }
            WireType::DOUBLE if width == 8 => scalar.float().map(Plan::F64).ok_or_else(mismatch),
            WireType::FLOAT | WireType::DOUBLE => Err(mismatch()),
            _ if matches!(width, 1 | 2 | 3 | 4 | 8) => {
                let bits = scalar.int_bits().ok_or_else(mismatch)?;
                warn_if_truncated(scalar, width);
                Ok(Plan::Int { bits, width })
            }
            _ => Err(mismatch()),
        },
        Length::Variable if is_temporal(descriptor.wire_type) => {
            scalar.moment().copied().map(Plan::Moment).ok_or_else(mismatch)
        }
        Length::Variable => match scalar.payload() {
            Some(Some(data)) => Ok(Plan::Prefixed(data)),
            _ => Err(mismatch()),
        },
    }
}

fn warn_if_truncated(scalar: &Scalar<'_>, width: usize) {
    let fits = match *scalar {
        Scalar::ISize(v) if width == 4 => i32::try_from(v).is_ok(),
        Scalar::USize(v) if width == 4 => u32::try_from(v).is_ok(),
        _ => true,
    };
    if !fits {
        tracing::warn!(
            kind = %scalar.kind(),
            width,
            "platform-width integer does not fit its wire type and will be truncated"
        );
    }
}

/// Exact number of bytes [`write`] would append.
pub fn encoded_len(descriptor: &BoundDescriptor, param: &Param<'_>) -> BindResult<usize> {
    Ok(plan(descriptor, param)?.len())
}

/// Append the encoding of `param` under `descriptor` to `dst`.
///
/// Returns the number of bytes written.
pub fn write<B: BufMut + ?Sized>(
    dst: &mut B,
    descriptor: &BoundDescriptor,
    param: &Param<'_>,
) -> BindResult<usize> {
    let plan = plan(descriptor, param)?;
    let written = plan.emit(dst);
    tracing::trace!(wire_type = %descriptor.wire_type, written, "wrote value");
    Ok(written)
}

/// Write the parameter type block: two bytes per parameter, type then flags.
pub fn write_param_types<B: BufMut + ?Sized>(dst: &mut B, descriptors: &[BoundDescriptor]) -> usize {
    for d in descriptors {
        dst.put_u16_le(d.wire_type.bits());
    }
    descriptors.len() * 2
}

/// A value together with its descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound<'a> {
    pub descriptor: BoundDescriptor,
    pub param: Param<'a>,
}

impl<'a> Bound<'a> {
    pub fn new(binder: &Binder, param: Param<'a>) -> Self {
        Self {
            descriptor: binder.bind(&param),
            param,
        }
    }

    pub fn of<V: ToParam + ?Sized>(binder: &Binder, value: &'a V) -> Self {
        Self::new(binder, value.to_param())
    }

    /// Exact number of bytes [`Bound::write_to`] appends.
    pub fn encoded_len(&self) -> BindResult<usize> {
        encoded_len(&self.descriptor, &self.param)
    }

    /// Nothing is written for this value; its NULL bitmap bit must be set.
    pub fn is_absent(&self) -> bool {
        match self.param.resolved() {
            Some(Scalar::Raw(raw)) => raw.bytes.is_none(),
            _ => self.descriptor.is_null() || self.param.is_absent(),
        }
    }

    pub fn write_to<B: BufMut + ?Sized>(&self, dst: &mut B) -> BindResult<usize> {
        write(dst, &self.descriptor, &self.param)
    }
}

/// Write every value in order, returning the total bytes written.
pub fn write_params<B: BufMut + ?Sized>(dst: &mut B, params: &[Bound<'_>]) -> BindResult<usize> {
    params.iter().try_fold(0, |total, b| Ok(total + b.write_to(dst)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{Blob, Raw, Real};
    use crate::binder::WidthPolicy;

    fn encode<V: ToParam + ?Sized>(value: &V) -> Vec<u8> {
        let bound = Bound::of(&Binder::default(), value);
        let mut buf = Vec::new();
        let n = bound.write_to(&mut buf).unwrap();
        assert_eq!(n, buf.len());
        assert_eq!(bound.encoded_len().unwrap(), buf.len());
        buf
    }

    #[test]
    fn test_unsigned_long() {
        assert_eq!(encode(&6u32), vec![6, 0, 0, 0]);
    }

    #[test]
    fn test_signed_negative() {
        assert_eq!(encode(&-2i16), vec![0xfe, 0xff]);
        assert_eq!(encode(&-1i8), vec![0xff]);
    }

    #[test]
    fn test_floats_use_ieee_bits() {
        assert_eq!(encode(&1e10f32), 1e10f32.to_bits().to_le_bytes().to_vec());
        assert_eq!(encode(&256e256f64), 256e256f64.to_bits().to_le_bytes().to_vec());
        assert_eq!(
            encode(&Real(3.14159e3)),
            (3.14159e3f64 as f32).to_bits().to_le_bytes().to_vec()
        );
    }

    #[test]
    fn test_strings_are_length_prefixed() {
        let out = encode("ssss");
        assert_eq!(out, b"\x04ssss".to_vec());
    }

    #[test]
    fn test_null_and_unresolved_write_nothing() {
        assert!(encode(&()).is_empty());
        assert!(encode(&None::<&String>).is_empty());
        assert!(encode(&None::<&Blob>).is_empty());
        assert!(encode(&None::<&f64>).is_empty());
    }

    #[test]
    fn test_raw_written_verbatim() {
        let bytes = [3u8, 2, 1];
        assert_eq!(encode(&Raw::new(WireType::INT24, &bytes)), vec![3, 3, 2, 1]);
        assert!(encode(&Raw::absent(WireType::INT24)).is_empty());
    }

    #[test]
    fn test_raw_with_temporal_code_is_not_reencoded() {
        let bytes = [1u8, 2];
        assert_eq!(encode(&Raw::new(WireType::DATETIME, &bytes)), vec![2, 1, 2]);
    }

    #[test]
    fn test_mismatched_descriptor() {
        let descriptor = BoundDescriptor {
            wire_type: WireType::LONG,
            indirect: false,
            length: Length::Fixed(4),
        };
        let mut buf = Vec::new();
        let err = write(&mut buf, &descriptor, &"text".to_param()).unwrap_err();
        assert!(matches!(err, BindError::Mismatch { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_float_descriptor_width_must_match() {
        let float_as_eight = BoundDescriptor {
            wire_type: WireType::FLOAT,
            indirect: false,
            length: Length::Fixed(8),
        };
        let double_as_four = BoundDescriptor {
            wire_type: WireType::DOUBLE,
            indirect: false,
            length: Length::Fixed(4),
        };
        let value = 1.5f64.to_param();
        for descriptor in [float_as_eight, double_as_four] {
            let mut buf = Vec::new();
            let err = write(&mut buf, &descriptor, &value).unwrap_err();
            assert!(matches!(err, BindError::Mismatch { .. }));
            assert!(buf.is_empty());
            assert!(encoded_len(&descriptor, &value).is_err());
        }
    }

    #[test]
    fn test_mismatched_bound_reports_error_size() {
        let bound = Bound {
            descriptor: BoundDescriptor {
                wire_type: WireType::LONG,
                indirect: false,
                length: Length::Fixed(4),
            },
            param: "text".to_param(),
        };
        assert!(matches!(bound.encoded_len(), Err(BindError::Mismatch { .. })));
    }

    #[test]
    fn test_raw_with_null_code_is_still_written() {
        let bytes = [1u8, 2, 3];
        let raw = Raw::new(WireType::NULL, &bytes);
        let bound = Bound::of(&Binder::default(), &raw);
        assert_eq!(bound.descriptor.wire_type, WireType::NULL);
        assert!(!bound.is_absent());
        assert_eq!(encode(&raw), vec![3, 1, 2, 3]);
        assert!(encode(&Raw::absent(WireType::NULL)).is_empty());
        assert!(Bound::of(&Binder::default(), &Raw::absent(WireType::NULL)).is_absent());
    }

    #[test]
    fn test_native_policy_writes_host_width() {
        let binder = Binder::new(WidthPolicy::Native);
        let bound = Bound::of(&binder, &-7isize);
        let mut buf = Vec::new();
        bound.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), std::mem::size_of::<isize>().max(4));
        assert_eq!(buf[0], 0xf9);
    }

    #[test]
    fn test_narrow_policy_truncates() {
        let wide = usize::MAX;
        let bound = Bound::of(&Binder::default(), &wide);
        let mut buf = Vec::new();
        bound.write_to(&mut buf).unwrap();
        assert_eq!(buf, vec![0xff; 4]);
    }

    #[test]
    fn test_param_type_block() {
        let binder = Binder::default();
        let descriptors = [binder.bind_value(&6u32), binder.bind_value("x"), binder.bind(&Param::Null)];
        let mut buf = Vec::new();
        assert_eq!(write_param_types(&mut buf, &descriptors), 6);
        assert_eq!(buf, vec![3, 0x80, 254, 0, 6, 0]);
    }

    #[test]
    fn test_write_params_in_order() {
        let binder = Binder::default();
        let text = String::from("ab");
        let missing: Option<&i32> = None;
        let params = [
            Bound::of(&binder, &1u8),
            Bound::of(&binder, &missing),
            Bound::of(&binder, &text),
        ];
        assert!(params[1].is_absent());
        let mut buf = Vec::new();
        assert_eq!(write_params(&mut buf, &params).unwrap(), 4);
        assert_eq!(buf, vec![1, 2, b'a', b'b']);
    }
}
