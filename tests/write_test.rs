use bytes::BytesMut;
use mybind::codec::{encode_u16, encode_u24, encode_u32, encode_u64, read_lenenc_int};
use mybind::prelude::*;
use mybind::temporal::encode_datetime;
use mybind::{Param, ToParam, encoded_len, write};
use pretty_assertions::assert_eq;

/// Bind with the default binder, write, and check the byte count agrees
/// with both the returned size and the declared/encoded length.
fn encode(param: Param<'_>) -> Vec<u8> {
    let binder = Binder::default();
    let descriptor = binder.bind(&param);
    let mut buf = Vec::new();
    let written = write(&mut buf, &descriptor, &param).unwrap();
    assert_eq!(written, buf.len());
    assert_eq!(encoded_len(&descriptor, &param).unwrap(), buf.len());
    if let (Length::Fixed(n), false) = (descriptor.length, param.is_absent()) {
        assert_eq!(n, buf.len());
    }
    buf
}

fn datetime_bytes(d: &Datetime) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_datetime(&mut buf, d);
    buf
}

fn prefixed(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = prefix.to_vec();
    out.extend_from_slice(body);
    out
}

#[test]
fn test_strings() {
    let bytes = b"Ala ma Kota!".to_vec();
    let string = String::from("ssss");
    assert_eq!(encode(bytes.to_param()), prefixed(&[bytes.len() as u8], &bytes));
    assert_eq!(encode(string.to_param()), prefixed(&[4], b"ssss"));
    assert_eq!(encode(Param::by_ref::<Vec<u8>>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<String>(None)), Vec::<u8>::new());
}

#[test]
fn test_thirteen_byte_sequence() {
    let bytes: Vec<u8> = (0..13).collect();
    let d = mybind::bind(&bytes);
    assert_eq!(d.wire_type, WireType::VAR_STRING);
    assert_eq!(d.length, Length::Variable);
    let out = encode(bytes.to_param());
    assert_eq!(out[0], 13);
    assert_eq!(&out[1..], bytes.as_slice());
}

#[test]
fn test_64k_blob() {
    let blob = Blob((0..64 * 1024).map(|i| i as u8).collect());
    let out = encode(blob.to_param());
    let expected = prefixed(&prefixed(&[253], &encode_u24(65536)), &blob.0);
    assert_eq!(out.len(), 1 + 3 + 65536);
    assert_eq!(&out[..4], &[0xfd, 0x00, 0x00, 0x01]);
    assert!(out == expected);

    let mut cursor = out.as_slice();
    assert_eq!(read_lenenc_int(&mut cursor), Some(65536));
    assert_eq!(cursor.len(), 65536);
}

#[test]
fn test_medium_and_large_payload_prefixes() {
    let medium = vec![7u8; 300];
    let out = encode(medium.to_param());
    assert_eq!(&out[..3], &[0xfc, 0x2c, 0x01]);
    assert_eq!(out.len(), 303);

    let large = Blob(vec![0u8; 1 << 24]);
    let out = encode(large.to_param());
    assert_eq!(&out[..9], &[0xfe, 0, 0, 0, 1, 0, 0, 0, 0]);
    assert_eq!(out.len(), 9 + (1 << 24));
}

#[test]
fn test_datetimes() {
    let date = Datetime::date(2010, 12, 30).with_time(17, 21, 0);
    let expected = vec![7, 0xda, 0x07, 12, 30, 17, 21, 0];
    assert_eq!(encode(date.to_param()), expected);
    assert_eq!(encode(Param::by_ref(Some(&date))), expected);
    assert_eq!(encode(date.to_param()), datetime_bytes(&date));
    assert_eq!(encode(Param::by_ref::<Datetime>(None)), Vec::<u8>::new());

    let tstamp = Timestamp(Datetime::date(2001, 2, 3).with_time(7, 2, 0));
    assert_eq!(encode(tstamp.to_param()), datetime_bytes(&tstamp.0));
    assert_eq!(encode(Param::by_ref(Some(&tstamp))), datetime_bytes(&tstamp.0));
    assert_eq!(encode(Param::by_ref::<Timestamp>(None)), Vec::<u8>::new());
}

#[test]
fn test_temporal_body_lengths() {
    let midnight = Datetime::date(2024, 1, 2);
    let with_second = midnight.with_time(0, 0, 1);
    let with_fraction = with_second.with_micros(500);
    assert_eq!(encode(Datetime::default().to_param()), vec![0]);
    assert_eq!(encode(midnight.to_param())[0], 4);
    assert_eq!(encode(with_second.to_param())[0], 7);
    let out = encode(with_fraction.to_param());
    assert_eq!(out[0], 11);
    assert_eq!(out.len(), 12);
    assert_eq!(&out[8..], &encode_u32(500));
}

#[test]
fn test_integers() {
    let int = 7isize;
    let uint = 8usize;
    assert_eq!(encode(int.to_param()), encode_u32(7).to_vec());
    assert_eq!(encode(3i16.to_param()), encode_u16(3).to_vec());
    assert_eq!(encode(5i32.to_param()), encode_u32(5).to_vec());
    assert_eq!(
        encode(0x7000_1000_2000_3001i64.to_param()),
        encode_u64(0x7000_1000_2000_3001).to_vec()
    );

    assert_eq!(encode(uint.to_param()), encode_u32(8).to_vec());
    assert_eq!(encode(4u16.to_param()), encode_u16(4).to_vec());
    assert_eq!(encode(6u32.to_param()), encode_u32(6).to_vec());
    assert_eq!(
        encode(0xffff_0000_ffff_0000u64.to_param()),
        encode_u64(0xffff_0000_ffff_0000).to_vec()
    );

    assert_eq!(encode(Param::by_ref(Some(&int))), encode_u32(7).to_vec());
    assert_eq!(encode(Param::by_ref(Some(&uint))), encode_u32(8).to_vec());
    assert_eq!(encode(Param::by_ref(Some(&6u32))), encode_u32(6).to_vec());

    assert_eq!(encode(Param::by_ref::<isize>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<i16>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<i32>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<i64>(None)), Vec::<u8>::new());
}

#[test]
fn test_floats() {
    let float = Real(3.14159e3);
    let float32 = 1e10f32;
    let float64 = 256e256f64;
    let narrowed = encode_u32((3.14159e3f64 as f32).to_bits()).to_vec();

    assert_eq!(encode(float.to_param()), narrowed);
    assert_eq!(encode(float32.to_param()), encode_u32(float32.to_bits()).to_vec());
    assert_eq!(encode(float64.to_param()), encode_u64(float64.to_bits()).to_vec());

    assert_eq!(encode(Param::by_ref(Some(&float))), narrowed);
    assert_eq!(encode(Param::by_ref(Some(&float32))), encode_u32(float32.to_bits()).to_vec());
    assert_eq!(encode(Param::by_ref(Some(&float64))), encode_u64(float64.to_bits()).to_vec());

    assert_eq!(encode(Param::by_ref::<Real>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<f32>(None)), Vec::<u8>::new());
    assert_eq!(encode(Param::by_ref::<f64>(None)), Vec::<u8>::new());
}

#[test]
fn test_null_writes_nothing() {
    let d = mybind::bind(&());
    assert_eq!(d.length, Length::Fixed(0));
    assert_eq!(encode(Param::Null), Vec::<u8>::new());
}

#[test]
fn test_raw_override() {
    let raw_bytes = [3u8, 2, 1];
    let raw = Raw::new(WireType::INT24, &raw_bytes);
    assert_eq!(encode(raw.to_param()), vec![3, 3, 2, 1]);

    let decimal = b"12.50";
    let raw = Raw::new(WireType::NEWDECIMAL, decimal);
    assert_eq!(encode(raw.to_param()), prefixed(&[5], decimal));
}

#[test]
fn test_bytes_mut_destination() {
    let binder = Binder::default();
    let params = [
        Bound::of(&binder, &1u8),
        Bound::of(&binder, "hi"),
        Bound::new(&binder, Param::by_ref::<u64>(None)),
        Bound::of(&binder, &-1i16),
    ];
    let mut buf = BytesMut::new();
    let written = mybind::write_params(&mut buf, &params).unwrap();
    assert_eq!(written, 6);
    assert_eq!(&buf[..], &[1, 2, b'h', b'i', 0xff, 0xff]);
    let absent: Vec<bool> = params.iter().map(Bound::is_absent).collect();
    assert_eq!(absent, vec![false, false, true, false]);
}
